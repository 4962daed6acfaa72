use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered list of parameter type identifiers.
///
/// Identifiers are compared as plain strings; `java.lang.Object` and `Object` are two
/// different identifiers. Only the final slot may be variadic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterSignature {
    types: Vec<String>,
    #[serde(default)]
    variadic: bool,
}

/// Parameter signature used as the key of constructor maps.
pub type ActionParameterTypes = ParameterSignature;

impl ParameterSignature {
    /// Build a signature. A variadic flag on an empty list is dropped since there is
    /// no final slot to mark.
    pub fn new<I, S>(types: I, variadic: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        let variadic = variadic && !types.is_empty();
        Self { types, variadic }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// The first `n` slots of this signature, never variadic.
    pub(crate) fn truncated(types: &[String], n: usize) -> Self {
        Self {
            types: types[..n].to_vec(),
            variadic: false,
        }
    }
}

impl Ord for ParameterSignature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.types
            .len()
            .cmp(&other.types.len())
            .then_with(|| self.types.cmp(&other.types))
            .then_with(|| self.variadic.cmp(&other.variadic))
    }
}

impl PartialOrd for ParameterSignature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ParameterSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        let last = self.types.len().saturating_sub(1);
        for (idx, ty) in self.types.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(ty)?;
            if self.variadic && idx == last {
                f.write_str("*")?;
            }
        }
        f.write_str(")")
    }
}

/// Identity of a callable member: operation name plus parameter signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionPrototype {
    name: String,
    signature: ParameterSignature,
}

impl ActionPrototype {
    pub fn new(name: impl Into<String>, signature: ParameterSignature) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &ParameterSignature {
        &self.signature
    }
}

impl Ord for ActionPrototype {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.signature.cmp(&other.signature))
    }
}

impl PartialOrd for ActionPrototype {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ActionPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.signature)
    }
}
