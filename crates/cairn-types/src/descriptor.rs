use std::collections::BTreeSet;

use cairn_signature::{
    expand, ActionPrototype, FormalParameter, ParameterSignature, SignatureError, SignatureSource,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A concrete or abstract type with a single supertype.
    #[default]
    Class,
    /// An interface-like type contributing operations to its implementors.
    Capability,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<FormalParameter>,
    /// Filled in by [`crate::TypeStore`] when left empty in a model file.
    #[serde(default)]
    pub declaring_type: String,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub is_abstract: bool,
    /// `None` when the operation returns no value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

impl OperationDescriptor {
    /// A concrete, overridable operation with no parameters and no return value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            declaring_type: String::new(),
            is_final: false,
            is_abstract: false,
            return_type: None,
        }
    }

    #[must_use]
    pub fn param(mut self, param: FormalParameter) -> Self {
        self.parameters.push(param);
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn final_(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Whether this declaration carries a body.
    pub fn is_concrete(&self) -> bool {
        !self.is_abstract
    }

    pub fn is_variadic(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.variadic)
    }

    pub fn prototypes(&self) -> Result<BTreeSet<ActionPrototype>, SignatureError> {
        expand(self)
    }
}

impl SignatureSource for OperationDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[FormalParameter] {
        &self.parameters
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default)]
    pub declaring_type: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            declaring_type: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDescriptor {
    #[serde(default)]
    pub parameters: Vec<FormalParameter>,
    #[serde(default)]
    pub declaring_type: String,
}

impl ConstructorDescriptor {
    pub fn new(parameters: Vec<FormalParameter>) -> Self {
        Self {
            parameters,
            declaring_type: String::new(),
        }
    }

    /// The constructor map key. Constructors carry no default values, so this is
    /// the full parameter list.
    pub fn parameter_types(&self) -> ParameterSignature {
        ParameterSignature::new(
            self.parameters.iter().map(|p| p.type_id.clone()),
            self.parameters.last().is_some_and(|p| p.variadic),
        )
    }

    pub fn is_parameterless(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl SignatureSource for ConstructorDescriptor {
    fn name(&self) -> &str {
        "new"
    }

    fn parameters(&self) -> &[FormalParameter] {
        &self.parameters
    }
}

/// Everything the engine needs to know about one named type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub operations: Vec<OperationDescriptor>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDescriptor>,
}

impl TypeDescriptor {
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Class)
    }

    pub fn capability(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Capability)
    }

    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_final: false,
            is_abstract: false,
            supertype: None,
            capabilities: Vec::new(),
            operations: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
        }
    }

    #[must_use]
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    #[must_use]
    pub fn implements(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    #[must_use]
    pub fn operation(mut self, op: OperationDescriptor) -> Self {
        self.operations.push(op);
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn constructor(mut self, ctor: ConstructorDescriptor) -> Self {
        self.constructors.push(ctor);
        self
    }

    #[must_use]
    pub fn final_(mut self) -> Self {
        self.is_final = true;
        self
    }

    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn is_capability(&self) -> bool {
        self.kind == TypeKind::Capability
    }

    /// `true` when the type declares a zero-argument constructor, or declares no
    /// constructor at all and therefore relies on the implicit default.
    pub fn has_parameterless_constructor(&self) -> bool {
        self.constructors.is_empty() || self.constructors.iter().any(|c| c.is_parameterless())
    }

    /// Direct supertypes in traversal order: the supertype first, then capabilities.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &str> {
        self.supertype
            .as_deref()
            .into_iter()
            .chain(self.capabilities.iter().map(String::as_str))
    }

    /// Fill in the declaring type of members that did not name one.
    pub(crate) fn normalize(&mut self) {
        for op in &mut self.operations {
            if op.declaring_type.is_empty() {
                op.declaring_type = self.name.clone();
            }
        }
        for field in &mut self.fields {
            if field.declaring_type.is_empty() {
                field.declaring_type = self.name.clone();
            }
        }
        for ctor in &mut self.constructors {
            if ctor.declaring_type.is_empty() {
                ctor.declaring_type = self.name.clone();
            }
        }
    }
}
