use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ActionPrototype, ParameterSignature};

/// One declared formal parameter of an operation or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormalParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub variadic: bool,
}

impl FormalParameter {
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            has_default: false,
            variadic: false,
        }
    }

    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.variadic = true;
        self
    }
}

/// Anything that declares a named parameter list and can therefore be expanded.
pub trait SignatureSource {
    fn name(&self) -> &str;
    fn parameters(&self) -> &[FormalParameter];
}

/// A parameter list that violates the default-value or variadic placement rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("parameter `{name}` (#{index}) has a default value but is followed by a parameter without one")]
    DefaultOnNonTrailingParameter { index: usize, name: String },
    #[error("parameter `{name}` (#{index}) is variadic but is not the last parameter")]
    VariadicNotLast { index: usize, name: String },
    #[error("variadic parameter `{name}` (#{index}) cannot have a default value")]
    VariadicWithDefault { index: usize, name: String },
    #[error("parameter `{name}` (#{index}) has a default value but the operation is variadic")]
    DefaultBeforeVariadic { index: usize, name: String },
}

impl SignatureError {
    /// `true` for violations of the variadic rules, `false` for default placement.
    pub fn is_variadic_misuse(&self) -> bool {
        matches!(
            self,
            SignatureError::VariadicNotLast { .. } | SignatureError::VariadicWithDefault { .. }
        )
    }

    /// Position of the offending parameter.
    pub fn index(&self) -> usize {
        match self {
            SignatureError::DefaultOnNonTrailingParameter { index, .. }
            | SignatureError::VariadicNotLast { index, .. }
            | SignatureError::VariadicWithDefault { index, .. }
            | SignatureError::DefaultBeforeVariadic { index, .. } => *index,
        }
    }
}

/// Compute the prototypes callable through one declaration.
///
/// - no defaults, not variadic: one prototype with every parameter;
/// - variadic: one prototype, flagged variadic;
/// - a trailing run of `k` defaulted parameters: `k + 1` prototypes, one per arity
///   from `total - k` to `total`.
pub fn expand<S>(operation: &S) -> Result<BTreeSet<ActionPrototype>, SignatureError>
where
    S: SignatureSource + ?Sized,
{
    let params = operation.parameters();
    let first_default = check_parameters(params)?;

    let types: Vec<String> = params.iter().map(|p| p.type_id.clone()).collect();
    let variadic = params.last().is_some_and(|p| p.variadic);

    let mut out = BTreeSet::new();
    match first_default {
        Some(first) => {
            for arity in first..=types.len() {
                out.insert(ActionPrototype::new(
                    operation.name(),
                    ParameterSignature::truncated(&types, arity),
                ));
            }
        }
        None => {
            out.insert(ActionPrototype::new(
                operation.name(),
                ParameterSignature::new(types, variadic),
            ));
        }
    }
    Ok(out)
}

/// Validate placement rules and return the index of the first defaulted parameter.
fn check_parameters(params: &[FormalParameter]) -> Result<Option<usize>, SignatureError> {
    let last = params.len().saturating_sub(1);
    for (index, param) in params.iter().enumerate() {
        if param.variadic && index != last {
            return Err(SignatureError::VariadicNotLast {
                index,
                name: param.name.clone(),
            });
        }
        if param.variadic && param.has_default {
            return Err(SignatureError::VariadicWithDefault {
                index,
                name: param.name.clone(),
            });
        }
    }

    let Some(first) = params.iter().position(|p| p.has_default) else {
        return Ok(None);
    };

    if params.last().is_some_and(|p| p.variadic) {
        return Err(SignatureError::DefaultBeforeVariadic {
            index: first,
            name: params[first].name.clone(),
        });
    }

    if let Some(gap) = params[first..].iter().position(|p| !p.has_default) {
        // The offending parameter is the last defaulted one before the gap.
        let index = first + gap - 1;
        return Err(SignatureError::DefaultOnNonTrailingParameter {
            index,
            name: params[index].name.clone(),
        });
    }

    Ok(Some(first))
}

/// Two declarations of the same type whose expanded prototype sets intersect.
///
/// `first` and `second` index into the declaration list passed to
/// [`find_signature_conflicts`], with `first < second`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignatureConflict {
    pub prototype: ActionPrototype,
    pub first: usize,
    pub second: usize,
}

/// Report every pair of declarations that expand to a shared prototype.
///
/// Declarations that fail [`expand`] are skipped; they are reported through their own
/// [`SignatureError`]. Each pair is reported once, keyed by the smallest shared
/// prototype, in declaration order.
pub fn find_signature_conflicts<'a, S, I>(declarations: I) -> Vec<SignatureConflict>
where
    S: SignatureSource + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let expanded: Vec<Option<BTreeSet<ActionPrototype>>> = declarations
        .into_iter()
        .map(|decl| expand(decl).ok())
        .collect();

    let mut out = Vec::new();
    for (second, later) in expanded.iter().enumerate() {
        let Some(later) = later else { continue };
        for (first, earlier) in expanded[..second].iter().enumerate() {
            let Some(earlier) = earlier else { continue };
            if let Some(shared) = earlier.intersection(later).next() {
                out.push(SignatureConflict {
                    prototype: shared.clone(),
                    first,
                    second,
                });
            }
        }
    }
    out
}

/// Whether `candidate` is a valid override of `overridden`.
///
/// The exact (full-arity) prototype of either side must be callable through the
/// other side's expanded set. Malformed declarations never match.
pub fn is_override_of<A, B>(candidate: &A, overridden: &B) -> bool
where
    A: SignatureSource + ?Sized,
    B: SignatureSource + ?Sized,
{
    let (Ok(candidate_set), Ok(overridden_set)) = (expand(candidate), expand(overridden)) else {
        return false;
    };
    let (Some(candidate_full), Some(overridden_full)) =
        (candidate_set.last(), overridden_set.last())
    else {
        return false;
    };
    overridden_set.contains(candidate_full) || candidate_set.contains(overridden_full)
}
