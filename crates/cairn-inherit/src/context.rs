use std::collections::BTreeMap;

use cairn_signature::{ActionParameterTypes, ActionPrototype, SignatureError};
use cairn_types::{ConstructorDescriptor, FieldDescriptor, OperationDescriptor, OracleError};
use serde::Serialize;
use thiserror::Error;

/// Which classifications the caller wants to keep.
///
/// Discarding an output only drops it from the finished context; the traversal still
/// performs the full bookkeeping, so the remaining outputs are unaffected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outputs {
    pub final_operations: bool,
    pub overridable_operations: bool,
    pub operations_to_implement: bool,
    pub inherited_fields: bool,
    pub constructors: bool,
}

impl Outputs {
    pub const ALL: Outputs = Outputs {
        final_operations: true,
        overridable_operations: true,
        operations_to_implement: true,
        inherited_fields: true,
        constructors: true,
    };

    pub fn all() -> Self {
        Self::ALL
    }

    #[must_use]
    pub fn discard_final_operations(mut self) -> Self {
        self.final_operations = false;
        self
    }

    #[must_use]
    pub fn discard_overridable_operations(mut self) -> Self {
        self.overridable_operations = false;
        self
    }

    #[must_use]
    pub fn discard_operations_to_implement(mut self) -> Self {
        self.operations_to_implement = false;
        self
    }

    #[must_use]
    pub fn discard_inherited_fields(mut self) -> Self {
        self.inherited_fields = false;
        self
    }

    #[must_use]
    pub fn discard_constructors(mut self) -> Self {
        self.constructors = false;
        self
    }
}

impl Default for Outputs {
    fn default() -> Self {
        Self::ALL
    }
}

/// Non-fatal problem found while walking the hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// The oracle does not know `name`; the branch contributes nothing.
    UnresolvedType {
        name: String,
        referenced_from: Option<String>,
    },
    /// The operation was excluded from classification.
    MalformedOperation {
        declaring_type: String,
        operation: String,
        #[serde(serialize_with = "serialize_error")]
        error: SignatureError,
    },
    /// The constructor was excluded from the constructor set.
    MalformedConstructor {
        declaring_type: String,
        #[serde(serialize_with = "serialize_error")]
        error: SignatureError,
    },
}

fn serialize_error<S: serde::Serializer>(
    error: &SignatureError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Two operations of one type that expand to a shared prototype.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateOperation {
    pub declaring_type: String,
    pub prototype: ActionPrototype,
    pub first: OperationDescriptor,
    pub second: OperationDescriptor,
}

/// Two constructors of one type with the same parameter types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateConstructor {
    pub declaring_type: String,
    pub parameter_types: ActionParameterTypes,
    pub first: ConstructorDescriptor,
    pub second: ConstructorDescriptor,
}

/// The oracle failed in a way that makes the whole request meaningless.
#[derive(Debug, Error)]
#[error("resolution aborted while resolving `{name}`")]
pub struct ResolutionAborted {
    pub name: String,
    #[source]
    pub source: OracleError,
}

/// Result of one inheritance resolution request.
///
/// Created per request, filled by [`crate::InheritanceContextBuilder::populate`] and
/// then only read. Populating again replaces the previous result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InheritanceContext {
    outputs: Outputs,
    pub(crate) final_operations: BTreeMap<ActionPrototype, OperationDescriptor>,
    pub(crate) overridable_operations: BTreeMap<ActionPrototype, OperationDescriptor>,
    pub(crate) operations_to_implement: BTreeMap<ActionPrototype, OperationDescriptor>,
    pub(crate) inherited_fields: BTreeMap<String, FieldDescriptor>,
    pub(crate) constructors: BTreeMap<ActionParameterTypes, ConstructorDescriptor>,
    pub(crate) duplicate_operations: Vec<DuplicateOperation>,
    pub(crate) duplicate_constructors: Vec<DuplicateConstructor>,
    pub(crate) warnings: Vec<ResolutionWarning>,
}

impl InheritanceContext {
    pub fn new(outputs: Outputs) -> Self {
        Self {
            outputs,
            ..Self::default()
        }
    }

    pub fn outputs(&self) -> Outputs {
        self.outputs
    }

    pub fn final_operations(&self) -> &BTreeMap<ActionPrototype, OperationDescriptor> {
        &self.final_operations
    }

    pub fn overridable_operations(&self) -> &BTreeMap<ActionPrototype, OperationDescriptor> {
        &self.overridable_operations
    }

    pub fn operations_to_implement(&self) -> &BTreeMap<ActionPrototype, OperationDescriptor> {
        &self.operations_to_implement
    }

    pub fn inherited_fields(&self) -> &BTreeMap<String, FieldDescriptor> {
        &self.inherited_fields
    }

    pub fn constructors(&self) -> &BTreeMap<ActionParameterTypes, ConstructorDescriptor> {
        &self.constructors
    }

    /// Operation conflicts found inside any visited type, in visit order.
    pub fn duplicate_operations(&self) -> &[DuplicateOperation] {
        &self.duplicate_operations
    }

    /// Constructor conflicts found on the supertype.
    pub fn duplicate_constructors(&self) -> &[DuplicateConstructor] {
        &self.duplicate_constructors
    }

    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }

    /// Drop every output the caller asked to discard.
    pub(crate) fn apply_outputs(&mut self) {
        let outputs = self.outputs;
        if !outputs.final_operations {
            self.final_operations.clear();
        }
        if !outputs.overridable_operations {
            self.overridable_operations.clear();
        }
        if !outputs.operations_to_implement {
            self.operations_to_implement.clear();
        }
        if !outputs.inherited_fields {
            self.inherited_fields.clear();
        }
        if !outputs.constructors {
            self.constructors.clear();
            self.duplicate_constructors.clear();
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.outputs);
    }
}

pub(crate) fn push_warning(warnings: &mut Vec<ResolutionWarning>, warning: ResolutionWarning) {
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}
