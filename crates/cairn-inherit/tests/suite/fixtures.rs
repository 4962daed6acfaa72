use std::sync::Arc;

use cairn_signature::{ActionPrototype, FormalParameter, ParameterSignature};
use cairn_types::{OperationDescriptor, OracleError, TypeDescriptor, TypeOracle, TypeStore};

pub fn proto(name: &str, types: &[&str]) -> ActionPrototype {
    ActionPrototype::new(name, ParameterSignature::new(types.iter().copied(), false))
}

pub fn variadic_proto(name: &str, types: &[&str]) -> ActionPrototype {
    ActionPrototype::new(name, ParameterSignature::new(types.iter().copied(), true))
}

pub fn abstract_op(name: &str, types: &[&str]) -> OperationDescriptor {
    types
        .iter()
        .enumerate()
        .fold(OperationDescriptor::new(name).abstract_(), |op, (idx, ty)| {
            op.param(FormalParameter::new(format!("arg{idx}"), *ty))
        })
}

pub fn concrete_op(name: &str, types: &[&str]) -> OperationDescriptor {
    let mut op = abstract_op(name, types);
    op.is_abstract = false;
    op
}

/// The `Lifecycle` / `Custom` hierarchy used by the end-to-end scenarios.
pub fn agent_store() -> TypeStore {
    TypeStore::new()
        .with(
            TypeDescriptor::class("Base").constructor(cairn_types::ConstructorDescriptor::new(
                vec![FormalParameter::new("x", "int")],
            )),
        )
        .with(
            TypeDescriptor::capability("Lifecycle").operation(
                OperationDescriptor::new("spawn")
                    .abstract_()
                    .returns("java.util.UUID")
                    .param(FormalParameter::new("agentType", "java.lang.Object"))
                    .param(FormalParameter::new("params", "java.lang.Object").repeated()),
            ),
        )
        .with(TypeDescriptor::capability("Custom"))
}

/// Oracle that fails for one name and delegates everything else.
pub struct FailingOracle {
    pub inner: TypeStore,
    pub failing: &'static str,
}

impl TypeOracle for FailingOracle {
    fn resolve(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, OracleError> {
        if name == self.failing {
            return Err(OracleError::Unavailable {
                name: name.to_string(),
                message: "index is rebuilding".to_string(),
            });
        }
        self.inner.resolve(name)
    }
}
