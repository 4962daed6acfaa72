use cairn_signature::{find_signature_conflicts, ActionPrototype};
use cairn_types::{OperationDescriptor, TypeDescriptor, TypeOracle};

use crate::context::push_warning;
use crate::walk::Walk;
use crate::{
    ConstructorCollector, DuplicateOperation, InheritanceContext, ResolutionAborted,
    ResolutionWarning,
};

/// Classifies every operation reachable from a supertype and a list of capabilities.
///
/// Visit order:
///
/// 1. the supertype chain, most derived first;
/// 2. the capabilities declared by chain members, chain order then declaration order;
/// 3. the directly declared capabilities, in declaration order, each walked depth-first.
///
/// Per prototype, the first visited concrete or final declaration wins. An abstract
/// declaration is recorded as "to implement" only while no implementation or final
/// declaration of the same prototype has been seen; a later implementation or final
/// declaration removes it. When both a final and an abstract declaration exist for the
/// same prototype the outcome therefore depends on visit order.
pub struct InheritanceContextBuilder<'o, O: TypeOracle + ?Sized> {
    oracle: &'o O,
}

impl<'o, O: TypeOracle + ?Sized> InheritanceContextBuilder<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        Self { oracle }
    }

    /// Fill `ctx` for a type extending `supertype` and implementing `capabilities`.
    ///
    /// Unresolved names and malformed declarations become warnings on the context; only
    /// an oracle failure aborts the request.
    pub fn populate<S: AsRef<str>>(
        &self,
        ctx: &mut InheritanceContext,
        supertype: Option<&str>,
        capabilities: &[S],
    ) -> Result<(), ResolutionAborted> {
        ctx.reset();

        let mut walk = Walk::new(self.oracle);
        let mut chain_capabilities: Vec<(String, String)> = Vec::new();

        if let Some(supertype) = supertype {
            let chain = walk.chain(supertype, |ty| classify_type(ctx, ty))?;
            for member in &chain {
                for cap in &member.capabilities {
                    chain_capabilities.push((cap.clone(), member.name.clone()));
                }
            }
        }

        for (cap, from) in &chain_capabilities {
            walk.depth_first(cap, Some(from), |ty| classify_type(ctx, ty))?;
        }

        for cap in capabilities {
            walk.depth_first(cap.as_ref(), None, |ty| classify_type(ctx, ty))?;
        }

        for warning in walk.warnings {
            push_warning(&mut ctx.warnings, warning);
        }

        if let Some(supertype) = supertype {
            if ctx.outputs().constructors {
                let outcome = ConstructorCollector::new(self.oracle)
                    .collect(&mut ctx.constructors, supertype)?;
                ctx.duplicate_constructors.extend(outcome.duplicates);
                for warning in outcome.warnings {
                    push_warning(&mut ctx.warnings, warning);
                }
            }
        }

        ctx.apply_outputs();

        tracing::debug!(
            target: "cairn.inherit",
            supertype,
            capabilities = capabilities.len(),
            final_operations = ctx.final_operations.len(),
            overridable_operations = ctx.overridable_operations.len(),
            operations_to_implement = ctx.operations_to_implement.len(),
            inherited_fields = ctx.inherited_fields.len(),
            constructors = ctx.constructors.len(),
            "populated inheritance context"
        );
        Ok(())
    }
}

fn classify_type(ctx: &mut InheritanceContext, ty: &TypeDescriptor) {
    for conflict in find_signature_conflicts(ty.operations.iter()) {
        ctx.duplicate_operations.push(DuplicateOperation {
            declaring_type: ty.name.clone(),
            prototype: conflict.prototype,
            first: ty.operations[conflict.first].clone(),
            second: ty.operations[conflict.second].clone(),
        });
    }

    for op in &ty.operations {
        let prototypes = match op.prototypes() {
            Ok(prototypes) => prototypes,
            Err(error) => {
                tracing::warn!(
                    target: "cairn.inherit",
                    ty = %ty.name,
                    operation = %op.name,
                    %error,
                    "excluding malformed operation"
                );
                push_warning(
                    &mut ctx.warnings,
                    ResolutionWarning::MalformedOperation {
                        declaring_type: ty.name.clone(),
                        operation: op.name.clone(),
                        error,
                    },
                );
                continue;
            }
        };
        for prototype in prototypes {
            classify_operation(ctx, prototype, op);
        }
    }

    for field in &ty.fields {
        ctx.inherited_fields
            .entry(field.name.clone())
            .or_insert_with(|| field.clone());
    }
}

fn classify_operation(
    ctx: &mut InheritanceContext,
    prototype: ActionPrototype,
    op: &OperationDescriptor,
) {
    if op.is_final {
        ctx.operations_to_implement.remove(&prototype);
        ctx.final_operations
            .entry(prototype)
            .or_insert_with(|| op.clone());
    } else if op.is_concrete() {
        ctx.operations_to_implement.remove(&prototype);
        ctx.overridable_operations
            .entry(prototype)
            .or_insert_with(|| op.clone());
    } else if !ctx.overridable_operations.contains_key(&prototype)
        && !ctx.final_operations.contains_key(&prototype)
    {
        ctx.operations_to_implement
            .entry(prototype)
            .or_insert_with(|| op.clone());
    }
}
