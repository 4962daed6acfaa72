use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use cairn_signature::{expand, ActionParameterTypes};
use cairn_types::{ConstructorDescriptor, TypeOracle};

use crate::{DuplicateConstructor, ResolutionAborted, ResolutionWarning};

/// Conflicts and warnings found while collecting constructors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstructorOutcome {
    pub duplicates: Vec<DuplicateConstructor>,
    pub warnings: Vec<ResolutionWarning>,
}

/// Derives the constructors a subtype has to expose for its supertype.
pub struct ConstructorCollector<'o, O: TypeOracle + ?Sized> {
    oracle: &'o O,
}

impl<'o, O: TypeOracle + ?Sized> ConstructorCollector<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        Self { oracle }
    }

    /// Record every constructor declared directly on `supertype` into `target`.
    ///
    /// Nothing is recorded when the supertype has a parameterless constructor (declared
    /// or implicit): the subtype can rely on the default one. Two constructors with the
    /// same parameter types are reported as a duplicate; the first one stays in
    /// `target`.
    pub fn collect(
        &self,
        target: &mut BTreeMap<ActionParameterTypes, ConstructorDescriptor>,
        supertype: &str,
    ) -> Result<ConstructorOutcome, ResolutionAborted> {
        let mut outcome = ConstructorOutcome::default();

        let resolved = self
            .oracle
            .resolve(supertype)
            .map_err(|source| ResolutionAborted {
                name: supertype.to_owned(),
                source,
            })?;
        let Some(ty) = resolved else {
            outcome.warnings.push(ResolutionWarning::UnresolvedType {
                name: supertype.to_owned(),
                referenced_from: None,
            });
            return Ok(outcome);
        };

        if ty.has_parameterless_constructor() {
            tracing::trace!(
                target: "cairn.inherit",
                ty = %ty.name,
                "supertype has a parameterless constructor"
            );
            return Ok(outcome);
        }

        for ctor in &ty.constructors {
            if let Err(error) = expand(ctor) {
                outcome.warnings.push(ResolutionWarning::MalformedConstructor {
                    declaring_type: ty.name.clone(),
                    error,
                });
                continue;
            }

            match target.entry(ctor.parameter_types()) {
                Entry::Vacant(slot) => {
                    slot.insert(ctor.clone());
                }
                Entry::Occupied(existing) => {
                    outcome.duplicates.push(DuplicateConstructor {
                        declaring_type: ty.name.clone(),
                        parameter_types: existing.key().clone(),
                        first: existing.get().clone(),
                        second: ctor.clone(),
                    });
                }
            }
        }

        Ok(outcome)
    }
}
