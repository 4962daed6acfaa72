use std::collections::BTreeSet;

use cairn_inherit::{
    InheritanceContext, InheritanceContextBuilder, Outputs, RedundancyDetector, ResolutionAborted,
    ResolutionWarning,
};
use cairn_signature::{find_signature_conflicts, ActionPrototype, SignatureError};
use cairn_types::{TypeDescriptor, TypeOracle};

use crate::codes;
use crate::{Diagnostic, Severity};

/// Switches for the checks that are a matter of taste.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    pub report_redundant_capabilities: bool,
    pub redundant_capability_severity: Severity,
    pub report_missing_constructor: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            report_redundant_capabilities: true,
            redundant_capability_severity: Severity::Warning,
            report_missing_constructor: true,
        }
    }
}

/// Checks one type declaration against the hierarchy known to an oracle.
///
/// The subject itself does not have to be known to the oracle; only the names it
/// extends are resolved.
pub struct Validator<'o, O: TypeOracle + ?Sized> {
    oracle: &'o O,
    options: CheckOptions,
}

impl<'o, O: TypeOracle + ?Sized> Validator<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        Self {
            oracle,
            options: CheckOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// Diagnostics for `subject`, sorted by severity, code and message.
    pub fn check(&self, subject: &TypeDescriptor) -> Result<Vec<Diagnostic>, ResolutionAborted> {
        let mut out = Vec::new();

        let supertype = match subject.supertype.as_deref() {
            Some(name) => self
                .oracle
                .resolve(name)
                .map_err(|source| ResolutionAborted {
                    name: name.to_owned(),
                    source,
                })?,
            None => None,
        };
        if let Some(sup) = &supertype {
            if sup.is_final {
                out.push(
                    Diagnostic::error(
                        codes::OVERRIDDEN_FINAL_TYPE,
                        format!("Cannot extend the final type {}", sup.name),
                    )
                    .with_data([sup.name.as_str()]),
                );
            }
        }

        let own = check_own_members(subject, &mut out);

        let mut ctx = InheritanceContext::new(
            Outputs::all()
                .discard_overridable_operations()
                .discard_inherited_fields(),
        );
        InheritanceContextBuilder::new(self.oracle).populate(
            &mut ctx,
            subject.supertype.as_deref(),
            &subject.capabilities,
        )?;

        for prototype in &own.all {
            if let Some(overridden) = ctx.final_operations().get(prototype) {
                out.push(
                    Diagnostic::error(
                        codes::OVERRIDDEN_FINAL_OPERATION,
                        format!(
                            "Cannot override the final operation {prototype} of {}",
                            overridden.declaring_type
                        ),
                    )
                    .with_data([overridden.declaring_type.clone(), prototype.to_string()]),
                );
            }
        }

        for duplicate in ctx.duplicate_operations() {
            out.push(
                Diagnostic::warning(
                    codes::DUPLICATE_METHOD,
                    format!(
                        "Duplicate inherited operation {} in {}",
                        duplicate.prototype, duplicate.declaring_type
                    ),
                )
                .with_data([
                    duplicate.declaring_type.clone(),
                    duplicate.prototype.to_string(),
                ]),
            );
        }
        for duplicate in ctx.duplicate_constructors() {
            out.push(
                Diagnostic::warning(
                    codes::DUPLICATE_CONSTRUCTOR,
                    format!(
                        "Duplicate inherited constructor new{} in {}",
                        duplicate.parameter_types, duplicate.declaring_type
                    ),
                )
                .with_data([
                    duplicate.declaring_type.clone(),
                    duplicate.parameter_types.to_string(),
                ]),
            );
        }

        // Each unresolved name is reported once, whichever walk reached it first.
        let mut unresolved = BTreeSet::new();
        for warning in ctx.warnings() {
            push_resolution_warning(&mut out, &mut unresolved, warning);
        }

        if !subject.is_capability() && !subject.is_abstract {
            for (prototype, op) in ctx.operations_to_implement() {
                if own.concrete.contains(prototype) {
                    continue;
                }
                out.push(
                    Diagnostic::error(
                        codes::MISSING_METHOD_IMPLEMENTATION,
                        format!(
                            "{} must implement the inherited operation {prototype} of {}",
                            subject.name, op.declaring_type
                        ),
                    )
                    .with_data([prototype.to_string()]),
                );
            }
        }

        if self.options.report_redundant_capabilities {
            let report = RedundancyDetector::new(self.oracle)
                .find_redundant(subject.supertype.as_deref(), &subject.capabilities)?;
            for entry in &report.redundant {
                out.push(
                    Diagnostic::new(
                        self.options.redundant_capability_severity,
                        codes::REDUNDANT_INTERFACE_IMPLEMENTATION,
                        format!(
                            "The capability {} is already implemented by {}",
                            entry.capability, entry.subsumed_by
                        ),
                    )
                    .with_data([entry.capability.clone(), entry.mode.to_string()]),
                );
            }
            for warning in &report.warnings {
                push_resolution_warning(&mut out, &mut unresolved, warning);
            }
        }

        if self.options.report_missing_constructor && !subject.is_capability() {
            if let Some(sup) = &supertype {
                if subject.constructors.is_empty() && !sup.has_parameterless_constructor() {
                    out.push(
                        Diagnostic::error(
                            codes::MISSING_CONSTRUCTOR,
                            format!(
                                "{} must declare a constructor: {} has no parameterless \
                                 constructor",
                                subject.name, sup.name
                            ),
                        )
                        .with_data([sup.name.as_str()]),
                    );
                }
            }
        }

        out.sort();
        out.dedup();

        tracing::debug!(
            target: "cairn.check",
            ty = %subject.name,
            diagnostics = out.len(),
            "checked type"
        );
        Ok(out)
    }
}

/// Validate `subject` with default options.
pub fn check_type<O: TypeOracle + ?Sized>(
    oracle: &O,
    subject: &TypeDescriptor,
) -> Result<Vec<Diagnostic>, ResolutionAborted> {
    Validator::new(oracle).check(subject)
}

/// Prototypes declared by the subject itself.
#[derive(Default)]
struct OwnPrototypes {
    all: BTreeSet<ActionPrototype>,
    concrete: BTreeSet<ActionPrototype>,
}

fn check_own_members(subject: &TypeDescriptor, out: &mut Vec<Diagnostic>) -> OwnPrototypes {
    let mut own = OwnPrototypes::default();

    for op in &subject.operations {
        match op.prototypes() {
            Ok(prototypes) => {
                if op.is_concrete() {
                    own.concrete.extend(prototypes.iter().cloned());
                }
                own.all.extend(prototypes);
            }
            Err(error) => out.push(signature_diagnostic(&subject.name, &op.name, &error)),
        }
    }
    for ctor in &subject.constructors {
        if let Err(error) = cairn_signature::expand(ctor) {
            out.push(signature_diagnostic(&subject.name, "new", &error));
        }
    }

    for conflict in find_signature_conflicts(subject.operations.iter()) {
        out.push(
            Diagnostic::error(
                codes::DUPLICATE_METHOD,
                format!(
                    "Duplicate operation {} in {}",
                    conflict.prototype, subject.name
                ),
            )
            .with_data([conflict.prototype.to_string()]),
        );
    }

    let mut fields = BTreeSet::new();
    for field in &subject.fields {
        if !fields.insert(field.name.as_str()) {
            out.push(
                Diagnostic::error(
                    codes::DUPLICATE_FIELD,
                    format!("Duplicate field {} in {}", field.name, subject.name),
                )
                .with_data([field.name.as_str()]),
            );
        }
    }

    let mut constructors = BTreeSet::new();
    for ctor in &subject.constructors {
        let key = ctor.parameter_types();
        if !constructors.insert(key.clone()) {
            out.push(
                Diagnostic::error(
                    codes::DUPLICATE_CONSTRUCTOR,
                    format!("Duplicate constructor new{key} in {}", subject.name),
                )
                .with_data([key.to_string()]),
            );
        }
    }

    own
}

fn signature_diagnostic(ty: &str, operation: &str, error: &SignatureError) -> Diagnostic {
    Diagnostic::error(
        codes::for_signature_error(error),
        format!("Invalid parameters for {ty}.{operation}: {error}"),
    )
    .with_data([operation.to_owned(), error.index().to_string()])
}

fn push_resolution_warning(
    out: &mut Vec<Diagnostic>,
    unresolved: &mut BTreeSet<String>,
    warning: &ResolutionWarning,
) {
    let diagnostic = match warning {
        ResolutionWarning::UnresolvedType {
            name,
            referenced_from,
        } => {
            if !unresolved.insert(name.clone()) {
                return;
            }
            let message = match referenced_from {
                Some(from) => format!("The type {name} referenced from {from} cannot be resolved"),
                None => format!("The type {name} cannot be resolved"),
            };
            Diagnostic::warning(codes::UNRESOLVED_TYPE, message).with_data([name.as_str()])
        }
        ResolutionWarning::MalformedOperation {
            declaring_type,
            operation,
            error,
        } => Diagnostic::warning(
            codes::for_signature_error(error),
            format!("Ignoring inherited operation {declaring_type}.{operation}: {error}"),
        )
        .with_data([declaring_type.as_str(), operation.as_str()]),
        ResolutionWarning::MalformedConstructor {
            declaring_type,
            error,
        } => Diagnostic::warning(
            codes::for_signature_error(error),
            format!("Ignoring inherited constructor of {declaring_type}: {error}"),
        )
        .with_data([declaring_type.as_str(), "new"]),
    };
    out.push(diagnostic);
}
