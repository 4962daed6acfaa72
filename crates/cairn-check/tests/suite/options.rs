use cairn_check::{codes, CheckOptions, Severity, Validator};
use cairn_types::{OperationDescriptor, TypeDescriptor};
use pretty_assertions::assert_eq;

use super::fixtures::{codes_of, store};

fn redundant_subject() -> TypeDescriptor {
    TypeDescriptor::class("Child")
        .implements("Custom")
        .implements("Custom")
}

#[test]
fn redundant_capability_is_a_warning_by_default() {
    let store = store();
    let diagnostics = Validator::new(&store).check(&redundant_subject()).unwrap();

    assert_eq!(
        codes_of(&diagnostics),
        vec![codes::REDUNDANT_INTERFACE_IMPLEMENTATION]
    );
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].data, vec!["Custom", "pre"]);
}

#[test]
fn redundant_capability_severity_is_configurable() {
    let store = store();
    let options = CheckOptions {
        redundant_capability_severity: Severity::Error,
        ..CheckOptions::default()
    };
    let diagnostics = Validator::new(&store)
        .with_options(options)
        .check(&redundant_subject())
        .unwrap();

    assert_eq!(diagnostics[0].severity, Severity::Error);
}

#[test]
fn disabled_checks_stay_silent() {
    let store = store().with(
        TypeDescriptor::capability("Ops").operation(OperationDescriptor::new("op").abstract_()),
    );
    let options = CheckOptions {
        report_redundant_capabilities: false,
        report_missing_constructor: false,
        ..CheckOptions::default()
    };
    let subject = TypeDescriptor::class("Child")
        .extends("Base")
        .implements("Ops")
        .implements("Ops")
        .operation(OperationDescriptor::new("op"));

    let diagnostics = Validator::new(&store)
        .with_options(options)
        .check(&subject)
        .unwrap();

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}
