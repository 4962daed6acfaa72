use cairn_check::{check_type, codes, has_errors, Diagnostic, Severity};
use cairn_signature::FormalParameter;
use cairn_types::{ConstructorDescriptor, OperationDescriptor, TypeDescriptor, TypeStore};
use pretty_assertions::assert_eq;

use super::fixtures::{codes_of, int_constructor, spawn, store};

#[test]
fn unimplemented_agent_reports_missing_action_and_constructor() {
    let subject = TypeDescriptor::class("MyAgent")
        .extends("Base")
        .implements("Lifecycle")
        .implements("Custom");

    let diagnostics = check_type(&store(), &subject).unwrap();

    assert_eq!(
        codes_of(&diagnostics),
        vec![codes::MISSING_CONSTRUCTOR, codes::MISSING_METHOD_IMPLEMENTATION]
    );
    assert_eq!(diagnostics[0].data, vec!["Base"]);
    assert_eq!(
        diagnostics[1].data,
        vec!["spawn(java.lang.Object, java.lang.Object*)"]
    );
    assert!(has_errors(&diagnostics));
}

#[test]
fn complete_agent_is_clean() {
    let subject = TypeDescriptor::class("MyAgent")
        .extends("Base")
        .implements("Lifecycle")
        .implements("Custom")
        .constructor(int_constructor())
        .operation(spawn());

    let diagnostics = check_type(&store(), &subject).unwrap();
    assert_eq!(diagnostics, Vec::<Diagnostic>::new());
}

#[test]
fn abstract_agent_may_leave_actions_unimplemented() {
    let subject = TypeDescriptor::class("MyAgent")
        .extends("Base")
        .implements("Lifecycle")
        .constructor(int_constructor())
        .abstract_();

    assert!(check_type(&store(), &subject).unwrap().is_empty());
}

#[test]
fn capability_never_needs_implementations() {
    let subject = TypeDescriptor::capability("Extended").implements("Lifecycle");

    assert!(check_type(&store(), &subject).unwrap().is_empty());
}

#[test]
fn abstract_redeclaration_does_not_count_as_implementation() {
    let subject = TypeDescriptor::class("MyAgent")
        .implements("Lifecycle")
        .operation(spawn().abstract_());

    let diagnostics = check_type(&store(), &subject).unwrap();
    assert_eq!(codes_of(&diagnostics), vec![codes::MISSING_METHOD_IMPLEMENTATION]);
}

#[test]
fn unresolved_capability_is_only_a_warning() {
    let subject = TypeDescriptor::class("MyAgent").implements("Nowhere");

    let diagnostics = check_type(&store(), &subject).unwrap();

    assert_eq!(codes_of(&diagnostics), vec![codes::UNRESOLVED_TYPE]);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].data, vec!["Nowhere"]);
    assert!(!has_errors(&diagnostics));
}

#[test]
fn diagnostics_serialize_with_their_payload() {
    let subject = TypeDescriptor::class("MyAgent").extends("Sealed");

    let diagnostics = check_type(&store(), &subject).unwrap();
    let json = serde_json::to_value(&diagnostics).unwrap();

    assert_eq!(
        json,
        serde_json::json!([{
            "severity": "error",
            "code": "cairn.overridden_final_type",
            "message": "Cannot extend the final type Sealed",
            "data": ["Sealed"],
        }])
    );
}

#[test]
fn inherited_duplicates_are_reported_with_their_declaring_type() {
    let store = TypeStore::new().with(
        TypeDescriptor::class("Doubled")
            .constructor(ConstructorDescriptor::new(vec![FormalParameter::new("a", "int")]))
            .constructor(ConstructorDescriptor::new(vec![FormalParameter::new("b", "int")]))
            .operation(OperationDescriptor::new("f").param(FormalParameter::new("x", "int")))
            .operation(
                OperationDescriptor::new("f")
                    .param(FormalParameter::new("x", "int"))
                    .param(FormalParameter::new("y", "int").with_default()),
            ),
    );
    let subject = TypeDescriptor::class("Sub")
        .extends("Doubled")
        .constructor(int_constructor());

    let diagnostics = check_type(&store, &subject).unwrap();

    assert_eq!(
        codes_of(&diagnostics),
        vec![codes::DUPLICATE_CONSTRUCTOR, codes::DUPLICATE_METHOD]
    );
    assert_eq!(diagnostics[0].data, vec!["Doubled", "(int)"]);
    assert_eq!(diagnostics[1].data, vec!["Doubled", "f(int)"]);
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn unresolved_type_shared_by_capabilities_is_reported_once() {
    let store = TypeStore::new()
        .with(TypeDescriptor::capability("A").implements("Missing"))
        .with(TypeDescriptor::capability("B").implements("Missing"));
    let subject = TypeDescriptor::class("Sub").implements("A").implements("B");

    let diagnostics = check_type(&store, &subject).unwrap();

    assert_eq!(codes_of(&diagnostics), vec![codes::UNRESOLVED_TYPE]);
    assert_eq!(
        diagnostics[0].message,
        "The type Missing referenced from A cannot be resolved"
    );
}

#[test]
fn inherited_implementation_satisfies_a_redundant_capability() {
    let store = store().with(
        TypeDescriptor::capability("Pausable")
            .operation(OperationDescriptor::new("pause").abstract_()),
    );
    let subject = TypeDescriptor::class("Worker")
        .extends("Guarded")
        .implements("Pausable");

    let diagnostics = check_type(&store, &subject).unwrap();
    assert_eq!(
        codes_of(&diagnostics),
        vec![codes::REDUNDANT_INTERFACE_IMPLEMENTATION]
    );
}
