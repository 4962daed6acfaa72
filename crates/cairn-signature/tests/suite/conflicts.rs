use cairn_signature::{
    find_signature_conflicts, is_override_of, ActionPrototype, FormalParameter, ParameterSignature,
    SignatureConflict, SignatureSource,
};
use pretty_assertions::assert_eq;

struct Op(&'static str, Vec<FormalParameter>);

impl SignatureSource for Op {
    fn name(&self) -> &str {
        self.0
    }

    fn parameters(&self) -> &[FormalParameter] {
        &self.1
    }
}

#[test]
fn defaulted_declaration_conflicts_with_shorter_overload() {
    let ops = [
        Op("f", vec![FormalParameter::new("a", "int")]),
        Op(
            "f",
            vec![
                FormalParameter::new("a", "int"),
                FormalParameter::new("b", "int").with_default(),
            ],
        ),
        Op("g", vec![FormalParameter::new("a", "int")]),
    ];

    let conflicts = find_signature_conflicts(ops.iter());
    assert_eq!(
        conflicts,
        vec![SignatureConflict {
            prototype: ActionPrototype::new("f", ParameterSignature::new(["int"], false)),
            first: 0,
            second: 1,
        }]
    );
}

#[test]
fn variadic_and_fixed_arity_overloads_do_not_conflict() {
    let ops = [
        Op("f", vec![FormalParameter::new("a", "int")]),
        Op("f", vec![FormalParameter::new("a", "int").repeated()]),
    ];

    assert!(find_signature_conflicts(ops.iter()).is_empty());
}

#[test]
fn malformed_declarations_are_not_reported_as_conflicts() {
    let ops = [
        Op("f", vec![FormalParameter::new("a", "int")]),
        Op(
            "f",
            vec![
                FormalParameter::new("a", "int").with_default(),
                FormalParameter::new("b", "int"),
            ],
        ),
    ];

    assert!(find_signature_conflicts(ops.iter()).is_empty());
}

#[test]
fn override_matches_any_callable_arity() {
    let overridden = Op(
        "run",
        vec![
            FormalParameter::new("a", "int"),
            FormalParameter::new("b", "int").with_default(),
        ],
    );
    let narrow = Op("run", vec![FormalParameter::new("a", "int")]);
    let unrelated = Op("run", vec![FormalParameter::new("a", "long")]);

    assert!(is_override_of(&narrow, &overridden));
    assert!(is_override_of(&overridden, &narrow));
    assert!(!is_override_of(&unrelated, &overridden));
}
