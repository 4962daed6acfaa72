use cairn_signature::{
    expand, ActionPrototype, FormalParameter, ParameterSignature, SignatureError, SignatureSource,
};
use pretty_assertions::assert_eq;

struct Op {
    name: String,
    params: Vec<FormalParameter>,
}

impl Op {
    fn new(name: &str, params: Vec<FormalParameter>) -> Self {
        Self {
            name: name.to_string(),
            params,
        }
    }
}

impl SignatureSource for Op {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[FormalParameter] {
        &self.params
    }
}

fn proto(name: &str, types: &[&str], variadic: bool) -> ActionPrototype {
    ActionPrototype::new(name, ParameterSignature::new(types.iter().copied(), variadic))
}

#[test]
fn plain_operation_expands_to_a_single_prototype() {
    let op = Op::new(
        "move",
        vec![
            FormalParameter::new("x", "int"),
            FormalParameter::new("y", "double"),
        ],
    );

    let set = expand(&op).unwrap();
    assert_eq!(
        set.into_iter().collect::<Vec<_>>(),
        vec![proto("move", &["int", "double"], false)]
    );
}

#[test]
fn trailing_defaults_expand_to_one_prototype_per_arity() {
    let op = Op::new(
        "f",
        vec![
            FormalParameter::new("a", "int"),
            FormalParameter::new("b", "java.lang.String").with_default(),
            FormalParameter::new("c", "boolean").with_default(),
        ],
    );

    let set = expand(&op).unwrap();
    let lengths: Vec<usize> = set.iter().map(|p| p.signature().len()).collect();
    assert_eq!(lengths, vec![1, 2, 3]);
    assert!(set.iter().all(|p| p.name() == "f" && !p.signature().is_variadic()));
    assert_eq!(
        set.into_iter().collect::<Vec<_>>(),
        vec![
            proto("f", &["int"], false),
            proto("f", &["int", "java.lang.String"], false),
            proto("f", &["int", "java.lang.String", "boolean"], false),
        ]
    );
}

#[test]
fn fully_defaulted_operation_is_callable_without_arguments() {
    let op = Op::new("ping", vec![FormalParameter::new("n", "int").with_default()]);

    let set = expand(&op).unwrap();
    assert_eq!(
        set.into_iter().collect::<Vec<_>>(),
        vec![proto("ping", &[], false), proto("ping", &["int"], false)]
    );
}

#[test]
fn variadic_operation_expands_to_one_variadic_prototype() {
    let op = Op::new(
        "spawn",
        vec![
            FormalParameter::new("agent", "java.lang.Class"),
            FormalParameter::new("params", "java.lang.Object").repeated(),
        ],
    );

    let set = expand(&op).unwrap();
    assert_eq!(set.len(), 1);
    let only = set.iter().next().unwrap();
    assert!(only.signature().is_variadic());
    assert_eq!(
        only.signature().types(),
        &["java.lang.Class".to_string(), "java.lang.Object".to_string()]
    );
}

#[test]
fn default_on_variadic_parameter_is_rejected() {
    let op = Op::new(
        "spawn",
        vec![FormalParameter::new("params", "java.lang.Object")
            .repeated()
            .with_default()],
    );

    let err = expand(&op).unwrap_err();
    assert_eq!(
        err,
        SignatureError::VariadicWithDefault {
            index: 0,
            name: "params".to_string()
        }
    );
    assert!(err.is_variadic_misuse());
}

#[test]
fn prototypes_serialize_with_their_signature() {
    let value = serde_json::to_value(proto("f", &["int"], true)).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "name": "f",
            "signature": { "types": ["int"], "variadic": true }
        })
    );
}
