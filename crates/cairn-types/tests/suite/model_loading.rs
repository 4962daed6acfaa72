use std::io::Write;

use cairn_types::{ModelError, TypeKind, TypeOracle, TypeStore};
use pretty_assertions::assert_eq;

const LIFECYCLE_MODEL: &str = r#"
[[types]]
name = "io.sarl.core.Lifecycle"
kind = "capability"

[[types.operations]]
name = "spawn"
is_abstract = true
return_type = "java.util.UUID"
parameters = [
    { name = "agentType", type = "java.lang.Class" },
    { name = "params", type = "java.lang.Object", variadic = true },
]

[[types.operations]]
name = "killMe"
is_abstract = true

[[types]]
name = "com.example.Base"
constructors = [{ parameters = [{ name = "x", type = "int" }] }]
"#;

#[test]
fn toml_model_round_trips_into_descriptors() {
    let store = TypeStore::from_toml_str(LIFECYCLE_MODEL).unwrap();
    assert_eq!(store.len(), 2);

    let lifecycle = store.resolve("io.sarl.core.Lifecycle").unwrap().unwrap();
    assert_eq!(lifecycle.kind, TypeKind::Capability);
    assert_eq!(lifecycle.operations.len(), 2);

    let spawn = &lifecycle.operations[0];
    assert!(spawn.is_abstract);
    assert!(spawn.is_variadic());
    assert_eq!(spawn.return_type.as_deref(), Some("java.util.UUID"));
    assert_eq!(spawn.declaring_type, "io.sarl.core.Lifecycle");

    let base = store.resolve("com.example.Base").unwrap().unwrap();
    assert_eq!(base.kind, TypeKind::Class);
    assert!(!base.has_parameterless_constructor());
    assert_eq!(base.constructors[0].declaring_type, "com.example.Base");
}

#[test]
fn json_model_is_detected_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{ "types": [ {{ "name": "A", "kind": "capability", "operations": [ {{ "name": "op", "is_abstract": true }} ] }} ] }}"#
    )
    .unwrap();

    let store = TypeStore::load_from_path(&path).unwrap();
    let a = store.get("A").unwrap();
    assert!(a.is_capability());
    assert_eq!(a.operations[0].declaring_type, "A");
}

#[test]
fn missing_model_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = TypeStore::load_from_path(&path).unwrap_err();
    assert!(
        matches!(&err, ModelError::Io { path, .. } if path.ends_with("missing.toml")),
        "unexpected error: {err:?}"
    );
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = TypeStore::from_toml_str("[[types]]\nkind = \"capability\"\n").unwrap_err();
    assert!(matches!(err, ModelError::Toml(_)));
}
