use cairn_codegen::{generate, StubOptions, StubWriter};
use cairn_signature::FormalParameter;
use cairn_types::{ConstructorDescriptor, OperationDescriptor, TypeDescriptor, TypeStore};
use pretty_assertions::assert_eq;

fn writer(options: StubOptions) -> StubWriter {
    StubWriter::new(options)
}

#[test]
fn actions_follow_prototype_order_with_default_values() {
    let store = TypeStore::new().with(
        TypeDescriptor::capability("Ops")
            .operation(OperationDescriptor::new("b").abstract_().returns("boolean"))
            .operation(
                OperationDescriptor::new("a")
                    .abstract_()
                    .returns("int")
                    .param(FormalParameter::new("n", "int").with_default()),
            ),
    );
    let options = StubOptions {
        indent: "  ".to_string(),
        action_comment: None,
        ..StubOptions::default()
    };
    let decl = TypeDescriptor::class("Impl").implements("Ops");

    let generated = generate(&store, &decl, &writer(options), None).unwrap();

    assert_eq!(
        generated.text,
        "skill Impl implements Ops {\n\
         \n  def a : int {\n    0\n  }\n\
         \n  def a(arg0 : int) : int {\n    0\n  }\n\
         \n  def b : boolean {\n    false\n  }\n\
         }"
    );
    assert!(generated.imports.is_empty());
}

#[test]
fn void_action_has_an_empty_body() {
    let kill_me = OperationDescriptor::new("killMe").abstract_();
    let store = TypeStore::new().with(TypeDescriptor::capability("Life").operation(kill_me));
    let decl = TypeDescriptor::class("S").implements("Life");

    let generated = generate(&store, &decl, &StubWriter::default(), None).unwrap();

    assert_eq!(
        generated.text,
        "skill S implements Life {\n\
         \n\
         \tdef killMe {\n\
         \t\t// Auto-generated action.\n\
         \t}\n\
         }"
    );
}

#[test]
fn member_kinds_can_be_switched_off() {
    let ctor = ConstructorDescriptor::new(vec![FormalParameter::new("x", "int")]);
    let store = TypeStore::new()
        .with(TypeDescriptor::class("Base").constructor(ctor))
        .with(
            TypeDescriptor::capability("Life")
                .operation(OperationDescriptor::new("go").abstract_()),
        );
    let decl = TypeDescriptor::class("S").extends("Base").implements("Life");
    let options = StubOptions {
        create_constructors: false,
        create_actions: false,
        ..StubOptions::default()
    };

    let generated = generate(&store, &decl, &writer(options), None).unwrap();

    assert_eq!(generated.text, "skill S extends Base implements Life {\n}");
}

#[test]
fn multi_line_action_comment_is_commented_line_by_line() {
    let kill_me = OperationDescriptor::new("killMe").abstract_();
    let store = TypeStore::new().with(TypeDescriptor::capability("Life").operation(kill_me));
    let options = StubOptions {
        indent: "  ".to_string(),
        action_comment: Some("line one\nline two".to_string()),
        ..StubOptions::default()
    };
    let decl = TypeDescriptor::class("S").implements("Life");

    let generated = generate(&store, &decl, &writer(options), None).unwrap();

    assert_eq!(
        generated.text,
        "skill S implements Life {\n\
         \n  def killMe {\n    // line one\n    // line two\n  }\n\
         }"
    );
}
