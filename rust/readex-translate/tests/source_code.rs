//! Classes and methods generated through the source builders.

use pretty_assertions::assert_eq;
use readex_core::build::*;
use readex_core::members::{MethodInfo, ParameterInfo};
use readex_core::{ExprRef, TypeRef};
use readex_translate::{
    to_class_source, to_method_source, to_source_code, ClassBuilder, MethodBuilder, NameKind,
    SourceCodeBuilder, TranslateError, TranslationSettings,
};

fn increment() -> ExprRef {
    let x = parameter(TypeRef::int(), "x");
    lambda(vec![x.clone()], add(x.expr(), int(1)))
}

fn identity(ty: TypeRef, name: &str) -> ExprRef {
    let p = parameter(ty, name);
    lambda(vec![p.clone()], p.expr())
}

#[test]
fn single_method_source_file() {
    let source = to_source_code(&increment(), &TranslationSettings::default()).unwrap();
    assert_eq!(
        source,
        "namespace GeneratedExpressionCode\n\
         {\n    \
             public class GeneratedExpressionClass\n    \
             {\n        \
                 public int GetInt(int x)\n        \
                 {\n            \
                     return x + 1;\n        \
                 }\n    \
             }\n\
         }"
    );
}

#[test]
fn class_and_method_sources_omit_the_outer_layers() {
    let settings = TranslationSettings::default();
    assert_eq!(
        to_method_source(&increment(), &settings).unwrap(),
        "public int GetInt(int x)\n{\n    return x + 1;\n}"
    );
    assert_eq!(
        to_class_source(&increment(), &settings).unwrap(),
        "public class GeneratedExpressionClass\n\
         {\n    \
             public int GetInt(int x)\n    \
             {\n        \
                 return x + 1;\n    \
             }\n\
         }"
    );
}

#[test]
fn methods_sharing_a_return_type_are_numbered() {
    let source = SourceCodeBuilder::new()
        .class(
            ClassBuilder::new()
                .method(MethodBuilder::new(increment()))
                .method(MethodBuilder::new(identity(TypeRef::string(), "s")))
                .method(MethodBuilder::new(identity(TypeRef::int(), "y"))),
        )
        .build()
        .unwrap();
    let names: Vec<&str> = source.classes()[0].methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["GetInt1", "GetString", "GetInt2"]);
}

#[test]
fn explicit_names_and_classes_are_kept() {
    let source = SourceCodeBuilder::new()
        .namespace("Acme.Generated")
        .class(
            ClassBuilder::new()
                .named("Calculator")
                .method(MethodBuilder::new(increment()).named("Increment").summary("Adds one.")),
        )
        .build()
        .unwrap();
    assert_eq!(
        source.text(),
        "namespace Acme.Generated\n\
         {\n    \
             public class Calculator\n    \
             {\n        \
                 /// <summary>\n        \
                 /// Adds one.\n        \
                 /// </summary>\n        \
                 public int Increment(int x)\n        \
                 {\n            \
                     return x + 1;\n        \
                 }\n    \
             }\n\
         }"
    );
}

#[test]
fn leading_comment_documents_the_lambda() {
    let body = block(vec![], vec![comment("Adds one."), increment()]);
    let method = to_method_source(&body, &TranslationSettings::default()).unwrap();
    let expected = "/// <summary>\n/// Adds one.\n/// </summary>\npublic int GetInt(int x)";
    assert!(method.starts_with(expected), "{method}");
}

#[test]
fn usings_are_sorted_system_first() {
    let string_builder = TypeRef::class("System.Text", "StringBuilder");
    let stream = TypeRef::class("System.IO", "Stream");
    let source = SourceCodeBuilder::new()
        .class(
            ClassBuilder::new()
                .method(MethodBuilder::new(identity(TypeRef::class("Acme", "Widget"), "widget")))
                .method(MethodBuilder::new(identity(string_builder, "builder")))
                .method(MethodBuilder::new(identity(TypeRef::structure("System", "Guid"), "id")))
                .method(MethodBuilder::new(identity(stream, "stream"))),
        )
        .build()
        .unwrap();
    assert_eq!(source.usings(), ["System", "System.IO", "System.Text", "Acme"]);
    assert!(source.text().starts_with(
        "using System;\nusing System.IO;\nusing System.Text;\nusing Acme;\n\n\
         namespace GeneratedExpressionCode\n"
    ));
}

#[test]
fn several_unnamed_classes_are_numbered() {
    let source = SourceCodeBuilder::new()
        .class(ClassBuilder::new().method(MethodBuilder::new(increment())))
        .class(ClassBuilder::new().method(MethodBuilder::new(increment())))
        .build()
        .unwrap();
    let names: Vec<&str> = source.classes().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["GeneratedExpressionClass1", "GeneratedExpressionClass2"]);
    assert!(source.text().contains("    }\n\n    public class GeneratedExpressionClass2\n"));
}

// ── Interfaces ──────────────────────────────────────────────────────

fn formatter_interface() -> TypeRef {
    TypeRef::interface("Acme", "IFormatter")
}

fn int_to_string(interface: &TypeRef, name: &str) -> MethodInfo {
    MethodInfo::new(interface.clone(), name, TypeRef::string())
        .with_parameters(vec![ParameterInfo::new("value", TypeRef::int())])
}

fn format_int() -> ExprRef {
    let x = parameter(TypeRef::int(), "x");
    let to_string = MethodInfo::new(TypeRef::int(), "ToString", TypeRef::string());
    lambda(vec![x.clone()], call(x.expr(), to_string, vec![]))
}

#[test]
fn matching_interface_method_names_the_method() {
    let interface = formatter_interface();
    let source = SourceCodeBuilder::new()
        .class(
            ClassBuilder::new()
                .implements(interface.clone(), vec![int_to_string(&interface, "Format")])
                .method(MethodBuilder::new(format_int())),
        )
        .build()
        .unwrap();
    assert_eq!(source.usings(), ["Acme"]);
    let text = source.text();
    assert!(text.contains("public class GeneratedExpressionClass : IFormatter\n"), "{text}");
    assert!(text.contains("public string Format(int x)\n"), "{text}");
    assert!(text.contains("return x.ToString();"), "{text}");
}

#[test]
fn two_matching_interface_methods_are_ambiguous() {
    let interface = formatter_interface();
    let err = SourceCodeBuilder::new()
        .class(
            ClassBuilder::new()
                .implements(
                    interface.clone(),
                    vec![
                        int_to_string(&interface, "Format"),
                        int_to_string(&interface, "Describe"),
                    ],
                )
                .method(MethodBuilder::new(format_int())),
        )
        .build()
        .unwrap_err();
    match err {
        TranslateError::AmbiguousInterfaceMethod {
            arguments,
            return_type,
            candidates,
        } => {
            assert_eq!(arguments, "int");
            assert_eq!(return_type, "string");
            assert_eq!(candidates, vec!["IFormatter.Format", "IFormatter.Describe"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn invalid_names_are_rejected() {
    let err = SourceCodeBuilder::new()
        .class(ClassBuilder::new().named("Not Valid").method(MethodBuilder::new(increment())))
        .build()
        .unwrap_err();
    assert!(matches!(err, TranslateError::InvalidName { kind: NameKind::Class, .. }), "{err}");

    let err = SourceCodeBuilder::new()
        .class(ClassBuilder::new().method(MethodBuilder::new(increment()).named("")))
        .build()
        .unwrap_err();
    assert!(matches!(err, TranslateError::InvalidName { kind: NameKind::Method, .. }), "{err}");
}

#[test]
fn duplicate_names_are_rejected() {
    let err = SourceCodeBuilder::new()
        .class(
            ClassBuilder::new()
                .method(MethodBuilder::new(increment()).named("Run"))
                .method(MethodBuilder::new(increment()).named("Run")),
        )
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        TranslateError::DuplicateName {
            kind: NameKind::Method,
            name: "Run".to_string()
        }
    );

    let err = SourceCodeBuilder::new()
        .class(ClassBuilder::new().named("Tools").method(MethodBuilder::new(increment())))
        .class(ClassBuilder::new().named("Tools").method(MethodBuilder::new(increment())))
        .build()
        .unwrap_err();
    assert!(matches!(err, TranslateError::DuplicateName { kind: NameKind::Class, .. }));
}

#[test]
fn comment_ordering_is_checked() {
    let body = block(vec![], vec![comment("First."), comment("Second."), increment()]);
    let err = to_source_code(&body, &TranslationSettings::default()).unwrap_err();
    assert!(matches!(err, TranslateError::Unsupported(_)), "{err}");
}

#[test]
fn comment_before_a_plain_value_is_written_in_the_body() {
    let body = block(vec![], vec![comment("The answer."), int(42)]);
    assert_eq!(
        to_method_source(&body, &TranslationSettings::default()).unwrap(),
        "public int GetInt()\n{\n    // The answer.\n    return 42;\n}"
    );
}

// ── Extracted blocks ────────────────────────────────────────────────

#[test]
fn block_in_expression_position_becomes_a_private_method() {
    let x = parameter(TypeRef::int(), "x");
    let y = parameter(TypeRef::int(), "y");
    let doubled = block(
        vec![y.clone()],
        vec![assign(y.expr(), multiply(x.expr(), int(2))), y.expr()],
    );
    let tree = lambda(vec![x.clone()], add(doubled, int(1)));
    let method = to_method_source(&tree, &TranslationSettings::default()).unwrap();
    assert_eq!(
        method,
        "public int GetInt1(int x)\n\
         {\n    \
             return GetInt2(x) + 1;\n\
         }\n\
         \n\
         private int GetInt2(int x)\n\
         {\n    \
             var y = x * 2;\n    \
             return y;\n\
         }"
    );
}

#[test]
fn built_sources_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<readex_translate::SourceCode>();
    assert_send_sync::<TranslationSettings>();
}
