//! Expression and statement rendering through the public entry points.

use pretty_assertions::assert_eq;
use readex_core::build::*;
use readex_core::expr::{CapturedField, ConstantValue};
use readex_core::members::{MemberInfo, MethodInfo, ParameterInfo};
use readex_core::{Expr, ExprKind, ExprRef, TypeRef};
use readex_translate::{translate, translate_raw, ExpressionTranslation, TranslationSettings};

fn render(expr: &ExprRef) -> String {
    translate(expr, &TranslationSettings::default())
}

fn write_line() -> MethodInfo {
    MethodInfo::new(TypeRef::class("System", "Console"), "WriteLine", TypeRef::void())
        .with_parameters(vec![ParameterInfo::new("value", TypeRef::int())])
        .static_method()
}

#[test]
fn lambda_with_arithmetic() {
    let x = parameter(TypeRef::int(), "x");
    assert_eq!(render(&lambda(vec![x.clone()], add(x.expr(), int(1)))), "x => x + 1");
}

#[test]
fn lambda_with_two_parameters_is_parenthesised() {
    let a = parameter(TypeRef::int(), "a");
    let b = parameter(TypeRef::int(), "b");
    let tree = lambda(vec![a.clone(), b.clone()], multiply(a.expr(), b.expr()));
    assert_eq!(render(&tree), "(a, b) => a * b");
}

#[test]
fn looser_operands_get_parentheses() {
    let a = parameter(TypeRef::int(), "a");
    let b = parameter(TypeRef::int(), "b");
    let c = parameter(TypeRef::int(), "c");
    let tree = multiply(add(a.expr(), b.expr()), c.expr());
    assert_eq!(render(&tree), "(a + b) * c");
    let tree = add(a.expr(), multiply(b.expr(), c.expr()));
    assert_eq!(render(&tree), "a + b * c");
}

#[test]
fn value_conditional_is_a_ternary() {
    let flag = parameter(TypeRef::bool(), "flag");
    assert_eq!(render(&ternary(flag.expr(), int(1), int(2))), "flag ? 1 : 2");
}

#[test]
fn assignment_inside_one_branch_is_joined() {
    let flag = parameter(TypeRef::bool(), "flag");
    let x = parameter(TypeRef::int(), "x");
    let tree = block(
        vec![x.clone()],
        vec![if_then(
            flag.expr(),
            block(
                vec![],
                vec![assign(x.expr(), int(1)), call_static(write_line(), vec![x.expr()])],
            ),
        )],
    );
    assert_eq!(
        render(&tree),
        "if (flag)\n\
         {\n    \
             var x = 1;\n    \
             Console.WriteLine(x);\n\
         }"
    );
}

#[test]
fn read_outside_the_branch_declares_in_the_list() {
    let flag = parameter(TypeRef::bool(), "flag");
    let x = parameter(TypeRef::int(), "x");
    let tree = block(
        vec![x.clone()],
        vec![
            if_then(
                flag.expr(),
                block(
                    vec![],
                    vec![assign(x.expr(), int(1)), call_static(write_line(), vec![x.expr()])],
                ),
            ),
            call_static(write_line(), vec![x.expr()]),
        ],
    );
    assert_eq!(
        render(&tree),
        "int x;\n\
         \n\
         if (flag)\n\
         {\n    \
             x = 1;\n    \
             Console.WriteLine(x);\n\
         }\n\
         \n\
         Console.WriteLine(x);"
    );
}

#[test]
fn else_branch_is_braced() {
    let flag = parameter(TypeRef::bool(), "flag");
    let tree = if_then_else(
        flag.expr(),
        call_static(write_line(), vec![int(1)]),
        call_static(write_line(), vec![int(2)]),
    );
    assert_eq!(
        render(&tree),
        "if (flag)\n\
         {\n    \
             Console.WriteLine(1);\n\
         }\n\
         else\n\
         {\n    \
             Console.WriteLine(2);\n\
         }"
    );
}

#[test]
fn required_namespaces_are_reported() {
    let translation = ExpressionTranslation::new(
        &call_static(write_line(), vec![int(1)]),
        &TranslationSettings::default(),
    );
    assert_eq!(translation.text(), "Console.WriteLine(1)");
    assert_eq!(translation.required_namespaces(), ["System".to_string()]);
    assert_eq!(translation.line_count(), 1);
}

#[test]
fn fully_qualified_names_need_no_namespaces() {
    let settings = TranslationSettings::default().fully_qualified();
    let tree = call_static(write_line(), vec![int(1)]);
    let translation = ExpressionTranslation::new(&tree, &settings);
    assert_eq!(translation.text(), "System.Console.WriteLine(1)");
    assert!(translation.required_namespaces().is_empty());
}

#[test]
fn html_output_keeps_raw_text_available() {
    let x = parameter(TypeRef::int(), "x");
    let tree = lambda(vec![x.clone()], add(x.expr(), int(1)));
    let settings = TranslationSettings::default().html();
    let html = translate(&tree, &settings);
    assert!(html.contains("=&gt;"), "{html}");
    assert!(html.contains("<span class=\"vb\">x</span>"), "{html}");
    assert_eq!(translate_raw(&tree, &settings), "x => x + 1");
}

#[test]
fn custom_indent_is_used() {
    let flag = parameter(TypeRef::bool(), "flag");
    let tree = if_then(flag.expr(), call_static(write_line(), vec![int(1)]));
    let settings = TranslationSettings::default().indent_using("\t");
    assert_eq!(translate(&tree, &settings), "if (flag)\n{\n\tConsole.WriteLine(1);\n}");
}

#[test]
fn translation_is_deterministic() {
    let flag = parameter(TypeRef::bool(), "flag");
    let x = parameter(TypeRef::int(), "x");
    let tree = block(
        vec![x.clone()],
        vec![
            assign(x.expr(), ternary(flag.expr(), int(1), int(2))),
            call_static(write_line(), vec![x.expr()]),
        ],
    );
    let settings = TranslationSettings::default();
    let first = translate(&tree, &settings);
    for _ in 0..5 {
        assert_eq!(translate(&tree, &settings), first);
    }
}

// ── Settings ────────────────────────────────────────────────────────

fn increment() -> ExprRef {
    let x = parameter(TypeRef::int(), "x");
    lambda(vec![x.clone()], add(x.expr(), int(1)))
}

#[test]
fn captured_values_replace_closure_fields() {
    let closure = TypeRef::closure("<>c__DisplayClass0_0");
    let holder = constant(
        ConstantValue::Closure(vec![CapturedField {
            name: "limit".to_string(),
            ty: TypeRef::int(),
            value: ConstantValue::Int(10),
        }]),
        closure.clone(),
    );
    let limit = member(holder, MemberInfo::field(closure, "limit", TypeRef::int()));
    let x = parameter(TypeRef::int(), "x");
    let tree = lambda(vec![x.clone()], greater_than(x.expr(), limit));

    assert_eq!(render(&tree), "x => x > limit");
    let settings = TranslationSettings::default().captured_values_shown();
    assert_eq!(translate(&tree, &settings), "x => x > 10");
}

#[test]
fn unused_lambda_parameters_can_be_discarded() {
    let a = parameter(TypeRef::int(), "a");
    let b = parameter(TypeRef::int(), "b");
    let tree = lambda(vec![a.clone(), b], a.expr());
    assert_eq!(render(&tree), "(a, b) => a");
    assert_eq!(translate(&tree, &TranslationSettings::default().discard_unused()), "(a, _) => a");
}

#[test]
fn lambda_parameter_types_can_be_shown() {
    let settings = TranslationSettings::default().lambda_parameter_types_shown();
    assert_eq!(translate(&increment(), &settings), "(int x) => x + 1");
}

#[test]
fn quoted_lambdas_can_be_commented() {
    let tree = quote(increment());
    assert_eq!(render(&tree), "x => x + 1");
    let settings = TranslationSettings::default().quoted_lambda_comments();
    assert_eq!(translate(&tree, &settings), "// Quoted to induce a closure:\nx => x + 1");
}

#[test]
fn string_concat_is_written_as_addition_unless_shown() {
    let concat = MethodInfo::new(TypeRef::string(), "Concat", TypeRef::string())
        .with_parameters(vec![
            ParameterInfo::new("str0", TypeRef::string()),
            ParameterInfo::new("str1", TypeRef::string()),
        ])
        .static_method();
    let s = parameter(TypeRef::string(), "s");
    let tree = call_static(concat, vec![s.expr(), string("!")]);

    assert_eq!(render(&tree), "s + \"!\"");
    let settings = TranslationSettings::default().string_concat_calls_shown();
    assert_eq!(translate(&tree, &settings), "string.Concat(s, \"!\")");
}

#[test]
fn anonymous_types_can_be_named() {
    let tree = type_of(TypeRef::anonymous(vec![TypeRef::int(), TypeRef::string()]));
    assert_eq!(render(&tree), "typeof(AnonymousType<int, string>)");
    let settings =
        TranslationSettings::default().name_anonymous_types_using(|_| "Pair".to_string());
    assert_eq!(translate(&tree, &settings), "typeof(Pair)");
}

// ── Generic methods ─────────────────────────────────────────────────

fn factory() -> TypeRef {
    TypeRef::class("Acme.Factories", "Factory")
}

fn widget() -> TypeRef {
    TypeRef::class("Acme.Models", "Widget")
}

#[test]
fn uninferable_generic_arguments_are_written_and_imported() {
    let t = TypeRef::generic_parameter("T");
    let create = MethodInfo::new(factory(), "Create", t.clone())
        .static_method()
        .generic(vec![t], vec![widget()]);
    let tree = call_static(create, vec![]);
    let translation = ExpressionTranslation::new(&tree, &TranslationSettings::default());
    assert_eq!(translation.text(), "Factory.Create<Widget>()");
    assert_eq!(
        translation.required_namespaces(),
        ["Acme.Factories".to_string(), "Acme.Models".to_string()]
    );
}

#[test]
fn inferable_generic_arguments_are_left_out_unless_configured() {
    let t = TypeRef::generic_parameter("T");
    let echo = MethodInfo::new(factory(), "Echo", t.clone())
        .with_parameters(vec![ParameterInfo::new("value", t.clone())])
        .static_method()
        .generic(vec![t], vec![widget()]);
    let w = parameter(widget(), "w");
    let tree = call_static(echo, vec![w.expr()]);

    let inferred = ExpressionTranslation::new(&tree, &TranslationSettings::default());
    assert_eq!(inferred.text(), "Factory.Echo(w)");
    assert_eq!(inferred.required_namespaces(), ["Acme.Factories".to_string()]);

    let settings = TranslationSettings::default().explicit_generic_parameters();
    let explicit = ExpressionTranslation::new(&tree, &settings);
    assert_eq!(explicit.text(), "Factory.Echo<Widget>(w)");
    assert_eq!(
        explicit.required_namespaces(),
        ["Acme.Factories".to_string(), "Acme.Models".to_string()]
    );
}

// ── Output parameters ───────────────────────────────────────────────

fn try_parse_then_print() -> ExprRef {
    let try_parse = MethodInfo::new(TypeRef::int(), "TryParse", TypeRef::bool())
        .with_parameters(vec![
            ParameterInfo::new("s", TypeRef::string()),
            ParameterInfo::out("result", TypeRef::int()),
        ])
        .static_method();
    let s = parameter(TypeRef::string(), "s");
    let value = parameter(TypeRef::int(), "value");
    block(
        vec![value.clone()],
        vec![if_then(
            call_static(try_parse, vec![s.expr(), value.expr()]),
            call_static(write_line(), vec![value.expr()]),
        )],
    )
}

#[test]
fn output_variables_are_declared_in_the_list_by_default() {
    assert_eq!(
        render(&try_parse_then_print()),
        "int value;\n\
         \n\
         if (int.TryParse(s, out value))\n\
         {\n    \
             Console.WriteLine(value);\n\
         }"
    );
}

#[test]
fn output_variables_can_be_declared_inline() {
    let settings = TranslationSettings::default().inline_output_parameters();
    assert_eq!(
        translate(&try_parse_then_print(), &settings),
        "if (int.TryParse(s, out var value))\n\
         {\n    \
             Console.WriteLine(value);\n\
         }"
    );
    let explicit = settings.explicit_type_names();
    assert!(translate(&try_parse_then_print(), &explicit).contains("out int value"));
}

// ── Custom translators ──────────────────────────────────────────────

fn custom_if() -> TranslationSettings {
    TranslationSettings::default()
        .translate_kind_using(ExprKind::Conditional, |_, _| Some("CUSTOM_IF".to_string()))
}

#[test]
fn custom_translator_replaces_a_root_statement() {
    let flag = parameter(TypeRef::bool(), "flag");
    let tree = if_then(flag.expr(), call_static(write_line(), vec![int(1)]));
    assert_eq!(translate(&tree, &custom_if()), "CUSTOM_IF;");
}

#[test]
fn custom_translator_replaces_a_nested_statement() {
    let flag = parameter(TypeRef::bool(), "flag");
    let tree = block(
        vec![],
        vec![
            call_static(write_line(), vec![int(0)]),
            if_then(flag.expr(), call_static(write_line(), vec![int(1)])),
        ],
    );
    let text = translate(&tree, &custom_if());
    assert!(text.contains("CUSTOM_IF"), "{text}");
    assert!(!text.contains("if ("), "{text}");
}

#[test]
fn declining_custom_translator_falls_back() {
    let settings = TranslationSettings::default().translate_kind_using(
        ExprKind::Constant,
        |expr, _| match expr {
            Expr::Constant(c) if c.value == ConstantValue::Int(7) => Some("seven".to_string()),
            _ => None,
        },
    );
    assert_eq!(translate(&add(int(7), int(1)), &settings), "seven + 1");
}

// ── Control flow ────────────────────────────────────────────────────

#[test]
fn loop_with_break_is_a_while_true() {
    let i = parameter(TypeRef::int(), "i");
    let exit = label_target(None);
    let next = label_target(None);
    let tree = loop_(
        block(
            vec![],
            vec![
                if_then(greater_than(i.expr(), int(10)), break_(&exit)),
                if_then(equal(i.expr(), int(5)), continue_(&next)),
                call_static(write_line(), vec![i.expr()]),
            ],
        ),
        Some(exit.clone()),
        Some(next.clone()),
    );
    assert_eq!(
        render(&tree),
        "while (true)\n\
         {\n    \
             if (i > 10)\n    \
             {\n        \
                 break;\n    \
             }\n\
         \n    \
             if (i == 5)\n    \
             {\n        \
                 continue;\n    \
             }\n\
         \n    \
             Console.WriteLine(i);\n\
         }"
    );
}

#[test]
fn switch_groups_case_labels_and_writes_the_default() {
    let i = parameter(TypeRef::int(), "i");
    let tree = switch(
        i.expr(),
        vec![
            switch_case(vec![int(1)], call_static(write_line(), vec![int(1)])),
            switch_case(vec![int(2), int(3)], call_static(write_line(), vec![int(2)])),
        ],
        Some(call_static(write_line(), vec![int(0)])),
    );
    assert_eq!(
        render(&tree),
        "switch (i)\n\
         {\n    \
             case 1:\n        \
                 Console.WriteLine(1);\n        \
                 break;\n\
         \n    \
             case 2:\n    \
             case 3:\n        \
                 Console.WriteLine(2);\n        \
                 break;\n\
         \n    \
             default:\n        \
                 Console.WriteLine(0);\n        \
                 break;\n\
         }"
    );
}

#[test]
fn try_with_filtered_catch_and_finally() {
    let ex = parameter(TypeRef::exception(), "ex");
    let message_property =
        MemberInfo::property(TypeRef::exception(), "Message", TypeRef::string());
    let message = member(ex.expr(), message_property);
    let tree = try_catch_finally(
        call_static(write_line(), vec![int(1)]),
        vec![
            catch_when(
                TypeRef::exception(),
                ex.clone(),
                equal(message, string("x")),
                call_static(write_line(), vec![int(2)]),
            ),
            catch(TypeRef::exception(), None, call_static(write_line(), vec![int(3)])),
        ],
        Some(call_static(write_line(), vec![int(4)])),
    );
    assert_eq!(
        render(&tree),
        "try\n\
         {\n    \
             Console.WriteLine(1);\n\
         }\n\
         catch (Exception ex) when (ex.Message == \"x\")\n\
         {\n    \
             Console.WriteLine(2);\n\
         }\n\
         catch\n\
         {\n    \
             Console.WriteLine(3);\n\
         }\n\
         finally\n\
         {\n    \
             Console.WriteLine(4);\n\
         }"
    );
}

#[test]
fn goto_targets_are_written_as_labels() {
    let skip = label_target(Some("skip"));
    let tree = block(
        vec![],
        vec![
            goto_(&skip),
            call_static(write_line(), vec![int(1)]),
            label(&skip, None),
            call_static(write_line(), vec![int(2)]),
        ],
    );
    assert_eq!(
        render(&tree),
        "goto skip;\n\
         Console.WriteLine(1);\n\
         skip:\n\
         Console.WriteLine(2);"
    );
}
