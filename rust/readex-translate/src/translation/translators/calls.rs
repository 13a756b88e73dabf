//! Method calls, delegate invocations, member access, indexers and
//! argument lists.

use crate::translation::analysis::{explicit_generic_arguments_required, is_string_concat};
use crate::translation::context::TranslationContext;
use crate::translation::scope::node_id;
use crate::translation::translators::constants::translate_value;
use crate::translation::translators::precedence::{ADDITIVE, PRIMARY};
use crate::translation::translators::{TranslationBox, TranslationBuilder, MAX_LINE_LENGTH};
use readex_core::expr::{CallExpr, ConstantExpr, ConstantValue, IndexExpr, InvokeExpr, MemberExpr};
use readex_core::members::{MethodInfo, ParameterInfo, ParameterMode};
use readex_core::{Expr, ExprKind, ExprRef, TypeRef};

pub fn translate_call(ctx: &TranslationContext<'_>, call: &CallExpr) -> TranslationBox {
    let method = &call.method;
    let ty = method.closed_return_type();
    if is_string_concat(method) && !ctx.settings().show_string_concat_calls {
        let operands = call.arguments.iter().map(|arg| ctx.translate_operand(arg, ADDITIVE + 1));
        return ctx.builder(ExprKind::Call, ty).children(operands, " + ").build();
    }

    let (subject, arguments): (Option<TranslationBox>, &[ExprRef]) = match (
        &call.instance,
        method.is_extension,
    ) {
        (Some(instance), _) => (Some(ctx.translate_operand(instance, PRIMARY)), &call.arguments),
        (None, true) if !call.arguments.is_empty() => (
            Some(ctx.translate_operand(&call.arguments[0], PRIMARY)),
            &call.arguments[1..],
        ),
        _ => (None, &call.arguments),
    };
    let extension_form =
        method.is_extension && call.instance.is_none() && !method.parameters.is_empty();
    let parameters = if extension_form {
        &method.parameters[1..]
    } else {
        &method.parameters[..]
    };

    let builder = ctx.builder(ExprKind::Call, ty);
    let builder = match subject {
        Some(subject) => builder.child(subject),
        None => builder.type_name(&method.declaring_type),
    };

    if let Some(property) = method.property_name() {
        if method.is_property_getter() && arguments.is_empty() {
            return builder.text(".").text(property).build();
        }
        if method.is_property_getter() && property == "Item" {
            return builder.child(index_list(ctx, arguments)).build();
        }
        if method.is_property_setter() {
            if let Some((value, indices)) = arguments.split_last() {
                let builder = if property == "Item" {
                    builder.child(index_list(ctx, indices))
                } else {
                    builder.text(".").text(property)
                };
                return builder.text(" = ").child(ctx.translate(value)).build();
            }
        }
    }

    builder
        .text(".")
        .method_name(&method.name)
        .child(generic_arguments(ctx, method))
        .child(argument_list(ctx, arguments, parameters))
        .build()
}

/// `<A, B>` when the method's generic arguments must be written.
fn generic_arguments(ctx: &TranslationContext<'_>, method: &MethodInfo) -> TranslationBox {
    let builder = ctx.builder(ExprKind::Call, method.closed_return_type());
    if !explicit_generic_arguments_required(method, ctx.settings()) {
        return builder.build();
    }
    let mut builder = builder.text("<");
    for (index, arg) in method.generic_args.iter().enumerate() {
        if index > 0 {
            builder = builder.text(", ");
        }
        builder = builder.type_name(arg);
    }
    builder.text(">").build()
}

pub fn translate_invoke(ctx: &TranslationContext<'_>, invoke: &InvokeExpr) -> TranslationBox {
    let target = match &*invoke.target {
        Expr::Lambda(_) => ctx.parenthesize(ctx.translate(&invoke.target)),
        _ => ctx.translate_operand(&invoke.target, PRIMARY),
    };
    ctx.builder(ExprKind::Invoke, invoke.ty.clone())
        .child(target)
        .text(".")
        .method_name("Invoke")
        .child(argument_list(ctx, &invoke.arguments, &[]))
        .build()
}

/// `instance.Member`, `Type.Member`, or the captured variable (or its value)
/// a closure field stands for.
pub fn translate_member(ctx: &TranslationContext<'_>, member: &MemberExpr) -> TranslationBox {
    let info = &member.member;
    let builder = ctx.builder(ExprKind::MemberAccess, info.member_type.clone());
    match member.instance.as_deref() {
        Some(Expr::Constant(ConstantExpr {
            value: ConstantValue::Closure(fields),
            ..
        })) => match fields.iter().find(|field| field.name == info.name) {
            Some(field) if ctx.settings().show_captured_values => {
                translate_value(ctx, &field.value, &field.ty)
            }
            _ => builder.variable(&info.name).build(),
        },
        Some(instance) => builder
            .child(ctx.translate_operand(instance, PRIMARY))
            .text(".")
            .text(&info.name)
            .build(),
        None => builder.type_name(&info.declaring_type).text(".").text(&info.name).build(),
    }
}

pub fn translate_index(ctx: &TranslationContext<'_>, index: &IndexExpr) -> TranslationBox {
    ctx.builder(ExprKind::Index, index.ty.clone())
        .child(ctx.translate_operand(&index.object, PRIMARY))
        .child(index_list(ctx, &index.arguments))
        .build()
}

fn index_list(ctx: &TranslationContext<'_>, arguments: &[ExprRef]) -> TranslationBox {
    ctx.builder(ExprKind::Index, TypeRef::void())
        .text("[")
        .children(arguments.iter().map(|arg| ctx.translate(arg)), ", ")
        .text("]")
        .build()
}

// ── Argument lists ──────────────────────────────────────────────────

/// `(a, b)`, with `ref`/`out` prefixes from `parameters`, a trailing
/// `params` array expanded into its elements, and wrapping one argument per
/// line when the list is long or several arguments span lines.
pub fn argument_list(
    ctx: &TranslationContext<'_>,
    arguments: &[ExprRef],
    parameters: &[ParameterInfo],
) -> TranslationBox {
    let mut translations = Vec::with_capacity(arguments.len());
    for (index, arg) in arguments.iter().enumerate() {
        let parameter = parameters.get(index);
        match (parameter, &**arg) {
            (Some(p), Expr::NewArray(array))
                if p.is_params && !array.bounds && index == arguments.len() - 1 =>
            {
                translations.extend(array.expressions.iter().map(|element| ctx.translate(element)));
            }
            _ => {
                let mode = parameter.map(|p| p.mode).unwrap_or_default();
                translations.push(translate_argument(ctx, arg, mode));
            }
        }
    }
    wrapped_list(ctx.builder(ExprKind::Call, TypeRef::void()), "(", ")", translations)
}

fn translate_argument(
    ctx: &TranslationContext<'_>,
    arg: &Expr,
    mode: ParameterMode,
) -> TranslationBox {
    let builder = ctx.builder(arg.kind(), arg.ty());
    match mode {
        ParameterMode::Value => ctx.translate(arg),
        ParameterMode::Ref => builder.keyword("ref").space().child(ctx.translate(arg)).build(),
        ParameterMode::Out => {
            let builder = builder.keyword("out").space();
            let declares = ctx
                .analysis()
                .variable_at(node_id(arg))
                .is_some_and(|variable| variable.should_declare_in_output_parameter_use());
            let builder = match (declares, arg.as_parameter()) {
                (true, Some(p)) if ctx.settings().use_explicit_type_names => {
                    builder.type_name(&p.ty).space()
                }
                (true, Some(_)) => builder.keyword("var").space(),
                _ => builder,
            };
            builder.child(ctx.translate(arg)).build()
        }
    }
}

/// Separates items with `, ` between `open` and `close`, or puts each on its
/// own indented line when they do not fit on one.
pub fn wrapped_list(
    builder: TranslationBuilder<'_>,
    open: &str,
    close: &str,
    items: Vec<TranslationBox>,
) -> TranslationBox {
    let multi_line: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_multi_line())
        .map(|(index, _)| index)
        .collect();
    let single_line_length: usize = items
        .iter()
        .filter(|item| !item.is_multi_line())
        .map(|item| item.translation_size())
        .sum::<usize>()
        + 2 * items.len().saturating_sub(1);
    let last_only =
        multi_line.is_empty() || (multi_line.len() == 1 && multi_line[0] + 1 == items.len());
    let wraps = single_line_length > MAX_LINE_LENGTH || !last_only;

    let mut builder = builder.text(open);
    if wraps {
        builder = builder.indent();
        for (index, item) in items.into_iter().enumerate() {
            if index > 0 {
                builder = builder.text(",");
            }
            builder = builder.new_line().child(item);
        }
        builder.unindent().text(close).build()
    } else {
        builder.children(items, ", ").text(close).build()
    }
}
