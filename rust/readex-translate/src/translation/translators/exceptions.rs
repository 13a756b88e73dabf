//! try/catch/finally statements.

use crate::translation::context::TranslationContext;
use crate::translation::scope::node_id;
use crate::translation::translators::blocks::{braced, translate_body};
use crate::translation::translators::{TranslationBox, TranslationBuilder};
use readex_core::expr::{CatchBlock, TryExpr};
use readex_core::{ExprKind, TypeRef};

pub fn translate_try(
    ctx: &TranslationContext<'_>,
    try_expr: &TryExpr,
    returns_value: bool,
) -> TranslationBox {
    let body = translate_body(ctx, &try_expr.body, returns_value);
    let mut jump = body.ends_with_jump();
    let mut builder = ctx
        .builder(ExprKind::Try, try_expr.ty.clone())
        .control("try")
        .new_line()
        .child(braced(ctx, body))
        .terminated();

    for handler in &try_expr.handlers {
        let handler_body = translate_body(ctx, &handler.body, returns_value);
        jump &= handler_body.ends_with_jump();
        builder = catch_header(ctx, builder.new_line(), handler)
            .new_line()
            .child(braced(ctx, handler_body));
    }

    if let Some(fault) = &try_expr.fault {
        let statements = translate_body(ctx, fault, false);
        let rethrow = ctx
            .builder(ExprKind::Throw, TypeRef::void())
            .control("throw")
            .text(";")
            .terminated()
            .jump(true)
            .build();
        let body = ctx
            .builder(ExprKind::Block, TypeRef::void())
            .child(statements)
            .new_line()
            .child(rethrow)
            .terminated()
            .jump(true)
            .build();
        builder = builder.new_line().control("catch").new_line().child(braced(ctx, body));
    }

    if let Some(finally) = &try_expr.finally {
        let statements = translate_body(ctx, finally, false);
        builder = builder
            .new_line()
            .control("finally")
            .new_line()
            .child(braced(ctx, statements));
    }
    builder.jump(jump).build()
}

/// `catch`, `catch (T)`, `catch (T name)`, plus any `when (filter)`.
fn catch_header<'c>(
    ctx: &TranslationContext<'_>,
    builder: TranslationBuilder<'c>,
    handler: &CatchBlock,
) -> TranslationBuilder<'c> {
    let variable = handler
        .variable
        .as_ref()
        .filter(|variable| ctx.analysis().is_catch_variable_used(node_id(&handler.body), variable));
    let catches_anything = handler.test.is_object() || handler.test == TypeRef::exception();
    let builder = builder.control("catch");
    let builder = match variable {
        Some(variable) => builder
            .text(" (")
            .type_name(&handler.test)
            .space()
            .variable(&ctx.variable_name(variable))
            .text(")"),
        None if catches_anything && handler.filter.is_none() => builder,
        None => builder.text(" (").type_name(&handler.test).text(")"),
    };
    match &handler.filter {
        Some(filter) => builder
            .space()
            .keyword("when")
            .text(" (")
            .child(ctx.translate(filter))
            .text(")"),
        None => builder,
    }
}
