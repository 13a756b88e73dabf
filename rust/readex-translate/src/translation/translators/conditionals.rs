//! Ternaries and if/else statements.

use crate::translation::analysis::is_ternary_shape;
use crate::translation::context::TranslationContext;
use crate::translation::translators::blocks::{braced, translate_body};
use crate::translation::translators::precedence::{COALESCE, CONDITIONAL};
use crate::translation::translators::{TranslationBox, MAX_LINE_LENGTH};
use readex_core::expr::ConditionalExpr;
use readex_core::{Expr, ExprKind};

/// `test ? a : b`, wrapping onto indented `?` and `:` lines when long.
pub fn translate_ternary(
    ctx: &TranslationContext<'_>,
    conditional: &ConditionalExpr,
) -> TranslationBox {
    let test = ctx.translate_operand(&conditional.test, COALESCE);
    let if_true = ctx.translate_operand(&conditional.if_true, CONDITIONAL);
    let if_false = ctx.translate_operand(&conditional.if_false, CONDITIONAL);
    let length =
        test.translation_size() + if_true.translation_size() + if_false.translation_size() + 6;
    let builder = ctx.builder(ExprKind::Conditional, conditional.ty.clone()).child(test);
    if length > MAX_LINE_LENGTH {
        builder
            .indent()
            .new_line()
            .text("? ")
            .child(if_true)
            .new_line()
            .text(": ")
            .child(if_false)
            .unindent()
            .build()
    } else {
        builder.text(" ? ").child(if_true).text(" : ").child(if_false).build()
    }
}

/// `if (test) { ... } else { ... }`, with `else if` chains flattened. When
/// `returns_value`, each branch returns its value.
pub fn translate_if(
    ctx: &TranslationContext<'_>,
    conditional: &ConditionalExpr,
    returns_value: bool,
) -> TranslationBox {
    let if_true = translate_body(ctx, &conditional.if_true, returns_value);
    let mut jump = if_true.ends_with_jump();
    let mut builder = ctx
        .builder(ExprKind::Conditional, conditional.ty.clone())
        .control("if")
        .text(" (")
        .child(ctx.translate(&conditional.test))
        .text(")")
        .new_line()
        .child(braced(ctx, if_true))
        .terminated();

    if conditional.if_false.is_empty() {
        return builder.jump(false).build();
    }
    builder = builder.new_line().control("else");
    match &*conditional.if_false {
        Expr::Conditional(nested) if !returns_value || !is_ternary_shape(nested) => {
            let chained = translate_if(ctx, nested, returns_value);
            jump &= chained.ends_with_jump();
            builder = builder.space().child(chained);
        }
        _ => {
            let if_false = translate_body(ctx, &conditional.if_false, returns_value);
            jump &= if_false.ends_with_jump();
            builder = builder.new_line().child(braced(ctx, if_false));
        }
    }
    builder.jump(jump).build()
}
