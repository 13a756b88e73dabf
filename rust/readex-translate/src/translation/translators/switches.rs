//! Switch statements.

use crate::translation::context::TranslationContext;
use crate::translation::translators::blocks::translate_body;
use crate::translation::translators::{TranslationBox, TranslationBuilder};
use readex_core::expr::SwitchExpr;
use readex_core::{Expr, ExprKind};

pub fn translate_switch(
    ctx: &TranslationContext<'_>,
    switch: &SwitchExpr,
    returns_value: bool,
) -> TranslationBox {
    let mut builder = ctx
        .builder(ExprKind::Switch, switch.ty.clone())
        .control("switch")
        .text(" (")
        .child(ctx.translate(&switch.value))
        .text(")")
        .new_line()
        .text("{")
        .indent()
        .terminated();
    let mut all_jump = true;

    for (index, case) in switch.cases.iter().enumerate() {
        if index > 0 {
            builder = builder.new_line();
        }
        for test in &case.test_values {
            builder = builder
                .new_line()
                .control("case")
                .space()
                .child(ctx.translate(test))
                .text(":");
        }
        let (next, jumps) = case_body(ctx, builder, &case.body, returns_value);
        builder = next;
        all_jump &= jumps;
    }

    if let Some(default) = &switch.default_body {
        if !switch.cases.is_empty() {
            builder = builder.new_line();
        }
        builder = builder.new_line().control("default").text(":");
        let (next, jumps) = case_body(ctx, builder, default, returns_value);
        builder = next;
        all_jump &= jumps;
    } else {
        all_jump = false;
    }

    builder.unindent().new_line().text("}").jump(all_jump).build()
}

/// The indented statements of one case, closed by `break;` unless they
/// already leave the switch.
fn case_body<'c>(
    ctx: &TranslationContext<'_>,
    builder: TranslationBuilder<'c>,
    body: &Expr,
    returns_value: bool,
) -> (TranslationBuilder<'c>, bool) {
    let statements = translate_body(ctx, body, returns_value);
    let jumps = statements.ends_with_jump();
    let builder = builder
        .indent()
        .when(!statements.is_empty(), |b| b.new_line())
        .child(statements)
        .when(!jumps, |b| b.new_line().control("break").text(";"))
        .unindent();
    (builder, jumps)
}
