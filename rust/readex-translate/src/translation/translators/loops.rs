//! Loops, jumps and labels.

use crate::translation::context::TranslationContext;
use crate::translation::translators::blocks::{braced, return_statement, terminate, translate_body};
use crate::translation::translators::{EmptyTranslation, TranslationBox};
use readex_core::expr::{GotoExpr, GotoKind, LabelExpr, LabelTarget, LoopExpr};
use readex_core::{ExprKind, TypeRef};

/// The written name of a label. Unnamed targets get one from their id.
pub fn label_name(target: &LabelTarget) -> String {
    match &target.name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("label{}", target.id),
    }
}

/// `while (true) { ... }`, followed by the break label when a `goto`
/// jumps to it.
pub fn translate_loop(ctx: &TranslationContext<'_>, looped: &LoopExpr) -> TranslationBox {
    let ty = looped
        .break_label
        .as_ref()
        .map(|label| label.ty.clone())
        .unwrap_or_else(TypeRef::void);
    let body = translate_body(ctx, &looped.body, false);
    let builder = ctx
        .builder(ExprKind::Loop, ty)
        .control("while")
        .text(" (")
        .keyword("true")
        .text(")")
        .new_line()
        .child(braced(ctx, body))
        .terminated();
    match looped.break_label.as_ref().filter(|label| ctx.analysis().is_goto_target(label)) {
        Some(label) => builder.new_line().text(&label_name(label)).text(":").build(),
        None => builder.build(),
    }
}

pub fn translate_goto(ctx: &TranslationContext<'_>, goto: &GotoExpr) -> TranslationBox {
    let builder = ctx.builder(ExprKind::Goto, goto.ty.clone()).jump(true);
    match goto.kind {
        GotoKind::Goto => builder.control("goto").space().text(&label_name(&goto.target)).build(),
        GotoKind::Break => builder.control("break").build(),
        GotoKind::Continue => builder.control("continue").build(),
        GotoKind::Return => match &goto.value {
            Some(value) => return_statement(ctx, ctx.translate(value)),
            None => builder.control("return").build(),
        },
    }
}

/// `name:` when some `goto` targets the label. In a returning position the
/// label's default value is returned after it.
pub fn translate_label(
    ctx: &TranslationContext<'_>,
    label: &LabelExpr,
    returns_value: bool,
) -> TranslationBox {
    let shown = ctx.analysis().is_goto_target(&label.target);
    let value = label
        .default_value
        .as_ref()
        .filter(|_| returns_value)
        .map(|value| terminate(ctx, return_statement(ctx, ctx.translate(value))));
    if !shown && value.is_none() {
        return EmptyTranslation::boxed(ExprKind::Label, label.target.ty.clone());
    }
    let mut builder = ctx.builder(ExprKind::Label, label.target.ty.clone()).terminated();
    if shown {
        builder = builder.text(&label_name(&label.target)).text(":");
    }
    if let Some(value) = value {
        builder = builder.when(shown, |b| b.new_line()).child(value).jump(true);
    }
    builder.build()
}
