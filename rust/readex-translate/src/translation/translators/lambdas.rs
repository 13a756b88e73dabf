//! Lambda expressions.

use crate::translation::analysis::{renders_as_statements, shows_lambda_parameter_types};
use crate::translation::context::TranslationContext;
use crate::translation::scope::node_id;
use crate::translation::translators::blocks::{braced, translate_body};
use crate::translation::translators::{TranslationBox, TranslationBuilder};
use readex_core::expr::LambdaExpr;
use readex_core::{Expr, ExprKind};

pub fn translate_lambda(
    ctx: &TranslationContext<'_>,
    expr: &Expr,
    lambda: &LambdaExpr,
) -> TranslationBox {
    let builder = ctx.builder(ExprKind::Lambda, lambda.ty.clone());
    let builder = parameter_list(ctx, builder, expr, lambda);
    if renders_as_statements(&lambda.body) {
        let body = translate_body(ctx, &lambda.body, !lambda.return_type.is_void());
        return builder.text(" =>").new_line().child(braced(ctx, body)).build();
    }
    builder.text(" => ").child(ctx.translate(&lambda.body)).build()
}

/// `x`, `()`, `(x, y)` or `(int x, ref string y)`. Unused parameters are
/// written `_` when discarding is on.
pub fn parameter_list<'c>(
    ctx: &TranslationContext<'_>,
    builder: TranslationBuilder<'c>,
    expr: &Expr,
    lambda: &LambdaExpr,
) -> TranslationBuilder<'c> {
    let typed = shows_lambda_parameter_types(lambda, ctx.settings());
    let discard = ctx.settings().discard_unused_parameters;
    let parenthesised = typed || lambda.parameters.len() != 1;

    let mut builder = builder.when(parenthesised, |b| b.text("("));
    for (index, parameter) in lambda.parameters.iter().enumerate() {
        if index > 0 {
            builder = builder.text(", ");
        }
        if typed {
            builder = builder
                .when(parameter.is_by_ref, |b| b.keyword("ref").space())
                .type_name(&parameter.ty)
                .space();
        }
        let name = if discard && !ctx.analysis().is_parameter_used(node_id(expr), parameter) {
            "_".to_string()
        } else {
            ctx.variable_name(parameter)
        };
        builder = builder.variable(&name);
    }
    builder.when(parenthesised, |b| b.text(")"))
}
