//! Statement lists, braces, variable declarations and `return`.

use crate::translation::analysis::is_transparent_block;
use crate::translation::context::TranslationContext;
use crate::translation::scope::node_id;
use crate::translation::translators::{loops, TranslationBox};
use readex_core::expr::{BlockExpr, ParameterExpr};
use readex_core::{Expr, ExprKind, TypeRef};

/// What becomes of the last expression in a statement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRole {
    /// Every expression is a statement.
    Discard,
    /// The last expression's value is returned.
    Return,
    /// The last expression is written as a bare value.
    Value,
}

/// The statements of a body without braces. Blocks contribute their own
/// statements; anything else becomes a single statement.
pub fn translate_body(
    ctx: &TranslationContext<'_>,
    expr: &Expr,
    returns_value: bool,
) -> TranslationBox {
    let role = if returns_value { BodyRole::Return } else { BodyRole::Discard };
    match expr {
        Expr::Block(block) if ctx.settings().custom_translator(ExprKind::Block).is_none() => {
            block_statements(ctx, expr, block, role)
        }
        _ if returns_value => terminate(ctx, ctx.translate_returning(expr)),
        _ => terminate(ctx, ctx.translate_statement(expr)),
    }
}

/// A block nested directly in a statement list. Without variables of its own
/// its statements merge into the enclosing list.
pub fn translate_nested_block(
    ctx: &TranslationContext<'_>,
    expr: &Expr,
    block: &BlockExpr,
    returns_value: bool,
) -> TranslationBox {
    let role = if returns_value { BodyRole::Return } else { BodyRole::Discard };
    let statements = block_statements(ctx, expr, block, role);
    if block.variables.is_empty() {
        statements
    } else {
        braced(ctx, statements)
    }
}

/// A block in expression position: its single expression, a call to the
/// method it was extracted into, or its statements in braces.
pub fn translate_value_block(
    ctx: &TranslationContext<'_>,
    expr: &Expr,
    block: &BlockExpr,
) -> TranslationBox {
    if let Some(only) = block.expressions.first().filter(|_| is_transparent_block(block)) {
        return ctx.translate(only);
    }
    if let Some(call) = ctx.extracted_call(node_id(expr)) {
        let mut builder = ctx
            .builder(ExprKind::Block, block.ty.clone())
            .method_name(&call.name)
            .text("(");
        for (index, argument) in call.arguments.iter().enumerate() {
            if index > 0 {
                builder = builder.text(", ");
            }
            builder = builder
                .when(argument.is_ref, |b| b.keyword("ref").space())
                .variable(&argument.name);
        }
        return builder.text(")").build();
    }
    braced(ctx, block_statements(ctx, expr, block, BodyRole::Value))
}

/// The declarations and statements of `block`, one per line.
pub fn block_statements(
    ctx: &TranslationContext<'_>,
    expr: &Expr,
    block: &BlockExpr,
    role: BodyRole,
) -> TranslationBox {
    let mut statements = declarations(ctx, expr);
    let declared = statements.len();
    let last = block.expressions.len().saturating_sub(1);
    for (index, statement) in block.expressions.iter().enumerate() {
        if statement.is_empty() {
            continue;
        }
        let is_last = index == last;
        let translation = match (role, &**statement) {
            (BodyRole::Return, Expr::Label(label)) if is_last && !block.ty.is_void() => {
                let unreachable = statements.last().is_some_and(|s| s.ends_with_jump());
                loops::translate_label(ctx, label, !unreachable)
            }
            (BodyRole::Return, _) if is_last && !block.ty.is_void() => {
                ctx.translate_returning(statement)
            }
            (BodyRole::Value, _) if is_last => ctx.translate(statement),
            _ => ctx.translate_statement(statement),
        };
        if translation.is_empty() {
            continue;
        }
        statements.push(terminate(ctx, translation));
    }
    join_statements(ctx, &block.ty, statements, declared)
}

/// `int i, j;` lines for the used variables declared at the top of the
/// block, grouped by type in first-declaration order.
fn declarations(ctx: &TranslationContext<'_>, expr: &Expr) -> Vec<TranslationBox> {
    let mut groups: Vec<(TypeRef, Vec<String>)> = Vec::new();
    for variable in ctx.analysis().block_declarations(node_id(expr)) {
        let parameter = ParameterExpr::new(variable.key.ty.clone(), &variable.key.name);
        let name = ctx.variable_name(&parameter);
        match groups.iter_mut().find(|(ty, _)| *ty == variable.key.ty) {
            Some((_, names)) => names.push(name),
            None => groups.push((variable.key.ty.clone(), vec![name])),
        }
    }
    groups
        .into_iter()
        .map(|(ty, names)| {
            let mut builder = ctx.builder(ExprKind::Block, TypeRef::void()).type_name(&ty).space();
            for (index, name) in names.iter().enumerate() {
                if index > 0 {
                    builder = builder.text(", ");
                }
                builder = builder.variable(name);
            }
            builder.text(";").terminated().build()
        })
        .collect()
}

/// Lines up statements, leaving a blank line after the declarations, before
/// comments and around multi-line statements. Comments stay attached to the
/// statement after them.
fn join_statements(
    ctx: &TranslationContext<'_>,
    ty: &TypeRef,
    statements: Vec<TranslationBox>,
    declared: usize,
) -> TranslationBox {
    let jump = statements.last().is_some_and(|s| s.ends_with_jump());
    let mut builder = ctx.builder(ExprKind::Block, ty.clone()).terminated().jump(jump);
    let mut previous: Option<(ExprKind, bool)> = None;
    for (index, statement) in statements.into_iter().enumerate() {
        let kind = statement.node_kind();
        let multi_line = statement.is_multi_line();
        if let Some((previous_kind, previous_multi_line)) = previous {
            let after_comment = previous_kind == ExprKind::Comment;
            let blank = (declared > 0 && index == declared)
                || kind == ExprKind::Comment
                || (!after_comment && (multi_line || previous_multi_line));
            builder = builder.new_line().when(blank, |b| b.new_line());
        }
        previous = Some((kind, multi_line));
        builder = builder.child(statement);
    }
    builder.build()
}

/// Appends `;` unless the statement closes itself.
pub fn terminate(ctx: &TranslationContext<'_>, statement: TranslationBox) -> TranslationBox {
    if statement.is_terminated() {
        return statement;
    }
    let kind = statement.node_kind();
    let ty = statement.result_type().clone();
    let jump = statement.ends_with_jump();
    ctx.builder(kind, ty).child(statement).text(";").terminated().jump(jump).build()
}

/// Wraps statements in braces on their own lines.
pub fn braced(ctx: &TranslationContext<'_>, body: TranslationBox) -> TranslationBox {
    let kind = body.node_kind();
    let ty = body.result_type().clone();
    if body.is_empty() {
        return ctx.builder(kind, ty).text("{").new_line().text("}").terminated().build();
    }
    let jump = body.ends_with_jump();
    ctx.builder(kind, ty)
        .text("{")
        .indent()
        .new_line()
        .child(body)
        .unindent()
        .new_line()
        .text("}")
        .terminated()
        .jump(jump)
        .build()
}

/// `return value`.
pub fn return_statement(ctx: &TranslationContext<'_>, value: TranslationBox) -> TranslationBox {
    let kind = value.node_kind();
    let ty = value.result_type().clone();
    ctx.builder(kind, ty)
        .control("return")
        .space()
        .child(value)
        .jump(true)
        .build()
}
