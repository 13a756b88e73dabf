//! Binary, unary and type-test operators, and assignments.

use crate::translation::context::TranslationContext;
use crate::translation::formatter::TokenType;
use crate::translation::scope::node_id;
use crate::translation::translators::precedence::{self, PRIMARY, RELATIONAL, UNARY};
use crate::translation::translators::{
    binary_precedence, TranslationBox, TranslationBuilder, MAX_LINE_LENGTH,
};
use readex_core::expr::{BinaryExpr, BinaryOp, ConstantValue, TypeBinaryExpr, UnaryExpr, UnaryOp};
use readex_core::members::MethodInfo;
use readex_core::{Expr, ExprKind, TypeRef};

fn operator_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add | BinaryOp::AddChecked => "+",
        BinaryOp::Subtract | BinaryOp::SubtractChecked => "-",
        BinaryOp::Multiply | BinaryOp::MultiplyChecked => "*",
        BinaryOp::Divide => "/",
        BinaryOp::Modulo => "%",
        BinaryOp::And => "&",
        BinaryOp::Or => "|",
        BinaryOp::ExclusiveOr => "^",
        BinaryOp::AndAlso => "&&",
        BinaryOp::OrElse => "||",
        BinaryOp::Equal => "==",
        BinaryOp::NotEqual => "!=",
        BinaryOp::LessThan => "<",
        BinaryOp::LessThanOrEqual => "<=",
        BinaryOp::GreaterThan => ">",
        BinaryOp::GreaterThanOrEqual => ">=",
        BinaryOp::Coalesce => "??",
        BinaryOp::LeftShift => "<<",
        BinaryOp::RightShift => ">>",
        BinaryOp::Assign => "=",
        BinaryOp::AddAssign | BinaryOp::AddAssignChecked => "+=",
        BinaryOp::SubtractAssign | BinaryOp::SubtractAssignChecked => "-=",
        BinaryOp::MultiplyAssign | BinaryOp::MultiplyAssignChecked => "*=",
        BinaryOp::DivideAssign => "/=",
        BinaryOp::ModuloAssign => "%=",
        BinaryOp::AndAssign => "&=",
        BinaryOp::OrAssign => "|=",
        BinaryOp::ExclusiveOrAssign => "^=",
        BinaryOp::LeftShiftAssign => "<<=",
        BinaryOp::RightShiftAssign => ">>=",
        BinaryOp::Power | BinaryOp::PowerAssign | BinaryOp::ArrayIndex => "",
    }
}

/// The plain operator a compound assignment applies.
fn compound_operator(op: BinaryOp) -> Option<BinaryOp> {
    Some(match op {
        BinaryOp::AddAssign => BinaryOp::Add,
        BinaryOp::AddAssignChecked => BinaryOp::AddChecked,
        BinaryOp::SubtractAssign => BinaryOp::Subtract,
        BinaryOp::SubtractAssignChecked => BinaryOp::SubtractChecked,
        BinaryOp::MultiplyAssign => BinaryOp::Multiply,
        BinaryOp::MultiplyAssignChecked => BinaryOp::MultiplyChecked,
        _ => return None,
    })
}

fn is_logical(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::AndAlso | BinaryOp::OrElse)
}

// ── Binary ──────────────────────────────────────────────────────────

pub fn translate_binary(ctx: &TranslationContext<'_>, binary: &BinaryExpr) -> TranslationBox {
    if let Some(method) = binary.method.as_ref().filter(|m| !m.is_operator()) {
        let operands: [&Expr; 2] = [&binary.left, &binary.right];
        return static_call(ctx, binary.op.kind(), method, &binary.ty, &operands);
    }
    match binary.op {
        BinaryOp::Power => static_call(
            ctx,
            ExprKind::Power,
            &MethodInfo::new(TypeRef::math(), "Pow", TypeRef::double()).static_method(),
            &binary.ty,
            &[&binary.left, &binary.right],
        ),
        BinaryOp::ArrayIndex => ctx
            .builder(ExprKind::ArrayIndex, binary.ty.clone())
            .child(ctx.translate_operand(&binary.left, PRIMARY))
            .text("[")
            .child(ctx.translate(&binary.right))
            .text("]")
            .build(),
        op if op.is_checked() => {
            let unchecked = ctx.builder(op.kind(), binary.ty.clone());
            let inner = operation(ctx, unchecked, op, &binary.left, &binary.right);
            ctx.builder(op.kind(), binary.ty.clone())
                .keyword("checked")
                .text("(")
                .child(inner)
                .text(")")
                .build()
        }
        op => {
            let builder = ctx.builder(op.kind(), binary.ty.clone());
            operation(ctx, builder, op, &binary.left, &binary.right)
        }
    }
}

/// `left op right`, parenthesising operands by precedence. Operands of
/// `&&` and `||` that are themselves operations are always parenthesised,
/// and long logical chains wrap after the operator.
fn operation(
    ctx: &TranslationContext<'_>,
    builder: TranslationBuilder<'_>,
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> TranslationBox {
    let level = binary_precedence(op);
    let (left, right) = if is_logical(op) {
        (logical_operand(ctx, op, left), logical_operand(ctx, op, right))
    } else {
        let right_level = if op == BinaryOp::Coalesce { level } else { level + 1 };
        let left_level = if op == BinaryOp::Coalesce { level + 1 } else { level };
        (ctx.translate_operand(left, left_level), ctx.translate_operand(right, right_level))
    };
    let wraps = is_logical(op)
        && left.translation_size() + right.translation_size() + 4 > MAX_LINE_LENGTH;
    let builder = builder.child(left).space().text(operator_symbol(op));
    if wraps {
        builder.indent().new_line().child(right).unindent().build()
    } else {
        builder.space().child(right).build()
    }
}

fn logical_operand(ctx: &TranslationContext<'_>, op: BinaryOp, operand: &Expr) -> TranslationBox {
    match operand {
        Expr::Binary(inner) if inner.op == op => ctx.translate(operand),
        Expr::Binary(inner)
            if !inner.op.is_checked()
                && inner.op != BinaryOp::Power
                && inner.op != BinaryOp::ArrayIndex =>
        {
            ctx.parenthesize(ctx.translate(operand))
        }
        _ => ctx.translate_operand(operand, binary_precedence(op) + 1),
    }
}

fn static_call(
    ctx: &TranslationContext<'_>,
    kind: ExprKind,
    method: &MethodInfo,
    ty: &TypeRef,
    arguments: &[&Expr],
) -> TranslationBox {
    ctx.builder(kind, ty.clone())
        .type_name(&method.declaring_type)
        .text(".")
        .method_name(&method.name)
        .text("(")
        .children(arguments.iter().map(|arg| ctx.translate(arg)), ", ")
        .text(")")
        .build()
}

// ── Assignment ──────────────────────────────────────────────────────

pub fn translate_assignment(
    ctx: &TranslationContext<'_>,
    expr: &Expr,
    binary: &BinaryExpr,
) -> TranslationBox {
    let kind = binary.op.kind();
    let builder = ctx.builder(kind, binary.ty.clone());
    let node = node_id(expr);
    let declaring = ctx
        .analysis()
        .variable_at(node)
        .is_some_and(|variable| variable.should_declare_in_assignment(node));
    let builder = if declaring {
        if ctx.analysis().is_explicit_join(node) {
            builder.type_name(&binary.left.ty()).space()
        } else {
            builder.keyword("var").space()
        }
    } else {
        builder
    };
    let target = ctx.translate(&binary.left);

    if binary.op == BinaryOp::PowerAssign {
        let power = static_call(
            ctx,
            ExprKind::Power,
            &MethodInfo::new(TypeRef::math(), "Pow", TypeRef::double()).static_method(),
            &binary.ty,
            &[&binary.left, &binary.right],
        );
        return builder.child(target).text(" = ").child(power).build();
    }
    if let Some(op) = compound_operator(binary.op).filter(|op| op.is_checked()) {
        let unchecked = ctx.builder(op.kind(), binary.ty.clone());
        let inner = operation(ctx, unchecked, op, &binary.left, &binary.right);
        return builder
            .child(target)
            .text(" = ")
            .keyword("checked")
            .text("(")
            .child(inner)
            .text(")")
            .build();
    }
    builder
        .child(target)
        .space()
        .text(operator_symbol(binary.op))
        .space()
        .child(ctx.translate(&binary.right))
        .build()
}

// ── Unary ───────────────────────────────────────────────────────────

pub fn translate_unary(ctx: &TranslationContext<'_>, unary: &UnaryExpr) -> TranslationBox {
    let kind = unary.op.kind();
    let builder = ctx.builder(kind, unary.ty.clone());
    let Some(operand) = unary.operand.as_deref() else {
        return builder.control("throw").jump(true).build();
    };
    if let Some(method) = unary.method.as_ref().filter(|m| !m.is_operator()) {
        return static_call(ctx, kind, method, &unary.ty, &[operand]);
    }
    match unary.op {
        UnaryOp::Negate | UnaryOp::UnaryPlus => {
            let symbol = if unary.op == UnaryOp::Negate { "-" } else { "+" };
            builder.text(symbol).child(prefix_operand(ctx, symbol, operand)).build()
        }
        UnaryOp::NegateChecked => {
            let inner = ctx
                .builder(kind, unary.ty.clone())
                .text("-")
                .child(prefix_operand(ctx, "-", operand))
                .build();
            builder.keyword("checked").text("(").child(inner).text(")").build()
        }
        UnaryOp::Not if unary.ty.is_bool() => {
            builder.text("!").child(ctx.translate_operand(operand, UNARY)).build()
        }
        UnaryOp::Not | UnaryOp::OnesComplement => {
            builder.text("~").child(ctx.translate_operand(operand, UNARY)).build()
        }
        UnaryOp::IsTrue => ctx.translate(operand),
        UnaryOp::IsFalse => builder.text("!").child(ctx.translate_operand(operand, UNARY)).build(),
        UnaryOp::Increment | UnaryOp::Decrement => {
            let symbol = if unary.op == UnaryOp::Increment { " + 1" } else { " - 1" };
            builder
                .child(ctx.translate_operand(operand, precedence::ADDITIVE))
                .token(symbol, TokenType::Default)
                .build()
        }
        UnaryOp::PreIncrementAssign => {
            builder.text("++").child(ctx.translate_operand(operand, UNARY)).build()
        }
        UnaryOp::PreDecrementAssign => {
            builder.text("--").child(ctx.translate_operand(operand, UNARY)).build()
        }
        UnaryOp::PostIncrementAssign => {
            builder.child(ctx.translate_operand(operand, PRIMARY)).text("++").build()
        }
        UnaryOp::PostDecrementAssign => {
            builder.child(ctx.translate_operand(operand, PRIMARY)).text("--").build()
        }
        UnaryOp::Convert | UnaryOp::ConvertChecked | UnaryOp::Unbox => {
            if operand.ty() == unary.ty {
                return ctx.translate(operand);
            }
            builder
                .text("(")
                .type_name(&unary.ty)
                .text(")")
                .child(ctx.translate_operand(operand, UNARY))
                .build()
        }
        UnaryOp::TypeAs => builder
            .child(ctx.translate_operand(operand, RELATIONAL))
            .space()
            .keyword("as")
            .space()
            .type_name(&unary.ty)
            .build(),
        UnaryOp::Quote => {
            let quoted = ctx.translate(operand);
            builder
                .when(ctx.settings().show_quoted_lambda_comments, |b| {
                    b.token("// Quoted to induce a closure:", TokenType::Comment)
                        .new_line()
                })
                .child(quoted)
                .build()
        }
        UnaryOp::Throw => builder
            .control("throw")
            .space()
            .child(ctx.translate(operand))
            .jump(true)
            .build(),
        UnaryOp::ArrayLength => builder
            .child(ctx.translate_operand(operand, PRIMARY))
            .text(".Length")
            .build(),
    }
}

/// Keeps `- -x` and `-(-1)` from fusing into a decrement.
fn prefix_operand(ctx: &TranslationContext<'_>, symbol: &str, operand: &Expr) -> TranslationBox {
    let fuses = match operand {
        Expr::Unary(inner) => match inner.op {
            UnaryOp::Negate | UnaryOp::NegateChecked | UnaryOp::PreDecrementAssign => symbol == "-",
            UnaryOp::UnaryPlus | UnaryOp::PreIncrementAssign => symbol == "+",
            _ => false,
        },
        Expr::Constant(constant) => {
            symbol == "-"
                && match constant.value {
                    ConstantValue::Int(value) => value < 0,
                    ConstantValue::Float(value) => value < 0.0,
                    _ => false,
                }
        }
        _ => false,
    };
    if fuses {
        ctx.parenthesize(ctx.translate(operand))
    } else {
        ctx.translate_operand(operand, UNARY)
    }
}

// ── Type tests ──────────────────────────────────────────────────────

pub fn translate_type_test(
    ctx: &TranslationContext<'_>,
    type_binary: &TypeBinaryExpr,
) -> TranslationBox {
    if type_binary.exact {
        return ctx
            .builder(ExprKind::TypeEqual, TypeRef::bool())
            .child(ctx.translate_operand(&type_binary.expression, PRIMARY))
            .text(".")
            .method_name("GetType")
            .text("() == ")
            .keyword("typeof")
            .text("(")
            .type_name(&type_binary.type_operand)
            .text(")")
            .build();
    }
    ctx.builder(ExprKind::TypeIs, TypeRef::bool())
        .child(ctx.translate_operand(&type_binary.expression, RELATIONAL))
        .space()
        .keyword("is")
        .space()
        .type_name(&type_binary.type_operand)
        .build()
}
