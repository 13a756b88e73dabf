//! Factory functions for assembling expression trees in code.
//!
//! Result types are inferred the way the host runtime infers them, so
//! callers only spell out types where a node cannot work them out.

use crate::expr::*;
use crate::members::{ConstructorInfo, MemberInfo, MethodInfo};
use crate::types::TypeRef;
use std::sync::Arc;

// ── Leaves ──────────────────────────────────────────────────────────

pub fn constant(value: ConstantValue, ty: TypeRef) -> ExprRef {
    Arc::new(Expr::Constant(ConstantExpr { value, ty }))
}

pub fn int(value: i64) -> ExprRef {
    constant(ConstantValue::Int(value), TypeRef::int())
}

pub fn long(value: i64) -> ExprRef {
    constant(ConstantValue::Int(value), TypeRef::long())
}

pub fn double(value: f64) -> ExprRef {
    constant(ConstantValue::Float(value), TypeRef::double())
}

pub fn boolean(value: bool) -> ExprRef {
    constant(ConstantValue::Bool(value), TypeRef::bool())
}

pub fn string(value: &str) -> ExprRef {
    constant(ConstantValue::String(value.to_string()), TypeRef::string())
}

pub fn character(value: char) -> ExprRef {
    constant(ConstantValue::Char(value), TypeRef::char())
}

pub fn null(ty: TypeRef) -> ExprRef {
    constant(ConstantValue::Null, ty)
}

/// `typeof(ty)`.
pub fn type_of(ty: TypeRef) -> ExprRef {
    constant(ConstantValue::Type(ty), TypeRef::type_type())
}

pub fn enum_member(enum_type: TypeRef, member: &str) -> ExprRef {
    constant(ConstantValue::EnumMember(member.to_string()), enum_type)
}

/// A lambda parameter or block variable declaration.
pub fn parameter(ty: TypeRef, name: &str) -> ParameterExpr {
    ParameterExpr::new(ty, name)
}

/// A by-ref lambda parameter.
pub fn ref_parameter(ty: TypeRef, name: &str) -> ParameterExpr {
    ParameterExpr {
        is_by_ref: true,
        ..ParameterExpr::new(ty, name)
    }
}

pub fn default(ty: TypeRef) -> ExprRef {
    Arc::new(Expr::Default(DefaultExpr { ty }))
}

/// `default(void)`.
pub fn empty() -> ExprRef {
    default(TypeRef::void())
}

pub fn comment(text: &str) -> ExprRef {
    Arc::new(Expr::Comment(CommentExpr {
        text: text.to_string(),
    }))
}

// ── Operators ───────────────────────────────────────────────────────

pub fn binary(op: BinaryOp, left: ExprRef, right: ExprRef) -> ExprRef {
    let ty = binary_result_type(op, &left, &right);
    Arc::new(Expr::Binary(BinaryExpr {
        op,
        left,
        right,
        ty,
        method: None,
    }))
}

/// A binary operator implemented by a user-defined method.
pub fn binary_with_method(
    op: BinaryOp,
    left: ExprRef,
    right: ExprRef,
    method: MethodInfo,
) -> ExprRef {
    let ty = method.closed_return_type();
    Arc::new(Expr::Binary(BinaryExpr {
        op,
        left,
        right,
        ty,
        method: Some(method),
    }))
}

fn binary_result_type(op: BinaryOp, left: &ExprRef, right: &ExprRef) -> TypeRef {
    if op.is_comparison() || matches!(op, BinaryOp::AndAlso | BinaryOp::OrElse) {
        return TypeRef::bool();
    }
    match op {
        BinaryOp::ArrayIndex => {
            let array = left.ty();
            array.element_type().cloned().unwrap_or(array)
        }
        BinaryOp::Coalesce => right.ty(),
        BinaryOp::Power => TypeRef::double(),
        _ => left.ty(),
    }
}

pub fn add(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::Add, left, right)
}

pub fn subtract(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::Subtract, left, right)
}

pub fn multiply(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::Multiply, left, right)
}

pub fn divide(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::Divide, left, right)
}

pub fn modulo(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::Modulo, left, right)
}

pub fn equal(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::Equal, left, right)
}

pub fn not_equal(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::NotEqual, left, right)
}

pub fn less_than(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::LessThan, left, right)
}

pub fn greater_than(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::GreaterThan, left, right)
}

pub fn and_also(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::AndAlso, left, right)
}

pub fn or_else(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::OrElse, left, right)
}

pub fn coalesce(left: ExprRef, right: ExprRef) -> ExprRef {
    binary(BinaryOp::Coalesce, left, right)
}

pub fn assign(target: ExprRef, value: ExprRef) -> ExprRef {
    binary(BinaryOp::Assign, target, value)
}

pub fn array_index(array: ExprRef, index: ExprRef) -> ExprRef {
    binary(BinaryOp::ArrayIndex, array, index)
}

pub fn unary(op: UnaryOp, operand: ExprRef) -> ExprRef {
    let ty = match op {
        UnaryOp::Not | UnaryOp::IsTrue | UnaryOp::IsFalse if operand.ty().is_bool() => {
            TypeRef::bool()
        }
        UnaryOp::ArrayLength => TypeRef::int(),
        UnaryOp::Throw => TypeRef::void(),
        _ => operand.ty(),
    };
    Arc::new(Expr::Unary(UnaryExpr {
        op,
        operand: Some(operand),
        ty,
        method: None,
    }))
}

/// A unary operator with an explicit result type (conversions, `as`, unbox).
pub fn unary_to(op: UnaryOp, operand: ExprRef, ty: TypeRef) -> ExprRef {
    Arc::new(Expr::Unary(UnaryExpr {
        op,
        operand: Some(operand),
        ty,
        method: None,
    }))
}

pub fn negate(operand: ExprRef) -> ExprRef {
    unary(UnaryOp::Negate, operand)
}

pub fn not(operand: ExprRef) -> ExprRef {
    unary(UnaryOp::Not, operand)
}

pub fn convert(operand: ExprRef, ty: TypeRef) -> ExprRef {
    unary_to(UnaryOp::Convert, operand, ty)
}

pub fn type_as(operand: ExprRef, ty: TypeRef) -> ExprRef {
    unary_to(UnaryOp::TypeAs, operand, ty)
}

pub fn post_increment(operand: ExprRef) -> ExprRef {
    unary(UnaryOp::PostIncrementAssign, operand)
}

pub fn pre_increment(operand: ExprRef) -> ExprRef {
    unary(UnaryOp::PreIncrementAssign, operand)
}

pub fn quote(lambda: ExprRef) -> ExprRef {
    let ty = TypeRef::expression_of(lambda.ty());
    unary_to(UnaryOp::Quote, lambda, ty)
}

pub fn throw(exception: ExprRef) -> ExprRef {
    unary(UnaryOp::Throw, exception)
}

/// `throw;` inside a catch block.
pub fn rethrow() -> ExprRef {
    Arc::new(Expr::Unary(UnaryExpr {
        op: UnaryOp::Throw,
        operand: None,
        ty: TypeRef::void(),
        method: None,
    }))
}

pub fn array_length(array: ExprRef) -> ExprRef {
    unary(UnaryOp::ArrayLength, array)
}

pub fn type_is(expression: ExprRef, ty: TypeRef) -> ExprRef {
    Arc::new(Expr::TypeBinary(TypeBinaryExpr {
        expression,
        type_operand: ty,
        exact: false,
    }))
}

pub fn type_equal(expression: ExprRef, ty: TypeRef) -> ExprRef {
    Arc::new(Expr::TypeBinary(TypeBinaryExpr {
        expression,
        type_operand: ty,
        exact: true,
    }))
}

// ── Control flow ────────────────────────────────────────────────────

pub fn condition(test: ExprRef, if_true: ExprRef, if_false: ExprRef, ty: TypeRef) -> ExprRef {
    Arc::new(Expr::Conditional(ConditionalExpr {
        test,
        if_true,
        if_false,
        ty,
    }))
}

/// `test ? if_true : if_false`, typed by the true branch.
pub fn ternary(test: ExprRef, if_true: ExprRef, if_false: ExprRef) -> ExprRef {
    let ty = if_true.ty();
    condition(test, if_true, if_false, ty)
}

pub fn if_then(test: ExprRef, body: ExprRef) -> ExprRef {
    condition(test, body, empty(), TypeRef::void())
}

pub fn if_then_else(test: ExprRef, if_true: ExprRef, if_false: ExprRef) -> ExprRef {
    condition(test, if_true, if_false, TypeRef::void())
}

/// A block typed by its last expression.
pub fn block(variables: Vec<ParameterExpr>, expressions: Vec<ExprRef>) -> ExprRef {
    let ty = expressions.last().map(|e| e.ty()).unwrap_or_else(TypeRef::void);
    block_of_type(ty, variables, expressions)
}

pub fn block_of_type(
    ty: TypeRef,
    variables: Vec<ParameterExpr>,
    expressions: Vec<ExprRef>,
) -> ExprRef {
    Arc::new(Expr::Block(BlockExpr {
        variables,
        expressions,
        ty,
    }))
}

pub fn lambda(parameters: Vec<ParameterExpr>, body: ExprRef) -> ExprRef {
    let return_type = body.ty();
    lambda_returning(parameters, body, return_type)
}

pub fn lambda_returning(
    parameters: Vec<ParameterExpr>,
    body: ExprRef,
    return_type: TypeRef,
) -> ExprRef {
    let ty = TypeRef::delegate_for(parameters.iter().map(|p| p.ty.clone()).collect(), &return_type);
    Arc::new(Expr::Lambda(LambdaExpr {
        name: None,
        parameters,
        body,
        return_type,
        ty,
    }))
}

pub fn loop_(
    body: ExprRef,
    break_label: Option<LabelTarget>,
    continue_label: Option<LabelTarget>,
) -> ExprRef {
    Arc::new(Expr::Loop(LoopExpr {
        body,
        break_label,
        continue_label,
    }))
}

pub fn label_target(name: Option<&str>) -> LabelTarget {
    LabelTarget::new(TypeRef::void(), name)
}

pub fn make_goto(kind: GotoKind, target: LabelTarget, value: Option<ExprRef>) -> ExprRef {
    Arc::new(Expr::Goto(GotoExpr {
        kind,
        target,
        value,
        ty: TypeRef::void(),
    }))
}

pub fn break_(target: &LabelTarget) -> ExprRef {
    make_goto(GotoKind::Break, target.clone(), None)
}

pub fn continue_(target: &LabelTarget) -> ExprRef {
    make_goto(GotoKind::Continue, target.clone(), None)
}

pub fn goto_(target: &LabelTarget) -> ExprRef {
    make_goto(GotoKind::Goto, target.clone(), None)
}

pub fn return_(target: &LabelTarget, value: Option<ExprRef>) -> ExprRef {
    make_goto(GotoKind::Return, target.clone(), value)
}

pub fn label(target: &LabelTarget, default_value: Option<ExprRef>) -> ExprRef {
    Arc::new(Expr::Label(LabelExpr {
        target: target.clone(),
        default_value,
    }))
}

pub fn switch_case(test_values: Vec<ExprRef>, body: ExprRef) -> SwitchCase {
    SwitchCase { test_values, body }
}

pub fn switch(value: ExprRef, cases: Vec<SwitchCase>, default_body: Option<ExprRef>) -> ExprRef {
    let ty = cases
        .first()
        .map(|c| c.body.ty())
        .unwrap_or_else(TypeRef::void);
    Arc::new(Expr::Switch(SwitchExpr {
        value,
        cases,
        default_body,
        ty,
    }))
}

pub fn catch(test: TypeRef, variable: Option<ParameterExpr>, body: ExprRef) -> CatchBlock {
    CatchBlock {
        test,
        variable,
        filter: None,
        body,
    }
}

pub fn catch_when(
    test: TypeRef,
    variable: ParameterExpr,
    filter: ExprRef,
    body: ExprRef,
) -> CatchBlock {
    CatchBlock {
        test,
        variable: Some(variable),
        filter: Some(filter),
        body,
    }
}

pub fn try_catch(body: ExprRef, handlers: Vec<CatchBlock>) -> ExprRef {
    try_catch_finally(body, handlers, None)
}

pub fn try_catch_finally(
    body: ExprRef,
    handlers: Vec<CatchBlock>,
    finally: Option<ExprRef>,
) -> ExprRef {
    let ty = body.ty();
    Arc::new(Expr::Try(TryExpr {
        body,
        handlers,
        finally,
        fault: None,
        ty,
    }))
}

pub fn try_fault(body: ExprRef, fault: ExprRef) -> ExprRef {
    let ty = body.ty();
    Arc::new(Expr::Try(TryExpr {
        body,
        handlers: Vec::new(),
        finally: None,
        fault: Some(fault),
        ty,
    }))
}

// ── Calls and members ───────────────────────────────────────────────

pub fn call(instance: ExprRef, method: MethodInfo, arguments: Vec<ExprRef>) -> ExprRef {
    Arc::new(Expr::Call(CallExpr {
        instance: Some(instance),
        method,
        arguments,
    }))
}

pub fn call_static(method: MethodInfo, arguments: Vec<ExprRef>) -> ExprRef {
    Arc::new(Expr::Call(CallExpr {
        instance: None,
        method,
        arguments,
    }))
}

pub fn invoke(target: ExprRef, arguments: Vec<ExprRef>) -> ExprRef {
    let ty = match target.as_lambda() {
        Some(lambda) => lambda.return_type.clone(),
        None => target
            .ty()
            .generic_args()
            .last()
            .cloned()
            .unwrap_or_else(TypeRef::void),
    };
    Arc::new(Expr::Invoke(InvokeExpr {
        target,
        arguments,
        ty,
    }))
}

pub fn member(instance: ExprRef, member: MemberInfo) -> ExprRef {
    Arc::new(Expr::Member(MemberExpr {
        instance: Some(instance),
        member,
    }))
}

pub fn static_member(member: MemberInfo) -> ExprRef {
    Arc::new(Expr::Member(MemberExpr {
        instance: None,
        member,
    }))
}

pub fn index(
    object: ExprRef,
    indexer: Option<MemberInfo>,
    arguments: Vec<ExprRef>,
    ty: TypeRef,
) -> ExprRef {
    Arc::new(Expr::Index(IndexExpr {
        object,
        indexer,
        arguments,
        ty,
    }))
}

// ── Construction ────────────────────────────────────────────────────

pub fn new_expr(
    ty: TypeRef,
    constructor: Option<ConstructorInfo>,
    arguments: Vec<ExprRef>,
) -> NewExpr {
    NewExpr {
        ty,
        constructor,
        arguments,
        members: Vec::new(),
    }
}

pub fn new(ty: TypeRef, arguments: Vec<ExprRef>) -> ExprRef {
    Arc::new(Expr::New(new_expr(ty, None, arguments)))
}

/// `new { Name = value, ... }`.
pub fn new_anonymous(members: Vec<(&str, ExprRef)>) -> ExprRef {
    let ty = TypeRef::anonymous(members.iter().map(|(_, e)| e.ty()).collect());
    let (names, arguments): (Vec<String>, Vec<ExprRef>) =
        members.into_iter().map(|(n, e)| (n.to_string(), e)).unzip();
    Arc::new(Expr::New(NewExpr {
        ty,
        constructor: None,
        arguments,
        members: names,
    }))
}

pub fn new_array_init(element_type: TypeRef, expressions: Vec<ExprRef>) -> ExprRef {
    Arc::new(Expr::NewArray(NewArrayExpr {
        element_type,
        expressions,
        bounds: false,
    }))
}

pub fn new_array_bounds(element_type: TypeRef, bounds: Vec<ExprRef>) -> ExprRef {
    Arc::new(Expr::NewArray(NewArrayExpr {
        element_type,
        expressions: bounds,
        bounds: true,
    }))
}

pub fn bind(member: MemberInfo, expression: ExprRef) -> MemberBinding {
    MemberBinding::Assignment { member, expression }
}

pub fn member_bind(member: MemberInfo, bindings: Vec<MemberBinding>) -> MemberBinding {
    MemberBinding::Member { member, bindings }
}

pub fn list_bind(member: MemberInfo, initializers: Vec<ElementInit>) -> MemberBinding {
    MemberBinding::List {
        member,
        initializers,
    }
}

pub fn member_init(new: NewExpr, bindings: Vec<MemberBinding>) -> ExprRef {
    Arc::new(Expr::MemberInit(MemberInitExpr { new, bindings }))
}

pub fn element_init(add_method: MethodInfo, arguments: Vec<ExprRef>) -> ElementInit {
    ElementInit {
        add_method,
        arguments,
    }
}

pub fn list_init(new: NewExpr, initializers: Vec<ElementInit>) -> ExprRef {
    Arc::new(Expr::ListInit(ListInitExpr { new, initializers }))
}

pub fn extension(
    name: &str,
    ty: TypeRef,
    display: Option<&str>,
    operands: Vec<ExprRef>,
) -> ExprRef {
    Arc::new(Expr::Extension(ExtensionExpr {
        name: name.to_string(),
        ty,
        display: display.map(str::to_string),
        operands,
    }))
}
