//! Expression tree nodes.
//!
//! Trees are built from [`ExprRef`] handles so subtrees may be shared. The
//! engine only ever reads them.

use crate::members::{ConstructorInfo, MemberInfo, MethodInfo};
use crate::types::TypeRef;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

/// Shared handle to an expression node.
pub type ExprRef = Arc<Expr>;

// ── Node kinds ──────────────────────────────────────────────────────

/// Closed set of node kinds. Every [`Expr`] maps to exactly one.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
)]
pub enum ExprKind {
    Constant,
    Parameter,
    // binary
    Add,
    AddChecked,
    Subtract,
    SubtractChecked,
    Multiply,
    MultiplyChecked,
    Divide,
    Modulo,
    Power,
    And,
    Or,
    ExclusiveOr,
    AndAlso,
    OrElse,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Coalesce,
    LeftShift,
    RightShift,
    ArrayIndex,
    Assign,
    AddAssign,
    AddAssignChecked,
    SubtractAssign,
    SubtractAssignChecked,
    MultiplyAssign,
    MultiplyAssignChecked,
    DivideAssign,
    ModuloAssign,
    PowerAssign,
    AndAssign,
    OrAssign,
    ExclusiveOrAssign,
    LeftShiftAssign,
    RightShiftAssign,
    // unary
    Negate,
    NegateChecked,
    UnaryPlus,
    Not,
    OnesComplement,
    IsTrue,
    IsFalse,
    Increment,
    Decrement,
    PreIncrementAssign,
    PreDecrementAssign,
    PostIncrementAssign,
    PostDecrementAssign,
    Convert,
    ConvertChecked,
    TypeAs,
    Quote,
    Throw,
    Unbox,
    ArrayLength,
    // everything else
    Conditional,
    Block,
    Lambda,
    Call,
    Invoke,
    MemberAccess,
    New,
    NewArrayInit,
    NewArrayBounds,
    MemberInit,
    ListInit,
    Loop,
    Goto,
    Label,
    Switch,
    Try,
    Default,
    Index,
    TypeIs,
    TypeEqual,
    Comment,
    Extension,
}

/// Binary operators, including assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    AddChecked,
    Subtract,
    SubtractChecked,
    Multiply,
    MultiplyChecked,
    Divide,
    Modulo,
    Power,
    And,
    Or,
    ExclusiveOr,
    AndAlso,
    OrElse,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Coalesce,
    LeftShift,
    RightShift,
    ArrayIndex,
    Assign,
    AddAssign,
    AddAssignChecked,
    SubtractAssign,
    SubtractAssignChecked,
    MultiplyAssign,
    MultiplyAssignChecked,
    DivideAssign,
    ModuloAssign,
    PowerAssign,
    AndAssign,
    OrAssign,
    ExclusiveOrAssign,
    LeftShiftAssign,
    RightShiftAssign,
}

impl BinaryOp {
    pub fn kind(self) -> ExprKind {
        match self {
            BinaryOp::Add => ExprKind::Add,
            BinaryOp::AddChecked => ExprKind::AddChecked,
            BinaryOp::Subtract => ExprKind::Subtract,
            BinaryOp::SubtractChecked => ExprKind::SubtractChecked,
            BinaryOp::Multiply => ExprKind::Multiply,
            BinaryOp::MultiplyChecked => ExprKind::MultiplyChecked,
            BinaryOp::Divide => ExprKind::Divide,
            BinaryOp::Modulo => ExprKind::Modulo,
            BinaryOp::Power => ExprKind::Power,
            BinaryOp::And => ExprKind::And,
            BinaryOp::Or => ExprKind::Or,
            BinaryOp::ExclusiveOr => ExprKind::ExclusiveOr,
            BinaryOp::AndAlso => ExprKind::AndAlso,
            BinaryOp::OrElse => ExprKind::OrElse,
            BinaryOp::Equal => ExprKind::Equal,
            BinaryOp::NotEqual => ExprKind::NotEqual,
            BinaryOp::LessThan => ExprKind::LessThan,
            BinaryOp::LessThanOrEqual => ExprKind::LessThanOrEqual,
            BinaryOp::GreaterThan => ExprKind::GreaterThan,
            BinaryOp::GreaterThanOrEqual => ExprKind::GreaterThanOrEqual,
            BinaryOp::Coalesce => ExprKind::Coalesce,
            BinaryOp::LeftShift => ExprKind::LeftShift,
            BinaryOp::RightShift => ExprKind::RightShift,
            BinaryOp::ArrayIndex => ExprKind::ArrayIndex,
            BinaryOp::Assign => ExprKind::Assign,
            BinaryOp::AddAssign => ExprKind::AddAssign,
            BinaryOp::AddAssignChecked => ExprKind::AddAssignChecked,
            BinaryOp::SubtractAssign => ExprKind::SubtractAssign,
            BinaryOp::SubtractAssignChecked => ExprKind::SubtractAssignChecked,
            BinaryOp::MultiplyAssign => ExprKind::MultiplyAssign,
            BinaryOp::MultiplyAssignChecked => ExprKind::MultiplyAssignChecked,
            BinaryOp::DivideAssign => ExprKind::DivideAssign,
            BinaryOp::ModuloAssign => ExprKind::ModuloAssign,
            BinaryOp::PowerAssign => ExprKind::PowerAssign,
            BinaryOp::AndAssign => ExprKind::AndAssign,
            BinaryOp::OrAssign => ExprKind::OrAssign,
            BinaryOp::ExclusiveOrAssign => ExprKind::ExclusiveOrAssign,
            BinaryOp::LeftShiftAssign => ExprKind::LeftShiftAssign,
            BinaryOp::RightShiftAssign => ExprKind::RightShiftAssign,
        }
    }

    /// Any form of assignment, plain or compound.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::AddAssignChecked
                | BinaryOp::SubtractAssign
                | BinaryOp::SubtractAssignChecked
                | BinaryOp::MultiplyAssign
                | BinaryOp::MultiplyAssignChecked
                | BinaryOp::DivideAssign
                | BinaryOp::ModuloAssign
                | BinaryOp::PowerAssign
                | BinaryOp::AndAssign
                | BinaryOp::OrAssign
                | BinaryOp::ExclusiveOrAssign
                | BinaryOp::LeftShiftAssign
                | BinaryOp::RightShiftAssign
        )
    }

    /// Operators producing `bool` regardless of operand types.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
        )
    }

    pub fn is_checked(self) -> bool {
        matches!(
            self,
            BinaryOp::AddChecked
                | BinaryOp::SubtractChecked
                | BinaryOp::MultiplyChecked
                | BinaryOp::AddAssignChecked
                | BinaryOp::SubtractAssignChecked
                | BinaryOp::MultiplyAssignChecked
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Negate,
    NegateChecked,
    UnaryPlus,
    Not,
    OnesComplement,
    IsTrue,
    IsFalse,
    Increment,
    Decrement,
    PreIncrementAssign,
    PreDecrementAssign,
    PostIncrementAssign,
    PostDecrementAssign,
    Convert,
    ConvertChecked,
    TypeAs,
    Quote,
    /// `throw operand`, or a rethrow when the operand is absent.
    Throw,
    Unbox,
    ArrayLength,
}

impl UnaryOp {
    pub fn kind(self) -> ExprKind {
        match self {
            UnaryOp::Negate => ExprKind::Negate,
            UnaryOp::NegateChecked => ExprKind::NegateChecked,
            UnaryOp::UnaryPlus => ExprKind::UnaryPlus,
            UnaryOp::Not => ExprKind::Not,
            UnaryOp::OnesComplement => ExprKind::OnesComplement,
            UnaryOp::IsTrue => ExprKind::IsTrue,
            UnaryOp::IsFalse => ExprKind::IsFalse,
            UnaryOp::Increment => ExprKind::Increment,
            UnaryOp::Decrement => ExprKind::Decrement,
            UnaryOp::PreIncrementAssign => ExprKind::PreIncrementAssign,
            UnaryOp::PreDecrementAssign => ExprKind::PreDecrementAssign,
            UnaryOp::PostIncrementAssign => ExprKind::PostIncrementAssign,
            UnaryOp::PostDecrementAssign => ExprKind::PostDecrementAssign,
            UnaryOp::Convert => ExprKind::Convert,
            UnaryOp::ConvertChecked => ExprKind::ConvertChecked,
            UnaryOp::TypeAs => ExprKind::TypeAs,
            UnaryOp::Quote => ExprKind::Quote,
            UnaryOp::Throw => ExprKind::Throw,
            UnaryOp::Unbox => ExprKind::Unbox,
            UnaryOp::ArrayLength => ExprKind::ArrayLength,
        }
    }

    /// Increment/decrement forms that write back to their operand.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            UnaryOp::PreIncrementAssign
                | UnaryOp::PreDecrementAssign
                | UnaryOp::PostIncrementAssign
                | UnaryOp::PostDecrementAssign
        )
    }
}

// ── Constant values ─────────────────────────────────────────────────

/// A field captured by a closure, with the value it held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedField {
    pub name: String,
    pub ty: TypeRef,
    pub value: ConstantValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Decimal literal text, kept exact.
    Decimal(String),
    Char(char),
    String(String),
    /// `typeof(T)`.
    Type(TypeRef),
    /// A named member of an enum type.
    EnumMember(String),
    /// An instance of a compiler-generated closure class.
    Closure(Vec<CapturedField>),
    /// Any other object; rendered through its display text.
    Object(String),
}

// ── Nodes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantExpr {
    pub value: ConstantValue,
    pub ty: TypeRef,
}

/// A lambda parameter or block variable. Identity is `(ty, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterExpr {
    pub name: String,
    pub ty: TypeRef,
    /// `ref`/`out` lambda parameter.
    #[serde(default)]
    pub is_by_ref: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: ExprRef,
    pub right: ExprRef,
    pub ty: TypeRef,
    /// User-defined operator implementation, if any.
    #[serde(default)]
    pub method: Option<MethodInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    /// Absent only for a rethrow.
    pub operand: Option<ExprRef>,
    pub ty: TypeRef,
    #[serde(default)]
    pub method: Option<MethodInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalExpr {
    pub test: ExprRef,
    pub if_true: ExprRef,
    pub if_false: ExprRef,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockExpr {
    #[serde(default)]
    pub variables: Vec<ParameterExpr>,
    pub expressions: Vec<ExprRef>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaExpr {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterExpr>,
    pub body: ExprRef,
    pub return_type: TypeRef,
    /// Delegate type (`Func<...>` / `Action<...>` or a custom delegate).
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    /// Absent for static calls.
    #[serde(default)]
    pub instance: Option<ExprRef>,
    pub method: MethodInfo,
    #[serde(default)]
    pub arguments: Vec<ExprRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeExpr {
    pub target: ExprRef,
    #[serde(default)]
    pub arguments: Vec<ExprRef>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpr {
    /// Absent for static members.
    #[serde(default)]
    pub instance: Option<ExprRef>,
    pub member: MemberInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpr {
    pub ty: TypeRef,
    #[serde(default)]
    pub constructor: Option<ConstructorInfo>,
    #[serde(default)]
    pub arguments: Vec<ExprRef>,
    /// Property names for anonymous-type construction, parallel to `arguments`.
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArrayExpr {
    pub element_type: TypeRef,
    /// Elements for `NewArrayInit`, bounds for `NewArrayBounds`.
    pub expressions: Vec<ExprRef>,
    #[serde(default)]
    pub bounds: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInit {
    pub add_method: MethodInfo,
    pub arguments: Vec<ExprRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "binding", rename_all = "snake_case")]
pub enum MemberBinding {
    /// `Member = value`
    Assignment { member: MemberInfo, expression: ExprRef },
    /// `Member = { Nested = value }`
    Member {
        member: MemberInfo,
        bindings: Vec<MemberBinding>,
    },
    /// `Member = { item, item }`
    List {
        member: MemberInfo,
        initializers: Vec<ElementInit>,
    },
}

impl MemberBinding {
    pub fn member(&self) -> &MemberInfo {
        match self {
            MemberBinding::Assignment { member, .. }
            | MemberBinding::Member { member, .. }
            | MemberBinding::List { member, .. } => member,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInitExpr {
    pub new: NewExpr,
    pub bindings: Vec<MemberBinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListInitExpr {
    pub new: NewExpr,
    pub initializers: Vec<ElementInit>,
}

static NEXT_LABEL_ID: AtomicU32 = AtomicU32::new(1);

/// Jump target for gotos, breaks, continues and returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelTarget {
    #[serde(default)]
    pub name: Option<String>,
    pub ty: TypeRef,
    /// Distinguishes unnamed targets of the same type.
    #[serde(default)]
    pub id: u32,
}

impl LabelTarget {
    pub fn new(ty: TypeRef, name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ty,
            id: NEXT_LABEL_ID.fetch_add(1, Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopExpr {
    pub body: ExprRef,
    #[serde(default)]
    pub break_label: Option<LabelTarget>,
    #[serde(default)]
    pub continue_label: Option<LabelTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GotoKind {
    Goto,
    Return,
    Break,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GotoExpr {
    pub kind: GotoKind,
    pub target: LabelTarget,
    #[serde(default)]
    pub value: Option<ExprRef>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelExpr {
    pub target: LabelTarget,
    #[serde(default)]
    pub default_value: Option<ExprRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub test_values: Vec<ExprRef>,
    pub body: ExprRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchExpr {
    pub value: ExprRef,
    pub cases: Vec<SwitchCase>,
    #[serde(default)]
    pub default_body: Option<ExprRef>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchBlock {
    pub test: TypeRef,
    #[serde(default)]
    pub variable: Option<ParameterExpr>,
    #[serde(default)]
    pub filter: Option<ExprRef>,
    pub body: ExprRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryExpr {
    pub body: ExprRef,
    #[serde(default)]
    pub handlers: Vec<CatchBlock>,
    #[serde(default)]
    pub finally: Option<ExprRef>,
    #[serde(default)]
    pub fault: Option<ExprRef>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultExpr {
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpr {
    pub object: ExprRef,
    /// Indexer property; absent for array access.
    #[serde(default)]
    pub indexer: Option<MemberInfo>,
    pub arguments: Vec<ExprRef>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBinaryExpr {
    pub expression: ExprRef,
    pub type_operand: TypeRef,
    /// `TypeEqual` (exact runtime type) rather than `TypeIs`.
    #[serde(default)]
    pub exact: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentExpr {
    pub text: String,
}

/// Fallback for node shapes outside the closed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionExpr {
    pub name: String,
    pub ty: TypeRef,
    /// Text shown when no custom translator is registered.
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub operands: Vec<ExprRef>,
}

/// An expression tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    Constant(ConstantExpr),
    Parameter(ParameterExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Conditional(ConditionalExpr),
    Block(BlockExpr),
    Lambda(LambdaExpr),
    Call(CallExpr),
    Invoke(InvokeExpr),
    Member(MemberExpr),
    New(NewExpr),
    NewArray(NewArrayExpr),
    MemberInit(MemberInitExpr),
    ListInit(ListInitExpr),
    Loop(LoopExpr),
    Goto(GotoExpr),
    Label(LabelExpr),
    Switch(SwitchExpr),
    Try(TryExpr),
    Default(DefaultExpr),
    Index(IndexExpr),
    TypeBinary(TypeBinaryExpr),
    Comment(CommentExpr),
    Extension(ExtensionExpr),
}

impl Expr {
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Constant(_) => ExprKind::Constant,
            Expr::Parameter(_) => ExprKind::Parameter,
            Expr::Binary(b) => b.op.kind(),
            Expr::Unary(u) => u.op.kind(),
            Expr::Conditional(_) => ExprKind::Conditional,
            Expr::Block(_) => ExprKind::Block,
            Expr::Lambda(_) => ExprKind::Lambda,
            Expr::Call(_) => ExprKind::Call,
            Expr::Invoke(_) => ExprKind::Invoke,
            Expr::Member(_) => ExprKind::MemberAccess,
            Expr::New(_) => ExprKind::New,
            Expr::NewArray(a) if a.bounds => ExprKind::NewArrayBounds,
            Expr::NewArray(_) => ExprKind::NewArrayInit,
            Expr::MemberInit(_) => ExprKind::MemberInit,
            Expr::ListInit(_) => ExprKind::ListInit,
            Expr::Loop(_) => ExprKind::Loop,
            Expr::Goto(_) => ExprKind::Goto,
            Expr::Label(_) => ExprKind::Label,
            Expr::Switch(_) => ExprKind::Switch,
            Expr::Try(_) => ExprKind::Try,
            Expr::Default(_) => ExprKind::Default,
            Expr::Index(_) => ExprKind::Index,
            Expr::TypeBinary(t) if t.exact => ExprKind::TypeEqual,
            Expr::TypeBinary(_) => ExprKind::TypeIs,
            Expr::Comment(_) => ExprKind::Comment,
            Expr::Extension(_) => ExprKind::Extension,
        }
    }

    /// The node's result type.
    pub fn ty(&self) -> TypeRef {
        match self {
            Expr::Constant(c) => c.ty.clone(),
            Expr::Parameter(p) => p.ty.clone(),
            Expr::Binary(b) => b.ty.clone(),
            Expr::Unary(u) => u.ty.clone(),
            Expr::Conditional(c) => c.ty.clone(),
            Expr::Block(b) => b.ty.clone(),
            Expr::Lambda(l) => l.ty.clone(),
            Expr::Call(c) => c.method.closed_return_type(),
            Expr::Invoke(i) => i.ty.clone(),
            Expr::Member(m) => m.member.member_type.clone(),
            Expr::New(n) => n.ty.clone(),
            Expr::NewArray(a) => {
                let rank = if a.bounds { a.expressions.len().max(1) } else { 1 };
                TypeRef::array_of_rank(a.element_type.clone(), rank as u8)
            }
            Expr::MemberInit(m) => m.new.ty.clone(),
            Expr::ListInit(l) => l.new.ty.clone(),
            Expr::Loop(l) => l
                .break_label
                .as_ref()
                .map(|label| label.ty.clone())
                .unwrap_or_else(TypeRef::void),
            Expr::Goto(g) => g.ty.clone(),
            Expr::Label(l) => l.target.ty.clone(),
            Expr::Switch(s) => s.ty.clone(),
            Expr::Try(t) => t.ty.clone(),
            Expr::Default(d) => d.ty.clone(),
            Expr::Index(i) => i.ty.clone(),
            Expr::TypeBinary(_) => TypeRef::bool(),
            Expr::Comment(_) => TypeRef::void(),
            Expr::Extension(e) => e.ty.clone(),
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterExpr> {
        match self {
            Expr::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&LambdaExpr> {
        match self {
            Expr::Lambda(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&BlockExpr> {
        match self {
            Expr::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&CommentExpr> {
        match self {
            Expr::Comment(c) => Some(c),
            _ => None,
        }
    }

    /// `default(void)`, the empty expression.
    pub fn is_empty(&self) -> bool {
        matches!(self, Expr::Default(d) if d.ty.is_void())
    }

    /// The direct children of this node, in evaluation order.
    pub fn children(&self) -> Vec<&ExprRef> {
        let mut out: Vec<&ExprRef> = Vec::new();
        match self {
            Expr::Constant(_) | Expr::Parameter(_) | Expr::Default(_) | Expr::Comment(_) => {}
            Expr::Binary(b) => {
                out.push(&b.left);
                out.push(&b.right);
            }
            Expr::Unary(u) => out.extend(u.operand.iter()),
            Expr::Conditional(c) => {
                out.push(&c.test);
                out.push(&c.if_true);
                out.push(&c.if_false);
            }
            Expr::Block(b) => out.extend(b.expressions.iter()),
            Expr::Lambda(l) => out.push(&l.body),
            Expr::Call(c) => {
                out.extend(c.instance.iter());
                out.extend(c.arguments.iter());
            }
            Expr::Invoke(i) => {
                out.push(&i.target);
                out.extend(i.arguments.iter());
            }
            Expr::Member(m) => out.extend(m.instance.iter()),
            Expr::New(n) => out.extend(n.arguments.iter()),
            Expr::NewArray(a) => out.extend(a.expressions.iter()),
            Expr::MemberInit(m) => {
                out.extend(m.new.arguments.iter());
                collect_binding_children(&m.bindings, &mut out);
            }
            Expr::ListInit(l) => {
                out.extend(l.new.arguments.iter());
                for init in &l.initializers {
                    out.extend(init.arguments.iter());
                }
            }
            Expr::Loop(l) => out.push(&l.body),
            Expr::Goto(g) => out.extend(g.value.iter()),
            Expr::Label(l) => out.extend(l.default_value.iter()),
            Expr::Switch(s) => {
                out.push(&s.value);
                for case in &s.cases {
                    out.extend(case.test_values.iter());
                    out.push(&case.body);
                }
                out.extend(s.default_body.iter());
            }
            Expr::Try(t) => {
                out.push(&t.body);
                for handler in &t.handlers {
                    out.extend(handler.filter.iter());
                    out.push(&handler.body);
                }
                out.extend(t.finally.iter());
                out.extend(t.fault.iter());
            }
            Expr::Index(i) => {
                out.push(&i.object);
                out.extend(i.arguments.iter());
            }
            Expr::TypeBinary(t) => out.push(&t.expression),
            Expr::Extension(e) => out.extend(e.operands.iter()),
        }
        out
    }

    /// Total number of nodes reachable from here, shared subtrees counted per use.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(|child| child.node_count())
            .sum::<usize>()
    }
}

fn collect_binding_children<'a>(bindings: &'a [MemberBinding], out: &mut Vec<&'a ExprRef>) {
    for binding in bindings {
        match binding {
            MemberBinding::Assignment { expression, .. } => out.push(expression),
            MemberBinding::Member { bindings, .. } => collect_binding_children(bindings, out),
            MemberBinding::List { initializers, .. } => {
                for init in initializers {
                    out.extend(init.arguments.iter());
                }
            }
        }
    }
}

impl From<ParameterExpr> for Expr {
    fn from(p: ParameterExpr) -> Self {
        Expr::Parameter(p)
    }
}

impl ParameterExpr {
    pub fn new(ty: TypeRef, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ty,
            is_by_ref: false,
        }
    }

    /// A node referencing this variable.
    pub fn expr(&self) -> ExprRef {
        Arc::new(Expr::Parameter(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn every_binary_op_maps_to_a_distinct_kind() {
        let kinds: std::collections::HashSet<ExprKind> =
            BinaryOp::iter().map(BinaryOp::kind).collect();
        assert_eq!(kinds.len(), BinaryOp::iter().count());
    }

    #[test]
    fn kind_names_parse_back() {
        for kind in ExprKind::iter() {
            let parsed: ExprKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!(ExprKind::COUNT > 80);
    }

    #[test]
    fn parameter_identity_is_type_and_name() {
        let a = ParameterExpr::new(TypeRef::int(), "x");
        let b = ParameterExpr::new(TypeRef::int(), "x");
        let c = ParameterExpr::new(TypeRef::long(), "x");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_expression_is_void_default() {
        let empty = Expr::Default(DefaultExpr { ty: TypeRef::void() });
        assert!(empty.is_empty());
        let zero = Expr::Default(DefaultExpr { ty: TypeRef::int() });
        assert!(!zero.is_empty());
    }
}
