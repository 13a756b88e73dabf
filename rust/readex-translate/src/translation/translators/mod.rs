//! Node translators.
//!
//! Every node becomes one immutable [`Translation`] built bottom-up. Sizes
//! and line counts are computed once at construction so parents can decide
//! on wrapping before anything is written.

pub mod blocks;
pub mod calls;
pub mod conditionals;
pub mod constants;
pub mod exceptions;
pub mod initializers;
pub mod lambdas;
pub mod loops;
pub mod operators;
pub mod switches;
pub mod variables;

use crate::translation::analysis::is_string_concat;
use crate::translation::buffer::TranslationBuffer;
use crate::translation::formatter::{TokenType, TranslationFormatter};
use crate::translation::type_names::{type_name_segments, TypeNameOptions};
use readex_core::expr::{BinaryOp, ConstantValue, UnaryOp};
use readex_core::{Expr, ExprKind, TypeRef};

/// Line length beyond which argument lists and operator chains wrap.
pub const MAX_LINE_LENGTH: usize = 100;

/// Rendered text for one node plus the metadata parents lay it out by.
pub trait Translation {
    fn node_kind(&self) -> ExprKind;

    fn result_type(&self) -> &TypeRef;

    /// Estimated characters written, indentation excluded.
    fn translation_size(&self) -> usize;

    /// Extra characters the formatter adds around tokens.
    fn formatting_size(&self) -> usize;

    fn line_count(&self) -> usize;

    fn write_to(&self, buffer: &mut TranslationBuffer<'_>);

    fn is_multi_line(&self) -> bool {
        self.line_count() > 1
    }

    /// Complete statements needing no `;`.
    fn is_terminated(&self) -> bool {
        false
    }

    /// Writes nothing at all.
    fn is_empty(&self) -> bool {
        false
    }

    /// Ends by leaving the enclosing flow: `return`, `throw`, `goto`,
    /// `break` or `continue`.
    fn ends_with_jump(&self) -> bool {
        false
    }
}

pub type TranslationBox = Box<dyn Translation>;

// ── Composite translations ──────────────────────────────────────────

enum Piece {
    Token(String, TokenType),
    Child(TranslationBox),
    NewLine,
    Indent,
    Unindent,
}

/// A translation assembled from tokens, child translations and layout
/// instructions.
pub struct CompositeTranslation {
    kind: ExprKind,
    ty: TypeRef,
    pieces: Vec<Piece>,
    size: usize,
    formatting: usize,
    lines: usize,
    terminated: bool,
    jump: bool,
}

impl Translation for CompositeTranslation {
    fn node_kind(&self) -> ExprKind {
        self.kind
    }

    fn result_type(&self) -> &TypeRef {
        &self.ty
    }

    fn translation_size(&self) -> usize {
        self.size
    }

    fn formatting_size(&self) -> usize {
        self.formatting
    }

    fn line_count(&self) -> usize {
        self.lines
    }

    fn write_to(&self, buffer: &mut TranslationBuffer<'_>) {
        for piece in &self.pieces {
            match piece {
                Piece::Token(text, token) => buffer.write_token(text, *token),
                Piece::Child(child) => child.write_to(buffer),
                Piece::NewLine => buffer.write_new_line(),
                Piece::Indent => buffer.indent(),
                Piece::Unindent => buffer.unindent(),
            }
        }
    }

    fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    fn ends_with_jump(&self) -> bool {
        self.jump
    }
}

/// Accumulates the pieces of a [`CompositeTranslation`].
pub struct TranslationBuilder<'c> {
    formatter: &'c dyn TranslationFormatter,
    names: TypeNameOptions<'c>,
    kind: ExprKind,
    ty: TypeRef,
    pieces: Vec<Piece>,
    terminated: bool,
    jump: bool,
}

impl<'c> TranslationBuilder<'c> {
    pub fn new(
        formatter: &'c dyn TranslationFormatter,
        names: TypeNameOptions<'c>,
        kind: ExprKind,
        ty: TypeRef,
    ) -> Self {
        Self {
            formatter,
            names,
            kind,
            ty,
            pieces: Vec::new(),
            terminated: false,
            jump: false,
        }
    }

    pub fn token(mut self, text: &str, token: TokenType) -> Self {
        if !text.is_empty() {
            self.pieces.push(Piece::Token(text.to_string(), token));
        }
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.token(text, TokenType::Default)
    }

    pub fn space(self) -> Self {
        self.text(" ")
    }

    pub fn keyword(self, text: &str) -> Self {
        self.token(text, TokenType::Keyword)
    }

    pub fn control(self, text: &str) -> Self {
        self.token(text, TokenType::ControlStatement)
    }

    pub fn variable(self, text: &str) -> Self {
        self.token(text, TokenType::Variable)
    }

    pub fn method_name(self, text: &str) -> Self {
        self.token(text, TokenType::MethodName)
    }

    pub fn type_name(self, ty: &TypeRef) -> Self {
        let names = self.names;
        self.type_name_with(ty, &names)
    }

    pub fn type_name_with(mut self, ty: &TypeRef, options: &TypeNameOptions<'_>) -> Self {
        for (text, token) in type_name_segments(ty, options) {
            self.pieces.push(Piece::Token(text, token));
        }
        self
    }

    pub fn child(mut self, child: TranslationBox) -> Self {
        if !child.is_empty() {
            self.pieces.push(Piece::Child(child));
        }
        self
    }

    pub fn children(
        mut self,
        children: impl IntoIterator<Item = TranslationBox>,
        separator: &str,
    ) -> Self {
        for (index, child) in children.into_iter().enumerate() {
            if index > 0 {
                self = self.text(separator);
            }
            self = self.child(child);
        }
        self
    }

    pub fn new_line(mut self) -> Self {
        self.pieces.push(Piece::NewLine);
        self
    }

    pub fn indent(mut self) -> Self {
        self.pieces.push(Piece::Indent);
        self
    }

    pub fn unindent(mut self) -> Self {
        self.pieces.push(Piece::Unindent);
        self
    }

    pub fn terminated(mut self) -> Self {
        self.terminated = true;
        self
    }

    pub fn jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    /// Adds pieces conditionally without breaking the chain.
    pub fn when(self, condition: bool, then: impl FnOnce(Self) -> Self) -> Self {
        if condition {
            then(self)
        } else {
            self
        }
    }

    pub fn build(self) -> TranslationBox {
        Box::new(self.build_composite())
    }

    pub fn build_composite(self) -> CompositeTranslation {
        let mut size = 0;
        let mut formatting = 0;
        let mut lines = 1;
        for piece in &self.pieces {
            match piece {
                Piece::Token(text, token) => {
                    size += text.chars().count();
                    formatting += self.formatter.overhead(*token);
                }
                Piece::Child(child) => {
                    size += child.translation_size();
                    formatting += child.formatting_size();
                    lines += child.line_count() - 1;
                }
                Piece::NewLine => {
                    size += 1;
                    lines += 1;
                }
                Piece::Indent | Piece::Unindent => {}
            }
        }
        CompositeTranslation {
            kind: self.kind,
            ty: self.ty,
            pieces: self.pieces,
            size,
            formatting,
            lines,
            terminated: self.terminated,
            jump: self.jump,
        }
    }
}

/// Writes nothing; stands in for empty expressions.
pub struct EmptyTranslation {
    kind: ExprKind,
    ty: TypeRef,
}

impl EmptyTranslation {
    pub fn boxed(kind: ExprKind, ty: TypeRef) -> TranslationBox {
        Box::new(Self { kind, ty })
    }
}

impl Translation for EmptyTranslation {
    fn node_kind(&self) -> ExprKind {
        self.kind
    }

    fn result_type(&self) -> &TypeRef {
        &self.ty
    }

    fn translation_size(&self) -> usize {
        0
    }

    fn formatting_size(&self) -> usize {
        0
    }

    fn line_count(&self) -> usize {
        0
    }

    fn write_to(&self, _buffer: &mut TranslationBuffer<'_>) {}

    fn is_terminated(&self) -> bool {
        true
    }

    fn is_empty(&self) -> bool {
        true
    }
}

// ── Precedence ──────────────────────────────────────────────────────

pub mod precedence {
    pub const LAMBDA: u8 = 0;
    pub const CONDITIONAL: u8 = 1;
    pub const COALESCE: u8 = 2;
    pub const OR_ELSE: u8 = 3;
    pub const AND_ALSO: u8 = 4;
    pub const OR: u8 = 5;
    pub const XOR: u8 = 6;
    pub const AND: u8 = 7;
    pub const EQUALITY: u8 = 8;
    pub const RELATIONAL: u8 = 9;
    pub const SHIFT: u8 = 10;
    pub const ADDITIVE: u8 = 11;
    pub const MULTIPLICATIVE: u8 = 12;
    pub const UNARY: u8 = 13;
    pub const PRIMARY: u8 = 14;
}

pub fn binary_precedence(op: BinaryOp) -> u8 {
    use precedence::*;
    match op {
        BinaryOp::Multiply
        | BinaryOp::MultiplyChecked
        | BinaryOp::Divide
        | BinaryOp::Modulo => MULTIPLICATIVE,
        BinaryOp::Add | BinaryOp::AddChecked | BinaryOp::Subtract | BinaryOp::SubtractChecked => {
            ADDITIVE
        }
        BinaryOp::LeftShift | BinaryOp::RightShift => SHIFT,
        BinaryOp::LessThan
        | BinaryOp::LessThanOrEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterThanOrEqual => RELATIONAL,
        BinaryOp::Equal | BinaryOp::NotEqual => EQUALITY,
        BinaryOp::And => AND,
        BinaryOp::ExclusiveOr => XOR,
        BinaryOp::Or => OR,
        BinaryOp::AndAlso => AND_ALSO,
        BinaryOp::OrElse => OR_ELSE,
        BinaryOp::Coalesce => COALESCE,
        BinaryOp::Power | BinaryOp::ArrayIndex => PRIMARY,
        _ => LAMBDA,
    }
}

/// The precedence of `expr` as rendered.
pub fn precedence_of(expr: &Expr) -> u8 {
    use precedence::*;
    match expr {
        Expr::Binary(binary) if binary.op.is_checked() && !binary.op.is_assignment() => PRIMARY,
        Expr::Binary(binary) if binary.method.as_ref().is_some_and(|m| !m.is_operator()) => PRIMARY,
        Expr::Binary(binary) => binary_precedence(binary.op),
        Expr::Unary(unary) => match unary.op {
            UnaryOp::PostIncrementAssign
            | UnaryOp::PostDecrementAssign
            | UnaryOp::ArrayLength => PRIMARY,
            UnaryOp::Throw | UnaryOp::Quote => LAMBDA,
            UnaryOp::TypeAs => RELATIONAL,
            UnaryOp::IsTrue => unary.operand.as_deref().map(precedence_of).unwrap_or(PRIMARY),
            UnaryOp::Convert | UnaryOp::ConvertChecked | UnaryOp::Unbox => {
                match unary.operand.as_deref() {
                    Some(operand) if operand.ty() == unary.ty => precedence_of(operand),
                    _ => UNARY,
                }
            }
            _ if unary.method.as_ref().is_some_and(|m| !m.is_operator()) => PRIMARY,
            _ => UNARY,
        },
        Expr::Conditional(_) => CONDITIONAL,
        Expr::Lambda(_) => LAMBDA,
        Expr::TypeBinary(type_binary) if type_binary.exact => EQUALITY,
        Expr::TypeBinary(_) => RELATIONAL,
        Expr::Constant(constant) => match constant.value {
            ConstantValue::Int(value) if value < 0 => UNARY,
            ConstantValue::Float(value) if value < 0.0 => UNARY,
            _ => PRIMARY,
        },
        Expr::Call(call) if is_string_concat(&call.method) => ADDITIVE,
        _ => PRIMARY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::formatter::{HtmlFormatter, PlainTextFormatter};

    fn builder(formatter: &dyn TranslationFormatter) -> TranslationBuilder<'_> {
        let options = TypeNameOptions::default();
        TranslationBuilder::new(formatter, options, ExprKind::Call, TypeRef::int())
    }

    #[test]
    fn composite_metrics_are_computed_once() {
        let inner = builder(&PlainTextFormatter).text("a").new_line().text("b").build();
        let outer = builder(&PlainTextFormatter)
            .keyword("return")
            .space()
            .child(inner)
            .build();
        assert_eq!(outer.translation_size(), "return a\nb".len());
        assert_eq!(outer.line_count(), 2);
        assert_eq!(outer.formatting_size(), 0);
    }

    #[test]
    fn formatting_size_follows_formatter_overhead() {
        let translation = builder(&HtmlFormatter)
            .keyword("new")
            .space()
            .type_name(&TypeRef::string())
            .build();
        assert_eq!(translation.formatting_size(), 2 * HtmlFormatter.overhead(TokenType::Keyword));
    }

    #[test]
    fn empty_children_are_dropped() {
        let translation = builder(&PlainTextFormatter)
            .child(EmptyTranslation::boxed(ExprKind::Default, TypeRef::void()))
            .build();
        assert!(translation.is_empty());
    }
}
