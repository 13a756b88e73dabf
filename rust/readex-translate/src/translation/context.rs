//! Shared state for the translation pass and the node dispatcher.

use crate::translation::analysis::{is_ternary_shape, ExpressionAnalysis};
use crate::translation::buffer::TranslationBuffer;
use crate::translation::formatter::PlainTextFormatter;
use crate::translation::scope::NodeId;
use crate::translation::settings::TranslationSettings;
use crate::translation::translators::{
    blocks, calls, conditionals, constants, exceptions, initializers, lambdas, loops, operators,
    precedence_of, switches, variables, TranslationBox, TranslationBuilder,
};
use crate::translation::type_names::{friendly_name, TypeNameOptions};
use readex_core::expr::{ParameterExpr, UnaryOp};
use readex_core::{Expr, ExprKind, TypeRef};
use std::collections::HashMap;
use tracing::trace;

/// How an extracted block is called from the method it was lifted out of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCall {
    pub name: String,
    pub arguments: Vec<ExtractedArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArgument {
    pub name: String,
    pub is_ref: bool,
}

pub type ExtractedCalls = HashMap<NodeId, ExtractedCall>;

/// Everything a translator may consult while building its translation.
pub struct TranslationContext<'a> {
    settings: &'a TranslationSettings,
    analysis: &'a ExpressionAnalysis,
    extracted_calls: Option<&'a ExtractedCalls>,
}

impl<'a> TranslationContext<'a> {
    pub fn new(settings: &'a TranslationSettings, analysis: &'a ExpressionAnalysis) -> Self {
        Self {
            settings,
            analysis,
            extracted_calls: None,
        }
    }

    pub fn with_extracted_calls(mut self, calls: &'a ExtractedCalls) -> Self {
        self.extracted_calls = Some(calls);
        self
    }

    pub fn settings(&self) -> &TranslationSettings {
        self.settings
    }

    pub fn analysis(&self) -> &ExpressionAnalysis {
        self.analysis
    }

    pub fn extracted_call(&self, node: NodeId) -> Option<&ExtractedCall> {
        self.extracted_calls.and_then(|calls| calls.get(&node))
    }

    pub fn type_names(&self) -> TypeNameOptions<'_> {
        TypeNameOptions::from_settings(self.settings)
    }

    /// The friendly name of `ty` under the current settings.
    pub fn type_name(&self, ty: &TypeRef) -> String {
        friendly_name(ty, &self.type_names())
    }

    pub fn builder(&self, kind: ExprKind, ty: TypeRef) -> TranslationBuilder<'_> {
        TranslationBuilder::new(self.settings.formatter.as_ref(), self.type_names(), kind, ty)
    }

    pub fn variable_name(&self, parameter: &ParameterExpr) -> String {
        variables::variable_name(parameter)
    }

    // ── Dispatch ────────────────────────────────────────────────────

    /// The user-supplied rendering of `expr`, when one is registered for
    /// its kind and does not decline.
    fn custom_translation(&self, expr: &Expr) -> Option<TranslationBox> {
        let custom = self.settings.custom_translator(expr.kind())?;
        let text = custom(expr, self)?;
        trace!(kind = %expr.kind(), "custom translator used");
        Some(self.builder(expr.kind(), expr.ty()).text(&text).build())
    }

    /// Translates `expr` in expression position.
    pub fn translate(&self, expr: &Expr) -> TranslationBox {
        if let Some(custom) = self.custom_translation(expr) {
            return custom;
        }
        match expr {
            Expr::Constant(constant) => constants::translate_constant(self, constant),
            Expr::Parameter(parameter) => variables::translate_parameter(self, parameter),
            Expr::Binary(binary) if binary.op.is_assignment() => {
                operators::translate_assignment(self, expr, binary)
            }
            Expr::Binary(binary) => operators::translate_binary(self, binary),
            Expr::Unary(unary) => operators::translate_unary(self, unary),
            Expr::Conditional(conditional) if is_ternary_shape(conditional) => {
                conditionals::translate_ternary(self, conditional)
            }
            Expr::Conditional(conditional) => conditionals::translate_if(self, conditional, false),
            Expr::Block(block) => blocks::translate_value_block(self, expr, block),
            Expr::Lambda(lambda) => lambdas::translate_lambda(self, expr, lambda),
            Expr::Call(call) => calls::translate_call(self, call),
            Expr::Invoke(invoke) => calls::translate_invoke(self, invoke),
            Expr::Member(member) => calls::translate_member(self, member),
            Expr::New(new) => initializers::translate_new(self, new),
            Expr::NewArray(array) => initializers::translate_new_array(self, array),
            Expr::MemberInit(init) => initializers::translate_member_init(self, init),
            Expr::ListInit(init) => initializers::translate_list_init(self, init),
            Expr::Loop(looped) => loops::translate_loop(self, looped),
            Expr::Goto(goto) => loops::translate_goto(self, goto),
            Expr::Label(label) => loops::translate_label(self, label, false),
            Expr::Switch(switch) => switches::translate_switch(self, switch, false),
            Expr::Try(try_expr) => exceptions::translate_try(self, try_expr, false),
            Expr::Default(default) => constants::translate_default(self, default),
            Expr::Index(index) => calls::translate_index(self, index),
            Expr::TypeBinary(type_binary) => operators::translate_type_test(self, type_binary),
            Expr::Comment(comment) => constants::translate_comment(self, comment),
            Expr::Extension(extension) => constants::translate_extension(self, extension),
        }
    }

    /// Translates `expr` as a statement whose value is discarded.
    pub fn translate_statement(&self, expr: &Expr) -> TranslationBox {
        if let Some(custom) = self.custom_translation(expr) {
            return custom;
        }
        match expr {
            Expr::Block(block) => blocks::translate_nested_block(self, expr, block, false),
            Expr::Conditional(conditional) => conditionals::translate_if(self, conditional, false),
            _ => self.translate(expr),
        }
    }

    /// Translates `expr` as the statement producing the enclosing body's
    /// value, adding `return` where the value is not already returned.
    pub fn translate_returning(&self, expr: &Expr) -> TranslationBox {
        if let Some(custom) = self.custom_translation(expr) {
            return if yields_no_return(expr) {
                custom
            } else {
                blocks::return_statement(self, custom)
            };
        }
        match expr {
            Expr::Block(block) => blocks::translate_nested_block(self, expr, block, true),
            Expr::Conditional(conditional) if !is_ternary_shape(conditional) => {
                conditionals::translate_if(self, conditional, !conditional.ty.is_void())
            }
            Expr::Switch(switch) => switches::translate_switch(self, switch, !switch.ty.is_void()),
            Expr::Try(try_expr) => {
                exceptions::translate_try(self, try_expr, !try_expr.ty.is_void())
            }
            Expr::Label(label) => loops::translate_label(self, label, true),
            _ if yields_no_return(expr) => self.translate(expr),
            _ => blocks::return_statement(self, self.translate(expr)),
        }
    }

    /// Translates `expr` as the operand of an operator binding at
    /// `min_precedence`, parenthesising when it binds more loosely.
    pub fn translate_operand(&self, expr: &Expr, min_precedence: u8) -> TranslationBox {
        let translation = self.translate(expr);
        if precedence_of(expr) < min_precedence {
            self.parenthesize(translation)
        } else {
            translation
        }
    }

    pub fn parenthesize(&self, translation: TranslationBox) -> TranslationBox {
        let kind = translation.node_kind();
        let ty = translation.result_type().clone();
        self.builder(kind, ty).text("(").child(translation).text(")").build()
    }

    /// Renders `expr` to plain text; for custom translators composing output
    /// around their operands.
    pub fn render(&self, expr: &Expr) -> String {
        let translation = self.translate(expr);
        let mut buffer = TranslationBuffer::new(
            &PlainTextFormatter,
            &self.settings.indent,
            translation.translation_size(),
        );
        translation.write_to(&mut buffer);
        buffer.finish().1
    }
}

/// Whether `expr` in the returning position is written without `return`.
fn yields_no_return(expr: &Expr) -> bool {
    match expr {
        Expr::Goto(_) | Expr::Loop(_) | Expr::Comment(_) => true,
        Expr::Unary(unary) if unary.op == UnaryOp::Throw => true,
        _ => expr.ty().is_void(),
    }
}
