//! Expression translation: analysis, translation and buffer passes.

pub mod analysis;
pub mod buffer;
pub mod context;
pub mod formatter;
pub mod namespaces;
pub mod scope;
pub mod settings;
pub mod translators;
pub mod type_names;

use analysis::{renders_as_statements, ExpressionAnalysis};
use buffer::TranslationBuffer;
use context::TranslationContext;
use readex_core::ExprRef;
use settings::TranslationSettings;
use tracing::debug;
use translators::blocks::translate_body;
use translators::TranslationBox;

/// The result of translating one expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionTranslation {
    text: String,
    raw: String,
    required_namespaces: Vec<String>,
    line_count: usize,
}

impl ExpressionTranslation {
    pub fn new(expr: &ExprRef, settings: &TranslationSettings) -> Self {
        let analysis = ExpressionAnalysis::of_expression(expr, settings);
        let context = TranslationContext::new(settings, &analysis);
        let translation = translate_root(&context, expr);
        let (text, raw, line_count) = write_translation(translation.as_ref(), settings);
        debug!(kind = %expr.kind(), lines = line_count, chars = raw.len(), "expression translated");
        Self {
            text,
            raw,
            required_namespaces: analysis.required_namespaces().to_vec(),
            line_count,
        }
    }

    /// The formatted text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text without formatter markup.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Namespaces the text needs imported, in `using` order.
    pub fn required_namespaces(&self) -> &[String] {
        &self.required_namespaces
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Statement-only trees become statements; anything else a bare expression.
fn translate_root(context: &TranslationContext<'_>, expr: &ExprRef) -> TranslationBox {
    if renders_as_statements(expr) {
        translate_body(context, expr, false)
    } else {
        context.translate(expr)
    }
}

/// Writes a finished translation, returning formatted text, raw text and
/// line count.
pub(crate) fn write_translation(
    translation: &dyn translators::Translation,
    settings: &TranslationSettings,
) -> (String, String, usize) {
    let capacity = translation.translation_size() + translation.formatting_size();
    let mut buffer =
        TranslationBuffer::new(settings.formatter.as_ref(), &settings.indent, capacity);
    translation.write_to(&mut buffer);
    let lines = if buffer.is_empty() { 0 } else { buffer.line_count() };
    let (text, raw) = buffer.finish();
    (text, raw, lines)
}

/// Translates `expr` to readable source text.
pub fn translate(expr: &ExprRef, settings: &TranslationSettings) -> String {
    ExpressionTranslation::new(expr, settings).into_text()
}

/// Translates `expr`, discarding formatter markup.
pub fn translate_raw(expr: &ExprRef, settings: &TranslationSettings) -> String {
    ExpressionTranslation::new(expr, settings).raw
}
