//! Translation settings and their serde-friendly configuration mirror.

use crate::translation::context::TranslationContext;
use crate::translation::formatter::{HtmlFormatter, PlainTextFormatter, TranslationFormatter};
use readex_core::{Expr, ExprKind, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Replaces the built-in rendering of one node kind. Returning `None` falls
/// back to the built-in strategy.
pub type CustomTranslator =
    Arc<dyn Fn(&Expr, &TranslationContext<'_>) -> Option<String> + Send + Sync>;

/// Names anonymous types in place of the default `AnonymousType`.
pub type AnonymousTypeNamer = Arc<dyn Fn(&TypeRef) -> String + Send + Sync>;

pub const DEFAULT_INDENT: &str = "    ";

/// Stylistic choices for one translation. Cheap to clone.
#[derive(Clone)]
pub struct TranslationSettings {
    pub fully_qualify_type_names: bool,
    /// Declare locals and `out` variables with their type rather than `var`.
    pub use_explicit_type_names: bool,
    /// Always write generic method arguments, even when inferable.
    pub use_explicit_generic_parameters: bool,
    pub declare_output_parameters_inline: bool,
    /// Write unused lambda parameters as `_`.
    pub discard_unused_parameters: bool,
    pub show_implicit_array_types: bool,
    pub show_lambda_parameter_types: bool,
    pub show_quoted_lambda_comments: bool,
    /// Write the values of captured closure fields instead of their names.
    pub show_captured_values: bool,
    pub show_string_concat_calls: bool,
    pub indent: String,
    pub formatter: Arc<dyn TranslationFormatter>,
    anonymous_type_namer: Option<AnonymousTypeNamer>,
    custom_translators: HashMap<ExprKind, CustomTranslator>,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            fully_qualify_type_names: false,
            use_explicit_type_names: false,
            use_explicit_generic_parameters: false,
            declare_output_parameters_inline: false,
            discard_unused_parameters: false,
            show_implicit_array_types: false,
            show_lambda_parameter_types: false,
            show_quoted_lambda_comments: false,
            show_captured_values: false,
            show_string_concat_calls: false,
            indent: DEFAULT_INDENT.to_string(),
            formatter: Arc::new(PlainTextFormatter),
            anonymous_type_namer: None,
            custom_translators: HashMap::new(),
        }
    }
}

impl fmt::Debug for TranslationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut custom: Vec<String> =
            self.custom_translators.keys().map(|k| k.to_string()).collect();
        custom.sort();
        f.debug_struct("TranslationSettings")
            .field("fully_qualify_type_names", &self.fully_qualify_type_names)
            .field("use_explicit_type_names", &self.use_explicit_type_names)
            .field("use_explicit_generic_parameters", &self.use_explicit_generic_parameters)
            .field("declare_output_parameters_inline", &self.declare_output_parameters_inline)
            .field("discard_unused_parameters", &self.discard_unused_parameters)
            .field("show_implicit_array_types", &self.show_implicit_array_types)
            .field("show_lambda_parameter_types", &self.show_lambda_parameter_types)
            .field("show_quoted_lambda_comments", &self.show_quoted_lambda_comments)
            .field("show_captured_values", &self.show_captured_values)
            .field("show_string_concat_calls", &self.show_string_concat_calls)
            .field("indent", &self.indent)
            .field("formatter", &self.formatter)
            .field("anonymous_type_namer", &self.anonymous_type_namer.is_some())
            .field("custom_translators", &custom)
            .finish()
    }
}

impl TranslationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default settings. Never mutated.
    pub fn shared_default() -> &'static TranslationSettings {
        static DEFAULT: OnceLock<TranslationSettings> = OnceLock::new();
        DEFAULT.get_or_init(TranslationSettings::default)
    }

    // ── Fluent setters ──────────────────────────────────────────────

    pub fn fully_qualified(mut self) -> Self {
        self.fully_qualify_type_names = true;
        self
    }

    pub fn explicit_type_names(mut self) -> Self {
        self.use_explicit_type_names = true;
        self
    }

    pub fn explicit_generic_parameters(mut self) -> Self {
        self.use_explicit_generic_parameters = true;
        self
    }

    pub fn inline_output_parameters(mut self) -> Self {
        self.declare_output_parameters_inline = true;
        self
    }

    pub fn discard_unused(mut self) -> Self {
        self.discard_unused_parameters = true;
        self
    }

    pub fn implicit_array_types_shown(mut self) -> Self {
        self.show_implicit_array_types = true;
        self
    }

    pub fn lambda_parameter_types_shown(mut self) -> Self {
        self.show_lambda_parameter_types = true;
        self
    }

    pub fn quoted_lambda_comments(mut self) -> Self {
        self.show_quoted_lambda_comments = true;
        self
    }

    pub fn captured_values_shown(mut self) -> Self {
        self.show_captured_values = true;
        self
    }

    pub fn string_concat_calls_shown(mut self) -> Self {
        self.show_string_concat_calls = true;
        self
    }

    pub fn indent_using(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn format_using(mut self, formatter: Arc<dyn TranslationFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn html(self) -> Self {
        self.format_using(Arc::new(HtmlFormatter))
    }

    pub fn name_anonymous_types_using<F>(mut self, namer: F) -> Self
    where
        F: Fn(&TypeRef) -> String + Send + Sync + 'static,
    {
        self.anonymous_type_namer = Some(Arc::new(namer));
        self
    }

    pub fn translate_kind_using<F>(mut self, kind: ExprKind, translator: F) -> Self
    where
        F: Fn(&Expr, &TranslationContext<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.custom_translators.insert(kind, Arc::new(translator));
        self
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn anonymous_type_namer(&self) -> Option<&AnonymousTypeNamer> {
        self.anonymous_type_namer.as_ref()
    }

    pub fn custom_translator(&self, kind: ExprKind) -> Option<&CustomTranslator> {
        self.custom_translators.get(&kind)
    }
}

// ── Configuration mirror ────────────────────────────────────────────

/// Output format selectable from configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Html,
}

/// Deserializable mirror of [`TranslationSettings`]. Absent fields keep the
/// value already present in the settings they are applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub fully_qualify_type_names: Option<bool>,
    pub use_explicit_type_names: Option<bool>,
    pub use_explicit_generic_parameters: Option<bool>,
    pub declare_output_parameters_inline: Option<bool>,
    pub discard_unused_parameters: Option<bool>,
    pub show_implicit_array_types: Option<bool>,
    pub show_lambda_parameter_types: Option<bool>,
    pub show_quoted_lambda_comments: Option<bool>,
    pub show_captured_values: Option<bool>,
    pub show_string_concat_calls: Option<bool>,
    pub indent: Option<String>,
    pub format: Option<OutputFormat>,
}

impl SettingsConfig {
    /// Overlays the configured values onto `settings`.
    pub fn apply(&self, mut settings: TranslationSettings) -> TranslationSettings {
        let flags: [(Option<bool>, &mut bool); 10] = [
            (self.fully_qualify_type_names, &mut settings.fully_qualify_type_names),
            (self.use_explicit_type_names, &mut settings.use_explicit_type_names),
            (self.use_explicit_generic_parameters, &mut settings.use_explicit_generic_parameters),
            (self.declare_output_parameters_inline, &mut settings.declare_output_parameters_inline),
            (self.discard_unused_parameters, &mut settings.discard_unused_parameters),
            (self.show_implicit_array_types, &mut settings.show_implicit_array_types),
            (self.show_lambda_parameter_types, &mut settings.show_lambda_parameter_types),
            (self.show_quoted_lambda_comments, &mut settings.show_quoted_lambda_comments),
            (self.show_captured_values, &mut settings.show_captured_values),
            (self.show_string_concat_calls, &mut settings.show_string_concat_calls),
        ];
        for (value, slot) in flags {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(indent) = &self.indent {
            settings.indent = indent.clone();
        }
        match self.format {
            Some(OutputFormat::Html) => settings.html(),
            Some(OutputFormat::Plain) => settings.format_using(Arc::new(PlainTextFormatter)),
            None => settings,
        }
    }

    /// Layers `other` over `self`; values set in `other` win.
    pub fn merged_with(&self, other: &SettingsConfig) -> SettingsConfig {
        SettingsConfig {
            fully_qualify_type_names: other
                .fully_qualify_type_names
                .or(self.fully_qualify_type_names),
            use_explicit_type_names: other.use_explicit_type_names.or(self.use_explicit_type_names),
            use_explicit_generic_parameters: other
                .use_explicit_generic_parameters
                .or(self.use_explicit_generic_parameters),
            declare_output_parameters_inline: other
                .declare_output_parameters_inline
                .or(self.declare_output_parameters_inline),
            discard_unused_parameters: other
                .discard_unused_parameters
                .or(self.discard_unused_parameters),
            show_implicit_array_types: other
                .show_implicit_array_types
                .or(self.show_implicit_array_types),
            show_lambda_parameter_types: other
                .show_lambda_parameter_types
                .or(self.show_lambda_parameter_types),
            show_quoted_lambda_comments: other
                .show_quoted_lambda_comments
                .or(self.show_quoted_lambda_comments),
            show_captured_values: other.show_captured_values.or(self.show_captured_values),
            show_string_concat_calls: other
                .show_string_concat_calls
                .or(self.show_string_concat_calls),
            indent: other.indent.clone().or_else(|| self.indent.clone()),
            format: other.format.or(self.format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_default_is_plain_four_spaces() {
        let settings = TranslationSettings::shared_default();
        assert_eq!(settings.indent, "    ");
        assert!(!settings.fully_qualify_type_names);
        assert_eq!(settings.formatter.overhead(crate::TokenType::Keyword), 0);
    }

    #[test]
    fn fluent_setters_chain() {
        let settings = TranslationSettings::new()
            .fully_qualified()
            .discard_unused()
            .indent_using("\t");
        assert!(settings.fully_qualify_type_names);
        assert!(settings.discard_unused_parameters);
        assert_eq!(settings.indent, "\t");
    }

    #[test]
    fn config_overlays_only_present_values() {
        let config = SettingsConfig {
            use_explicit_type_names: Some(true),
            indent: Some("  ".into()),
            ..Default::default()
        };
        let settings = config.apply(TranslationSettings::new().fully_qualified());
        assert!(settings.use_explicit_type_names);
        assert!(settings.fully_qualify_type_names);
        assert_eq!(settings.indent, "  ");
    }

    #[test]
    fn merged_config_prefers_later_layer() {
        let file = SettingsConfig {
            show_captured_values: Some(true),
            format: Some(OutputFormat::Html),
            ..Default::default()
        };
        let flags = SettingsConfig {
            format: Some(OutputFormat::Plain),
            ..Default::default()
        };
        let merged = file.merged_with(&flags);
        assert_eq!(merged.show_captured_values, Some(true));
        assert_eq!(merged.format, Some(OutputFormat::Plain));
    }

    #[test]
    fn custom_translators_are_keyed_by_kind() {
        let settings = TranslationSettings::new()
            .translate_kind_using(ExprKind::Extension, |_, _| Some("X".into()));
        assert!(settings.custom_translator(ExprKind::Extension).is_some());
        assert!(settings.custom_translator(ExprKind::Call).is_none());
    }
}
