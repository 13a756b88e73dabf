//! Human-facing rendering of [`TranslateError`]s with codes and help lines.

use crate::error::{NameKind, TranslateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A rendered diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    /// The input the diagnostic concerns, e.g. a tree file.
    pub origin: Option<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message.into())
    }

    fn new(severity: Severity, message: String) -> Self {
        Self {
            severity,
            code: None,
            message,
            origin: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.suggestions.push(help.into());
        self
    }

    /// Render with ANSI colors for terminal
    pub fn render_ansi(&self) -> String {
        self.render(true)
    }

    /// Render without colors
    pub fn render_plain(&self) -> String {
        self.render(false)
    }

    fn render(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("\x1b[{code}m{text}\x1b[0m")
            } else {
                text.to_string()
            }
        };
        let mut out = String::new();

        let label = match self.severity {
            Severity::Error => paint("31", "error"),
            Severity::Warning => paint("33", "warning"),
        };
        match &self.code {
            Some(code) => out.push_str(&format!("{label}[{}]: ", paint("1", code))),
            None => out.push_str(&format!("{label}: ")),
        }
        out.push_str(&paint("1", &self.message));
        out.push('\n');

        if let Some(origin) = &self.origin {
            out.push_str(&format!("  {} {origin}\n", paint("36", "-->")));
        }

        if !self.suggestions.is_empty() {
            out.push_str(&format!("   {}\n", paint("36", "|")));
            for suggestion in &self.suggestions {
                let (equals, help) = (paint("36", "="), paint("36", "help"));
                out.push_str(&format!("   {equals} {help}: {suggestion}\n"));
            }
        }
        out
    }
}

/// Converts a translation error into a diagnostic with help lines.
pub fn format_translate_error(error: &TranslateError) -> Diagnostic {
    let suggestions = match error {
        TranslateError::InvalidName { kind, name, .. } => {
            let mut help = vec![format!(
                "{kind} names use letters, digits and underscores, and do not start with a digit"
            )];
            if let Some(fixed) = sanitize_identifier(name, *kind == NameKind::Namespace) {
                help.push(format!("did you mean '{fixed}'?"));
            }
            help
        }
        TranslateError::DuplicateName { kind, name } => {
            vec![format!("give each {kind} a distinct name, e.g. '{name}2'")]
        }
        TranslateError::NoClasses => vec!["add at least one class to the builder".to_string()],
        TranslateError::NoMethods { .. } => {
            vec!["add at least one method to the class".to_string()]
        }
        TranslateError::AmbiguousInterfaceMethod { .. } => {
            vec!["name the method to pick the interface method it implements".to_string()]
        }
        TranslateError::Unsupported(_) => {
            vec!["a summary comment must be the only comment and precede a lambda".to_string()]
        }
    };
    Diagnostic {
        code: Some(error.code().to_string()),
        suggestions,
        ..Diagnostic::error(error.to_string())
    }
}

/// The closest valid identifier to `name`, if any characters survive.
fn sanitize_identifier(name: &str, dotted: bool) -> Option<String> {
    let parts: Vec<String> = if dotted {
        name.split('.').map(sanitize_part).filter(|p| !p.is_empty()).collect()
    } else {
        vec![sanitize_part(name)]
    };
    let fixed = parts.join(".");
    (!fixed.is_empty() && fixed != name).then_some(fixed)
}

fn sanitize_part(part: &str) -> String {
    let cleaned: String = part
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    match cleaned.chars().next() {
        Some(first) if first.is_ascii_digit() => format!("_{cleaned}"),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_names_suggest_a_fix() {
        let error = TranslateError::InvalidName {
            kind: NameKind::Method,
            name: "1st Method".to_string(),
            reason: "must not start with a digit".to_string(),
        };
        let rendered = format_translate_error(&error).render_plain();
        assert!(rendered.starts_with("error[R001]: invalid method name '1st Method'"));
        assert!(rendered.contains("= help: did you mean '_1stMethod'?"));
    }

    #[test]
    fn namespaces_keep_their_dots() {
        assert_eq!(sanitize_identifier("My App.Tools", true), Some("MyApp.Tools".to_string()));
        assert_eq!(sanitize_identifier("Valid", false), None);
    }

    #[test]
    fn ansi_rendering_colors_the_label() {
        let rendered = format_translate_error(&TranslateError::NoClasses).render_ansi();
        assert!(rendered.contains("\x1b[31merror\x1b[0m"));
    }

    #[test]
    fn warnings_carry_their_own_label() {
        let rendered = Diagnostic::warning("readex.toml already exists")
            .with_origin("readex.toml")
            .with_help("edit the existing file instead")
            .render_plain();
        assert_eq!(
            rendered,
            "warning: readex.toml already exists\n\
             \x20 --> readex.toml\n\
             \x20  |\n\
             \x20  = help: edit the existing file instead\n"
        );
    }
}
