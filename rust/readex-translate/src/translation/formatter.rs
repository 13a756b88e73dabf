//! Output formatters: how tagged tokens reach the final text.

use std::fmt;

/// Syntactic role of a written token, for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Default,
    Keyword,
    /// `if`, `while`, `return`, `throw` and friends.
    ControlStatement,
    TypeName,
    /// Interfaces and open generic parameters.
    InterfaceName,
    Variable,
    MethodName,
    Numeric,
    Text,
    Comment,
}

impl TokenType {
    fn css_class(self) -> Option<&'static str> {
        match self {
            TokenType::Default => None,
            TokenType::Keyword => Some("kw"),
            TokenType::ControlStatement => Some("cs"),
            TokenType::TypeName => Some("tn"),
            TokenType::InterfaceName => Some("in"),
            TokenType::Variable => Some("vb"),
            TokenType::MethodName => Some("mn"),
            TokenType::Numeric => Some("nm"),
            TokenType::Text => Some("tx"),
            TokenType::Comment => Some("cm"),
        }
    }
}

/// Plugpoint deciding how tokens are written to the output.
pub trait TranslationFormatter: fmt::Debug + Send + Sync {
    /// Appends `text`, tagged as `token`, to `out`.
    fn write_formatted(&self, text: &str, token: TokenType, out: &mut String);

    /// Appends untagged `text` to `out`, encoding it if the format requires.
    fn write_encoded(&self, text: &str, out: &mut String);

    /// Characters `write_formatted` adds beyond the text itself.
    fn overhead(&self, token: TokenType) -> usize;
}

/// Writes text as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextFormatter;

impl TranslationFormatter for PlainTextFormatter {
    fn write_formatted(&self, text: &str, _token: TokenType, out: &mut String) {
        out.push_str(text);
    }

    fn write_encoded(&self, text: &str, out: &mut String) {
        out.push_str(text);
    }

    fn overhead(&self, _token: TokenType) -> usize {
        0
    }
}

/// Wraps tokens in `<span class="..">` and HTML-encodes text.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFormatter;

const SPAN_OPEN_PREFIX: &str = "<span class=\"";
const SPAN_OPEN_SUFFIX: &str = "\">";
const SPAN_CLOSE: &str = "</span>";

impl TranslationFormatter for HtmlFormatter {
    fn write_formatted(&self, text: &str, token: TokenType, out: &mut String) {
        match token.css_class() {
            Some(class) => {
                out.push_str(SPAN_OPEN_PREFIX);
                out.push_str(class);
                out.push_str(SPAN_OPEN_SUFFIX);
                self.write_encoded(text, out);
                out.push_str(SPAN_CLOSE);
            }
            None => self.write_encoded(text, out),
        }
    }

    fn write_encoded(&self, text: &str, out: &mut String) {
        for ch in text.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                c => out.push(c),
            }
        }
    }

    fn overhead(&self, token: TokenType) -> usize {
        match token.css_class() {
            Some(class) => {
                SPAN_OPEN_PREFIX.len() + class.len() + SPAN_OPEN_SUFFIX.len() + SPAN_CLOSE.len()
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_formatter_ignores_tokens() {
        let mut out = String::new();
        PlainTextFormatter.write_formatted("int", TokenType::Keyword, &mut out);
        assert_eq!(out, "int");
        assert_eq!(PlainTextFormatter.overhead(TokenType::Keyword), 0);
    }

    #[test]
    fn html_formatter_wraps_and_encodes() {
        let mut out = String::new();
        HtmlFormatter.write_formatted("List<int>", TokenType::TypeName, &mut out);
        assert_eq!(out, "<span class=\"tn\">List&lt;int&gt;</span>");
    }

    #[test]
    fn html_overhead_matches_written_tags() {
        let mut out = String::new();
        HtmlFormatter.write_formatted("x", TokenType::Variable, &mut out);
        assert_eq!(out.len() - 1, HtmlFormatter.overhead(TokenType::Variable));
        assert_eq!(HtmlFormatter.overhead(TokenType::Default), 0);
    }
}
