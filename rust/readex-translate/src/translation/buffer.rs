//! Accumulating output buffer with indentation and token tagging.
//!
//! The buffer keeps two parallel texts: the formatted one (through the
//! configured [`TranslationFormatter`]) and a raw, untagged one.

use crate::translation::formatter::{TokenType, TranslationFormatter};

pub struct TranslationBuffer<'f> {
    formatter: &'f dyn TranslationFormatter,
    indent_unit: String,
    depth: usize,
    content: String,
    raw: String,
    /// Lengths of indentation written after the last newline, while that
    /// line is still otherwise empty.
    pending_indent: Option<(usize, usize)>,
    line_count: usize,
    column: usize,
}

impl<'f> TranslationBuffer<'f> {
    pub fn new(
        formatter: &'f dyn TranslationFormatter,
        indent_unit: &str,
        capacity: usize,
    ) -> Self {
        Self {
            formatter,
            indent_unit: indent_unit.to_string(),
            depth: 0,
            content: String::with_capacity(capacity),
            raw: String::with_capacity(capacity),
            pending_indent: None,
            line_count: 1,
            column: 0,
        }
    }

    // ── Indentation ─────────────────────────────────────────────────

    /// Increases the depth applied from the next new line on.
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn unindent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ── Writing ─────────────────────────────────────────────────────

    /// Writes untagged text. Embedded newlines become [`write_new_line`] calls.
    ///
    /// [`write_new_line`]: TranslationBuffer::write_new_line
    pub fn write_str(&mut self, text: &str) {
        self.write_lines(text, TokenType::Default);
    }

    pub fn write_token(&mut self, text: &str, token: TokenType) {
        self.write_lines(text, token);
    }

    pub fn write_keyword(&mut self, text: &str) {
        self.write_token(text, TokenType::Keyword);
    }

    pub fn write_control(&mut self, text: &str) {
        self.write_token(text, TokenType::ControlStatement);
    }

    pub fn write_type_name(&mut self, text: &str) {
        self.write_token(text, TokenType::TypeName);
    }

    pub fn write_variable(&mut self, text: &str) {
        self.write_token(text, TokenType::Variable);
    }

    pub fn write_method_name(&mut self, text: &str) {
        self.write_token(text, TokenType::MethodName);
    }

    pub fn write_space(&mut self) {
        self.write_str(" ");
    }

    pub fn write_new_line(&mut self) {
        self.trim_pending_indent();
        self.content.push('\n');
        self.raw.push('\n');
        self.line_count += 1;
        self.column = 0;
        if self.depth > 0 {
            let before = (self.content.len(), self.raw.len());
            for _ in 0..self.depth {
                self.formatter.write_encoded(&self.indent_unit, &mut self.content);
                self.raw.push_str(&self.indent_unit);
            }
            self.column = self.indent_unit.chars().count() * self.depth;
            self.pending_indent = Some((self.content.len() - before.0, self.raw.len() - before.1));
        }
    }

    fn write_lines(&mut self, text: &str, token: TokenType) {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.write_segment(first, token);
        }
        for line in lines {
            self.write_new_line();
            self.write_segment(line, token);
        }
    }

    fn write_segment(&mut self, text: &str, token: TokenType) {
        if text.is_empty() {
            return;
        }
        self.pending_indent = None;
        match token {
            TokenType::Default => self.formatter.write_encoded(text, &mut self.content),
            _ => self.formatter.write_formatted(text, token, &mut self.content),
        }
        self.raw.push_str(text);
        self.column += text.chars().count();
    }

    fn trim_pending_indent(&mut self) {
        if let Some((content_len, raw_len)) = self.pending_indent.take() {
            self.content.truncate(self.content.len() - content_len);
            self.raw.truncate(self.raw.len() - raw_len);
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Characters on the current line, indentation included.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The raw text written so far.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Finishes the buffer, returning the formatted and raw texts.
    pub fn finish(mut self) -> (String, String) {
        self.trim_pending_indent();
        (self.content, self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::formatter::{HtmlFormatter, PlainTextFormatter};

    #[test]
    fn indentation_follows_new_lines() {
        let mut buffer = TranslationBuffer::new(&PlainTextFormatter, "    ", 16);
        buffer.write_str("{");
        buffer.indent();
        buffer.write_new_line();
        buffer.write_str("x;");
        buffer.unindent();
        buffer.write_new_line();
        buffer.write_str("}");
        let (text, _) = buffer.finish();
        assert_eq!(text, "{\n    x;\n}");
    }

    #[test]
    fn blank_lines_carry_no_indentation() {
        let mut buffer = TranslationBuffer::new(&PlainTextFormatter, "\t", 16);
        buffer.indent();
        buffer.write_str("a;");
        buffer.write_new_line();
        buffer.write_new_line();
        buffer.write_str("b;");
        buffer.write_new_line();
        let (text, _) = buffer.finish();
        assert_eq!(text, "a;\n\n\tb;\n");
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn tracks_lines_and_columns() {
        let mut buffer = TranslationBuffer::new(&PlainTextFormatter, "  ", 16);
        buffer.write_str("ab");
        assert_eq!(buffer.column(), 2);
        buffer.indent();
        buffer.write_str("\ncd");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.column(), 4);
    }

    #[test]
    fn html_output_keeps_raw_text_untagged() {
        let mut buffer = TranslationBuffer::new(&HtmlFormatter, "    ", 16);
        buffer.write_keyword("new");
        buffer.write_space();
        buffer.write_type_name("List<int>");
        let (text, raw) = buffer.finish();
        assert_eq!(raw, "new List<int>");
        assert_eq!(
            text,
            "<span class=\"kw\">new</span> <span class=\"tn\">List&lt;int&gt;</span>"
        );
    }
}
