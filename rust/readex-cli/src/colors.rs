//! ANSI color helpers for CLI output.

/// Paints text with ANSI escapes when enabled, and leaves it alone otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Colored unless `NO_COLOR` is set.
    pub fn from_env() -> Self {
        Self::new(std::env::var_os("NO_COLOR").is_none())
    }

    pub fn is_enabled(self) -> bool {
        self.enabled
    }

    fn paint(self, code: &str, s: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    pub fn green(self, s: &str) -> String {
        self.paint("32", s)
    }

    pub fn red(self, s: &str) -> String {
        self.paint("31", s)
    }

    pub fn bold(self, s: &str) -> String {
        self.paint("1", s)
    }

    pub fn gray(self, s: &str) -> String {
        self.paint("90", s)
    }

    /// Right-aligned in twelve columns, bold green: `     Created`.
    pub fn status_label(self, label: &str) -> String {
        self.paint("1;32", &format!("{label:>12}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_palette_writes_plain_text() {
        let plain = Palette::new(false);
        assert_eq!(plain.red("error:"), "error:");
        assert_eq!(plain.status_label("Created"), "     Created");
    }

    #[test]
    fn enabled_palette_wraps_in_escapes() {
        assert_eq!(Palette::new(true).green("ok"), "\x1b[32mok\x1b[0m");
    }
}
