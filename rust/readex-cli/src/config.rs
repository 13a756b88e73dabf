//! Configuration file parsing for `readex.toml`.
//!
//! Searches the current directory then its ancestors, falling back to
//! `~/.config/readex/readex.toml` if no project-level file is found.

use readex_translate::SettingsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "readex.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml in '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct ReadexConfig {
    /// Rendering options, layered over the library defaults.
    #[serde(default)]
    pub translation: SettingsConfig,
    #[serde(default)]
    pub source: SourceSection,
}

/// Defaults for `readex source`.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct SourceSection {
    pub namespace: Option<String>,
    pub class: Option<String>,
}

impl ReadexConfig {
    /// The first config found from `start` upwards, then the global one.
    /// `Ok(None)` when there is none; a file that exists but cannot be
    /// parsed is an error.
    pub fn discover(start: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut dir = start.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::load_from(&candidate).map(|cfg| Some((candidate, cfg)));
            }
            if !dir.pop() {
                break;
            }
        }
        match global_config_path() {
            Some(global) if global.is_file() => {
                Self::load_from(&global).map(|cfg| Some((global, cfg)))
            }
            _ => Ok(None),
        }
    }

    /// Discovers from the current directory; defaults when nothing is found.
    pub fn load() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Self::discover(&cwd)?.map(|(_, cfg)| cfg).unwrap_or_default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    }

    /// A commented `readex.toml` listing every option.
    pub fn default_template() -> &'static str {
        r#"# readex configuration
# Options left commented out keep their defaults.

[translation]
# fully_qualify_type_names = false
# use_explicit_type_names = false
# use_explicit_generic_parameters = false
# declare_output_parameters_inline = false
# discard_unused_parameters = false
# show_implicit_array_types = false
# show_lambda_parameter_types = false
# show_quoted_lambda_comments = false
# show_captured_values = false
# show_string_concat_calls = false
# indent = "    "
# format = "plain"   # or "html"

[source]
# namespace = "GeneratedExpressionCode"
# class = "GeneratedExpressionClass"
"#
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("readex").join(CONFIG_FILE_NAME))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use readex_translate::OutputFormat;

    #[test]
    fn parse_translation_section() {
        let cfg: ReadexConfig = toml::from_str(
            r#"
[translation]
use_explicit_type_names = true
indent = "  "
format = "html"
"#,
        )
        .expect("should parse");
        assert_eq!(cfg.translation.use_explicit_type_names, Some(true));
        assert_eq!(cfg.translation.indent.as_deref(), Some("  "));
        assert_eq!(cfg.translation.format, Some(OutputFormat::Html));
        assert_eq!(cfg.source, SourceSection::default());
    }

    #[test]
    fn template_parses_to_defaults() {
        let cfg: ReadexConfig =
            toml::from_str(ReadexConfig::default_template()).expect("template parses");
        assert_eq!(cfg, ReadexConfig::default());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result: Result<ReadexConfig, _> = toml::from_str("[translation]\nformat = \"rtf\"\n");
        assert!(result.is_err());
    }
}
