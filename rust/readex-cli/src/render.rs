//! The work behind `readex render`, `readex source` and `readex check`.

use readex_core::{ExprRef, ModelError};
use readex_translate::diagnostics::{format_translate_error, Diagnostic};
use readex_translate::{
    translate, ClassBuilder, MethodBuilder, SettingsConfig, SourceCodeBuilder, TranslateError,
    TranslationSettings,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error("no input files specified")]
    NoInput,
}

impl CliError {
    /// A diagnostic for terminal output.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CliError::Translate(error) => format_translate_error(error),
            CliError::Model { path, source } => {
                Diagnostic::error(source.to_string()).with_origin(path.display().to_string())
            }
            other => Diagnostic::error(other.to_string()),
        }
    }
}

/// Reads and deserializes one JSON expression tree.
pub fn load_tree(path: &Path) -> Result<ExprRef, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = readex_core::from_json(&json).map_err(|source| CliError::Model {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), kind = %tree.kind(), "loaded tree");
    Ok(tree)
}

fn load_trees(paths: &[PathBuf]) -> Result<Vec<ExprRef>, CliError> {
    if paths.is_empty() {
        return Err(CliError::NoInput);
    }
    paths.iter().map(|path| load_tree(path)).collect()
}

/// Settings from the file configuration with command-line overrides on top.
pub fn settings_from(file: &SettingsConfig, overrides: &SettingsConfig) -> TranslationSettings {
    file.merged_with(overrides).apply(TranslationSettings::default())
}

/// Each tree rendered, separated by blank lines.
pub fn render_files(paths: &[PathBuf], settings: &TranslationSettings) -> Result<String, CliError> {
    let trees = load_trees(paths)?;
    let rendered: Vec<String> = trees.iter().map(|tree| translate(tree, settings)).collect();
    info!(trees = rendered.len(), "rendered");
    Ok(rendered.join("\n\n"))
}

/// Options for a generated source file.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub namespace: Option<String>,
    pub class: Option<String>,
}

/// One source file with a method per tree, all in one class.
pub fn source_file(
    paths: &[PathBuf],
    options: &SourceOptions,
    settings: &TranslationSettings,
) -> Result<String, CliError> {
    let trees = load_trees(paths)?;
    let mut class = ClassBuilder::new();
    if let Some(name) = &options.class {
        class = class.named(name.clone());
    }
    for tree in trees {
        class = class.method(MethodBuilder::new(tree));
    }
    let mut builder = SourceCodeBuilder::new().with_settings(settings.clone()).class(class);
    if let Some(namespace) = &options.namespace {
        builder = builder.namespace(namespace.clone());
    }
    Ok(builder.build()?.into_text())
}

/// Whether each file holds a valid tree, in input order.
pub fn check_files(paths: &[PathBuf]) -> Vec<(PathBuf, Result<(), CliError>)> {
    paths
        .iter()
        .map(|path| (path.clone(), load_tree(path).map(|_| ())))
        .collect()
}
