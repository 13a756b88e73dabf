//! Command behaviour over tree files on disk.

use pretty_assertions::assert_eq;
use readex_cli::config::{ReadexConfig, CONFIG_FILE_NAME};
use readex_cli::render::{
    check_files, render_files, settings_from, source_file, CliError, SourceOptions,
};
use readex_core::build::*;
use readex_core::{ExprRef, TypeRef};
use readex_translate::{translate, OutputFormat, SettingsConfig, TranslationSettings};
use std::path::{Path, PathBuf};

fn increment() -> ExprRef {
    let x = parameter(TypeRef::int(), "x");
    lambda(vec![x.clone()], add(x.expr(), int(1)))
}

fn write_tree(dir: &Path, name: &str, tree: &ExprRef) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, readex_core::to_json(tree).unwrap()).unwrap();
    path
}

#[test]
fn render_joins_trees_with_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_tree(dir.path(), "a.json", &increment());
    let second = write_tree(dir.path(), "b.json", &multiply(int(2), int(3)));
    let text = render_files(&[first, second], &TranslationSettings::default()).unwrap();
    assert_eq!(text, "x => x + 1\n\n2 * 3");
}

#[test]
fn command_line_overrides_win_over_the_file() {
    let file = SettingsConfig {
        indent: Some("\t".to_string()),
        format: Some(OutputFormat::Html),
        ..SettingsConfig::default()
    };
    let overrides = SettingsConfig {
        indent: Some("  ".to_string()),
        ..SettingsConfig::default()
    };
    let settings = settings_from(&file, &overrides);
    assert_eq!(settings.indent, "  ");
    assert!(translate(&increment(), &settings).contains("=&gt;"));
}

#[test]
fn source_uses_requested_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_tree(dir.path(), "inc.json", &increment());
    let options = SourceOptions {
        namespace: Some("Acme".to_string()),
        class: Some("Maths".to_string()),
    };
    let text = source_file(&[path], &options, &TranslationSettings::default()).unwrap();
    assert!(text.starts_with("namespace Acme\n{\n    public class Maths\n"));
    assert!(text.contains("public int GetInt(int x)"));
}

#[test]
fn source_with_an_invalid_class_name_reports_a_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_tree(dir.path(), "inc.json", &increment());
    let options = SourceOptions {
        namespace: None,
        class: Some("2Maths".to_string()),
    };
    let err = source_file(&[path], &options, &TranslationSettings::default()).unwrap_err();
    assert!(matches!(err, CliError::Translate(_)));
    assert!(err.to_diagnostic().render_plain().starts_with("error["));
}

#[test]
fn no_input_is_an_error() {
    let err = render_files(&[], &TranslationSettings::default()).unwrap_err();
    assert!(matches!(err, CliError::NoInput));
}

#[test]
fn check_reports_each_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_tree(dir.path(), "good.json", &increment());
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ \"node\": \"nonsense\" }").unwrap();
    let missing = dir.path().join("missing.json");

    let results = check_files(&[good.clone(), bad, missing]);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0, good);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(CliError::Model { .. })));
    assert!(matches!(results[2].1, Err(CliError::Read { .. })));

    let rendered = results[1].1.as_ref().unwrap_err().to_diagnostic().render_plain();
    assert!(rendered.contains("invalid expression tree JSON"));
}

#[test]
fn config_is_found_in_an_ancestor_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[translation]\nuse_explicit_type_names = true\n\n[source]\nclass = \"Shapes\"\n",
    )
    .unwrap();
    let nested = dir.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let (path, cfg) = ReadexConfig::discover(&nested).unwrap().expect("config found");
    assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
    assert_eq!(cfg.translation.use_explicit_type_names, Some(true));
    assert_eq!(cfg.source.class.as_deref(), Some("Shapes"));
}

#[test]
fn broken_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[translation\n").unwrap();
    assert!(ReadexConfig::discover(dir.path()).is_err());
}
