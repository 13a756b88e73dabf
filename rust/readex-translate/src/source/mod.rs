//! Source-code generation: classes and methods built from expression trees.

pub mod builder;
pub mod interfaces;
pub mod model;
pub mod naming;
mod writer;

pub use builder::{ClassBuilder, MethodBuilder, SourceCodeBuilder};
pub use interfaces::InterfaceImplementation;
pub use model::{ClassModel, MethodModel, SourceCode, Visibility};

use crate::error::TranslateError;
use crate::translation::settings::TranslationSettings;
use readex_core::ExprRef;

fn single_method_source(
    expr: &ExprRef,
    settings: &TranslationSettings,
) -> Result<SourceCode, TranslateError> {
    SourceCodeBuilder::new()
        .with_settings(settings.clone())
        .class(ClassBuilder::new().method(MethodBuilder::new(expr.clone())))
        .build()
}

/// A complete source file holding one class with one method for `expr`.
pub fn to_source_code(
    expr: &ExprRef,
    settings: &TranslationSettings,
) -> Result<String, TranslateError> {
    Ok(single_method_source(expr, settings)?.into_text())
}

/// Just the class declaration for `expr`, without usings or namespace.
pub fn to_class_source(
    expr: &ExprRef,
    settings: &TranslationSettings,
) -> Result<String, TranslateError> {
    let source = single_method_source(expr, settings)?;
    Ok(source
        .classes()
        .first()
        .map(|class| writer::write_class_only(class, settings))
        .unwrap_or_default())
}

/// Just the method for `expr`, followed by any methods extracted from it.
pub fn to_method_source(
    expr: &ExprRef,
    settings: &TranslationSettings,
) -> Result<String, TranslateError> {
    let source = single_method_source(expr, settings)?;
    Ok(source
        .classes()
        .first()
        .map(|class| writer::write_methods_only(class, settings))
        .unwrap_or_default())
}
