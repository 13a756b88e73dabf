//! Writes the source model: usings, namespace, classes and methods.

use super::model::{ClassModel, MethodModel, SourceCode};
use crate::translation::analysis::ExpressionAnalysis;
use crate::translation::buffer::TranslationBuffer;
use crate::translation::context::TranslationContext;
use crate::translation::formatter::TokenType;
use crate::translation::settings::TranslationSettings;
use crate::translation::translators::blocks::{braced, translate_body};
use crate::translation::translators::variables::variable_name;
use crate::translation::type_names::{type_name_segments, TypeNameOptions};
use readex_core::TypeRef;

fn new_buffer(settings: &TranslationSettings) -> TranslationBuffer<'_> {
    TranslationBuffer::new(settings.formatter.as_ref(), &settings.indent, 1024)
}

/// The full file: `using` lines, a blank line, then the namespace.
pub(crate) fn write_source(source: &SourceCode, settings: &TranslationSettings) -> String {
    let mut buffer = new_buffer(settings);
    for namespace in &source.usings {
        buffer.write_keyword("using");
        buffer.write_space();
        buffer.write_str(namespace);
        buffer.write_str(";");
        buffer.write_new_line();
    }
    if !source.usings.is_empty() {
        buffer.write_new_line();
    }
    buffer.write_keyword("namespace");
    buffer.write_space();
    buffer.write_str(&source.namespace);
    buffer.write_new_line();
    buffer.write_str("{");
    buffer.indent();
    for (index, class) in source.classes.iter().enumerate() {
        if index > 0 {
            buffer.write_new_line();
        }
        buffer.write_new_line();
        write_class(&mut buffer, class, settings);
    }
    buffer.unindent();
    buffer.write_new_line();
    buffer.write_str("}");
    buffer.finish().0
}

/// A class declaration on its own.
pub(crate) fn write_class_only(class: &ClassModel, settings: &TranslationSettings) -> String {
    let mut buffer = new_buffer(settings);
    write_class(&mut buffer, class, settings);
    buffer.finish().0
}

/// A class's methods on their own, separated by blank lines.
pub(crate) fn write_methods_only(class: &ClassModel, settings: &TranslationSettings) -> String {
    let mut buffer = new_buffer(settings);
    write_methods(&mut buffer, class, settings);
    buffer.finish().0
}

fn write_class(
    buffer: &mut TranslationBuffer<'_>,
    class: &ClassModel,
    settings: &TranslationSettings,
) {
    let names = TypeNameOptions::from_settings(settings);
    buffer.write_keyword("public");
    buffer.write_space();
    buffer.write_keyword("class");
    buffer.write_space();
    buffer.write_type_name(&class.name);
    for (index, interface) in class.interfaces.iter().enumerate() {
        buffer.write_str(if index == 0 { " : " } else { ", " });
        write_type(buffer, interface, &names);
    }
    buffer.write_new_line();
    buffer.write_str("{");
    buffer.indent();
    buffer.write_new_line();
    write_methods(buffer, class, settings);
    buffer.unindent();
    buffer.write_new_line();
    buffer.write_str("}");
}

fn write_methods(
    buffer: &mut TranslationBuffer<'_>,
    class: &ClassModel,
    settings: &TranslationSettings,
) {
    for (index, method) in class.methods.iter().enumerate() {
        if index > 0 {
            buffer.write_new_line();
            buffer.write_new_line();
        }
        write_method(buffer, class, method, settings);
    }
}

fn write_method(
    buffer: &mut TranslationBuffer<'_>,
    class: &ClassModel,
    method: &MethodModel,
    settings: &TranslationSettings,
) {
    let names = TypeNameOptions::from_settings(settings);
    if let Some(summary) = &method.summary {
        buffer.write_token("/// <summary>", TokenType::Comment);
        for line in summary.lines() {
            buffer.write_new_line();
            buffer.write_token(&format!("/// {}", line.trim_end()), TokenType::Comment);
        }
        buffer.write_new_line();
        buffer.write_token("/// </summary>", TokenType::Comment);
        buffer.write_new_line();
    }

    buffer.write_keyword(method.visibility.keyword());
    buffer.write_space();
    write_type(buffer, &method.return_type, &names);
    buffer.write_space();
    buffer.write_method_name(&method.name);
    buffer.write_str("(");
    for (index, parameter) in method.parameters.iter().enumerate() {
        if index > 0 {
            buffer.write_str(", ");
        }
        if parameter.is_by_ref {
            buffer.write_keyword("ref");
            buffer.write_space();
        }
        write_type(buffer, &parameter.ty, &names);
        buffer.write_space();
        buffer.write_variable(&variable_name(parameter));
    }
    buffer.write_str(")");
    buffer.write_new_line();

    let returns_value = method.returns_value();
    let analysis = ExpressionAnalysis::of_method_body(&method.body, returns_value, settings);
    let context =
        TranslationContext::new(settings, &analysis).with_extracted_calls(&class.extracted_calls);
    let body = braced(&context, translate_body(&context, &method.body, returns_value));
    body.write_to(buffer);
}

fn write_type(buffer: &mut TranslationBuffer<'_>, ty: &TypeRef, names: &TypeNameOptions<'_>) {
    for (text, token) in type_name_segments(ty, names) {
        buffer.write_token(&text, token);
    }
}
