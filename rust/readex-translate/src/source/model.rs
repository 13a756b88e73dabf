//! The built source-code model. Immutable once built.

use crate::translation::context::ExtractedCalls;
use readex_core::expr::ParameterExpr;
use readex_core::{ExprRef, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    /// Methods extracted from blocks in expression position.
    Private,
}

impl Visibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MethodModel {
    pub name: String,
    pub visibility: Visibility,
    pub summary: Option<String>,
    pub parameters: Vec<ParameterExpr>,
    pub return_type: TypeRef,
    pub body: ExprRef,
}

impl MethodModel {
    pub fn returns_value(&self) -> bool {
        !self.return_type.is_void()
    }
}

#[derive(Debug, Clone)]
pub struct ClassModel {
    pub name: String,
    pub interfaces: Vec<TypeRef>,
    pub methods: Vec<MethodModel>,
    /// Call sites of extracted blocks, for every method of the class.
    pub(crate) extracted_calls: ExtractedCalls,
}

impl ClassModel {
    pub fn public_methods(&self) -> impl Iterator<Item = &MethodModel> {
        self.methods.iter().filter(|m| m.visibility == Visibility::Public)
    }
}

/// A complete source file: usings, namespace and classes, plus its text.
#[derive(Debug, Clone)]
pub struct SourceCode {
    pub(crate) namespace: String,
    pub(crate) usings: Vec<String>,
    pub(crate) classes: Vec<ClassModel>,
    pub(crate) text: String,
}

impl SourceCode {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Imported namespaces, `System` first.
    pub fn usings(&self) -> &[String] {
        &self.usings
    }

    pub fn classes(&self) -> &[ClassModel] {
        &self.classes
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Display for SourceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
