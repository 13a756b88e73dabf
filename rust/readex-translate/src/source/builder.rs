//! Fluent builders producing a [`SourceCode`] model.
//!
//! Everything is decided in [`SourceCodeBuilder::build`]: names are
//! validated before any tree is walked, then each method body is analysed
//! once to collect the blocks that become private methods, and finally the
//! file text is written.

use super::interfaces::{find_interface_method, unimplemented_methods, InterfaceImplementation};
use super::model::{ClassModel, MethodModel, SourceCode, Visibility};
use super::naming::{
    default_method_name, ensure_unique, resolve_names, validate_identifier, DEFAULT_CLASS_NAME,
    DEFAULT_NAMESPACE,
};
use super::writer::write_source;
use crate::error::{NameKind, TranslateError};
use crate::translation::analysis::ExpressionAnalysis;
use crate::translation::context::{ExtractedArgument, ExtractedCall, ExtractedCalls};
use crate::translation::namespaces::NamespaceSet;
use crate::translation::scope::NodeId;
use crate::translation::settings::TranslationSettings;
use crate::translation::translators::variables::variable_name;
use readex_core::expr::{LambdaExpr, ParameterExpr};
use readex_core::members::MethodInfo;
use readex_core::{Expr, ExprRef, TypeRef};
use std::collections::HashSet;
use tracing::{debug, warn};

// ── Method ──────────────────────────────────────────────────────────

/// One public method, from a lambda or a plain expression.
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: Option<String>,
    summary: Option<String>,
    body: ExprRef,
}

impl MethodBuilder {
    pub fn new(body: ExprRef) -> Self {
        Self {
            name: None,
            summary: None,
            body,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Documentation written as a `/// <summary>` block.
    pub fn summary(mut self, text: impl Into<String>) -> Self {
        self.summary = Some(text.into());
        self
    }
}

/// A method body taken apart into signature and statements.
#[derive(Debug)]
struct ParsedMethod {
    summary: Option<String>,
    parameters: Vec<ParameterExpr>,
    return_type: TypeRef,
    body: ExprRef,
}

impl ParsedMethod {
    fn from_lambda(lambda: &LambdaExpr, summary: Option<String>) -> Self {
        Self {
            summary,
            parameters: lambda.parameters.clone(),
            return_type: lambda.return_type.clone(),
            body: lambda.body.clone(),
        }
    }

    fn parameter_types(&self) -> Vec<TypeRef> {
        self.parameters.iter().map(|p| p.ty.clone()).collect()
    }
}

/// A lambda becomes a method with its parameters; `{ comment; lambda }`
/// additionally documents it. Anything else is a parameterless method.
fn parse_method(method: &MethodBuilder) -> Result<ParsedMethod, TranslateError> {
    let expr = &method.body;
    let mut parsed = match &**expr {
        Expr::Lambda(lambda) => ParsedMethod::from_lambda(lambda, None),
        Expr::Block(block)
            if block.variables.is_empty() && annotates_lambda(&block.expressions) =>
        {
            match block.expressions.as_slice() {
                [comment, lambda] => match (&**comment, &**lambda) {
                    (Expr::Comment(comment), Expr::Lambda(lambda)) => {
                        ParsedMethod::from_lambda(lambda, Some(comment.text.clone()))
                    }
                    _ => return Err(unsupported_ordering()),
                },
                _ => {
                    return Err(TranslateError::Unsupported(
                        "a lambda may be annotated by one leading comment only".to_string(),
                    ))
                }
            }
        }
        Expr::Block(block) if ends_with_comment(&block.expressions) => {
            return Err(unsupported_ordering());
        }
        _ => ParsedMethod {
            summary: None,
            parameters: Vec::new(),
            return_type: expr.ty(),
            body: expr.clone(),
        },
    };
    if method.summary.is_some() {
        parsed.summary = method.summary.clone();
    }
    Ok(parsed)
}

/// Comments followed by a lambda, with nothing else.
fn annotates_lambda(expressions: &[ExprRef]) -> bool {
    match expressions.split_last() {
        Some((last, leading)) => {
            matches!(**last, Expr::Lambda(_))
                && !leading.is_empty()
                && leading.iter().all(|e| matches!(**e, Expr::Comment(_)))
        }
        None => false,
    }
}

fn ends_with_comment(expressions: &[ExprRef]) -> bool {
    matches!(expressions.last().map(|e| &**e), Some(Expr::Comment(_)))
}

fn unsupported_ordering() -> TranslateError {
    TranslateError::Unsupported(
        "a method summary comment must be followed by the lambda it documents".to_string(),
    )
}

// ── Class ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ClassBuilder {
    name: Option<String>,
    interfaces: Vec<InterfaceImplementation>,
    methods: Vec<MethodBuilder>,
}

impl ClassBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declares `interface`; generated methods whose signature matches one
    /// of `methods` take that method's name.
    pub fn implements(mut self, interface: TypeRef, methods: Vec<MethodInfo>) -> Self {
        self.interfaces.push(InterfaceImplementation::new(interface, methods));
        self
    }

    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    fn validate_names(&self) -> Result<(), TranslateError> {
        if let Some(name) = &self.name {
            validate_identifier(NameKind::Class, name)?;
        }
        for name in self.methods.iter().filter_map(|m| m.name.as_deref()) {
            validate_identifier(NameKind::Method, name)?;
        }
        ensure_unique(NameKind::Method, self.methods.iter().filter_map(|m| m.name.as_deref()))
    }
}

// ── Source file ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SourceCodeBuilder {
    namespace: String,
    settings: TranslationSettings,
    classes: Vec<ClassBuilder>,
}

impl Default for SourceCodeBuilder {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            settings: TranslationSettings::default(),
            classes: Vec::new(),
        }
    }
}

impl SourceCodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_settings(mut self, settings: TranslationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn class(mut self, class: ClassBuilder) -> Self {
        self.classes.push(class);
        self
    }

    pub fn build(self) -> Result<SourceCode, TranslateError> {
        validate_identifier(NameKind::Namespace, &self.namespace)?;
        for class in &self.classes {
            class.validate_names()?;
        }
        ensure_unique(NameKind::Class, self.classes.iter().filter_map(|c| c.name.as_deref()))?;
        if self.classes.is_empty() {
            return Err(TranslateError::NoClasses);
        }

        let class_slots: Vec<(Option<String>, String)> = self
            .classes
            .iter()
            .map(|c| (c.name.clone(), DEFAULT_CLASS_NAME.to_string()))
            .collect();
        let class_names = resolve_names(&class_slots);
        ensure_unique(NameKind::Class, class_names.iter().map(String::as_str))?;
        let empty = self.classes.iter().zip(&class_names).find(|(c, _)| c.methods.is_empty());
        if let Some((_, name)) = empty {
            return Err(TranslateError::NoMethods { class: name.clone() });
        }

        let mut namespaces = NamespaceSet::new();
        let mut classes = Vec::with_capacity(self.classes.len());
        for (class, name) in self.classes.iter().zip(class_names) {
            classes.push(build_class(class, name, &self.settings, &mut namespaces)?);
        }

        let mut source = SourceCode {
            namespace: self.namespace,
            usings: namespaces.sorted(),
            classes,
            text: String::new(),
        };
        source.text = write_source(&source, &self.settings);
        debug!(
            classes = source.classes.len(),
            methods = source.classes.iter().map(|c| c.methods.len()).sum::<usize>(),
            usings = source.usings.len(),
            "source code built"
        );
        Ok(source)
    }
}

/// A block lifted out of a method body, waiting for its name.
struct PendingExtraction {
    node: NodeId,
    parameters: Vec<ParameterExpr>,
    return_type: TypeRef,
    body: ExprRef,
}

fn build_class(
    class: &ClassBuilder,
    name: String,
    settings: &TranslationSettings,
    namespaces: &mut NamespaceSet,
) -> Result<ClassModel, TranslateError> {
    let qualify = settings.fully_qualify_type_names;
    let mut parsed = Vec::with_capacity(class.methods.len());
    for method in &class.methods {
        parsed.push(parse_method(method)?);
    }

    let mut slots = Vec::new();
    let mut implemented = Vec::new();
    for (builder, method) in class.methods.iter().zip(&parsed) {
        let explicit = match &builder.name {
            Some(name) => Some(name.clone()),
            None => {
                let matched = find_interface_method(
                    &class.interfaces,
                    &method.parameter_types(),
                    &method.return_type,
                )?;
                matched.map(|m| {
                    implemented.push(m);
                    m.name.clone()
                })
            }
        };
        slots.push((explicit, default_method_name(&method.return_type)));
    }
    for missing in unimplemented_methods(&class.interfaces, &implemented) {
        warn!(
            class = %name,
            method = %missing,
            "interface method not implemented by any generated method"
        );
    }

    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut extractions = Vec::new();
    for method in &parsed {
        let returns_value = !method.return_type.is_void();
        let analysis = ExpressionAnalysis::of_method_body(&method.body, returns_value, settings);
        for namespace in analysis.required_namespaces() {
            namespaces.add(namespace);
        }
        for block in analysis.extracted_blocks() {
            if !seen.insert(block.node) {
                continue;
            }
            let parameters = analysis
                .escaped_variables(block)
                .iter()
                .map(|escaped| ParameterExpr {
                    name: escaped.key.name.clone(),
                    ty: escaped.key.ty.clone(),
                    is_by_ref: escaped.is_assigned,
                })
                .collect();
            extractions.push(PendingExtraction {
                node: block.node,
                parameters,
                return_type: block.block.ty(),
                body: block.block.clone(),
            });
        }
    }
    slots.extend(extractions.iter().map(|e| (None, default_method_name(&e.return_type))));

    let names = resolve_names(&slots);
    ensure_unique(NameKind::Method, names.iter().map(String::as_str))?;
    let (public_names, private_names) = names.split_at(parsed.len());

    let mut methods: Vec<MethodModel> = parsed
        .into_iter()
        .zip(public_names)
        .map(|(method, name)| MethodModel {
            name: name.clone(),
            visibility: Visibility::Public,
            summary: method.summary,
            parameters: method.parameters,
            return_type: method.return_type,
            body: method.body,
        })
        .collect();

    let mut extracted_calls = ExtractedCalls::new();
    for (extraction, name) in extractions.into_iter().zip(private_names) {
        let arguments = extraction
            .parameters
            .iter()
            .map(|p| ExtractedArgument {
                name: variable_name(p),
                is_ref: p.is_by_ref,
            })
            .collect();
        extracted_calls.insert(
            extraction.node,
            ExtractedCall {
                name: name.clone(),
                arguments,
            },
        );
        methods.push(MethodModel {
            name: name.clone(),
            visibility: Visibility::Private,
            summary: None,
            parameters: extraction.parameters,
            return_type: extraction.return_type,
            body: extraction.body,
        });
    }

    let interfaces: Vec<TypeRef> = class.interfaces.iter().map(|i| i.interface.clone()).collect();
    if !qualify {
        for ty in &interfaces {
            namespaces.add_type(ty);
        }
        for method in &methods {
            namespaces.add_type(&method.return_type);
            for parameter in &method.parameters {
                namespaces.add_type(&parameter.ty);
            }
        }
    }
    debug!(
        class = %name,
        methods = methods.len(),
        extracted = extracted_calls.len(),
        "class model built"
    );
    Ok(ClassModel {
        name,
        interfaces,
        methods,
        extracted_calls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use readex_core::build::*;

    #[test]
    fn comment_then_lambda_becomes_a_summary() {
        let x = parameter(TypeRef::int(), "x");
        let doubled = lambda(vec![x.clone()], multiply(x.expr(), int(2)));
        let body = block(vec![], vec![comment("Doubles x"), doubled]);
        let parsed = parse_method(&MethodBuilder::new(body)).unwrap();
        assert_eq!(parsed.summary.as_deref(), Some("Doubles x"));
        assert_eq!(parsed.parameters, vec![x]);
        assert_eq!(parsed.return_type, TypeRef::int());
    }

    #[test]
    fn two_leading_comments_are_unsupported() {
        let body = block(vec![], vec![comment("one"), comment("two"), lambda(vec![], int(1))]);
        let err = parse_method(&MethodBuilder::new(body)).unwrap_err();
        assert!(matches!(err, TranslateError::Unsupported(_)));
    }

    #[test]
    fn trailing_comment_is_unsupported() {
        let body = block(vec![], vec![lambda(vec![], int(1)), comment("orphan")]);
        assert!(parse_method(&MethodBuilder::new(body)).is_err());
    }

    #[test]
    fn comment_before_a_non_lambda_stays_in_the_body() {
        let body = block(vec![], vec![comment("Answer"), int(42)]);
        let parsed = parse_method(&MethodBuilder::new(body.clone())).unwrap();
        assert_eq!(parsed.summary, None);
        assert!(parsed.parameters.is_empty());
        assert_eq!(parsed.body, body);
    }

    #[test]
    fn plain_expression_is_a_parameterless_method() {
        let parsed = parse_method(&MethodBuilder::new(add(int(1), int(2)))).unwrap();
        assert!(parsed.parameters.is_empty());
        assert_eq!(parsed.return_type, TypeRef::int());
    }

    #[test]
    fn naming_is_validated_before_anything_else() {
        let err = SourceCodeBuilder::new()
            .namespace("Bad Namespace")
            .build()
            .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidName { kind: NameKind::Namespace, .. }));
    }

    #[test]
    fn empty_builders_are_rejected() {
        assert_eq!(SourceCodeBuilder::new().build().unwrap_err(), TranslateError::NoClasses);
        let err = SourceCodeBuilder::new().class(ClassBuilder::new()).build().unwrap_err();
        assert_eq!(
            err,
            TranslateError::NoMethods {
                class: DEFAULT_CLASS_NAME.to_string()
            }
        );
    }
}
