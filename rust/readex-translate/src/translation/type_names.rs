//! Friendly type names: keywords for primitives, `T?` for nullables,
//! `Name<A, B>` for generics and declaring-type chains for nested types.

use crate::translation::formatter::TokenType;
use crate::translation::settings::{AnonymousTypeNamer, TranslationSettings};
use readex_core::TypeRef;

/// One tagged piece of a rendered type name.
pub type NameSegment = (String, TokenType);

#[derive(Clone, Copy, Default)]
pub struct TypeNameOptions<'a> {
    pub fully_qualify: bool,
    /// Omit the element type of arrays, leaving `[]`.
    pub hide_array_element_type: bool,
    pub anonymous_namer: Option<&'a AnonymousTypeNamer>,
}

impl<'a> TypeNameOptions<'a> {
    pub fn from_settings(settings: &'a TranslationSettings) -> Self {
        Self {
            fully_qualify: settings.fully_qualify_type_names,
            hide_array_element_type: false,
            anonymous_namer: settings.anonymous_type_namer(),
        }
    }
}

/// The friendly name of `ty` as plain text.
pub fn friendly_name(ty: &TypeRef, options: &TypeNameOptions<'_>) -> String {
    type_name_segments(ty, options).into_iter().map(|(text, _)| text).collect()
}

/// The friendly name of `ty`, split into tagged segments.
pub fn type_name_segments(ty: &TypeRef, options: &TypeNameOptions<'_>) -> Vec<NameSegment> {
    let mut out = Vec::new();
    push_type(ty, options, &mut out);
    out
}

fn push_type(ty: &TypeRef, options: &TypeNameOptions<'_>, out: &mut Vec<NameSegment>) {
    if let Some(element) = ty.element_type() {
        if !options.hide_array_element_type {
            push_type(element, options, out);
        }
        let mut brackets = String::from("[");
        for _ in 1..ty.rank() {
            brackets.push(',');
        }
        brackets.push(']');
        out.push((brackets, TokenType::Default));
        return;
    }
    if ty.is_generic_parameter() {
        out.push((ty.raw_name().to_string(), TokenType::InterfaceName));
        return;
    }
    if let Some(underlying) = ty.nullable_underlying() {
        push_type(underlying, options, out);
        out.push(("?".to_string(), TokenType::Default));
        return;
    }
    if ty.is_anonymous() {
        push_anonymous(ty, options, out);
        return;
    }
    if let Some(keyword) = ty.keyword() {
        out.push((keyword.to_string(), TokenType::Keyword));
        return;
    }
    if ty.is_generic() {
        push_generic(ty, options, out);
        return;
    }
    match ty.declaring_type() {
        Some(declaring) => {
            push_type(declaring, options, out);
            out.push((".".to_string(), TokenType::Default));
        }
        None => push_namespace(ty, options, out),
    }
    out.push((ty.name_without_arity().to_string(), token_for(ty)));
}

fn push_anonymous(ty: &TypeRef, options: &TypeNameOptions<'_>, out: &mut Vec<NameSegment>) {
    if let Some(namer) = options.anonymous_namer {
        out.push((namer(ty), TokenType::TypeName));
        return;
    }
    out.push(("AnonymousType".to_string(), TokenType::TypeName));
    if ty.is_generic() {
        push_argument_list(ty.generic_args(), options, out);
    }
}

/// Writes the declaring chain of a generic type, each segment consuming its
/// own arity's worth of the flattened argument list.
fn push_generic(ty: &TypeRef, options: &TypeNameOptions<'_>, out: &mut Vec<NameSegment>) {
    let mut chain = vec![ty.clone()];
    let mut current = ty.declaring_type();
    while let Some(declaring) = current {
        chain.push(declaring.clone());
        current = declaring.declaring_type();
    }
    chain.reverse();

    let args = ty.generic_args();
    let mut cursor = 0;
    for (index, segment) in chain.iter().enumerate() {
        if index == 0 {
            push_namespace(segment, options, out);
        } else {
            out.push((".".to_string(), TokenType::Default));
        }
        out.push((segment.name_without_arity().to_string(), token_for(segment)));
        let arity = segment.own_arity();
        let end = (cursor + arity).min(args.len());
        if arity > 0 && cursor < end {
            push_argument_list(&args[cursor..end], options, out);
        }
        cursor = end;
    }
}

fn push_argument_list(args: &[TypeRef], options: &TypeNameOptions<'_>, out: &mut Vec<NameSegment>) {
    out.push(("<".to_string(), TokenType::Default));
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            out.push((", ".to_string(), TokenType::Default));
        }
        push_type(arg, options, out);
    }
    out.push((">".to_string(), TokenType::Default));
}

fn push_namespace(ty: &TypeRef, options: &TypeNameOptions<'_>, out: &mut Vec<NameSegment>) {
    if !options.fully_qualify {
        return;
    }
    if let Some(namespace) = ty.namespace() {
        out.push((format!("{namespace}."), TokenType::Default));
    }
}

fn token_for(ty: &TypeRef) -> TokenType {
    if ty.is_interface() {
        TokenType::InterfaceName
    } else {
        TokenType::TypeName
    }
}

// ── Variable-style names ────────────────────────────────────────────

/// A PascalCase name describing `ty`: `Int`, `IntList`, `IntArray`,
/// `NullableInt`, `StringIntDictionary`.
pub fn pascal_case_name(ty: &TypeRef) -> String {
    if let Some(element) = ty.element_type() {
        return format!("{}Array", pascal_case_name(element));
    }
    if let Some(underlying) = ty.nullable_underlying() {
        return format!("Nullable{}", pascal_case_name(underlying));
    }
    if ty.is_anonymous() {
        return "AnonymousType".to_string();
    }
    if let Some(keyword) = ty.keyword() {
        return capitalize(keyword);
    }
    if ty.is_generic_parameter() {
        return capitalize(ty.raw_name());
    }
    let base = capitalize(ty.name_without_arity());
    if ty.is_generic() {
        let args: String = ty.generic_args().iter().map(pascal_case_name).collect();
        return format!("{args}{base}");
    }
    base
}

/// The camelCase form of [`pascal_case_name`].
pub fn camel_case_name(ty: &TypeRef) -> String {
    let pascal = pascal_case_name(ty);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => pascal,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
