//! Variable references and names.

use crate::translation::context::TranslationContext;
use crate::translation::translators::TranslationBox;
use crate::translation::type_names::camel_case_name;
use readex_core::expr::ParameterExpr;
use readex_core::ExprKind;

const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// The written name of a variable. Unnamed variables are named after their
/// type; reserved words are escaped with `@`.
pub fn variable_name(parameter: &ParameterExpr) -> String {
    let name = if parameter.name.is_empty() {
        camel_case_name(&parameter.ty)
    } else {
        parameter.name.clone()
    };
    if is_reserved_word(&name) {
        format!("@{name}")
    } else {
        name
    }
}

pub fn translate_parameter(
    ctx: &TranslationContext<'_>,
    parameter: &ParameterExpr,
) -> TranslationBox {
    ctx.builder(ExprKind::Parameter, parameter.ty.clone())
        .variable(&variable_name(parameter))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use readex_core::TypeRef;

    #[test]
    fn reserved_words_are_escaped() {
        assert_eq!(variable_name(&ParameterExpr::new(TypeRef::int(), "class")), "@class");
        assert_eq!(variable_name(&ParameterExpr::new(TypeRef::int(), "count")), "count");
    }

    #[test]
    fn unnamed_variables_are_named_after_their_type() {
        let list = TypeRef::class("System.Collections.Generic", "List`1")
            .with_args(vec![TypeRef::string()]);
        assert_eq!(variable_name(&ParameterExpr::new(list, "")), "stringList");
        assert_eq!(variable_name(&ParameterExpr::new(TypeRef::int(), "")), "@int");
    }
}
