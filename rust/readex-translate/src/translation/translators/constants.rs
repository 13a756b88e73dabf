//! Literals, `default(T)`, comments and extension nodes.

use crate::translation::context::TranslationContext;
use crate::translation::formatter::TokenType;
use crate::translation::translators::{EmptyTranslation, TranslationBox};
use readex_core::expr::{CommentExpr, ConstantExpr, ConstantValue, DefaultExpr, ExtensionExpr};
use readex_core::{ExprKind, TypeRef};

pub fn translate_constant(ctx: &TranslationContext<'_>, constant: &ConstantExpr) -> TranslationBox {
    translate_value(ctx, &constant.value, &constant.ty)
}

/// A literal for `value` typed as `ty`.
pub fn translate_value(
    ctx: &TranslationContext<'_>,
    value: &ConstantValue,
    ty: &TypeRef,
) -> TranslationBox {
    let builder = ctx.builder(ExprKind::Constant, ty.clone());
    match value {
        ConstantValue::Null => builder.keyword("null"),
        ConstantValue::Bool(flag) => builder.keyword(if *flag { "true" } else { "false" }),
        ConstantValue::Int(number) => {
            let suffix = if *ty == TypeRef::long() { "L" } else { "" };
            builder.token(&format!("{number}{suffix}"), TokenType::Numeric)
        }
        ConstantValue::UInt(number) => {
            let suffix = if *ty == TypeRef::ulong() {
                "UL"
            } else if *ty == TypeRef::uint() {
                "U"
            } else {
                ""
            };
            builder.token(&format!("{number}{suffix}"), TokenType::Numeric)
        }
        ConstantValue::Float(number) => match float_literal(*number, ty) {
            Ok(literal) => builder.token(&literal, TokenType::Numeric),
            Err(member) => builder.type_name(ty).text(".").text(member),
        },
        ConstantValue::Decimal(text) => builder.token(&format!("{text}m"), TokenType::Numeric),
        ConstantValue::Char(ch) => {
            let literal = format!("'{}'", escape(&ch.to_string(), '\''));
            builder.token(&literal, TokenType::Text)
        }
        ConstantValue::String(text) => {
            builder.token(&format!("\"{}\"", escape(text, '"')), TokenType::Text)
        }
        ConstantValue::Type(operand) => {
            builder.keyword("typeof").text("(").type_name(operand).text(")")
        }
        ConstantValue::EnumMember(member) => builder.type_name(ty).text(".").text(member),
        ConstantValue::Closure(_) => builder.type_name(ty),
        ConstantValue::Object(display) => builder.text(display),
    }
    .build()
}

/// The literal text of a floating-point number, or the name of the
/// `double`/`float` member standing in for a non-finite value.
fn float_literal(number: f64, ty: &TypeRef) -> Result<String, &'static str> {
    if number.is_nan() {
        return Err("NaN");
    }
    if number.is_infinite() {
        return Err(if number > 0.0 { "PositiveInfinity" } else { "NegativeInfinity" });
    }
    let is_float = *ty == TypeRef::float();
    let text = number.to_string();
    Ok(if is_float {
        format!("{text}f")
    } else if number.fract() == 0.0 {
        format!("{text}d")
    } else {
        text
    })
}

fn escape(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

pub fn translate_default(ctx: &TranslationContext<'_>, default: &DefaultExpr) -> TranslationBox {
    if default.ty.is_void() {
        return EmptyTranslation::boxed(ExprKind::Default, default.ty.clone());
    }
    ctx.builder(ExprKind::Default, default.ty.clone())
        .keyword("default")
        .text("(")
        .type_name(&default.ty)
        .text(")")
        .build()
}

/// One `//` line per line of text.
pub fn translate_comment(ctx: &TranslationContext<'_>, comment: &CommentExpr) -> TranslationBox {
    let mut builder = ctx.builder(ExprKind::Comment, TypeRef::void()).terminated();
    for (index, line) in comment.text.lines().enumerate() {
        if index > 0 {
            builder = builder.new_line();
        }
        let line = line.trim();
        let text = if line.starts_with("//") {
            line.to_string()
        } else {
            format!("// {line}")
        };
        builder = builder.token(&text, TokenType::Comment);
    }
    builder.build()
}

pub fn translate_extension(
    ctx: &TranslationContext<'_>,
    extension: &ExtensionExpr,
) -> TranslationBox {
    let builder = ctx.builder(ExprKind::Extension, extension.ty.clone());
    match &extension.display {
        Some(display) => builder.text(display).build(),
        None if extension.operands.is_empty() => builder.text(&extension.name).build(),
        None => builder
            .text(&extension.name)
            .text("(")
            .children(extension.operands.iter().map(|operand| ctx.translate(operand)), ", ")
            .text(")")
            .build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_literals() {
        assert_eq!(float_literal(1.0, &TypeRef::double()), Ok("1d".to_string()));
        assert_eq!(float_literal(0.5, &TypeRef::double()), Ok("0.5".to_string()));
        assert_eq!(float_literal(2.5, &TypeRef::float()), Ok("2.5f".to_string()));
        assert_eq!(float_literal(f64::NAN, &TypeRef::double()), Err("NaN"));
        assert_eq!(float_literal(f64::NEG_INFINITY, &TypeRef::double()), Err("NegativeInfinity"));
    }

    #[test]
    fn escapes() {
        assert_eq!(escape("a\"b\\c\n", '"'), "a\\\"b\\\\c\\n");
        assert_eq!(escape("'", '\''), "\\'");
        assert_eq!(escape("'", '"'), "'");
    }
}
