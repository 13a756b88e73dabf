//! Identifier validation and default names for classes and methods.

use crate::error::{NameKind, TranslateError};
use crate::translation::translators::variables::is_reserved_word;
use crate::translation::type_names::pascal_case_name;
use readex_core::TypeRef;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_NAMESPACE: &str = "GeneratedExpressionCode";
pub const DEFAULT_CLASS_NAME: &str = "GeneratedExpressionClass";
pub const DEFAULT_ACTION_NAME: &str = "DoAction";

/// Checks `name` is a usable identifier; namespaces may be dotted.
pub fn validate_identifier(kind: NameKind, name: &str) -> Result<(), TranslateError> {
    if kind == NameKind::Namespace {
        return name.split('.').try_for_each(|part| validate_part(kind, name, part));
    }
    validate_part(kind, name, name)
}

fn validate_part(kind: NameKind, name: &str, part: &str) -> Result<(), TranslateError> {
    let invalid = |reason: String| TranslateError::InvalidName {
        kind,
        name: name.to_string(),
        reason,
    };
    if part.trim().is_empty() {
        return Err(invalid("must not be blank".to_string()));
    }
    if let Some(bad) = part.chars().find(|c| !(c.is_alphanumeric() || *c == '_')) {
        return Err(invalid(format!("contains '{bad}'")));
    }
    if part.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid("must not start with a digit".to_string()));
    }
    if is_reserved_word(part) {
        return Err(invalid("is a reserved word".to_string()));
    }
    Ok(())
}

/// `Get` plus the type's PascalCase name, or `DoAction` for void.
pub fn default_method_name(return_type: &TypeRef) -> String {
    if return_type.is_void() {
        DEFAULT_ACTION_NAME.to_string()
    } else {
        format!("Get{}", pascal_case_name(return_type))
    }
}

/// Resolves final names from explicit names and default names. Defaults
/// shared by several unnamed entries get 1-based suffixes in order.
pub fn resolve_names(slots: &[(Option<String>, String)]) -> Vec<String> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for (explicit, default) in slots {
        if explicit.is_none() {
            *totals.entry(default.as_str()).or_default() += 1;
        }
    }
    let mut positions: HashMap<&str, usize> = HashMap::new();
    slots
        .iter()
        .map(|(explicit, default)| match explicit {
            Some(name) => name.clone(),
            None if totals.get(default.as_str()).copied().unwrap_or(0) <= 1 => default.clone(),
            None => {
                let position = positions.entry(default.as_str()).or_default();
                *position += 1;
                format!("{default}{position}")
            }
        })
        .collect()
}

/// Fails on the first name that appears twice.
pub fn ensure_unique<'a>(
    kind: NameKind,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), TranslateError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(TranslateError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unnamed(default: &str) -> (Option<String>, String) {
        (None, default.to_string())
    }

    #[test]
    fn shared_defaults_are_numbered_in_order() {
        let names = resolve_names(&[
            unnamed("GetInt"),
            (Some("Total".to_string()), "GetInt".to_string()),
            unnamed("GetString"),
            unnamed("GetInt"),
        ]);
        assert_eq!(names, vec!["GetInt1", "Total", "GetString", "GetInt2"]);
    }

    #[test]
    fn identifiers_are_validated() {
        assert!(validate_identifier(NameKind::Method, "Get_Value2").is_ok());
        assert!(validate_identifier(NameKind::Namespace, "Acme.Tools").is_ok());
        for bad in ["", "  ", "2Fast", "has space", "class", "dash-ed"] {
            assert!(validate_identifier(NameKind::Method, bad).is_err(), "{bad:?} accepted");
        }
        assert!(validate_identifier(NameKind::Namespace, "Acme..Tools").is_err());
    }

    #[test]
    fn default_names_follow_the_return_type() {
        assert_eq!(default_method_name(&TypeRef::void()), "DoAction");
        assert_eq!(default_method_name(&TypeRef::nullable(TypeRef::int())), "GetNullableInt");
        assert_eq!(default_method_name(&TypeRef::array(TypeRef::int())), "GetIntArray");
    }

    #[test]
    fn duplicates_are_reported() {
        let err = ensure_unique(NameKind::Class, ["A", "B", "A"]).unwrap_err();
        assert_eq!(
            err,
            TranslateError::DuplicateName {
                kind: NameKind::Class,
                name: "A".to_string()
            }
        );
    }
}
