//! Type references carried by expression nodes.
//!
//! A [`TypeRef`] is a cheap, shareable handle to an immutable [`TypeData`].
//! Equality and hashing are structural: two separately-built references to
//! `System.Int32` compare equal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Broad classification of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    /// An open generic parameter such as `T`.
    GenericParameter,
    Array,
}

/// The data behind a [`TypeRef`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeData {
    pub kind: TypeKind,
    #[serde(default)]
    pub namespace: Option<String>,
    /// Raw name, including any arity marker (`` Dictionary`2 ``).
    pub name: String,
    /// Enclosing type for nested types.
    #[serde(default)]
    pub declaring_type: Option<TypeRef>,
    /// Flattened generic arguments, declaring-type arguments first.
    #[serde(default)]
    pub generic_args: Vec<TypeRef>,
    /// Element type, for arrays.
    #[serde(default)]
    pub element_type: Option<TypeRef>,
    /// Array rank; `1` for everything else.
    #[serde(default = "default_rank")]
    pub rank: u8,
    #[serde(default)]
    pub is_anonymous: bool,
    /// Compiler-generated closure classes hold captured variables.
    #[serde(default)]
    pub is_closure: bool,
}

fn default_rank() -> u8 {
    1
}

/// Shared, structurally-compared reference to a type.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(Arc<TypeData>);

const SYSTEM: &str = "System";

impl TypeRef {
    pub fn new(data: TypeData) -> Self {
        TypeRef(Arc::new(data))
    }

    fn named(kind: TypeKind, namespace: Option<&str>, name: &str) -> Self {
        Self::new(TypeData {
            kind,
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
            declaring_type: None,
            generic_args: Vec::new(),
            element_type: None,
            rank: 1,
            is_anonymous: false,
            is_closure: false,
        })
    }

    /// A reference type. Pass an empty namespace for the global namespace.
    pub fn class(namespace: &str, name: &str) -> Self {
        Self::named(TypeKind::Class, non_empty(namespace), name)
    }

    pub fn structure(namespace: &str, name: &str) -> Self {
        Self::named(TypeKind::Struct, non_empty(namespace), name)
    }

    pub fn interface(namespace: &str, name: &str) -> Self {
        Self::named(TypeKind::Interface, non_empty(namespace), name)
    }

    pub fn enumeration(namespace: &str, name: &str) -> Self {
        Self::named(TypeKind::Enum, non_empty(namespace), name)
    }

    pub fn delegate(namespace: &str, name: &str) -> Self {
        Self::named(TypeKind::Delegate, non_empty(namespace), name)
    }

    /// An open generic parameter. Generic parameters have no namespace.
    pub fn generic_parameter(name: &str) -> Self {
        Self::named(TypeKind::GenericParameter, None, name)
    }

    pub fn array(element: TypeRef) -> Self {
        Self::array_of_rank(element, 1)
    }

    pub fn array_of_rank(element: TypeRef, rank: u8) -> Self {
        let name = format!("{}[]", element.0.name);
        Self::new(TypeData {
            kind: TypeKind::Array,
            namespace: element.0.namespace.clone(),
            name,
            declaring_type: None,
            generic_args: Vec::new(),
            element_type: Some(element),
            rank: rank.max(1),
            is_anonymous: false,
            is_closure: false,
        })
    }

    /// `System.Nullable<T>`.
    pub fn nullable(underlying: TypeRef) -> Self {
        Self::structure(SYSTEM, "Nullable`1").with_args(vec![underlying])
    }

    /// An anonymous type whose properties have the given types.
    pub fn anonymous(property_types: Vec<TypeRef>) -> Self {
        let name = format!("<>f__AnonymousType0`{}", property_types.len());
        let mut data = Self::class("", &name).data().clone();
        data.generic_args = property_types;
        data.is_anonymous = true;
        Self::new(data)
    }

    /// A compiler-generated closure class.
    pub fn closure(name: &str) -> Self {
        let mut data = Self::class("", name).data().clone();
        data.is_closure = true;
        Self::new(data)
    }

    /// Returns a copy of this type with the given generic arguments.
    pub fn with_args(&self, args: Vec<TypeRef>) -> Self {
        let mut data = self.data().clone();
        data.generic_args = args;
        Self::new(data)
    }

    /// Returns a copy of this type nested inside `declaring`.
    pub fn nested_in(&self, declaring: TypeRef) -> Self {
        let mut data = self.data().clone();
        data.namespace = declaring.0.namespace.clone();
        data.declaring_type = Some(declaring);
        Self::new(data)
    }

    // ── Well-known types ────────────────────────────────────────────

    pub fn void() -> Self {
        Self::structure(SYSTEM, "Void")
    }
    pub fn object() -> Self {
        Self::class(SYSTEM, "Object")
    }
    pub fn string() -> Self {
        Self::class(SYSTEM, "String")
    }
    pub fn bool() -> Self {
        Self::structure(SYSTEM, "Boolean")
    }
    pub fn int() -> Self {
        Self::structure(SYSTEM, "Int32")
    }
    pub fn long() -> Self {
        Self::structure(SYSTEM, "Int64")
    }
    pub fn short() -> Self {
        Self::structure(SYSTEM, "Int16")
    }
    pub fn byte() -> Self {
        Self::structure(SYSTEM, "Byte")
    }
    pub fn sbyte() -> Self {
        Self::structure(SYSTEM, "SByte")
    }
    pub fn uint() -> Self {
        Self::structure(SYSTEM, "UInt32")
    }
    pub fn ulong() -> Self {
        Self::structure(SYSTEM, "UInt64")
    }
    pub fn ushort() -> Self {
        Self::structure(SYSTEM, "UInt16")
    }
    pub fn double() -> Self {
        Self::structure(SYSTEM, "Double")
    }
    pub fn float() -> Self {
        Self::structure(SYSTEM, "Single")
    }
    pub fn decimal() -> Self {
        Self::structure(SYSTEM, "Decimal")
    }
    pub fn char() -> Self {
        Self::structure(SYSTEM, "Char")
    }
    pub fn exception() -> Self {
        Self::class(SYSTEM, "Exception")
    }
    /// `System.Type`, the type of `typeof(...)` constants.
    pub fn type_type() -> Self {
        Self::class(SYSTEM, "Type")
    }
    pub fn math() -> Self {
        Self::class(SYSTEM, "Math")
    }

    /// `Func<...>` for non-void lambdas, `Action<...>` otherwise.
    pub fn delegate_for(parameter_types: Vec<TypeRef>, return_type: &TypeRef) -> Self {
        if return_type.is_void() {
            if parameter_types.is_empty() {
                return Self::delegate(SYSTEM, "Action");
            }
            let name = format!("Action`{}", parameter_types.len());
            return Self::delegate(SYSTEM, &name).with_args(parameter_types);
        }
        let mut args = parameter_types;
        args.push(return_type.clone());
        let name = format!("Func`{}", args.len());
        Self::delegate(SYSTEM, &name).with_args(args)
    }

    /// `System.Linq.Expressions.Expression<TDelegate>`, the type of quoted lambdas.
    pub fn expression_of(delegate: TypeRef) -> Self {
        Self::class("System.Linq.Expressions", "Expression`1").with_args(vec![delegate])
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn data(&self) -> &TypeData {
        &self.0
    }

    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    pub fn namespace(&self) -> Option<&str> {
        self.0.namespace.as_deref()
    }

    /// The raw name, arity marker included.
    pub fn raw_name(&self) -> &str {
        &self.0.name
    }

    /// The name with any `` `N `` arity marker removed.
    pub fn name_without_arity(&self) -> &str {
        split_arity(&self.0.name).0
    }

    /// Number of generic parameters this segment declares (from the arity marker).
    pub fn own_arity(&self) -> usize {
        split_arity(&self.0.name).1
    }

    pub fn declaring_type(&self) -> Option<&TypeRef> {
        self.0.declaring_type.as_ref()
    }

    pub fn generic_args(&self) -> &[TypeRef] {
        &self.0.generic_args
    }

    pub fn element_type(&self) -> Option<&TypeRef> {
        self.0.element_type.as_ref()
    }

    pub fn rank(&self) -> u8 {
        self.0.rank
    }

    pub fn is_void(&self) -> bool {
        self.is_system("Void")
    }

    pub fn is_string(&self) -> bool {
        self.is_system("String")
    }

    pub fn is_object(&self) -> bool {
        self.is_system("Object")
    }

    pub fn is_bool(&self) -> bool {
        self.is_system("Boolean")
    }

    pub fn is_array(&self) -> bool {
        self.0.kind == TypeKind::Array
    }

    pub fn is_interface(&self) -> bool {
        self.0.kind == TypeKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.0.kind == TypeKind::Enum
    }

    pub fn is_generic_parameter(&self) -> bool {
        self.0.kind == TypeKind::GenericParameter
    }

    pub fn is_value_type(&self) -> bool {
        matches!(self.0.kind, TypeKind::Struct | TypeKind::Enum)
    }

    pub fn is_generic(&self) -> bool {
        !self.0.generic_args.is_empty()
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_anonymous
    }

    pub fn is_closure(&self) -> bool {
        self.0.is_closure
    }

    pub fn is_nullable(&self) -> bool {
        self.is_system("Nullable`1") && self.0.generic_args.len() == 1
    }

    /// `T` for `Nullable<T>`.
    pub fn nullable_underlying(&self) -> Option<&TypeRef> {
        if self.is_nullable() {
            self.0.generic_args.first()
        } else {
            None
        }
    }

    /// True for `Expression<TDelegate>`.
    pub fn is_expression_type(&self) -> bool {
        self.namespace() == Some("System.Linq.Expressions") && self.raw_name() == "Expression`1"
    }

    fn is_system(&self, name: &str) -> bool {
        self.0.declaring_type.is_none()
            && self.0.kind != TypeKind::Array
            && self.namespace() == Some(SYSTEM)
            && self.0.name == name
    }

    /// The language keyword for built-in types, if this is one.
    pub fn keyword(&self) -> Option<&'static str> {
        if self.namespace() != Some(SYSTEM)
            || self.0.declaring_type.is_some()
            || self.0.kind == TypeKind::Array
        {
            return None;
        }
        let keyword = match self.0.name.as_str() {
            "String" => "string",
            "Int32" => "int",
            "Boolean" => "bool",
            "Decimal" => "decimal",
            "Int64" => "long",
            "Double" => "double",
            "Object" => "object",
            "Byte" => "byte",
            "Int16" => "short",
            "Single" => "float",
            "Char" => "char",
            "UInt32" => "uint",
            "UInt64" => "ulong",
            "SByte" => "sbyte",
            "UInt16" => "ushort",
            "Void" => "void",
            _ => return None,
        };
        Some(keyword)
    }

    /// Whether `param` (a generic parameter) occurs anywhere in this type.
    pub fn mentions(&self, param: &TypeRef) -> bool {
        if self == param {
            return true;
        }
        if let Some(element) = self.element_type() {
            if element.mentions(param) {
                return true;
            }
        }
        self.generic_args().iter().any(|arg| arg.mentions(param))
    }

    /// Replaces every occurrence of `params[i]` with `args[i]`.
    pub fn substitute(&self, params: &[TypeRef], args: &[TypeRef]) -> TypeRef {
        if let Some(index) = params.iter().position(|p| p == self) {
            if let Some(arg) = args.get(index) {
                return arg.clone();
            }
        }
        if params.is_empty() || !params.iter().any(|p| self.mentions(p)) {
            return self.clone();
        }
        let mut data = self.data().clone();
        if let Some(element) = &data.element_type {
            data.element_type = Some(element.substitute(params, args));
        }
        data.generic_args = data
            .generic_args
            .iter()
            .map(|arg| arg.substitute(params, args))
            .collect();
        TypeRef::new(data)
    }

    /// Namespace-qualified CLR-style name, used in diagnostics.
    pub fn full_name(&self) -> String {
        let mut name = String::new();
        if let Some(element) = self.element_type() {
            name.push_str(&element.full_name());
            name.push('[');
            for _ in 1..self.rank() {
                name.push(',');
            }
            name.push(']');
            return name;
        }
        match self.declaring_type() {
            Some(declaring) => {
                name.push_str(&declaring.full_name());
                name.push('+');
            }
            None => {
                if let Some(ns) = self.namespace() {
                    name.push_str(ns);
                    name.push('.');
                }
            }
        }
        name.push_str(self.raw_name());
        name
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.full_name())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

fn non_empty(namespace: &str) -> Option<&str> {
    if namespace.is_empty() {
        None
    } else {
        Some(namespace)
    }
}

/// Splits `` List`1 `` into `("List", 1)`.
fn split_arity(name: &str) -> (&str, usize) {
    match name.rfind('`') {
        Some(index) => match name[index + 1..].parse::<usize>() {
            Ok(arity) => (&name[..index], arity),
            Err(_) => (name, 0),
        },
        None => (name, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn structural_equality() {
        assert_eq!(TypeRef::int(), TypeRef::structure("System", "Int32"));
        assert_ne!(TypeRef::int(), TypeRef::long());
    }

    #[test]
    fn arity_marker_is_stripped() {
        let list = TypeRef::class("System.Collections.Generic", "List`1");
        assert_eq!(list.name_without_arity(), "List");
        assert_eq!(list.own_arity(), 1);
        assert_eq!(TypeRef::int().own_arity(), 0);
    }

    #[test]
    fn keywords_only_for_system_primitives() {
        assert_eq!(TypeRef::int().keyword(), Some("int"));
        assert_eq!(TypeRef::void().keyword(), Some("void"));
        assert_eq!(TypeRef::structure("MyApp", "Int32").keyword(), None);
        assert_eq!(TypeRef::array(TypeRef::int()).keyword(), None);
    }

    #[test]
    fn nullable_underlying_type() {
        let nullable = TypeRef::nullable(TypeRef::int());
        assert!(nullable.is_nullable());
        assert_eq!(nullable.nullable_underlying(), Some(&TypeRef::int()));
        assert!(!TypeRef::int().is_nullable());
    }

    #[test]
    fn substitute_replaces_nested_parameters() {
        let t = TypeRef::generic_parameter("T");
        let list_of_t =
            TypeRef::class("System.Collections.Generic", "List`1").with_args(vec![t.clone()]);
        let closed = list_of_t.substitute(&[t.clone()], &[TypeRef::string()]);
        assert_eq!(closed.generic_args(), &[TypeRef::string()]);
        assert!(list_of_t.mentions(&t));
        assert!(!closed.mentions(&t));
    }

    #[test]
    fn full_name_of_nested_array() {
        let outer = TypeRef::class("MyApp", "Outer");
        let inner = TypeRef::class("", "Inner").nested_in(outer);
        assert_eq!(TypeRef::array(inner).full_name(), "MyApp.Outer+Inner[]");
    }

    #[test]
    fn serde_roundtrip_keeps_equality() {
        let ty = TypeRef::nullable(TypeRef::decimal());
        let json = serde_json::to_string(&ty).unwrap();
        let back: TypeRef = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, back);
    }
}
