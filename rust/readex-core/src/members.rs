//! Descriptors for methods, constructors, fields and properties.

use crate::types::TypeRef;
use serde::{Deserialize, Serialize};

/// How an argument is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterMode {
    #[default]
    Value,
    Ref,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    /// Declared type; may mention the method's generic parameters.
    pub ty: TypeRef,
    #[serde(default)]
    pub mode: ParameterMode,
    /// A trailing `params` array.
    #[serde(default)]
    pub is_params: bool,
}

impl ParameterInfo {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
            mode: ParameterMode::Value,
            is_params: false,
        }
    }

    pub fn out(name: &str, ty: TypeRef) -> Self {
        Self {
            mode: ParameterMode::Out,
            ..Self::new(name, ty)
        }
    }

    pub fn by_ref(name: &str, ty: TypeRef) -> Self {
        Self {
            mode: ParameterMode::Ref,
            ..Self::new(name, ty)
        }
    }
}

/// A method, possibly generic, possibly an extension method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub declaring_type: TypeRef,
    /// Declared return type; may mention generic parameters.
    pub return_type: TypeRef,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default)]
    pub is_static: bool,
    /// Static method callable with instance syntax on its first argument.
    #[serde(default)]
    pub is_extension: bool,
    /// Open generic parameters (`T`, `TResult`, ...).
    #[serde(default)]
    pub generic_parameters: Vec<TypeRef>,
    /// Closed generic arguments, parallel to `generic_parameters`.
    #[serde(default)]
    pub generic_args: Vec<TypeRef>,
}

impl MethodInfo {
    pub fn new(declaring_type: TypeRef, name: &str, return_type: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            declaring_type,
            return_type,
            parameters: Vec::new(),
            is_static: false,
            is_extension: false,
            generic_parameters: Vec::new(),
            generic_args: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterInfo>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn extension_method(mut self) -> Self {
        self.is_static = true;
        self.is_extension = true;
        self
    }

    /// Closes the method over `args` for its open `params`.
    pub fn generic(mut self, params: Vec<TypeRef>, args: Vec<TypeRef>) -> Self {
        self.generic_parameters = params;
        self.generic_args = args;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// Return type with generic arguments substituted.
    pub fn closed_return_type(&self) -> TypeRef {
        self.return_type
            .substitute(&self.generic_parameters, &self.generic_args)
    }

    /// Parameter types with generic arguments substituted.
    pub fn closed_parameter_types(&self) -> Vec<TypeRef> {
        self.parameters
            .iter()
            .map(|p| p.ty.substitute(&self.generic_parameters, &self.generic_args))
            .collect()
    }

    /// `Some("Name")` for `get_Name` / `set_Name` accessors.
    pub fn property_name(&self) -> Option<&str> {
        self.name
            .strip_prefix("get_")
            .or_else(|| self.name.strip_prefix("set_"))
            .filter(|name| !name.is_empty())
    }

    pub fn is_property_getter(&self) -> bool {
        self.name.starts_with("get_") && self.name.len() > 4
    }

    pub fn is_property_setter(&self) -> bool {
        self.name.starts_with("set_") && self.name.len() > 4
    }

    /// Compiler-named operator overloads (`op_Addition`, ...).
    pub fn is_operator(&self) -> bool {
        self.is_static && self.name.starts_with("op_")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructorInfo {
    pub declaring_type: TypeRef,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
}

impl ConstructorInfo {
    pub fn new(declaring_type: TypeRef, parameters: Vec<ParameterInfo>) -> Self {
        Self {
            declaring_type,
            parameters,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Property,
}

/// A field or property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberInfo {
    pub name: String,
    pub declaring_type: TypeRef,
    pub member_type: TypeRef,
    pub kind: MemberKind,
    #[serde(default)]
    pub is_static: bool,
}

impl MemberInfo {
    pub fn property(declaring_type: TypeRef, name: &str, member_type: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            declaring_type,
            member_type,
            kind: MemberKind::Property,
            is_static: false,
        }
    }

    pub fn field(declaring_type: TypeRef, name: &str, member_type: TypeRef) -> Self {
        Self {
            kind: MemberKind::Field,
            ..Self::property(declaring_type, name, member_type)
        }
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn generic_method_closes_over_arguments() {
        let t = TypeRef::generic_parameter("T");
        let enumerable = TypeRef::interface("System.Collections.Generic", "IEnumerable`1");
        let method = MethodInfo::new(
            TypeRef::class("System.Linq", "Enumerable"),
            "Empty",
            enumerable.with_args(vec![t.clone()]),
        )
        .static_method()
        .generic(vec![t], vec![TypeRef::int()]);

        assert!(method.is_generic());
        assert_eq!(method.closed_return_type().generic_args(), &[TypeRef::int()]);
    }

    #[test]
    fn accessor_names() {
        let getter = MethodInfo::new(TypeRef::string(), "get_Length", TypeRef::int());
        assert!(getter.is_property_getter());
        assert_eq!(getter.property_name(), Some("Length"));
        let plain = MethodInfo::new(TypeRef::string(), "get_", TypeRef::int());
        assert_eq!(plain.property_name(), None);
    }
}
