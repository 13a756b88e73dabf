//! Matching generated methods to the interface methods they implement.

use crate::error::TranslateError;
use crate::translation::type_names::{friendly_name, TypeNameOptions};
use readex_core::members::MethodInfo;
use readex_core::TypeRef;

/// An interface a class declares, with the methods it requires.
#[derive(Debug, Clone)]
pub struct InterfaceImplementation {
    pub interface: TypeRef,
    pub methods: Vec<MethodInfo>,
}

impl InterfaceImplementation {
    pub fn new(interface: TypeRef, methods: Vec<MethodInfo>) -> Self {
        Self { interface, methods }
    }
}

fn signature_matches(
    method: &MethodInfo,
    parameter_types: &[TypeRef],
    return_type: &TypeRef,
) -> bool {
    method.closed_return_type() == *return_type
        && method.closed_parameter_types() == parameter_types
}

/// The single interface method with this signature, if any.
pub fn find_interface_method<'i>(
    interfaces: &'i [InterfaceImplementation],
    parameter_types: &[TypeRef],
    return_type: &TypeRef,
) -> Result<Option<&'i MethodInfo>, TranslateError> {
    let candidates: Vec<(&TypeRef, &MethodInfo)> = interfaces
        .iter()
        .flat_map(|i| i.methods.iter().map(move |m| (&i.interface, m)))
        .filter(|(_, m)| signature_matches(m, parameter_types, return_type))
        .collect();
    match candidates.as_slice() {
        [] => Ok(None),
        [(_, method)] => Ok(Some(method)),
        _ => {
            let options = TypeNameOptions::default();
            let arguments: Vec<String> =
                parameter_types.iter().map(|t| friendly_name(t, &options)).collect();
            Err(TranslateError::AmbiguousInterfaceMethod {
                arguments: arguments.join(", "),
                return_type: friendly_name(return_type, &options),
                candidates: candidates
                    .iter()
                    .map(|(interface, m)| {
                        format!("{}.{}", friendly_name(interface, &options), m.name)
                    })
                    .collect(),
            })
        }
    }
}

/// `Interface.Method` for every interface method no generated method
/// implements.
pub fn unimplemented_methods(
    interfaces: &[InterfaceImplementation],
    implemented: &[&MethodInfo],
) -> Vec<String> {
    let options = TypeNameOptions::default();
    interfaces
        .iter()
        .flat_map(|i| i.methods.iter().map(move |m| (&i.interface, m)))
        .filter(|(_, m)| !implemented.iter().any(|done| std::ptr::eq(*done, *m)))
        .map(|(interface, m)| format!("{}.{}", friendly_name(interface, &options), m.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use readex_core::members::ParameterInfo;

    fn interface_method(interface: &TypeRef, name: &str) -> MethodInfo {
        MethodInfo::new(interface.clone(), name, TypeRef::string())
            .with_parameters(vec![ParameterInfo::new("value", TypeRef::int())])
    }

    #[test]
    fn single_match_is_found() {
        let formatter = TypeRef::interface("Acme", "IFormatter");
        let interfaces = vec![InterfaceImplementation::new(
            formatter.clone(),
            vec![interface_method(&formatter, "Format")],
        )];
        let found =
            find_interface_method(&interfaces, &[TypeRef::int()], &TypeRef::string()).unwrap();
        assert_eq!(found.map(|m| m.name.as_str()), Some("Format"));
        assert!(find_interface_method(&interfaces, &[TypeRef::long()], &TypeRef::string())
            .unwrap()
            .is_none());
    }

    #[test]
    fn two_matches_are_ambiguous() {
        let formatter = TypeRef::interface("Acme", "IFormatter");
        let interfaces = vec![InterfaceImplementation::new(
            formatter.clone(),
            vec![interface_method(&formatter, "Format"), interface_method(&formatter, "Describe")],
        )];
        let err = find_interface_method(&interfaces, &[TypeRef::int()], &TypeRef::string())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "method (int) returning string matches more than one interface method: \
             IFormatter.Format, IFormatter.Describe"
        );
    }
}
