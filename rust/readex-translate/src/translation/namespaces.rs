//! The set of namespaces a rendered translation needs imported.

use readex_core::TypeRef;
use std::cmp::Ordering;
use std::collections::BTreeSet;

const SYSTEM: &str = "System";

/// Duplicate-free namespace accumulator.
#[derive(Debug, Clone, Default)]
pub struct NamespaceSet {
    namespaces: BTreeSet<String>,
}

impl NamespaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, namespace: &str) {
        if !namespace.is_empty() {
            self.namespaces.insert(namespace.to_string());
        }
    }

    /// Records whatever namespaces referencing `ty` by its short name needs.
    pub fn add_type(&mut self, ty: &TypeRef) {
        if let Some(element) = ty.element_type() {
            self.add_type(element);
            return;
        }
        if let Some(underlying) = ty.nullable_underlying() {
            self.add_type(underlying);
            return;
        }
        if ty.is_generic_parameter() || ty.keyword().is_some() || ty.is_closure() {
            return;
        }
        for arg in ty.generic_args() {
            self.add_type(arg);
        }
        if ty.is_anonymous() {
            return;
        }
        let mut outermost = ty;
        while let Some(declaring) = outermost.declaring_type() {
            outermost = declaring;
        }
        if let Some(namespace) = outermost.namespace() {
            self.add(namespace);
        }
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// The namespaces in `using` order.
    pub fn sorted(&self) -> Vec<String> {
        sort_namespaces(self.namespaces.iter().cloned())
    }
}

fn is_system(namespace: &str) -> bool {
    namespace == SYSTEM || namespace.starts_with("System.")
}

fn compare_namespaces(a: &str, b: &str) -> Ordering {
    match (is_system(a), is_system(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.cmp(b),
    }
}

/// Sorts namespaces with `System` and `System.*` first, then the rest, each
/// group alphabetically, removing duplicates.
pub fn sort_namespaces(namespaces: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut sorted: Vec<String> = namespaces.into_iter().collect();
    sorted.sort_by(|a, b| compare_namespaces(a, b));
    sorted.dedup();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_namespaces_sort_first() {
        let sorted = sort_namespaces(
            ["System.Text", "Acme.Tools", "System", "System.IO", "Acme"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(sorted, vec!["System", "System.IO", "System.Text", "Acme", "Acme.Tools"]);
    }

    #[test]
    fn systemic_prefix_is_not_system() {
        let sorted = sort_namespaces(["Systematic", "System"].into_iter().map(String::from));
        assert_eq!(sorted, vec!["System", "Systematic"]);
    }

    #[test]
    fn keywords_and_generic_parameters_need_nothing() {
        let mut set = NamespaceSet::new();
        set.add_type(&TypeRef::int());
        set.add_type(&TypeRef::generic_parameter("T"));
        set.add_type(&TypeRef::nullable(TypeRef::int()));
        assert!(set.is_empty());
    }

    #[test]
    fn generic_arguments_and_nesting_are_followed() {
        let mut set = NamespaceSet::new();
        let list = TypeRef::class("System.Collections.Generic", "List`1")
            .with_args(vec![TypeRef::class("Acme.Model", "Order")]);
        set.add_type(&TypeRef::array(list));
        let outer = TypeRef::class("Acme.Nested", "Outer");
        set.add_type(&TypeRef::class("", "Inner").nested_in(outer));
        assert_eq!(
            set.sorted(),
            vec!["System.Collections.Generic", "Acme.Model", "Acme.Nested"]
        );
    }
}
