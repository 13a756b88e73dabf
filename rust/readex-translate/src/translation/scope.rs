//! Lexical scope tree built by the analysis pass.
//!
//! Scopes live in one arena; children are owned lists of indices and parents
//! are index links, so the tree holds no reference cycles. A variable
//! resolves to the nearest enclosing scope declaring it, or to the root
//! scope when nothing does.

use readex_core::expr::ParameterExpr;
use readex_core::{Expr, TypeRef};
use std::cell::Cell;

/// Identity of a node within one borrowed tree.
pub type NodeId = usize;

pub fn node_id(expr: &Expr) -> NodeId {
    expr as *const Expr as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Lambda,
    Block,
    Branch,
    LoopBody,
    SwitchCase,
    TryBody,
    CatchBody,
    FinallyBody,
    /// A block rendered as its own method.
    ExtractedMethod,
}

/// Variable identity: type plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableKey {
    pub ty: TypeRef,
    pub name: String,
}

impl From<&ParameterExpr> for VariableKey {
    fn from(p: &ParameterExpr) -> Self {
        Self {
            ty: p.ty.clone(),
            name: p.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationType {
    /// Lambda parameters, catch variables and free variables.
    Undeclared,
    /// Declared at the top of its block: `int i, j;`.
    InList,
    /// Declared at its first use as an `out` argument: `out var x`.
    InlineOutput,
    /// Declared by its first assignment: `var x = 1;`.
    JoinedAssignment,
}

#[derive(Debug, Clone)]
pub struct VariableInfo {
    pub key: VariableKey,
    pub declaration: DeclarationType,
    reference_count: usize,
    seen: bool,
    /// Scope active when the declaring use was recorded.
    first_use_scope: Option<ScopeId>,
    joined_node: Option<NodeId>,
    has_been_declared: Cell<bool>,
}

impl VariableInfo {
    fn new(key: VariableKey, declaration: DeclarationType) -> Self {
        Self {
            key,
            declaration,
            reference_count: 0,
            seen: false,
            first_use_scope: None,
            joined_node: None,
            has_been_declared: Cell::new(false),
        }
    }

    pub fn is_used(&self) -> bool {
        self.reference_count > 0
    }

    /// The assignment node folded into this variable's declaration.
    pub fn joined_assignment(&self) -> Option<NodeId> {
        match self.declaration {
            DeclarationType::JoinedAssignment => self.joined_node,
            _ => None,
        }
    }

    /// True exactly once for an inline output variable: at the use that
    /// declares it.
    pub fn should_declare_in_output_parameter_use(&self) -> bool {
        self.declaration == DeclarationType::InlineOutput && !self.has_been_declared.replace(true)
    }

    /// True exactly once for a joined variable: at its declaring assignment.
    pub fn should_declare_in_assignment(&self, node: NodeId) -> bool {
        self.joined_assignment() == Some(node) && !self.has_been_declared.replace(true)
    }
}

/// A variable declared outside an extracted-method scope but used in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapedVariable {
    pub key: VariableKey,
    pub is_assigned: bool,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub variables: Vec<VariableInfo>,
    pub escaped: Vec<EscapedVariable>,
}

/// Where a variable lives: the declaring scope and its slot there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableSlot {
    pub scope: ScopeId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Root,
                parent: None,
                children: Vec::new(),
                variables: Vec::new(),
                escaped: Vec::new(),
            }],
        }
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn push(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            variables: Vec::new(),
            escaped: Vec::new(),
        });
        self.scopes[parent.0].children.push(id);
        id
    }

    pub fn declare(
        &mut self,
        scope: ScopeId,
        key: VariableKey,
        declaration: DeclarationType,
    ) -> VariableSlot {
        let variables = &mut self.scopes[scope.0].variables;
        if let Some(index) = variables.iter().position(|v| v.key == key) {
            return VariableSlot { scope, index };
        }
        variables.push(VariableInfo::new(key, declaration));
        VariableSlot {
            scope,
            index: variables.len() - 1,
        }
    }

    /// Resolves `key` from `from`, registering it as a free variable on the
    /// root scope when no enclosing scope declares it.
    pub fn resolve(&mut self, from: ScopeId, key: &VariableKey) -> VariableSlot {
        let mut current = Some(from);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(index) = scope.variables.iter().position(|v| &v.key == key) {
                return VariableSlot { scope: id, index };
            }
            current = scope.parent;
        }
        self.declare(ScopeId::ROOT, key.clone(), DeclarationType::Undeclared)
    }

    pub fn variable(&self, slot: VariableSlot) -> &VariableInfo {
        &self.scopes[slot.scope.0].variables[slot.index]
    }

    fn variable_mut(&mut self, slot: VariableSlot) -> &mut VariableInfo {
        &mut self.scopes[slot.scope.0].variables[slot.index]
    }

    /// Whether `candidate` is `ancestor` or nested anywhere inside it.
    pub fn is_same_or_descendant(&self, candidate: ScopeId, ancestor: ScopeId) -> bool {
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.scopes[id.0].parent;
        }
        false
    }

    /// Extracted-method scopes between `from` (inclusive) and the scope
    /// declaring `slot` (exclusive), innermost first.
    fn extracted_between(&self, from: ScopeId, slot: VariableSlot) -> Vec<ScopeId> {
        let mut found = Vec::new();
        let mut current = Some(from);
        while let Some(id) = current {
            if id == slot.scope {
                break;
            }
            if self.scopes[id.0].kind == ScopeKind::ExtractedMethod {
                found.push(id);
            }
            current = self.scopes[id.0].parent;
        }
        found
    }

    fn record_escape(&mut self, from: ScopeId, slot: VariableSlot, is_assigned: bool) -> bool {
        let extracted = self.extracted_between(from, slot);
        let key = self.variable(slot).key.clone();
        for id in &extracted {
            let escaped = &mut self.scopes[id.0].escaped;
            match escaped.iter_mut().find(|e| e.key == key) {
                Some(existing) => existing.is_assigned |= is_assigned,
                None => escaped.push(EscapedVariable {
                    key: key.clone(),
                    is_assigned,
                }),
            }
        }
        !extracted.is_empty()
    }

    // ── Reference transitions ───────────────────────────────────────

    /// A read (or a write that cannot declare) of `key` from `from`.
    pub fn record_reference(
        &mut self,
        from: ScopeId,
        key: &VariableKey,
        is_assigned: bool,
    ) -> VariableSlot {
        let slot = self.resolve(from, key);
        self.record_escape(from, slot, is_assigned);
        self.note_reference(from, slot);
        slot
    }

    fn note_reference(&mut self, from: ScopeId, slot: VariableSlot) {
        let first_use = self.variable(slot).first_use_scope;
        let demote = matches!(
            self.variable(slot).declaration,
            DeclarationType::JoinedAssignment | DeclarationType::InlineOutput
        ) && first_use.is_some_and(|first| !self.is_same_or_descendant(from, first));
        let info = self.variable_mut(slot);
        info.seen = true;
        info.reference_count += 1;
        if demote {
            info.declaration = DeclarationType::InList;
            info.joined_node = None;
        }
    }

    /// A plain `key = value` assignment. Joins the declaration into it when
    /// this is the variable's first use and the assignment is a statement.
    pub fn record_assignment(
        &mut self,
        from: ScopeId,
        key: &VariableKey,
        node: NodeId,
        is_statement: bool,
    ) -> VariableSlot {
        let slot = self.resolve(from, key);
        let escapes = self.record_escape(from, slot, true);
        let info = self.variable(slot);
        let fresh = !info.seen && info.declaration == DeclarationType::InList;
        let joinable = is_statement && !escapes && fresh;
        if !joinable {
            self.note_reference(from, slot);
            return slot;
        }
        let info = self.variable_mut(slot);
        info.declaration = DeclarationType::JoinedAssignment;
        info.joined_node = Some(node);
        info.first_use_scope = Some(from);
        info.seen = true;
        info.reference_count += 1;
        slot
    }

    /// `key` passed as an `out` argument.
    pub fn record_output_argument(
        &mut self,
        from: ScopeId,
        key: &VariableKey,
        declare_inline: bool,
    ) -> VariableSlot {
        let slot = self.resolve(from, key);
        let escapes = self.record_escape(from, slot, true);
        let info = self.variable(slot);
        let fresh = !info.seen && info.declaration == DeclarationType::InList;
        let inline = declare_inline && !escapes && fresh;
        if !inline {
            self.note_reference(from, slot);
            return slot;
        }
        let info = self.variable_mut(slot);
        info.declaration = DeclarationType::InlineOutput;
        info.first_use_scope = Some(from);
        // The declaring occurrence is not itself a use.
        info.seen = true;
        slot
    }

    /// All variables, with their slots.
    pub fn all_variables(&self) -> impl Iterator<Item = (VariableSlot, &VariableInfo)> + '_ {
        self.scopes.iter().enumerate().flat_map(|(scope, entry)| {
            entry.variables.iter().enumerate().map(move |(index, variable)| {
                (
                    VariableSlot {
                        scope: ScopeId(scope),
                        index,
                    },
                    variable,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> VariableKey {
        VariableKey {
            ty: TypeRef::int(),
            name: name.to_string(),
        }
    }

    fn block_with(tree: &mut ScopeTree, name: &str) -> ScopeId {
        let block = tree.push(ScopeId::ROOT, ScopeKind::Block);
        tree.declare(block, key(name), DeclarationType::InList);
        block
    }

    #[test]
    fn first_statement_assignment_joins() {
        let mut tree = ScopeTree::new();
        let block = block_with(&mut tree, "x");
        let slot = tree.record_assignment(block, &key("x"), 7, true);
        let info = tree.variable(slot);
        assert_eq!(info.declaration, DeclarationType::JoinedAssignment);
        assert_eq!(info.joined_assignment(), Some(7));
        assert!(info.is_used());
    }

    #[test]
    fn assignment_in_expression_position_does_not_join() {
        let mut tree = ScopeTree::new();
        let block = block_with(&mut tree, "x");
        let slot = tree.record_assignment(block, &key("x"), 7, false);
        assert_eq!(tree.variable(slot).declaration, DeclarationType::InList);
    }

    #[test]
    fn read_before_assignment_prevents_joining() {
        let mut tree = ScopeTree::new();
        let block = block_with(&mut tree, "x");
        tree.record_reference(block, &key("x"), false);
        let slot = tree.record_assignment(block, &key("x"), 7, true);
        assert_eq!(tree.variable(slot).declaration, DeclarationType::InList);
    }

    #[test]
    fn reference_outside_construct_demotes_to_list() {
        let mut tree = ScopeTree::new();
        let block = block_with(&mut tree, "x");
        let branch = tree.push(block, ScopeKind::Branch);
        let inner = tree.push(branch, ScopeKind::Block);
        tree.record_assignment(inner, &key("x"), 7, true);
        let nested = tree.push(inner, ScopeKind::Lambda);
        let slot = tree.record_reference(nested, &key("x"), false);
        assert_eq!(tree.variable(slot).declaration, DeclarationType::JoinedAssignment);

        let slot = tree.record_reference(block, &key("x"), false);
        assert_eq!(tree.variable(slot).declaration, DeclarationType::InList);
        assert_eq!(tree.variable(slot).joined_assignment(), None);
    }

    #[test]
    fn sibling_branch_reference_demotes_to_list() {
        let mut tree = ScopeTree::new();
        let block = block_with(&mut tree, "x");
        let left = tree.push(block, ScopeKind::Branch);
        let right = tree.push(block, ScopeKind::Branch);
        tree.record_assignment(left, &key("x"), 1, true);
        let slot = tree.record_reference(right, &key("x"), false);
        assert_eq!(tree.variable(slot).declaration, DeclarationType::InList);
    }

    #[test]
    fn inline_output_is_not_a_use_and_declares_once() {
        let mut tree = ScopeTree::new();
        let block = block_with(&mut tree, "x");
        let slot = tree.record_output_argument(block, &key("x"), true);
        let info = tree.variable(slot);
        assert_eq!(info.declaration, DeclarationType::InlineOutput);
        assert!(!info.is_used());
        assert!(info.should_declare_in_output_parameter_use());
        assert!(!info.should_declare_in_output_parameter_use());
    }

    #[test]
    fn output_argument_without_inline_setting_is_a_reference() {
        let mut tree = ScopeTree::new();
        let block = block_with(&mut tree, "x");
        let slot = tree.record_output_argument(block, &key("x"), false);
        assert_eq!(tree.variable(slot).declaration, DeclarationType::InList);
        assert!(tree.variable(slot).is_used());
    }

    #[test]
    fn free_variables_resolve_to_root() {
        let mut tree = ScopeTree::new();
        let block = tree.push(ScopeId::ROOT, ScopeKind::Block);
        let slot = tree.record_reference(block, &key("free"), false);
        assert_eq!(slot.scope, ScopeId::ROOT);
        assert_eq!(tree.variable(slot).declaration, DeclarationType::Undeclared);
    }

    #[test]
    fn variables_escape_extracted_scopes_in_first_reference_order() {
        let mut tree = ScopeTree::new();
        let block = tree.push(ScopeId::ROOT, ScopeKind::Block);
        tree.declare(block, key("a"), DeclarationType::InList);
        tree.declare(block, key("b"), DeclarationType::InList);
        let extracted = tree.push(block, ScopeKind::ExtractedMethod);
        let inner = tree.push(extracted, ScopeKind::Block);
        tree.record_reference(inner, &key("b"), false);
        tree.record_assignment(inner, &key("a"), 3, true);
        tree.record_reference(inner, &key("b"), true);

        let escaped = &tree.scope(extracted).escaped;
        assert_eq!(escaped.len(), 2);
        assert_eq!(escaped[0].key.name, "b");
        assert!(escaped[0].is_assigned);
        assert_eq!(escaped[1].key.name, "a");
        assert!(escaped[1].is_assigned);
        let a = tree.resolve(inner, &key("a"));
        assert_eq!(tree.variable(a).declaration, DeclarationType::InList);
    }
}
