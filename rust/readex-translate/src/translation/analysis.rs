//! First pass: scope analysis, required namespaces and extracted blocks.
//!
//! The translation pass consults the result to decide how variables are
//! declared, which labels are rendered and which blocks become methods.
//! The shape predicates at the bottom of this module are shared by both
//! passes so they always agree on how a node is laid out.

use crate::translation::namespaces::NamespaceSet;
use crate::translation::scope::{
    node_id, DeclarationType, EscapedVariable, NodeId, ScopeId, ScopeKind, ScopeTree, VariableInfo,
    VariableKey, VariableSlot,
};
use crate::translation::settings::TranslationSettings;
use readex_core::expr::{
    BinaryExpr, BinaryOp, BlockExpr, CallExpr, ConditionalExpr, ConstantValue, ElementInit,
    GotoKind, LabelTarget, LambdaExpr, MemberBinding, NewArrayExpr, ParameterExpr, SwitchExpr,
    TryExpr, UnaryOp,
};
use readex_core::members::{MethodInfo, ParameterInfo, ParameterMode};
use readex_core::{Expr, ExprRef, TypeRef};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Rendering a standalone expression.
    Expression,
    /// Rendering method bodies; multi-statement blocks in expression
    /// position are extracted into their own methods.
    SourceCode,
}

/// A block in expression position that becomes a private method.
#[derive(Debug, Clone)]
pub struct ExtractedBlock {
    pub node: NodeId,
    pub block: ExprRef,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct ExpressionAnalysis {
    mode: AnalysisMode,
    scopes: ScopeTree,
    block_scopes: HashMap<NodeId, ScopeId>,
    lambda_scopes: HashMap<NodeId, ScopeId>,
    catch_scopes: HashMap<NodeId, ScopeId>,
    variable_uses: HashMap<NodeId, VariableSlot>,
    explicit_joins: HashSet<VariableSlot>,
    namespaces: Vec<String>,
    extracted: Vec<ExtractedBlock>,
    goto_labels: HashSet<LabelTarget>,
}

impl ExpressionAnalysis {
    fn empty(mode: AnalysisMode) -> Self {
        Self {
            mode,
            scopes: ScopeTree::new(),
            block_scopes: HashMap::new(),
            lambda_scopes: HashMap::new(),
            catch_scopes: HashMap::new(),
            variable_uses: HashMap::new(),
            explicit_joins: HashSet::new(),
            namespaces: Vec::new(),
            extracted: Vec::new(),
            goto_labels: HashSet::new(),
        }
    }

    /// Analyses a standalone expression.
    pub fn of_expression(expr: &ExprRef, settings: &TranslationSettings) -> Self {
        let mut analyser = Analyser::new(settings, AnalysisMode::Expression);
        analyser.visit_root(expr);
        analyser.finish()
    }

    /// Analyses a method body in source-code mode.
    pub fn of_method_body(
        body: &ExprRef,
        returns_value: bool,
        settings: &TranslationSettings,
    ) -> Self {
        let mut analyser = Analyser::new(settings, AnalysisMode::SourceCode);
        analyser.visit_body(body, returns_value);
        analyser.finish()
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Required namespaces, in `using` order.
    pub fn required_namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Extracted blocks in discovery order, outermost first.
    pub fn extracted_blocks(&self) -> &[ExtractedBlock] {
        &self.extracted
    }

    pub fn is_extracted(&self, node: NodeId) -> bool {
        self.extracted.iter().any(|block| block.node == node)
    }

    /// Variables an extracted block uses from outside, in first-use order.
    pub fn escaped_variables(&self, block: &ExtractedBlock) -> &[EscapedVariable] {
        &self.scopes.scope(block.scope).escaped
    }

    /// The variable written by an assignment or passed to an `out` argument.
    pub fn variable_at(&self, node: NodeId) -> Option<&VariableInfo> {
        self.variable_uses.get(&node).map(|slot| self.scopes.variable(*slot))
    }

    /// Whether a joined declaration must spell out its type.
    pub fn is_explicit_join(&self, node: NodeId) -> bool {
        self.variable_uses
            .get(&node)
            .is_some_and(|slot| self.explicit_joins.contains(slot))
    }

    /// Used variables declared at the top of `block`, in declaration order.
    pub fn block_declarations(&self, block: NodeId) -> Vec<&VariableInfo> {
        match self.block_scopes.get(&block) {
            Some(scope) => self
                .scopes
                .scope(*scope)
                .variables
                .iter()
                .filter(|v| v.declaration == DeclarationType::InList && v.is_used())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_parameter_used(&self, lambda: NodeId, parameter: &ParameterExpr) -> bool {
        self.is_used_in(self.lambda_scopes.get(&lambda), parameter)
    }

    /// Whether a catch block reads its exception variable.
    pub fn is_catch_variable_used(&self, handler_body: NodeId, variable: &ParameterExpr) -> bool {
        self.is_used_in(self.catch_scopes.get(&handler_body), variable)
    }

    fn is_used_in(&self, scope: Option<&ScopeId>, parameter: &ParameterExpr) -> bool {
        let key = VariableKey::from(parameter);
        match scope {
            Some(scope) => self
                .scopes
                .scope(*scope)
                .variables
                .iter()
                .any(|v| v.key == key && v.is_used()),
            None => true,
        }
    }

    /// Whether some `goto` targets `label`; other labels are not rendered.
    pub fn is_goto_target(&self, label: &LabelTarget) -> bool {
        self.goto_labels.contains(label)
    }
}

// ── Visitor ─────────────────────────────────────────────────────────

/// How a block's expressions are visited.
#[derive(Debug, Clone, Copy)]
enum BlockRole {
    Statements { returns_value: bool },
    Value,
}

struct Analyser<'s> {
    settings: &'s TranslationSettings,
    analysis: ExpressionAnalysis,
    namespaces: NamespaceSet,
    current: ScopeId,
}

impl<'s> Analyser<'s> {
    fn new(settings: &'s TranslationSettings, mode: AnalysisMode) -> Self {
        Self {
            settings,
            analysis: ExpressionAnalysis::empty(mode),
            namespaces: NamespaceSet::new(),
            current: ScopeId::ROOT,
        }
    }

    fn finish(mut self) -> ExpressionAnalysis {
        let mut declared_types = Vec::new();
        for (slot, variable) in self.analysis.scopes.all_variables() {
            let needs_type = match variable.declaration {
                DeclarationType::InList => variable.is_used(),
                DeclarationType::JoinedAssignment => {
                    self.settings.use_explicit_type_names
                        || self.analysis.explicit_joins.contains(&slot)
                }
                DeclarationType::InlineOutput => self.settings.use_explicit_type_names,
                DeclarationType::Undeclared => false,
            };
            if needs_type {
                declared_types.push(variable.key.ty.clone());
            }
        }
        for ty in &declared_types {
            self.add_type(ty);
        }
        self.analysis.namespaces = self.namespaces.sorted();
        debug!(
            scopes = self.analysis.scopes.scope_count(),
            namespaces = self.analysis.namespaces.len(),
            extracted = self.analysis.extracted.len(),
            "expression analysed"
        );
        self.analysis
    }

    fn add_type(&mut self, ty: &TypeRef) {
        if !self.settings.fully_qualify_type_names {
            self.namespaces.add_type(ty);
        }
    }

    fn enter(&mut self, kind: ScopeKind) -> ScopeId {
        let scope = self.analysis.scopes.push(self.current, kind);
        self.current = scope;
        scope
    }

    fn leave(&mut self, scope: ScopeId) {
        self.current = self.analysis.scopes.scope(scope).parent.unwrap_or(ScopeId::ROOT);
    }

    fn in_scope(&mut self, kind: ScopeKind, visit: impl FnOnce(&mut Self)) -> ScopeId {
        let scope = self.enter(kind);
        visit(self);
        self.leave(scope);
        scope
    }

    // ── Positions ───────────────────────────────────────────────────

    fn visit_root(&mut self, expr: &ExprRef) {
        if renders_as_statements(expr) {
            self.visit_statement(expr);
        } else {
            self.visit(expr);
        }
    }

    fn visit_body(&mut self, expr: &ExprRef, returns_value: bool) {
        if returns_value {
            self.visit_returning(expr);
        } else {
            self.visit_statement(expr);
        }
    }

    fn visit_statement(&mut self, expr: &ExprRef) {
        match &**expr {
            Expr::Block(block) => {
                self.visit_block(expr, block, BlockRole::Statements { returns_value: false })
            }
            Expr::Binary(binary) if binary.op.is_assignment() => {
                self.visit_assignment(expr, binary, true)
            }
            Expr::Conditional(conditional) => self.visit_if(conditional, false),
            _ => self.visit(expr),
        }
    }

    fn visit_returning(&mut self, expr: &ExprRef) {
        match &**expr {
            Expr::Block(block) => {
                self.visit_block(expr, block, BlockRole::Statements { returns_value: true })
            }
            Expr::Conditional(conditional) if !is_ternary_shape(conditional) => {
                self.visit_if(conditional, !conditional.ty.is_void())
            }
            Expr::Switch(switch) => self.visit_switch(switch, !switch.ty.is_void()),
            Expr::Try(try_expr) => self.visit_try(try_expr, !try_expr.ty.is_void()),
            _ => self.visit(expr),
        }
    }

    fn visit(&mut self, expr: &ExprRef) {
        match &**expr {
            Expr::Constant(constant) => match &constant.value {
                ConstantValue::Type(ty) => self.add_type(ty),
                ConstantValue::EnumMember(_) => self.add_type(&constant.ty),
                ConstantValue::Closure(fields) if self.settings.show_captured_values => {
                    for field in fields {
                        if let ConstantValue::EnumMember(_) = field.value {
                            self.add_type(&field.ty);
                        }
                    }
                }
                _ => {}
            },
            Expr::Parameter(p) => {
                self.analysis
                    .scopes
                    .record_reference(self.current, &VariableKey::from(p), false);
            }
            Expr::Binary(binary) if binary.op.is_assignment() => {
                self.visit_assignment(expr, binary, false)
            }
            Expr::Binary(binary) => {
                if binary.op == BinaryOp::Power {
                    self.add_type(&TypeRef::math());
                }
                if let Some(method) = binary.method.as_ref().filter(|m| !m.is_operator()) {
                    self.add_type(&method.declaring_type);
                }
                self.visit(&binary.left);
                self.visit(&binary.right);
            }
            Expr::Unary(unary) => {
                match unary.op {
                    UnaryOp::Convert | UnaryOp::ConvertChecked | UnaryOp::Unbox
                        if unary.operand.as_ref().is_some_and(|o| o.ty() != unary.ty) =>
                    {
                        self.add_type(&unary.ty)
                    }
                    UnaryOp::TypeAs => self.add_type(&unary.ty),
                    _ => {}
                }
                if let Some(method) = unary.method.as_ref().filter(|m| !m.is_operator()) {
                    self.add_type(&method.declaring_type);
                }
                if let Some(operand) = &unary.operand {
                    match operand.as_parameter() {
                        Some(p) if unary.op.is_assignment() => {
                            self.analysis
                                .scopes
                                .record_reference(self.current, &VariableKey::from(p), true);
                        }
                        _ => self.visit(operand),
                    }
                }
            }
            Expr::Conditional(conditional) => {
                self.visit(&conditional.test);
                self.visit(&conditional.if_true);
                self.visit(&conditional.if_false);
            }
            Expr::Block(block) => {
                if self.analysis.mode == AnalysisMode::SourceCode && !is_transparent_block(block) {
                    self.extract(expr, block);
                } else {
                    self.visit_block(expr, block, BlockRole::Value);
                }
            }
            Expr::Lambda(lambda) => self.visit_lambda(expr, lambda),
            Expr::Call(call) => self.visit_call(call),
            Expr::Invoke(invoke) => {
                self.visit(&invoke.target);
                for arg in &invoke.arguments {
                    self.visit(arg);
                }
            }
            Expr::Member(member) => {
                if member.member.is_static {
                    self.add_type(&member.member.declaring_type);
                }
                if let Some(instance) = &member.instance {
                    if !is_closure_constant(instance) {
                        self.visit(instance);
                    }
                }
            }
            Expr::New(new) => {
                if !new.ty.is_anonymous() {
                    self.add_type(&new.ty);
                }
                let parameters = new.constructor.as_ref().map(|c| c.parameters.as_slice());
                self.visit_arguments(&new.arguments, parameters.unwrap_or(&[]));
            }
            Expr::NewArray(array) => {
                if array.bounds || !is_implicitly_typed_array(array, self.settings) {
                    self.add_type(&array.element_type);
                }
                for element in &array.expressions {
                    self.visit(element);
                }
            }
            Expr::MemberInit(init) => {
                self.add_type(&init.new.ty);
                for arg in &init.new.arguments {
                    self.visit(arg);
                }
                self.visit_bindings(&init.bindings);
            }
            Expr::ListInit(init) => {
                self.add_type(&init.new.ty);
                for arg in &init.new.arguments {
                    self.visit(arg);
                }
                self.visit_element_inits(&init.initializers);
            }
            Expr::Loop(looped) => {
                self.in_scope(ScopeKind::LoopBody, |a| a.visit_statement(&looped.body));
            }
            Expr::Goto(goto) => {
                if goto.kind == GotoKind::Goto {
                    self.analysis.goto_labels.insert(goto.target.clone());
                }
                if let Some(value) = &goto.value {
                    self.visit(value);
                }
            }
            Expr::Label(label) => {
                if let Some(value) = &label.default_value {
                    self.visit(value);
                }
            }
            Expr::Switch(switch) => self.visit_switch(switch, false),
            Expr::Try(try_expr) => self.visit_try(try_expr, false),
            Expr::Default(default) => {
                if !default.ty.is_void() {
                    self.add_type(&default.ty);
                }
            }
            Expr::Index(index) => {
                self.visit(&index.object);
                for arg in &index.arguments {
                    self.visit(arg);
                }
            }
            Expr::TypeBinary(type_binary) => {
                self.add_type(&type_binary.type_operand);
                self.visit(&type_binary.expression);
            }
            Expr::Comment(_) => {}
            Expr::Extension(extension) => {
                for operand in &extension.operands {
                    self.visit(operand);
                }
            }
        }
    }

    // ── Constructs ──────────────────────────────────────────────────

    fn visit_block(&mut self, expr: &ExprRef, block: &BlockExpr, role: BlockRole) {
        let scope = self.enter(ScopeKind::Block);
        self.analysis.block_scopes.insert(node_id(expr), scope);
        for variable in &block.variables {
            self.analysis
                .scopes
                .declare(scope, VariableKey::from(variable), DeclarationType::InList);
        }
        let last = block.expressions.len().saturating_sub(1);
        for (index, statement) in block.expressions.iter().enumerate() {
            match role {
                BlockRole::Statements { returns_value }
                    if returns_value && index == last && !block.ty.is_void() =>
                {
                    self.visit_returning(statement)
                }
                BlockRole::Value if index == last => self.visit(statement),
                _ => self.visit_statement(statement),
            }
        }
        self.leave(scope);
    }

    fn extract(&mut self, expr: &ExprRef, block: &BlockExpr) {
        let scope = self.enter(ScopeKind::ExtractedMethod);
        trace!(statements = block.expressions.len(), "extracting block");
        self.analysis.extracted.push(ExtractedBlock {
            node: node_id(expr),
            block: expr.clone(),
            scope,
        });
        self.visit_block(
            expr,
            block,
            BlockRole::Statements {
                returns_value: !block.ty.is_void(),
            },
        );
        self.leave(scope);
    }

    fn visit_assignment(&mut self, expr: &ExprRef, binary: &BinaryExpr, is_statement: bool) {
        self.visit(&binary.right);
        if binary.op == BinaryOp::PowerAssign {
            self.add_type(&TypeRef::math());
        }
        match binary.left.as_parameter() {
            Some(p) if binary.op == BinaryOp::Assign => {
                let key = VariableKey::from(p);
                let slot = self
                    .analysis
                    .scopes
                    .record_assignment(self.current, &key, node_id(expr), is_statement);
                self.analysis.variable_uses.insert(node_id(expr), slot);
                if self.analysis.scopes.variable(slot).joined_assignment() == Some(node_id(expr))
                    && declares_explicitly(&p.ty, &binary.right, self.settings)
                {
                    self.analysis.explicit_joins.insert(slot);
                }
            }
            Some(p) => {
                self.analysis
                    .scopes
                    .record_reference(self.current, &VariableKey::from(p), true);
            }
            None => self.visit(&binary.left),
        }
    }

    fn visit_if(&mut self, conditional: &ConditionalExpr, returns_value: bool) {
        self.visit(&conditional.test);
        self.in_scope(ScopeKind::Branch, |a| a.visit_body(&conditional.if_true, returns_value));
        if !conditional.if_false.is_empty() {
            self.in_scope(ScopeKind::Branch, |a| {
                a.visit_body(&conditional.if_false, returns_value)
            });
        }
    }

    fn visit_switch(&mut self, switch: &SwitchExpr, returns_value: bool) {
        self.visit(&switch.value);
        for case in &switch.cases {
            for test in &case.test_values {
                self.visit(test);
            }
            self.in_scope(ScopeKind::SwitchCase, |a| a.visit_body(&case.body, returns_value));
        }
        if let Some(default) = &switch.default_body {
            self.in_scope(ScopeKind::SwitchCase, |a| a.visit_body(default, returns_value));
        }
    }

    fn visit_try(&mut self, try_expr: &TryExpr, returns_value: bool) {
        self.in_scope(ScopeKind::TryBody, |a| a.visit_body(&try_expr.body, returns_value));
        for handler in &try_expr.handlers {
            let scope = self.enter(ScopeKind::CatchBody);
            self.analysis.catch_scopes.insert(node_id(&handler.body), scope);
            if !handler.test.is_object() {
                self.add_type(&handler.test);
            }
            if let Some(variable) = &handler.variable {
                self.analysis
                    .scopes
                    .declare(scope, VariableKey::from(variable), DeclarationType::Undeclared);
            }
            if let Some(filter) = &handler.filter {
                self.visit(filter);
            }
            self.visit_body(&handler.body, returns_value);
            self.leave(scope);
        }
        if let Some(finally) = &try_expr.finally {
            self.in_scope(ScopeKind::FinallyBody, |a| a.visit_statement(finally));
        }
        if let Some(fault) = &try_expr.fault {
            self.in_scope(ScopeKind::CatchBody, |a| a.visit_statement(fault));
        }
    }

    fn visit_lambda(&mut self, expr: &ExprRef, lambda: &LambdaExpr) {
        let scope = self.enter(ScopeKind::Lambda);
        self.analysis.lambda_scopes.insert(node_id(expr), scope);
        let typed = shows_lambda_parameter_types(lambda, self.settings);
        for parameter in &lambda.parameters {
            self.analysis
                .scopes
                .declare(scope, VariableKey::from(parameter), DeclarationType::Undeclared);
            if typed {
                self.add_type(&parameter.ty);
            }
        }
        if renders_as_statements(&lambda.body) {
            self.visit_body(&lambda.body, !lambda.return_type.is_void());
        } else {
            self.visit(&lambda.body);
        }
        self.leave(scope);
    }

    fn visit_call(&mut self, call: &CallExpr) {
        let method = &call.method;
        if is_string_concat(method) && !self.settings.show_string_concat_calls {
            for arg in &call.arguments {
                self.visit(arg);
            }
            return;
        }
        if method.is_static && !method.is_operator() {
            self.add_type(&method.declaring_type);
        }
        if explicit_generic_arguments_required(method, self.settings) {
            for arg in &method.generic_args {
                self.add_type(arg);
            }
        }
        if let Some(instance) = &call.instance {
            self.visit(instance);
        }
        self.visit_arguments(&call.arguments, &method.parameters);
    }

    fn visit_arguments(&mut self, arguments: &[ExprRef], parameters: &[ParameterInfo]) {
        for (index, arg) in arguments.iter().enumerate() {
            let mode = parameters.get(index).map(|p| p.mode).unwrap_or_default();
            match (mode, arg.as_parameter()) {
                (ParameterMode::Out, Some(p)) => {
                    let slot = self.analysis.scopes.record_output_argument(
                        self.current,
                        &VariableKey::from(p),
                        self.settings.declare_output_parameters_inline,
                    );
                    self.analysis.variable_uses.insert(node_id(arg), slot);
                }
                (ParameterMode::Ref, Some(p)) => {
                    self.analysis
                        .scopes
                        .record_reference(self.current, &VariableKey::from(p), true);
                }
                _ => self.visit(arg),
            }
        }
    }

    fn visit_bindings(&mut self, bindings: &[MemberBinding]) {
        for binding in bindings {
            match binding {
                MemberBinding::Assignment { expression, .. } => self.visit(expression),
                MemberBinding::Member { bindings, .. } => self.visit_bindings(bindings),
                MemberBinding::List { initializers, .. } => self.visit_element_inits(initializers),
            }
        }
    }

    fn visit_element_inits(&mut self, initializers: &[ElementInit]) {
        for init in initializers {
            for arg in &init.arguments {
                self.visit(arg);
            }
        }
    }
}

// ── Rendering shapes ────────────────────────────────────────────────

/// A block rendered as its single expression: one expression, no variables.
pub fn is_transparent_block(block: &BlockExpr) -> bool {
    block.variables.is_empty() && block.expressions.len() == 1
}

/// A value-producing conditional whose branches fit in `a ? b : c`.
pub fn is_ternary_shape(conditional: &ConditionalExpr) -> bool {
    !conditional.ty.is_void()
        && !renders_as_statements(&conditional.if_true)
        && !renders_as_statements(&conditional.if_false)
}

/// Nodes that can only be written as statements.
pub fn renders_as_statements(expr: &Expr) -> bool {
    match expr {
        Expr::Block(block) => match block.expressions.first() {
            Some(only) if is_transparent_block(block) => renders_as_statements(only),
            _ => true,
        },
        Expr::Conditional(conditional) => !is_ternary_shape(conditional),
        Expr::Loop(_)
        | Expr::Switch(_)
        | Expr::Try(_)
        | Expr::Goto(_)
        | Expr::Label(_)
        | Expr::Comment(_) => true,
        _ => false,
    }
}

/// `new[] { ... }`: the elements share exactly one type, whatever the
/// declared element type.
pub fn is_implicitly_typed_array(array: &NewArrayExpr, settings: &TranslationSettings) -> bool {
    if array.bounds || settings.show_implicit_array_types {
        return false;
    }
    let mut types = array.expressions.iter().map(|e| e.ty());
    match types.next() {
        Some(first) => types.all(|ty| ty == first),
        None => false,
    }
}

/// Generic arguments are written when one cannot be inferred from the
/// parameters, or always when configured.
pub fn explicit_generic_arguments_required(
    method: &MethodInfo,
    settings: &TranslationSettings,
) -> bool {
    if !method.is_generic() || method.generic_args.is_empty() {
        return false;
    }
    settings.use_explicit_generic_parameters
        || method
            .generic_parameters
            .iter()
            .any(|param| !method.parameters.iter().any(|p| p.ty.mentions(param)))
}

/// Whether a joined declaration of a `ty` variable assigned `value` needs its
/// type written instead of `var`.
pub fn declares_explicitly(ty: &TypeRef, value: &Expr, settings: &TranslationSettings) -> bool {
    if ty.is_anonymous() {
        return false;
    }
    settings.use_explicit_type_names
        || matches!(value, Expr::Lambda(_))
        || matches!(value, Expr::Constant(c) if c.value == ConstantValue::Null)
        || matches!(value, Expr::Unary(u) if u.op == UnaryOp::Quote)
}

pub fn shows_lambda_parameter_types(lambda: &LambdaExpr, settings: &TranslationSettings) -> bool {
    !lambda.parameters.is_empty()
        && (settings.show_lambda_parameter_types || lambda.parameters.iter().any(|p| p.is_by_ref))
}

pub fn is_string_concat(method: &MethodInfo) -> bool {
    method.is_static && method.name == "Concat" && method.declaring_type.is_string()
}

pub fn is_closure_constant(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(c) if matches!(c.value, ConstantValue::Closure(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use readex_core::build::*;

    fn analyse(expr: &ExprRef) -> ExpressionAnalysis {
        ExpressionAnalysis::of_expression(expr, &TranslationSettings::default())
    }

    #[test]
    fn joined_assignment_is_recorded_for_its_node() {
        let x = parameter(TypeRef::int(), "x");
        let assignment = assign(x.expr(), int(1));
        let tree = block(vec![x.clone()], vec![assignment.clone(), x.expr()]);
        let analysis = analyse(&tree);
        let info = analysis.variable_at(node_id(&assignment)).unwrap();
        assert_eq!(info.declaration, DeclarationType::JoinedAssignment);
        assert!(analysis.block_declarations(node_id(&tree)).is_empty());
    }

    #[test]
    fn self_referencing_assignment_is_declared_in_list() {
        let x = parameter(TypeRef::int(), "x");
        let tree = block(vec![x.clone()], vec![assign(x.expr(), add(x.expr(), int(1)))]);
        let analysis = analyse(&tree);
        let declared = analysis.block_declarations(node_id(&tree));
        assert_eq!(declared.len(), 1);
        assert_eq!(declared[0].key.name, "x");
    }

    #[test]
    fn unused_variables_are_not_declared() {
        let x = parameter(TypeRef::int(), "x");
        let console = TypeRef::class("System", "Console");
        let write_line = MethodInfo::new(console, "WriteLine", TypeRef::void()).static_method();
        let tree = block(vec![x], vec![call_static(write_line, vec![])]);
        assert!(analyse(&tree).block_declarations(node_id(&tree)).is_empty());
    }

    #[test]
    fn namespaces_come_from_rendered_types() {
        let file = TypeRef::class("System.IO", "File");
        let read = MethodInfo::new(file, "ReadAllText", TypeRef::string())
            .static_method()
            .with_parameters(vec![ParameterInfo::new("path", TypeRef::string())]);
        let tree = call_static(read, vec![string("a.txt")]);
        assert_eq!(analyse(&tree).required_namespaces(), &["System.IO".to_string()]);

        let settings = TranslationSettings::new().fully_qualified();
        let qualified = ExpressionAnalysis::of_expression(&tree, &settings);
        assert!(qualified.required_namespaces().is_empty());
    }

    #[test]
    fn only_goto_targets_are_labels() {
        let jumped = label_target(Some("skip"));
        let returned = label_target(Some("end"));
        let tree = block(
            vec![],
            vec![
                goto_(&jumped),
                label(&jumped, None),
                return_(&returned, None),
                label(&returned, None),
            ],
        );
        let analysis = analyse(&tree);
        assert!(analysis.is_goto_target(&jumped));
        assert!(!analysis.is_goto_target(&returned));
    }

    #[test]
    fn source_mode_extracts_value_blocks() {
        let y = parameter(TypeRef::int(), "y");
        let inner = block(vec![y.clone()], vec![assign(y.expr(), int(2)), add(y.expr(), int(1))]);
        let x = parameter(TypeRef::int(), "x");
        let body = block(vec![x.clone()], vec![assign(x.expr(), inner.clone()), x.expr()]);
        let analysis =
            ExpressionAnalysis::of_method_body(&body, true, &TranslationSettings::default());
        assert_eq!(analysis.extracted_blocks().len(), 1);
        assert!(analysis.is_extracted(node_id(&inner)));
        assert!(analysis.escaped_variables(&analysis.extracted_blocks()[0]).is_empty());

        let plain = analyse(&body);
        assert!(plain.extracted_blocks().is_empty());
    }

    #[test]
    fn shapes() {
        let flag = parameter(TypeRef::bool(), "flag");
        let simple = ternary(flag.expr(), int(1), int(2));
        let Expr::Conditional(c) = &*simple else { unreachable!() };
        assert!(is_ternary_shape(c));
        assert!(!renders_as_statements(&simple));

        let statement = if_then(flag.expr(), int(1));
        assert!(renders_as_statements(&statement));
        assert!(!renders_as_statements(&block(vec![], vec![int(1)])));
    }
}
