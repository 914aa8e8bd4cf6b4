/*
 * Path-Conditioned Trace Builder
 *
 * Walks each function definition depth-first and records, in traversal
 * order, the effects the downstream checker cares about:
 * - local declarations (string literals become sized buffers)
 * - whole-variable copies `a = b`
 * - literal-index array accesses `buf[3]`
 * - direct calls with literal-integer arguments resolved
 *
 * Every action is tagged with the path condition in effect. The condition
 * is threaded explicitly through the recursion: entering the then-branch of
 * an `if` conjoins the guard, the else-branch conjoins its negation, and an
 * arm whose guard is provably false is not walked at all.
 *
 * Example:
 *   void f(int n) {
 *       char *s = "hi";          VarDeclared s = buffer(size: 2)   if (true)
 *       if (n > 2)
 *           s[3];                ArrayIndexAccess s[int(3)]        if (n > int(2))
 *       else
 *           g(1, n);             FunctionCall g(int(1), unknown)   if (n <= int(2))
 *   }
 */

use crate::config::{GuardFailurePolicy, TraceConfig};
use crate::features::symbolic_trace::domain::{
    ActionKind, BlockRegistry, CodeBlock, Condition, ProcessedAction, TraceResult,
    VariableIdentifier, VariableState,
};
use crate::shared::models::{
    BinaryOperator, Callee, Expr, ExprKind, FunctionDecl, SourceLocation, Stmt,
    TranslationUnit, VarDecl,
};

use super::shape_probe::{argument_state, VariableRefProbe};

pub struct TraceBuilder {
    config: TraceConfig,
}

impl Default for TraceBuilder {
    fn default() -> Self {
        Self::new(TraceConfig::default())
    }
}

impl TraceBuilder {
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Trace every function definition of `unit` into `registry`.
    ///
    /// Returns the number of blocks added. Prototypes are skipped.
    pub fn build_unit(
        &self,
        unit: &TranslationUnit,
        registry: &mut BlockRegistry,
    ) -> TraceResult<usize> {
        let mut added = 0;
        for function in &unit.functions {
            if !function.is_definition() {
                tracing::trace!(function = %function.qualified_name, "skipping prototype");
                continue;
            }
            self.build_function(function, registry)?;
            added += 1;
        }
        tracing::debug!(file = %unit.file_path, blocks = added, "translation unit traced");
        Ok(added)
    }

    /// Trace one function and move its block into `registry`
    pub fn build_function(
        &self,
        function: &FunctionDecl,
        registry: &mut BlockRegistry,
    ) -> TraceResult<()> {
        let block = self.trace_function(function);

        if self.config.log_completed_blocks {
            tracing::debug!("completed block: {}", block.dump());
        }

        registry.add_block(block)
    }

    pub fn trace_function(&self, function: &FunctionDecl) -> CodeBlock {
        let mut block = CodeBlock::new(function.qualified_name.as_str(), function.location.clone());

        for parameter in &function.parameters {
            block.add_function_parameter(VariableIdentifier::new(parameter.name.as_str()));
        }

        if let Some(body) = &function.body {
            self.visit_stmt(body, &Condition::always(), &mut block);
        }
        block
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════════

    fn visit_stmt(&self, stmt: &Stmt, condition: &Condition, block: &mut CodeBlock) {
        match stmt {
            Stmt::Compound(stmts) | Stmt::Other(stmts) => {
                for stmt in stmts {
                    self.visit_stmt(stmt, condition, block);
                }
            }
            Stmt::Decl(decls) => {
                for decl in decls {
                    self.visit_decl(decl, condition, block);
                }
            }
            Stmt::Expr(expr) => self.visit_expr(expr, condition, block),
            Stmt::If {
                condition: guard,
                then_branch,
                else_branch,
                location,
            } => self.visit_if(
                guard,
                then_branch,
                else_branch.as_deref(),
                location,
                condition,
                block,
            ),
            // Loop guards are not modeled: bodies run under the enclosing condition
            Stmt::While {
                condition: guard,
                body,
            } => {
                self.visit_expr(guard, condition, block);
                self.visit_stmt(body, condition, block);
            }
            Stmt::DoWhile {
                body,
                condition: guard,
            } => {
                self.visit_stmt(body, condition, block);
                self.visit_expr(guard, condition, block);
            }
            Stmt::For {
                init,
                condition: guard,
                increment,
                body,
            } => {
                if let Some(init) = init {
                    self.visit_stmt(init, condition, block);
                }
                if let Some(guard) = guard {
                    self.visit_expr(guard, condition, block);
                }
                if let Some(increment) = increment {
                    self.visit_expr(increment, condition, block);
                }
                self.visit_stmt(body, condition, block);
            }
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.visit_expr(value, condition, block);
                }
            }
        }
    }

    fn visit_if(
        &self,
        guard: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
        location: &SourceLocation,
        outer: &Condition,
        block: &mut CodeBlock,
    ) {
        let (condition, negated) = match Condition::from_guard(guard) {
            Ok(condition) => {
                let negated = condition.negate();
                (condition, negated)
            }
            Err(e) => {
                tracing::warn!(location = %location, "Failed to parse condition: {}", e);
                match self.config.guard_failure_policy {
                    GuardFailurePolicy::SkipStatement => return,
                    GuardFailurePolicy::TraverseUnconstrained => {
                        let opaque = Condition::opaque();
                        let negated = opaque.negate();
                        (opaque, negated)
                    }
                }
            }
        };

        tracing::debug!(
            condition = %condition,
            combined = %outer.and(&condition),
            negated = %negated,
            "conditional"
        );

        if negated.is_always_true() {
            tracing::trace!(location = %location, "then-branch is dead");
        } else {
            self.visit_stmt(then_branch, &outer.and(&condition), block);
        }

        if condition.is_always_true() {
            tracing::trace!(location = %location, "else-branch is dead");
        } else if let Some(else_branch) = else_branch {
            self.visit_stmt(else_branch, &outer.and(&negated), block);
        }
    }

    fn visit_decl(&self, decl: &VarDecl, condition: &Condition, block: &mut CodeBlock) {
        let state = match decl.init.as_ref().map(Expr::ignore_parens_and_casts) {
            Some(Expr {
                kind: ExprKind::Literal(literal),
                ..
            }) => literal
                .string_byte_length(self.config.count_string_terminator)
                .map(VariableState::buffer)
                .unwrap_or(VariableState::Unknown),
            _ => VariableState::Unknown,
        };

        tracing::debug!(
            variable = %decl.name,
            declared_type = %decl.declared_type,
            state = %state,
            "local var"
        );

        block.add_processed_action(ProcessedAction::new(
            condition.clone(),
            decl.location.clone(),
            ActionKind::VarDeclared {
                variable: VariableIdentifier::new(decl.name.as_str()),
                state,
            },
        ));

        if let Some(init) = &decl.init {
            self.visit_expr(init, condition, block);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════════

    fn visit_expr(&self, expr: &Expr, condition: &Condition, block: &mut CodeBlock) {
        match &expr.kind {
            ExprKind::Binary { op, lhs, rhs } => {
                if *op == BinaryOperator::Assign {
                    self.record_assignment(expr, lhs, rhs, condition, block);
                } else if op.is_compound_assignment() {
                    tracing::trace!(location = %expr.location, op = ?op, "compound assignment not tracked");
                }
                self.visit_expr(lhs, condition, block);
                self.visit_expr(rhs, condition, block);
            }
            ExprKind::Subscript { base, index } => {
                self.record_array_access(expr, base, index, condition, block);
                self.visit_expr(base, condition, block);
                self.visit_expr(index, condition, block);
            }
            // Arguments are probed, not walked
            ExprKind::Call {
                callee: Callee::Direct(function),
                args,
            } => self.record_call(expr, function, args, condition, block),
            ExprKind::Call {
                callee: Callee::Indirect(_),
                ..
            } => {
                tracing::trace!(location = %expr.location, "indirect call ignored");
            }
            ExprKind::Unary { operand, .. } => self.visit_expr(operand, condition, block),
            ExprKind::Paren(inner) | ExprKind::Cast { operand: inner, .. } => {
                self.visit_expr(inner, condition, block)
            }
            ExprKind::Unsupported(children) => {
                for child in children {
                    self.visit_expr(child, condition, block);
                }
            }
            ExprKind::VarRef(_) | ExprKind::Literal(_) => {}
        }
    }

    fn record_assignment(
        &self,
        expr: &Expr,
        lhs: &Expr,
        rhs: &Expr,
        condition: &Condition,
        block: &mut CodeBlock,
    ) {
        let (Some(target), Some(source)) = (
            VariableRefProbe::whole_variable(lhs),
            VariableRefProbe::whole_variable(rhs),
        ) else {
            return;
        };

        tracing::debug!(variable = %target, source = %source, "Assignment found");

        block.add_processed_action(ProcessedAction::new(
            condition.clone(),
            expr.location.clone(),
            ActionKind::VarAssigned {
                variable: target,
                state: VariableState::copy_of(source),
            },
        ));
    }

    fn record_array_access(
        &self,
        expr: &Expr,
        base: &Expr,
        index: &Expr,
        condition: &Condition,
        block: &mut CodeBlock,
    ) {
        let Some(array) = VariableRefProbe::whole_variable(base) else {
            return;
        };
        let Some(index) = index.as_integer_literal() else {
            tracing::trace!(array = %array, "unknown array subscript index");
            return;
        };

        tracing::debug!(array = %array, index, "found array access");

        block.add_processed_action(ProcessedAction::new(
            condition.clone(),
            expr.location.clone(),
            ActionKind::ArrayIndexAccess {
                array,
                index: VariableState::integer(index),
            },
        ));
    }

    fn record_call(
        &self,
        expr: &Expr,
        function: &str,
        args: &[Expr],
        condition: &Condition,
        block: &mut CodeBlock,
    ) {
        let arguments: Vec<VariableState> = args.iter().map(argument_state).collect();

        tracing::trace!(function, args = arguments.len(), "func call");

        block.add_processed_action(ProcessedAction::new(
            condition.clone(),
            expr.location.clone(),
            ActionKind::FunctionCall {
                function: function.to_string(),
                arguments,
            },
        ));
    }
}
