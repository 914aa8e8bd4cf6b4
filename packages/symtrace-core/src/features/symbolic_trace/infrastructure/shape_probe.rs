//! Expression shape probes
//!
//! Conservative filters deciding which sub-expressions the trace builder can
//! name: a whole variable (assignment sides, subscript bases) or a literal
//! value (call arguments, subscript indices).

use crate::features::symbolic_trace::domain::{VariableIdentifier, VariableState};
use crate::shared::models::{Callee, Expr, ExprKind};

/// Walks one side of an assignment or the base of a subscript.
///
/// A variable reference becomes the candidate. A subscript anywhere in the
/// subtree breaks the "whole variable" assumption; any other operator makes
/// the side a compound expression; a second reference makes it ambiguous.
/// Parentheses and casts are transparent.
#[derive(Debug, Default)]
pub struct VariableRefProbe {
    candidate: Option<VariableIdentifier>,
    references: usize,
    whole_variable: bool,
    compound: bool,
}

impl VariableRefProbe {
    pub fn new() -> Self {
        Self {
            whole_variable: true,
            ..Default::default()
        }
    }

    /// The single bare variable `expr` denotes, if any
    pub fn whole_variable(expr: &Expr) -> Option<VariableIdentifier> {
        let mut probe = Self::new();
        probe.visit(expr);
        probe.finish()
    }

    pub fn visit(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::VarRef(name) => {
                tracing::trace!(variable = %name, "found var reference");
                self.references += 1;
                if self.whole_variable {
                    self.candidate = Some(VariableIdentifier::new(name.as_str()));
                }
            }
            ExprKind::Subscript { base, index } => {
                self.whole_variable = false;
                self.visit(base);
                self.visit(index);
            }
            ExprKind::Paren(inner) | ExprKind::Cast { operand: inner, .. } => self.visit(inner),
            ExprKind::Literal(_) => self.compound = true,
            ExprKind::Binary { lhs, rhs, .. } => {
                self.compound = true;
                self.visit(lhs);
                self.visit(rhs);
            }
            ExprKind::Unary { operand, .. } => {
                self.compound = true;
                self.visit(operand);
            }
            ExprKind::Call { callee, args } => {
                self.compound = true;
                if let Callee::Indirect(target) = callee {
                    self.visit(target);
                }
                for arg in args {
                    self.visit(arg);
                }
            }
            ExprKind::Unsupported(children) => {
                self.compound = true;
                for child in children {
                    self.visit(child);
                }
            }
        }
    }

    pub fn finish(self) -> Option<VariableIdentifier> {
        if self.whole_variable && !self.compound && self.references == 1 {
            self.candidate
        } else {
            None
        }
    }
}

/// State of a call argument: only a bare integer literal is known
pub fn argument_state(arg: &Expr) -> VariableState {
    match arg.as_integer_literal() {
        Some(value) => VariableState::integer(value),
        None => VariableState::Unknown,
    }
}
