/*
 * Path Condition Algebra
 *
 * Boolean predicates over branch guards:
 * - Built from guard expressions (`if (x < n && flag)`)
 * - Conjunction when entering nested branches
 * - Negation for else-branches (De Morgan over And/Or, exact per range)
 * - Conservative tautology test used to prune dead branches
 *
 * Example:
 *   if (len > 4)        then: len > int(4)
 *     if (!p)           then: len > int(4) && p == 0
 *   else                else: len <= int(4)
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use super::comparison::Comparison;
use super::errors::{TraceError, TraceResult};
use super::value_range::ValueRange;
use super::variable::{PrimitiveInfo, VariableIdentifier, VariableState, VariableValueProvider};
use crate::shared::models::{BinaryOperator, Expr, ExprKind, Literal, UnaryOperator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// Root path condition of a function body
    Always,
    Never,
    /// Guard that is a literal value, e.g. `if (1)`
    Literal {
        value: VariableState,
        negated: bool,
    },
    /// Constraint on one variable
    Range {
        variable: VariableIdentifier,
        range: ValueRange,
    },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    /// Placeholder for a guard that could not be modeled
    Opaque {
        negated: bool,
    },
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Always
    }
}

impl Condition {
    pub fn always() -> Self {
        Condition::Always
    }

    pub fn range(variable: VariableIdentifier, range: ValueRange) -> Self {
        Condition::Range { variable, range }
    }

    pub fn literal(value: VariableState) -> Self {
        Condition::Literal {
            value,
            negated: false,
        }
    }

    pub fn opaque() -> Self {
        Condition::Opaque { negated: false }
    }

    /// Model a guard expression.
    ///
    /// Fails with `TraceError::ConditionParse` for shapes outside the
    /// algebra (calls, arithmetic, subscripts, assignments...).
    pub fn from_guard(guard: &Expr) -> TraceResult<Self> {
        let guard = guard.ignore_parens_and_casts();
        match &guard.kind {
            ExprKind::VarRef(name) => Ok(Condition::range(
                VariableIdentifier::new(name.as_str()),
                ValueRange::NotZero,
            )),
            ExprKind::Literal(literal) => Ok(Condition::literal(literal_state(literal))),
            ExprKind::Unary {
                op: UnaryOperator::LogicalNot,
                operand,
            } => Ok(Condition::from_guard(operand)?.negate()),
            ExprKind::Binary {
                op: BinaryOperator::LogicalAnd,
                lhs,
                rhs,
            } => Ok(Condition::from_guard(lhs)?.and(&Condition::from_guard(rhs)?)),
            ExprKind::Binary {
                op: BinaryOperator::LogicalOr,
                lhs,
                rhs,
            } => Ok(Condition::from_guard(lhs)?.or(&Condition::from_guard(rhs)?)),
            ExprKind::Binary { op, lhs, rhs } => match Comparison::from_operator(*op) {
                Some(cmp) => comparison_condition(cmp, lhs, rhs),
                None => Err(unsupported(guard)),
            },
            _ => Err(unsupported(guard)),
        }
    }

    /// Conjunction; `Always` is the identity and nested conjunctions flatten
    pub fn and(&self, other: &Condition) -> Condition {
        match (self, other) {
            (Condition::Always, c) | (c, Condition::Always) => c.clone(),
            (Condition::Never, _) | (_, Condition::Never) => Condition::Never,
            _ => {
                let mut parts = Vec::new();
                for side in [self, other] {
                    match side {
                        Condition::All(inner) => parts.extend(inner.iter().cloned()),
                        c => parts.push(c.clone()),
                    }
                }
                Condition::All(parts)
            }
        }
    }

    /// Disjunction; `Never` is the identity and nested disjunctions flatten
    pub fn or(&self, other: &Condition) -> Condition {
        match (self, other) {
            (Condition::Never, c) | (c, Condition::Never) => c.clone(),
            (Condition::Always, _) | (_, Condition::Always) => Condition::Always,
            _ => {
                let mut parts = Vec::new();
                for side in [self, other] {
                    match side {
                        Condition::Any(inner) => parts.extend(inner.iter().cloned()),
                        c => parts.push(c.clone()),
                    }
                }
                Condition::Any(parts)
            }
        }
    }

    /// Logical complement; `negate(negate(c)) == c`
    pub fn negate(&self) -> Condition {
        match self {
            Condition::Always => Condition::Never,
            Condition::Never => Condition::Always,
            Condition::Literal { value, negated } => Condition::Literal {
                value: value.clone(),
                negated: !negated,
            },
            Condition::Range { variable, range } => Condition::Range {
                variable: variable.clone(),
                range: range.negate(),
            },
            Condition::All(parts) => Condition::Any(parts.iter().map(Self::negate).collect()),
            Condition::Any(parts) => Condition::All(parts.iter().map(Self::negate).collect()),
            Condition::Opaque { negated } => Condition::Opaque { negated: !negated },
        }
    }

    /// Structural tautology test.
    ///
    /// Only answers true when the predicate holds for every state; anything
    /// depending on variable values or on an unresolvable literal is false.
    pub fn is_always_true(&self) -> bool {
        match self {
            Condition::Always => true,
            Condition::Literal { value, negated } => match value.to_zero_or_non_zero() {
                Ok(truth) => truth != *negated,
                Err(_) => false,
            },
            Condition::All(parts) => parts.iter().all(Self::is_always_true),
            Condition::Any(parts) => parts.iter().any(Self::is_always_true),
            Condition::Never | Condition::Range { .. } | Condition::Opaque { .. } => false,
        }
    }

    /// Evaluate against known variable values; unknowns never match
    pub fn matches(&self, provider: &dyn VariableValueProvider) -> bool {
        match self {
            Condition::Range { variable, range } => match provider.state_of(variable) {
                Some(state) => range.matches(state, provider),
                None => false,
            },
            Condition::All(parts) => parts.iter().all(|c| c.matches(provider)),
            Condition::Any(parts) => parts.iter().any(|c| c.matches(provider)),
            other => other.is_always_true(),
        }
    }

    pub fn dump(&self) -> String {
        match self {
            Condition::Always => "true".to_string(),
            Condition::Never => "false".to_string(),
            Condition::Literal { value, negated } => {
                if *negated {
                    format!("!({})", value)
                } else {
                    value.dump()
                }
            }
            Condition::Range { variable, range } => format!("{} {}", variable, range),
            Condition::All(parts) => parts
                .iter()
                .map(|c| match c {
                    Condition::Any(_) => format!("({})", c.dump()),
                    _ => c.dump(),
                })
                .collect::<Vec<_>>()
                .join(" && "),
            Condition::Any(parts) => parts
                .iter()
                .map(|c| match c {
                    Condition::All(_) => format!("({})", c.dump()),
                    _ => c.dump(),
                })
                .collect::<Vec<_>>()
                .join(" || "),
            Condition::Opaque { negated: false } => "<unmodeled>".to_string(),
            Condition::Opaque { negated: true } => "!<unmodeled>".to_string(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Guard helpers
// ═══════════════════════════════════════════════════════════════════════════

enum Operand {
    Variable(VariableIdentifier),
    Constant(PrimitiveInfo),
}

fn comparison_condition(op: Comparison, lhs: &Expr, rhs: &Expr) -> TraceResult<Condition> {
    let left = operand(lhs).ok_or_else(|| unsupported(lhs))?;
    let right = operand(rhs).ok_or_else(|| unsupported(rhs))?;

    let condition = match (left, right) {
        (Operand::Variable(variable), Operand::Variable(other)) => {
            Condition::range(variable, ValueRange::compared_to(op, other))
        }
        (Operand::Variable(variable), Operand::Constant(value)) => Condition::range(
            variable,
            ValueRange::constant(op, VariableState::Primitive(value)),
        ),
        (Operand::Constant(value), Operand::Variable(variable)) => Condition::range(
            variable,
            ValueRange::constant(op.mirror(), VariableState::Primitive(value)),
        ),
        (Operand::Constant(a), Operand::Constant(b)) => Condition::literal(
            VariableState::Primitive(PrimitiveInfo::Bool(a.compare_to(op, &b))),
        ),
    };
    Ok(condition)
}

fn operand(expr: &Expr) -> Option<Operand> {
    let expr = expr.ignore_parens_and_casts();
    match &expr.kind {
        ExprKind::VarRef(name) => Some(Operand::Variable(VariableIdentifier::new(name.as_str()))),
        ExprKind::Literal(literal) => match literal_state(literal) {
            VariableState::Primitive(value) => Some(Operand::Constant(value)),
            _ => None,
        },
        ExprKind::Unary {
            op: UnaryOperator::Minus,
            operand: inner,
        } => match operand(inner)? {
            Operand::Constant(PrimitiveInfo::Integer(v)) => {
                Some(Operand::Constant(PrimitiveInfo::Integer(v.checked_neg()?)))
            }
            Operand::Constant(PrimitiveInfo::Float(v)) => {
                Some(Operand::Constant(PrimitiveInfo::Float(-v)))
            }
            _ => None,
        },
        _ => None,
    }
}

fn literal_state(literal: &Literal) -> VariableState {
    match literal {
        Literal::Integer(v) | Literal::Char(v) => VariableState::integer(*v),
        Literal::Float(v) => VariableState::Primitive(PrimitiveInfo::Float(*v)),
        Literal::Bool(v) => VariableState::Primitive(PrimitiveInfo::Bool(*v)),
        Literal::String(_) | Literal::WideString { .. } => {
            VariableState::buffer(literal.string_byte_length(false).unwrap_or_default())
        }
    }
}

fn unsupported(expr: &Expr) -> TraceError {
    let shape = match &expr.kind {
        ExprKind::VarRef(_) => "variable".to_string(),
        ExprKind::Literal(_) => "literal".to_string(),
        ExprKind::Binary { op, .. } => format!("binary operator {:?}", op),
        ExprKind::Unary { op, .. } => format!("unary operator {:?}", op),
        ExprKind::Subscript { .. } => "array subscript".to_string(),
        ExprKind::Call { .. } => "function call".to_string(),
        ExprKind::Paren(_) => "parenthesized expression".to_string(),
        ExprKind::Cast { .. } => "cast".to_string(),
        ExprKind::Unsupported(_) => "unsupported expression".to_string(),
    };
    TraceError::condition_parse(format!("{} at {}", shape, expr.location))
}
