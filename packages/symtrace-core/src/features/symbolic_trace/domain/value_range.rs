//! Constraints implied by branch guards

use serde::{Deserialize, Serialize};
use std::fmt;

use super::comparison::Comparison;
use super::variable::{VariableIdentifier, VariableState, VariableValueProvider};

/// Constraint on a single variable's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueRange {
    NotZero,
    Zero,
    /// `variable op other`
    Comparison {
        op: Comparison,
        other: VariableIdentifier,
    },
    /// `variable op constant`
    Constant {
        op: Comparison,
        constant: VariableState,
    },
}

impl ValueRange {
    pub fn compared_to(op: Comparison, other: VariableIdentifier) -> Self {
        ValueRange::Comparison { op, other }
    }

    pub fn constant(op: Comparison, constant: VariableState) -> Self {
        ValueRange::Constant { op, constant }
    }

    /// Exact logical complement
    pub fn negate(&self) -> Self {
        match self {
            ValueRange::NotZero => ValueRange::Zero,
            ValueRange::Zero => ValueRange::NotZero,
            ValueRange::Comparison { op, other } => ValueRange::Comparison {
                op: op.negate(),
                other: other.clone(),
            },
            ValueRange::Constant { op, constant } => ValueRange::Constant {
                op: op.negate(),
                constant: constant.clone(),
            },
        }
    }

    /// True if `state` is known to satisfy this range.
    ///
    /// Unresolved knowledge never matches, for the range and its negation alike.
    pub fn matches(&self, state: &VariableState, provider: &dyn VariableValueProvider) -> bool {
        let resolved = state.resolve(provider);
        match self {
            ValueRange::NotZero => resolved.to_zero_or_non_zero() == Ok(true),
            ValueRange::Zero => resolved.to_zero_or_non_zero() == Ok(false),
            ValueRange::Comparison { op, other } => match provider.state_of(other) {
                Some(other_state) => resolved.compare_to(*op, &other_state.resolve(provider)),
                None => false,
            },
            ValueRange::Constant { op, constant } => {
                resolved.compare_to(*op, &constant.resolve(provider))
            }
        }
    }

    pub fn dump(&self) -> String {
        match self {
            ValueRange::NotZero => "!= 0".to_string(),
            ValueRange::Zero => "== 0".to_string(),
            ValueRange::Comparison { op, other } => format!("{} {}", op, other),
            ValueRange::Constant { op, constant } => format!("{} {}", op, constant),
        }
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}
