//! Comparison operators used in guards and value ranges

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::models::BinaryOperator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    NotEqual,
    Equal,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::LessThan,
        Comparison::LessThanEqual,
        Comparison::GreaterThan,
        Comparison::GreaterThanEqual,
        Comparison::NotEqual,
        Comparison::Equal,
    ];

    /// Logical complement: `!(a op b)` is `a op.negate() b`
    pub fn negate(self) -> Self {
        match self {
            Self::LessThan => Self::GreaterThanEqual,
            Self::LessThanEqual => Self::GreaterThan,
            Self::GreaterThan => Self::LessThanEqual,
            Self::GreaterThanEqual => Self::LessThan,
            Self::NotEqual => Self::Equal,
            Self::Equal => Self::NotEqual,
        }
    }

    /// Operand swap: `a op b` is `b op.mirror() a`
    pub fn mirror(self) -> Self {
        match self {
            Self::LessThan => Self::GreaterThan,
            Self::LessThanEqual => Self::GreaterThanEqual,
            Self::GreaterThan => Self::LessThan,
            Self::GreaterThanEqual => Self::LessThanEqual,
            Self::NotEqual => Self::NotEqual,
            Self::Equal => Self::Equal,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
            Self::NotEqual => "!=",
            Self::Equal => "==",
        }
    }

    pub fn from_operator(op: BinaryOperator) -> Option<Self> {
        match op {
            BinaryOperator::Lt => Some(Self::LessThan),
            BinaryOperator::Le => Some(Self::LessThanEqual),
            BinaryOperator::Gt => Some(Self::GreaterThan),
            BinaryOperator::Ge => Some(Self::GreaterThanEqual),
            BinaryOperator::Ne => Some(Self::NotEqual),
            BinaryOperator::Eq => Some(Self::Equal),
            _ => None,
        }
    }

    pub fn apply_i64(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::LessThan => lhs < rhs,
            Self::LessThanEqual => lhs <= rhs,
            Self::GreaterThan => lhs > rhs,
            Self::GreaterThanEqual => lhs >= rhs,
            Self::NotEqual => lhs != rhs,
            Self::Equal => lhs == rhs,
        }
    }

    pub fn apply_f64(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::LessThan => lhs < rhs,
            Self::LessThanEqual => lhs <= rhs,
            Self::GreaterThan => lhs > rhs,
            Self::GreaterThanEqual => lhs >= rhs,
            Self::NotEqual => lhs != rhs,
            Self::Equal => lhs == rhs,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negate_is_fixed_point_free_involution() {
        for op in Comparison::ALL {
            assert_ne!(op.negate(), op);
            assert_eq!(op.negate().negate(), op);
        }
    }

    #[test]
    fn test_negate_table() {
        assert_eq!(Comparison::LessThan.negate(), Comparison::GreaterThanEqual);
        assert_eq!(Comparison::LessThanEqual.negate(), Comparison::GreaterThan);
        assert_eq!(Comparison::NotEqual.negate(), Comparison::Equal);
    }

    #[test]
    fn test_negate_is_bijective() {
        let images: std::collections::HashSet<_> =
            Comparison::ALL.iter().map(|op| op.negate()).collect();
        assert_eq!(images.len(), Comparison::ALL.len());
        for op in Comparison::ALL {
            assert!(images.contains(&op));
        }
    }

    #[test]
    fn test_negate_agrees_with_evaluation() {
        for op in Comparison::ALL {
            for (a, b) in [(1, 2), (2, 2), (3, 2)] {
                assert_eq!(op.apply_i64(a, b), !op.negate().apply_i64(a, b));
                assert_eq!(op.apply_i64(a, b), op.mirror().apply_i64(b, a));
            }
        }
    }

    #[test]
    fn test_symbols() {
        let symbols: Vec<_> = Comparison::ALL.iter().map(|op| op.to_string()).collect();
        assert_eq!(symbols, vec!["<", "<=", ">", ">=", "!=", "=="]);
    }
}
