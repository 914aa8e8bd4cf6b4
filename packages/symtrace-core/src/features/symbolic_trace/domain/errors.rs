/*
 * Symbolic Trace Error Types
 *
 * Expected failures of the trace builder, reported as values:
 * - Guard expressions the condition algebra cannot model
 * - Truth queries on states without a concrete value
 * - Registry contract violations
 * - Frontend (parser) failures
 */

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// Guard shape not representable as a `Condition`
    #[error("Unsupported guard expression: {0}")]
    ConditionParse(String),

    /// Concrete truth value requested from a state that has none
    #[error("Unknown variable state: {0}")]
    UnknownVariableState(String),

    /// A block for this function identity is already registered
    #[error("Block already registered for function '{function}'")]
    DuplicateBlock { function: String },

    /// Parser setup or parse failure
    #[error("Frontend error: {0}")]
    Frontend(String),
}

impl TraceError {
    pub fn condition_parse(msg: impl Into<String>) -> Self {
        TraceError::ConditionParse(msg.into())
    }

    pub fn unknown_state(msg: impl Into<String>) -> Self {
        TraceError::UnknownVariableState(msg.into())
    }

    pub fn frontend(msg: impl Into<String>) -> Self {
        TraceError::Frontend(msg.into())
    }
}

/// Result type for trace operations
pub type TraceResult<T> = Result<T, TraceError>;
