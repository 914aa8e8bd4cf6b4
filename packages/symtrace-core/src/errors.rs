//! Error types for symtrace-core
//!
//! Provides unified error handling for drivers (CLI, embedding tools).

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::symbolic_trace::domain::TraceError;

/// Main error type for symtrace operations
#[derive(Debug, Error)]
pub enum SymtraceError {
    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for symtrace operations
pub type Result<T> = std::result::Result<T, SymtraceError>;
