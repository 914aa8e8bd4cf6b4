/*
 * Symtrace Core - Path-Conditioned Symbolic Traces for C
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Source locations and the syntax tree model
 * - features/    : symbolic_trace (domain → infrastructure → application)
 * - config/      : TraceConfig + versioned YAML
 *
 * Each analyzed function becomes a CodeBlock: its parameters and the
 * ordered actions of its body, each tagged with the path condition under
 * which it runs. Checkers consume the resulting BlockRegistry.
 */

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, GuardFailurePolicy, TraceConfig};
pub use errors::{Result, SymtraceError};
pub use features::symbolic_trace::{
    ActionKind, BlockRegistry, CFrontend, CodeBlock, Condition, ProcessedAction, SyntaxFrontend,
    TraceBuilder, TraceBuildingUseCase, TraceBuildingUseCaseImpl, TraceError, TraceResult,
    ValueSnapshot, VariableIdentifier, VariableState,
};
pub use shared::models::SourceLocation;
