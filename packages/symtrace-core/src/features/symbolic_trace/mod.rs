//! Symbolic Trace - syntax tree → path-conditioned action traces
//!
//! One `CodeBlock` per function definition: parameters plus the ordered
//! declarations, copies, literal-index accesses and direct calls found in
//! its body, each tagged with the `Condition` under which it executes.
//!
//! ## Architecture
//!
//! ```text
//! source ──SyntaxFrontend──▶ TranslationUnit
//!                                 │
//!                           TraceBuilder (Condition threaded per branch)
//!                                 ▼
//!                           BlockRegistry ──▶ ValueSnapshot / dump / JSON
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{TraceBuildingUseCase, TraceBuildingUseCaseImpl};
pub use domain::{
    ActionKind, BlockRegistry, CodeBlock, Condition, FunctionId, ProcessedAction, TraceError,
    TraceResult, ValueSnapshot, VariableIdentifier, VariableState,
};
pub use infrastructure::{CFrontend, TraceBuilder};
pub use ports::SyntaxFrontend;
