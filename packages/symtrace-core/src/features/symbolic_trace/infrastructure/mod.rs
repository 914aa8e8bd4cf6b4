//! Symbolic trace infrastructure
//!
//! Syntax-tree traversal (`TraceBuilder`) and the tree-sitter C adapter.

pub mod c_frontend;
pub mod shape_probe;
pub mod trace_builder;

pub use c_frontend::CFrontend;
pub use shape_probe::{argument_state, VariableRefProbe};
pub use trace_builder::TraceBuilder;
