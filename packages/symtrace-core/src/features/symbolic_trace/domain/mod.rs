//! Symbolic trace domain model
//!
//! Condition algebra, symbolic values, actions, blocks and the registry.
//! Nothing here knows how the syntax tree is walked.

pub mod action;
pub mod comparison;
pub mod condition;
pub mod errors;
pub mod registry;
pub mod snapshot;
pub mod value_range;
pub mod variable;

pub use action::{ActionKind, CodeBlock, FunctionId, ProcessedAction};
pub use comparison::Comparison;
pub use condition::Condition;
pub use errors::{TraceError, TraceResult};
pub use registry::BlockRegistry;
pub use snapshot::ValueSnapshot;
pub use value_range::ValueRange;
pub use variable::{
    BufferInfo, PrimitiveInfo, StateKind, VarCopyInfo, VariableIdentifier, VariableState,
    VariableValueProvider, COPY_CHAIN_LIMIT,
};
