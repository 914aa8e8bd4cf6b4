//! Custom assertions for trace verification

use pretty_assertions::assert_eq;
use symtrace_core::features::symbolic_trace::domain::{ActionKind, CodeBlock, Condition};
use symtrace_core::shared::models::FunctionDecl;
use symtrace_core::{TraceBuilder, TraceConfig};

/// Trace one function with the default config
pub fn trace(function: &FunctionDecl) -> CodeBlock {
    TraceBuilder::default().trace_function(function)
}

pub fn trace_with(config: TraceConfig, function: &FunctionDecl) -> CodeBlock {
    TraceBuilder::new(config).trace_function(function)
}

pub fn kinds(block: &CodeBlock) -> Vec<ActionKind> {
    block.actions().iter().map(|a| a.kind().clone()).collect()
}

/// Condition dumps, in trace order
pub fn conditions(block: &CodeBlock) -> Vec<String> {
    block.actions().iter().map(|a| a.condition().dump()).collect()
}

pub fn assert_kinds(block: &CodeBlock, expected: &[ActionKind]) {
    assert_eq!(kinds(block), expected.to_vec(), "trace:\n{}", block.dump());
}

pub fn assert_no_actions(block: &CodeBlock) {
    assert!(
        block.actions().is_empty(),
        "Expected empty trace, got:\n{}",
        block.dump()
    );
}

pub fn assert_all_unconditional(block: &CodeBlock) {
    for action in block.actions() {
        assert_eq!(action.condition(), &Condition::Always, "{}", action);
    }
}
