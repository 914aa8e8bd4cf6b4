//! Feature modules

pub mod symbolic_trace;
