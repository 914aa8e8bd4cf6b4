//! Common test utilities for symtrace-core
//!
//! Syntax tree builders and trace assertions shared by the integration
//! tests.

#![allow(dead_code)]

mod assertions;
mod builders;

pub use assertions::*;
pub use builders::*;
