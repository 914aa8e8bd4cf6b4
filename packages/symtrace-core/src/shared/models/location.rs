//! Source location types
//!
//! Positions of syntax tree nodes, as reported by the frontend.
//! Lines and columns are 1-based; a zero location marks "unknown".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Single location in a source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location used when the frontend could not map a node
    pub fn unknown() -> Self {
        Self::new("", 0, 0)
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "<unknown>");
        }
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
