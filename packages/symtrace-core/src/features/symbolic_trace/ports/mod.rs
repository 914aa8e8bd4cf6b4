//! Symbolic trace ports
//!
//! The trace builder consumes the language-agnostic syntax model; a
//! frontend produces it from source text.

use std::path::Path;

use crate::features::symbolic_trace::domain::{TraceError, TraceResult};
use crate::shared::models::TranslationUnit;

/// Source text → syntax model
pub trait SyntaxFrontend {
    /// Parse one file's contents. `file_path` is only used for locations.
    fn parse_source(&mut self, file_path: &str, source: &str) -> TraceResult<TranslationUnit>;

    fn parse_file(&mut self, path: &Path) -> TraceResult<TranslationUnit> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            TraceError::frontend(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.parse_source(&path.to_string_lossy(), &source)
    }

    fn language_name(&self) -> &'static str;
}
