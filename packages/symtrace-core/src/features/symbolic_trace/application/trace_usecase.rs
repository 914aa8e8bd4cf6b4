//! Trace Building UseCase
//!
//! Frontend → `TraceBuilder` → `BlockRegistry`. The registry is owned by the
//! caller once built; one registry can span several translation units.

use std::path::PathBuf;

use crate::config::TraceConfig;
use crate::features::symbolic_trace::domain::{
    BlockRegistry, CodeBlock, TraceResult, ValueSnapshot,
};
use crate::features::symbolic_trace::infrastructure::{CFrontend, TraceBuilder};
use crate::features::symbolic_trace::ports::SyntaxFrontend;
use crate::shared::models::TranslationUnit;

/// Trace Building UseCase Trait
pub trait TraceBuildingUseCase {
    /// Trace every function definition of an already lowered unit
    fn build_registry(&self, unit: &TranslationUnit) -> TraceResult<BlockRegistry>;

    fn build_registry_from_source(
        &mut self,
        file_path: &str,
        source: &str,
    ) -> TraceResult<BlockRegistry>;

    /// One registry across all files; a function defined twice is an error
    fn build_registry_from_files(&mut self, paths: &[PathBuf]) -> TraceResult<BlockRegistry>;

    /// Values known before `block.actions()[upto]`
    fn snapshot(&self, block: &CodeBlock, upto: usize) -> ValueSnapshot;
}

/// Trace Building UseCase Implementation
pub struct TraceBuildingUseCaseImpl<F: SyntaxFrontend> {
    frontend: F,
    builder: TraceBuilder,
}

impl<F: SyntaxFrontend> TraceBuildingUseCaseImpl<F> {
    pub fn new(frontend: F, config: TraceConfig) -> Self {
        Self {
            frontend,
            builder: TraceBuilder::new(config),
        }
    }

    pub fn config(&self) -> &TraceConfig {
        self.builder.config()
    }
}

impl TraceBuildingUseCaseImpl<CFrontend> {
    pub fn for_c(config: TraceConfig) -> TraceResult<Self> {
        Ok(Self::new(CFrontend::new()?, config))
    }
}

impl<F: SyntaxFrontend> TraceBuildingUseCase for TraceBuildingUseCaseImpl<F> {
    fn build_registry(&self, unit: &TranslationUnit) -> TraceResult<BlockRegistry> {
        let mut registry = BlockRegistry::new();
        self.builder.build_unit(unit, &mut registry)?;
        Ok(registry)
    }

    fn build_registry_from_source(
        &mut self,
        file_path: &str,
        source: &str,
    ) -> TraceResult<BlockRegistry> {
        let unit = self.frontend.parse_source(file_path, source)?;
        self.build_registry(&unit)
    }

    fn build_registry_from_files(&mut self, paths: &[PathBuf]) -> TraceResult<BlockRegistry> {
        let mut registry = BlockRegistry::new();
        for path in paths {
            let unit = self.frontend.parse_file(path)?;
            self.builder.build_unit(&unit, &mut registry)?;
        }
        tracing::debug!(
            files = paths.len(),
            blocks = registry.len(),
            language = self.frontend.language_name(),
            "registry built"
        );
        Ok(registry)
    }

    fn snapshot(&self, block: &CodeBlock, upto: usize) -> ValueSnapshot {
        let mut snapshot =
            ValueSnapshot::new().with_copy_chain_limit(self.builder.config().copy_chain_limit);
        snapshot.replay(block, upto);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::symbolic_trace::domain::{TraceError, VariableIdentifier, VariableState};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_from_source() {
        let mut usecase = TraceBuildingUseCaseImpl::for_c(TraceConfig::default()).unwrap();
        let registry = usecase
            .build_registry_from_source("u.c", "int g(int);\nvoid f(int n) { g(n); }\n")
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.iter().next().unwrap().name(), "f");
    }

    #[test]
    fn test_duplicate_definition_across_files() {
        let mut first = NamedTempFile::new().unwrap();
        first.write_all(b"void f(void) {}\n").unwrap();

        let mut usecase = TraceBuildingUseCaseImpl::for_c(TraceConfig::default()).unwrap();
        let paths = vec![first.path().to_path_buf(), first.path().to_path_buf()];
        let result = usecase.build_registry_from_files(&paths);
        assert!(matches!(result, Err(TraceError::DuplicateBlock { .. })));
    }

    #[test]
    fn test_missing_file_is_frontend_error() {
        let mut usecase = TraceBuildingUseCaseImpl::for_c(TraceConfig::default()).unwrap();
        let result = usecase.build_registry_from_files(&[PathBuf::from("/nonexistent/x.c")]);
        assert!(matches!(result, Err(TraceError::Frontend(_))));
    }

    #[test]
    fn test_snapshot_honors_copy_chain_limit() {
        let source = "void f(void) { char *a = \"hi\"; char *b; char *c; b = a; c = b; }\n";
        let unit = CFrontend::new().unwrap().parse_source("u.c", source).unwrap();

        let short = TraceBuildingUseCaseImpl::new(
            CFrontend::new().unwrap(),
            TraceConfig::default().copy_chain_limit(1),
        );
        let registry = short.build_registry(&unit).unwrap();
        let block = registry.iter().next().unwrap();
        let c = VariableIdentifier::new("c");

        // c → b → a needs two hops
        let snapshot = short.snapshot(block, block.actions().len());
        assert_eq!(snapshot.resolved(&c), VariableState::Unknown);

        let default = TraceBuildingUseCaseImpl::new(CFrontend::new().unwrap(), TraceConfig::default());
        let snapshot = default.snapshot(block, block.actions().len());
        assert_eq!(snapshot.resolved(&c), VariableState::buffer(2));
    }
}
