//! Block registry: one trace per analyzed function for an analysis run

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

use super::action::{CodeBlock, FunctionId};
use super::errors::{TraceError, TraceResult};

/// Write-once collection of [`CodeBlock`]s, iterated in insertion order
#[derive(Debug, Default, Clone)]
pub struct BlockRegistry {
    blocks: Vec<CodeBlock>,
    index: FxHashMap<FunctionId, usize>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a completed block.
    ///
    /// A second block for the same function identity is rejected and the
    /// first one is kept.
    pub fn add_block(&mut self, block: CodeBlock) -> TraceResult<()> {
        if self.index.contains_key(block.function()) {
            return Err(TraceError::DuplicateBlock {
                function: block.function().to_string(),
            });
        }
        self.index.insert(block.function().clone(), self.blocks.len());
        self.blocks.push(block);
        Ok(())
    }

    pub fn get(&self, function: &FunctionId) -> Option<&CodeBlock> {
        self.index.get(function).map(|&i| &self.blocks[i])
    }

    /// Blocks whose qualified name is `name` (overloads, static functions
    /// in several files)
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CodeBlock> + 'a {
        self.blocks.iter().filter(move |b| b.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CodeBlock> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn dump(&self) -> String {
        self.blocks.iter().map(CodeBlock::dump).collect::<Vec<_>>().join("\n")
    }

    /// JSON export for external checkers (not a stable format)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for BlockRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.blocks.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a BlockRegistry {
    type Item = &'a CodeBlock;
    type IntoIter = std::slice::Iter<'a, CodeBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
