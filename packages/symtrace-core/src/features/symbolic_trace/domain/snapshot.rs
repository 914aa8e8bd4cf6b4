//! Value snapshot replayed from a trace
//!
//! Folds the declarations and assignments of a block, in trace order, into
//! a [`VariableValueProvider`]. Branch conditions are ignored: the last
//! write wins. Copies stay lazy and are resolved on lookup.

use std::collections::{BTreeMap, HashMap};

use super::action::{ActionKind, CodeBlock, ProcessedAction};
use super::variable::{VariableIdentifier, VariableState, VariableValueProvider, COPY_CHAIN_LIMIT};

#[derive(Debug, Clone)]
pub struct ValueSnapshot {
    values: HashMap<VariableIdentifier, VariableState>,
    copy_chain_limit: usize,
}

impl Default for ValueSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueSnapshot {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            copy_chain_limit: COPY_CHAIN_LIMIT,
        }
    }

    pub fn with_copy_chain_limit(mut self, limit: usize) -> Self {
        self.copy_chain_limit = limit;
        self
    }

    /// State before `block.actions()[upto]` (parameters start as unknown)
    pub fn at(block: &CodeBlock, upto: usize) -> Self {
        let mut snapshot = Self::new();
        snapshot.replay(block, upto);
        snapshot
    }

    /// State after the whole block
    pub fn after(block: &CodeBlock) -> Self {
        Self::at(block, block.actions().len())
    }

    pub fn replay(&mut self, block: &CodeBlock, upto: usize) {
        for parameter in block.parameters() {
            self.values.insert(parameter.clone(), VariableState::Unknown);
        }
        for action in block.actions().iter().take(upto) {
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: &ProcessedAction) {
        match action.kind() {
            ActionKind::VarDeclared { variable, state }
            | ActionKind::VarAssigned { variable, state } => {
                self.values.insert(variable.clone(), state.clone());
            }
            ActionKind::ArrayIndexAccess { .. } | ActionKind::FunctionCall { .. } => {}
        }
    }

    /// Recorded state, copies unresolved
    pub fn raw(&self, variable: &VariableIdentifier) -> Option<&VariableState> {
        self.values.get(variable)
    }

    /// Recorded state with copies resolved against this snapshot
    pub fn resolved(&self, variable: &VariableIdentifier) -> VariableState {
        match self.values.get(variable) {
            Some(state) => state.resolve_with_limit(self, self.copy_chain_limit),
            None => VariableState::Unknown,
        }
    }

    /// Every known variable with its resolved state, ordered by name
    pub fn resolved_all(&self) -> BTreeMap<VariableIdentifier, VariableState> {
        self.values
            .keys()
            .map(|variable| (variable.clone(), self.resolved(variable)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl VariableValueProvider for ValueSnapshot {
    fn state_of(&self, variable: &VariableIdentifier) -> Option<&VariableState> {
        self.values.get(variable)
    }
}
