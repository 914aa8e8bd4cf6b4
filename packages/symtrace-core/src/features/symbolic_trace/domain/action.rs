//! Action & block model
//!
//! A `CodeBlock` is the trace of one function: its parameters and the
//! ordered, condition-tagged effects found while walking its body.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::condition::Condition;
use super::variable::{VariableIdentifier, VariableState};
use crate::shared::models::SourceLocation;

/// Recorded effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    VarDeclared {
        variable: VariableIdentifier,
        state: VariableState,
    },
    VarAssigned {
        variable: VariableIdentifier,
        state: VariableState,
    },
    ArrayIndexAccess {
        array: VariableIdentifier,
        index: VariableState,
    },
    FunctionCall {
        function: String,
        arguments: Vec<VariableState>,
    },
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::VarDeclared { .. } => "VarDeclared",
            ActionKind::VarAssigned { .. } => "VarAssigned",
            ActionKind::ArrayIndexAccess { .. } => "ArrayIndexAccess",
            ActionKind::FunctionCall { .. } => "FunctionCall",
        }
    }
}

/// One effect with the path condition it happens under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedAction {
    condition: Condition,
    location: SourceLocation,
    kind: ActionKind,
}

impl ProcessedAction {
    pub fn new(condition: Condition, location: SourceLocation, kind: ActionKind) -> Self {
        Self {
            condition,
            location,
            kind,
        }
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn dump(&self) -> String {
        let body = match &self.kind {
            ActionKind::VarDeclared { variable, state } => {
                format!("VarDeclared {} = {}", variable, state)
            }
            ActionKind::VarAssigned { variable, state } => {
                format!("VarAssigned {} = {}", variable, state)
            }
            ActionKind::ArrayIndexAccess { array, index } => {
                format!("ArrayIndexAccess {}[{}]", array, index)
            }
            ActionKind::FunctionCall {
                function,
                arguments,
            } => {
                let args: Vec<_> = arguments.iter().map(|a| a.dump()).collect();
                format!("FunctionCall {}({})", function, args.join(", "))
            }
        };
        format!("[{}] {} if ({})", self.location, body, self.condition)
    }
}

impl fmt::Display for ProcessedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

/// Function identity: qualified name + declaration location
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId {
    pub qualified_name: String,
    pub location: SourceLocation,
}

impl FunctionId {
    pub fn new(qualified_name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            location,
        }
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.qualified_name, self.location)
    }
}

/// Trace of one function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    function: FunctionId,
    parameters: Vec<VariableIdentifier>,
    actions: Vec<ProcessedAction>,
}

impl CodeBlock {
    pub fn new(qualified_name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            function: FunctionId::new(qualified_name, location),
            parameters: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn add_function_parameter(&mut self, parameter: VariableIdentifier) {
        self.parameters.push(parameter);
    }

    pub fn add_processed_action(&mut self, action: ProcessedAction) {
        self.actions.push(action);
    }

    pub fn function(&self) -> &FunctionId {
        &self.function
    }

    pub fn name(&self) -> &str {
        &self.function.qualified_name
    }

    pub fn parameters(&self) -> &[VariableIdentifier] {
        &self.parameters
    }

    pub fn actions(&self) -> &[ProcessedAction] {
        &self.actions
    }

    pub fn is_parameter(&self, variable: &VariableIdentifier) -> bool {
        self.parameters.contains(variable)
    }

    pub fn dump(&self) -> String {
        let params: Vec<_> = self.parameters.iter().map(|p| p.dump()).collect();
        let mut out = format!(
            "block {}({}) at {}\n",
            self.function.qualified_name,
            params.join(", "),
            self.function.location
        );
        for action in &self.actions {
            out.push_str("  ");
            out.push_str(&action.dump());
            out.push('\n');
        }
        out
    }
}
