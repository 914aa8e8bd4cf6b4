//! Symbolic value model
//!
//! `VariableState` is what the trace builder knows about a variable at one
//! point: nothing, a literal scalar, a buffer descriptor, or "same value as
//! that other variable". Copies are resolved lazily through a
//! [`VariableValueProvider`], never substituted eagerly.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::comparison::Comparison;
use super::errors::{TraceError, TraceResult};

/// Maximum number of copy hops followed by [`VariableState::resolve`]
pub const COPY_CHAIN_LIMIT: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════════

/// Variable identity, by name only.
///
/// Two variables with the same name in different scopes compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableIdentifier {
    pub name: String,
}

impl VariableIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn dump(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for VariableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for VariableIdentifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Payloads
// ═══════════════════════════════════════════════════════════════════════════

/// Known allocation: null, or a buffer of a known byte size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferInfo {
    Null,
    Allocated { size: u64 },
}

impl BufferInfo {
    pub fn null() -> Self {
        BufferInfo::Null
    }

    pub fn sized(size: u64) -> Self {
        BufferInfo::Allocated { size }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, BufferInfo::Null)
    }

    pub fn dump(&self) -> String {
        match self {
            BufferInfo::Null => "buffer(nullptr)".to_string(),
            BufferInfo::Allocated { size } => format!("buffer(size: {})", size),
        }
    }
}

/// Known scalar value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveInfo {
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl PrimitiveInfo {
    pub fn is_non_zero(&self) -> bool {
        match self {
            PrimitiveInfo::Bool(value) => *value,
            PrimitiveInfo::Integer(value) => *value != 0,
            PrimitiveInfo::Float(value) => *value != 0.0,
        }
    }

    /// Floats truncate toward zero, booleans are 0/1
    pub fn as_integer(&self) -> i64 {
        match self {
            PrimitiveInfo::Bool(value) => i64::from(*value),
            PrimitiveInfo::Integer(value) => *value,
            PrimitiveInfo::Float(value) => *value as i64,
        }
    }

    fn as_float(&self) -> f64 {
        match self {
            PrimitiveInfo::Bool(value) => f64::from(u8::from(*value)),
            PrimitiveInfo::Integer(value) => *value as f64,
            PrimitiveInfo::Float(value) => *value,
        }
    }

    /// Compares using the shared numeric type: float if either side is a
    /// float, integer otherwise.
    pub fn compare_to(&self, op: Comparison, other: &PrimitiveInfo) -> bool {
        match (self, other) {
            (PrimitiveInfo::Float(_), _) | (_, PrimitiveInfo::Float(_)) => {
                op.apply_f64(self.as_float(), other.as_float())
            }
            _ => op.apply_i64(self.as_integer(), other.as_integer()),
        }
    }

    pub fn dump(&self) -> String {
        match self {
            PrimitiveInfo::Bool(value) => format!("bool({})", value),
            PrimitiveInfo::Integer(value) => format!("int({})", value),
            PrimitiveInfo::Float(value) => format!("float({})", value),
        }
    }
}

/// "Equal to `source` as of the copy point"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarCopyInfo {
    pub source: VariableIdentifier,
}

impl VarCopyInfo {
    pub fn new(source: VariableIdentifier) -> Self {
        Self { source }
    }

    pub fn dump(&self) -> String {
        format!("copy of {}", self.source)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Value lookup
// ═══════════════════════════════════════════════════════════════════════════

/// Current knowledge about other variables, used to resolve copies
pub trait VariableValueProvider {
    fn state_of(&self, variable: &VariableIdentifier) -> Option<&VariableState>;
}

impl VariableValueProvider for HashMap<VariableIdentifier, VariableState> {
    fn state_of(&self, variable: &VariableIdentifier) -> Option<&VariableState> {
        self.get(variable)
    }
}

impl VariableValueProvider for BTreeMap<VariableIdentifier, VariableState> {
    fn state_of(&self, variable: &VariableIdentifier) -> Option<&VariableState> {
        self.get(variable)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// VariableState
// ═══════════════════════════════════════════════════════════════════════════

/// Tag of a [`VariableState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Unknown,
    Primitive,
    Buffer,
    CopyVar,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum VariableState {
    #[default]
    Unknown,
    Primitive(PrimitiveInfo),
    Buffer(BufferInfo),
    CopyVar(VarCopyInfo),
}

impl VariableState {
    pub fn integer(value: i64) -> Self {
        VariableState::Primitive(PrimitiveInfo::Integer(value))
    }

    pub fn buffer(size: u64) -> Self {
        VariableState::Buffer(BufferInfo::sized(size))
    }

    pub fn copy_of(source: VariableIdentifier) -> Self {
        VariableState::CopyVar(VarCopyInfo::new(source))
    }

    pub fn kind(&self) -> StateKind {
        match self {
            VariableState::Unknown => StateKind::Unknown,
            VariableState::Primitive(_) => StateKind::Primitive,
            VariableState::Buffer(_) => StateKind::Buffer,
            VariableState::CopyVar(_) => StateKind::CopyVar,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, VariableState::Unknown)
    }

    /// Follow the copy chain through `provider`.
    ///
    /// Unknown when a source is missing or the chain is longer than
    /// [`COPY_CHAIN_LIMIT`] (which also covers cycles).
    pub fn resolve(&self, provider: &dyn VariableValueProvider) -> VariableState {
        self.resolve_with_limit(provider, COPY_CHAIN_LIMIT)
    }

    pub fn resolve_with_limit(
        &self,
        provider: &dyn VariableValueProvider,
        limit: usize,
    ) -> VariableState {
        let mut current = self;
        for _ in 0..=limit {
            match current {
                VariableState::CopyVar(copy) => match provider.state_of(&copy.source) {
                    Some(next) => current = next,
                    None => return VariableState::Unknown,
                },
                resolved => return resolved.clone(),
            }
        }
        VariableState::Unknown
    }

    /// True only when both sides are primitives satisfying `op`.
    ///
    /// Does not resolve copies; callers resolve first.
    pub fn compare_to(&self, op: Comparison, other: &VariableState) -> bool {
        match (self, other) {
            (VariableState::Primitive(lhs), VariableState::Primitive(rhs)) => {
                lhs.compare_to(op, rhs)
            }
            _ => false,
        }
    }

    /// Concrete truth value of a primitive state
    pub fn to_zero_or_non_zero(&self) -> TraceResult<bool> {
        match self {
            VariableState::Primitive(value) => Ok(value.is_non_zero()),
            other => Err(TraceError::unknown_state(format!(
                "no concrete truth value for {}",
                other.dump()
            ))),
        }
    }

    pub fn dump(&self) -> String {
        match self {
            VariableState::Unknown => "unknown".to_string(),
            VariableState::Primitive(value) => value.dump(),
            VariableState::Buffer(buffer) => buffer.dump(),
            VariableState::CopyVar(copy) => copy.dump(),
        }
    }
}

impl fmt::Display for VariableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}
