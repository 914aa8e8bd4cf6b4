//! Configuration
//!
//! One stage config (`TraceConfig`) with builder setters, range validation
//! and a versioned YAML schema.
//!
//! ```rust,ignore
//! use symtrace_core::config::{GuardFailurePolicy, TraceConfig};
//!
//! let config = TraceConfig::default()
//!     .guard_failure_policy(GuardFailurePolicy::TraverseUnconstrained);
//!
//! let config = TraceConfig::from_yaml("symtrace.yaml")?;
//! ```

pub mod error;
pub mod io;
pub mod trace_config;

pub use error::{ConfigError, ConfigResult};
pub use io::ConfigFileV1;
pub use trace_config::{GuardFailurePolicy, TraceConfig};
