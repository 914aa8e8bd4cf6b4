//! Configuration I/O (YAML loading)

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::trace_config::TraceConfig;

pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    #[serde(default)]
    pub trace: TraceConfig,
}

impl TraceConfig {
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;
        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }
        file.trace.validate()?;
        Ok(file.trace)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            trace: self.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardFailurePolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_roundtrip() {
        let config = TraceConfig::default()
            .guard_failure_policy(GuardFailurePolicy::TraverseUnconstrained)
            .copy_chain_limit(8);

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("guard_failure_policy: traverse_unconstrained"));
        assert_eq!(TraceConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
trace:
  count_string_terminator: true
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml_content.as_bytes()).unwrap();

        let config = TraceConfig::from_yaml(file.path()).unwrap();
        assert!(config.count_string_terminator);
        assert_eq!(config.guard_failure_policy, GuardFailurePolicy::SkipStatement);
    }

    #[test]
    fn test_missing_version() {
        let result = TraceConfig::from_yaml_str("trace:\n  log_completed_blocks: true\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_unsupported_version() {
        let result = TraceConfig::from_yaml_str("version: 2\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = TraceConfig::from_yaml_str("version: 1\ntrace:\n  max_depth: 3\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let result = TraceConfig::from_yaml_str("version: 1\ntrace:\n  copy_chain_limit: 0\n");
        assert!(matches!(result, Err(ConfigError::Range { .. })));
    }
}
