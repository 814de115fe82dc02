//! Configuration file loading.

use crate::config::{validate_config, Config, ConfigOverrides};
use std::path::Path;
use thiserror::Error;

/// Errors that make a configuration unusable.
///
/// Any of these aborts the invocation before the first network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("required reference '{0}' is missing or empty")]
    MissingReference(&'static str),

    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a YAML file.
///
/// This function reads the file, parses the YAML, and validates the configuration.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config = read_config(path.as_ref())?;

    validate_config(&config).map_err(ConfigError::ValidationError)?;

    Ok(config)
}

/// Build the effective configuration from an optional file plus overrides.
///
/// Without a file the defaults are used, so the overrides alone may
/// supply every required reference.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => Config::default(),
    };

    config.apply_overrides(overrides);

    validate_config(&config).map_err(ConfigError::ValidationError)?;

    Ok(config)
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
failover:
  active_pool_ref: tg-A
  passive_pool_ref: tg-B
  listener_ref: listener-1
"#;

    #[test]
    fn test_load_minimal_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.failover.active_pool_ref, "tg-A");
        assert_eq!(config.failover.passive_pool_ref, "tg-B");
        assert_eq!(config.failover.listener_ref, "listener-1");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/config.yaml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::ReadError(_)));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not: valid: yaml: {{{}}}").unwrap();

        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_missing_listener() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"failover:\n  active_pool_ref: tg-A\n  passive_pool_ref: tg-B\n")
            .unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("listener_ref"));
    }

    #[test]
    fn test_resolve_from_overrides_only() {
        let overrides = ConfigOverrides {
            active_pool_ref: Some("tg-A".to_string()),
            passive_pool_ref: Some("tg-B".to_string()),
            listener_ref: Some("listener-1".to_string()),
            ..Default::default()
        };

        let config = resolve_config(None, overrides).unwrap();
        assert_eq!(config.failover.passive_pool_ref, "tg-B");
    }

    #[test]
    fn test_resolve_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let overrides = ConfigOverrides {
            passive_pool_ref: Some("tg-C".to_string()),
            ..Default::default()
        };

        let config = resolve_config(Some(file.path()), overrides).unwrap();
        assert_eq!(config.failover.active_pool_ref, "tg-A");
        assert_eq!(config.failover.passive_pool_ref, "tg-C");
    }
}
