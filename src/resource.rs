//! References to load balancer resources.
//!
//! Both reference types are opaque to this crate. A value that is empty or
//! only whitespace is rejected; anything else is stored exactly as given.

use crate::config::ConfigError;
use serde::Serialize;
use std::fmt;

/// Identifier of a backend target pool (for example, a target group ARN).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TargetPoolRef(String);

impl TargetPoolRef {
    /// Create a pool reference. `field` names the setting it came from.
    pub fn new(field: &'static str, value: impl Into<String>) -> Result<Self, ConfigError> {
        non_empty(field, value.into()).map(Self)
    }

    /// Get the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetPoolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the listener whose default action gets repointed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ListenerRef(String);

impl ListenerRef {
    /// Create a listener reference. `field` names the setting it came from.
    pub fn new(field: &'static str, value: impl Into<String>) -> Result<Self, ConfigError> {
        non_empty(field, value.into()).map(Self)
    }

    /// Get the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListenerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingReference(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_ref_rejects_empty() {
        let err = TargetPoolRef::new("active_pool_ref", "").unwrap_err();
        assert!(matches!(err, ConfigError::MissingReference("active_pool_ref")));
    }

    #[test]
    fn test_pool_ref_rejects_whitespace() {
        assert!(TargetPoolRef::new("passive_pool_ref", "   ").is_err());
    }

    #[test]
    fn test_listener_ref_kept_verbatim() {
        let listener = ListenerRef::new("listener_ref", " listener-1\n").unwrap();
        assert_eq!(listener.as_str(), " listener-1\n");
        assert_eq!(listener.to_string(), " listener-1\n");
    }
}
