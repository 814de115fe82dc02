//! Invocation ID generation.
//!
//! Every invocation gets a unique identifier that is attached to its tracing
//! span and returned in the outcome, so a response can be matched to its logs.

use uuid::Uuid;

/// Identifier of a single controller invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationId(String);

impl InvocationId {
    /// Create a new random invocation ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the invocation ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_invocation_ids_unique() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            let id = InvocationId::new();
            assert_eq!(id.as_str().len(), 36);
            assert!(ids.insert(id.into_string()), "duplicate ID generated");
        }
    }

    #[test]
    fn test_invocation_id_display() {
        let id = InvocationId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }
}
