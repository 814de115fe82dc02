//! Pool health states.

use crate::client::TargetState;
use crate::resource::TargetPoolRef;
use serde::Serialize;
use std::fmt;

/// Reduced health of a whole target pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Unhealthy,
    /// The pool could not be observed. Never treated as healthy.
    Unknown,
}

impl HealthState {
    pub fn is_healthy(self) -> bool {
        self == HealthState::Healthy
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Healthy => "healthy",
            HealthState::Unhealthy => "unhealthy",
            HealthState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a pool ended up in its [`HealthState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthCause {
    /// The sampled member reported this state.
    MemberReported {
        target_id: String,
        member_state: TargetState,
    },
    /// Every one of `members` reported healthy.
    AllMembersHealthy { members: usize },
    /// `unhealthy` of `members` were not healthy.
    UnhealthyMembers { unhealthy: usize, members: usize },
    /// The pool has no registered members.
    NoMembers,
    /// The health query itself failed.
    QueryFailed { error: String },
}

/// Result of evaluating one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolHealth {
    pub pool: TargetPoolRef,
    pub state: HealthState,
    pub cause: HealthCause,
}

impl PoolHealth {
    pub fn is_healthy(&self) -> bool {
        self.state.is_healthy()
    }

    /// Whether the state comes from a failed query rather than an answer.
    pub fn query_failed(&self) -> bool {
        matches!(self.cause, HealthCause::QueryFailed { .. })
    }
}
