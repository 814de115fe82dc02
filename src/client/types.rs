//! Data exchanged with the load balancer control plane.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Health of a single registered target, as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberHealth {
    /// Target identifier (instance id, IP address, ...).
    pub target_id: String,
    /// Port the target is registered on, when the pool uses ports.
    pub port: Option<u16>,
    /// Reported state.
    pub state: TargetState,
    /// Machine-readable reason code for a non-healthy state.
    pub reason: Option<String>,
    /// Human-readable description for a non-healthy state.
    pub description: Option<String>,
}

impl MemberHealth {
    /// Shorthand for a member with only an id and a state.
    pub fn new(target_id: impl Into<String>, state: TargetState) -> Self {
        Self {
            target_id: target_id.into(),
            port: None,
            state,
            reason: None,
            description: None,
        }
    }
}

/// Target health states known to the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetState {
    #[serde(rename = "initial")]
    Initial,
    #[serde(rename = "healthy")]
    Healthy,
    #[serde(rename = "unhealthy")]
    Unhealthy,
    #[serde(rename = "unused")]
    Unused,
    #[serde(rename = "draining")]
    Draining,
    #[serde(rename = "unavailable")]
    Unavailable,
    #[serde(rename = "unhealthy.draining")]
    UnhealthyDraining,
    #[serde(other, rename = "unrecognized")]
    Unrecognized,
}

impl TargetState {
    /// Only `healthy` counts; every transitional state is treated as down.
    pub fn is_healthy(self) -> bool {
        self == TargetState::Healthy
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetState::Initial => "initial",
            TargetState::Healthy => "healthy",
            TargetState::Unhealthy => "unhealthy",
            TargetState::Unused => "unused",
            TargetState::Draining => "draining",
            TargetState::Unavailable => "unavailable",
            TargetState::UnhealthyDraining => "unhealthy.draining",
            TargetState::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a control-plane failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    AccessDenied,
    NotFound,
    Throttling,
    Timeout,
    Transport,
    Other,
}

/// Errors returned by a [`LoadBalancerApi`](crate::client::LoadBalancerApi) call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{operation} timed out after {}", human(.after))]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service error {status} {code}: {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// Classify this error for logs and metrics.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Timeout { .. } => ApiErrorKind::Timeout,
            ApiError::Transport(_) => ApiErrorKind::Transport,
            ApiError::Service { status, code, .. } => classify_service_error(*status, code),
            ApiError::Decode(_) | ApiError::InvalidEndpoint(_) => ApiErrorKind::Other,
        }
    }
}

fn human(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

/// Map a service error code (falling back to the HTTP status) to a kind.
fn classify_service_error(status: u16, code: &str) -> ApiErrorKind {
    match code {
        "AccessDenied" | "AccessDeniedException" | "UnauthorizedOperation" => {
            return ApiErrorKind::AccessDenied;
        }
        "Throttling" | "ThrottlingException" | "RequestLimitExceeded" => {
            return ApiErrorKind::Throttling;
        }
        "TargetGroupNotFound" | "ListenerNotFound" | "LoadBalancerNotFound" => {
            return ApiErrorKind::NotFound;
        }
        _ => {}
    }

    match status {
        401 | 403 => ApiErrorKind::AccessDenied,
        404 => ApiErrorKind::NotFound,
        429 => ApiErrorKind::Throttling,
        _ => ApiErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_state_serde() {
        let state: TargetState = serde_json::from_str("\"healthy\"").unwrap();
        assert_eq!(state, TargetState::Healthy);

        let state: TargetState = serde_json::from_str("\"unhealthy.draining\"").unwrap();
        assert_eq!(state, TargetState::UnhealthyDraining);

        let state: TargetState = serde_json::from_str("\"warming-up\"").unwrap();
        assert_eq!(state, TargetState::Unrecognized);
    }

    #[test]
    fn test_only_healthy_is_healthy() {
        assert!(TargetState::Healthy.is_healthy());
        assert!(!TargetState::Initial.is_healthy());
        assert!(!TargetState::Draining.is_healthy());
        assert!(!TargetState::Unrecognized.is_healthy());
    }

    #[test]
    fn test_classify_by_code() {
        let err = ApiError::Service {
            status: 400,
            code: "Throttling".to_string(),
            message: "Rate exceeded".to_string(),
        };
        assert_eq!(err.kind(), ApiErrorKind::Throttling);

        let err = ApiError::Service {
            status: 400,
            code: "ListenerNotFound".to_string(),
            message: "One or more listeners not found".to_string(),
        };
        assert_eq!(err.kind(), ApiErrorKind::NotFound);
    }

    #[test]
    fn test_classify_by_status() {
        let err = ApiError::Service {
            status: 403,
            code: String::new(),
            message: "forbidden".to_string(),
        };
        assert_eq!(err.kind(), ApiErrorKind::AccessDenied);
    }

    #[test]
    fn test_timeout_display() {
        let err = ApiError::Timeout {
            operation: "DescribeTargetHealth",
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "DescribeTargetHealth timed out after 5s");
        assert_eq!(err.kind(), ApiErrorKind::Timeout);
    }
}
