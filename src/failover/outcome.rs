//! Invocation results.

use crate::health::PoolHealth;
use crate::resource::TargetPoolRef;
use serde::Serialize;

/// Why an invocation ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    /// Active pool is healthy, nothing changed.
    ActiveHealthy,
    /// Listener now forwards to the passive pool.
    FailedOver,
    /// Failover was attempted but the listener mutation failed.
    MutationFailed,
    /// Failover was withheld because the passive pool is not healthy either.
    StandbyUnhealthy,
}

/// What one invocation decided and whether it worked.
#[derive(Debug, Clone, Serialize)]
pub struct FailoverOutcome {
    pub invocation_id: String,
    /// A listener mutation was attempted.
    pub triggered: bool,
    pub success: bool,
    pub reason: OutcomeReason,
    pub active: PoolHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standby: Option<PoolHealth>,
    /// Pool the listener was repointed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetPoolRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FailoverOutcome {
    pub(crate) fn no_action(invocation_id: String, active: PoolHealth) -> Self {
        Self {
            invocation_id,
            triggered: false,
            success: true,
            reason: OutcomeReason::ActiveHealthy,
            active,
            standby: None,
            target: None,
            error: None,
        }
    }

    pub(crate) fn withheld(invocation_id: String, active: PoolHealth, standby: PoolHealth) -> Self {
        Self {
            invocation_id,
            triggered: false,
            success: false,
            reason: OutcomeReason::StandbyUnhealthy,
            active,
            standby: Some(standby),
            target: None,
            error: None,
        }
    }

    pub(crate) fn attempted(
        invocation_id: String,
        active: PoolHealth,
        standby: Option<PoolHealth>,
        target: TargetPoolRef,
        result: Result<(), String>,
    ) -> Self {
        let (success, reason, error) = match result {
            Ok(()) => (true, OutcomeReason::FailedOver, None),
            Err(e) => (false, OutcomeReason::MutationFailed, Some(e)),
        };

        Self {
            invocation_id,
            triggered: true,
            success,
            reason,
            active,
            standby,
            target: Some(target),
            error,
        }
    }
}

/// Status object returned to whoever triggered the invocation.
///
/// Every completed invocation reports `200`, whether or not it failed over;
/// callers must read the body to learn what happened.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: InvocationBody,
}

/// Body of an [`InvocationResponse`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InvocationBody {
    Outcome(FailoverOutcome),
    Error { error: String },
}

impl InvocationResponse {
    pub fn completed(outcome: FailoverOutcome) -> Self {
        Self {
            status_code: 200,
            body: InvocationBody::Outcome(outcome),
        }
    }

    pub fn rejected(error: impl ToString) -> Self {
        Self {
            status_code: 400,
            body: InvocationBody::Error {
                error: error.to_string(),
            },
        }
    }

    /// The outcome, when the invocation ran to completion.
    pub fn outcome(&self) -> Option<&FailoverOutcome> {
        match &self.body {
            InvocationBody::Outcome(outcome) => Some(outcome),
            InvocationBody::Error { .. } => None,
        }
    }
}
