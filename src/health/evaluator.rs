//! Target pool health evaluation.
//!
//! Queries the control plane for a pool's members and reduces them to a
//! single [`HealthState`].

use crate::client::{LoadBalancerApi, MemberHealth};
use crate::config::SamplingPolicy;
use crate::health::{HealthCause, HealthState, PoolHealth};
use crate::resource::TargetPoolRef;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Evaluates the health of one target pool per call.
#[derive(Clone)]
pub struct HealthEvaluator {
    api: Arc<dyn LoadBalancerApi>,
    sampling: SamplingPolicy,
}

impl HealthEvaluator {
    /// Create an evaluator that uses `sampling` to reduce member states.
    pub fn new(api: Arc<dyn LoadBalancerApi>, sampling: SamplingPolicy) -> Self {
        Self { api, sampling }
    }

    /// Query `pool` once and reduce the answer.
    ///
    /// A failed query yields [`HealthState::Unknown`] instead of an error.
    pub async fn evaluate(&self, pool: &TargetPoolRef) -> PoolHealth {
        match self.api.describe_target_health(pool).await {
            Ok(members) => {
                debug!(pool = %pool, members = members.len(), "target health described");
                let health = reduce(pool, &members, self.sampling);
                if !health.is_healthy() {
                    warn!(pool = %pool, state = %health.state, cause = ?health.cause, "pool not healthy");
                }
                health
            }
            Err(e) => {
                error!(pool = %pool, error = %e, kind = ?e.kind(), "target health query failed");
                PoolHealth {
                    pool: pool.clone(),
                    state: HealthState::Unknown,
                    cause: HealthCause::QueryFailed {
                        error: e.to_string(),
                    },
                }
            }
        }
    }
}

/// Reduce member health records to a pool state.
pub fn reduce(pool: &TargetPoolRef, members: &[MemberHealth], sampling: SamplingPolicy) -> PoolHealth {
    let Some(first) = members.first() else {
        return PoolHealth {
            pool: pool.clone(),
            state: HealthState::Unknown,
            cause: HealthCause::NoMembers,
        };
    };

    let (state, cause) = match sampling {
        SamplingPolicy::FirstMember => (
            member_state(first),
            HealthCause::MemberReported {
                target_id: first.target_id.clone(),
                member_state: first.state,
            },
        ),
        SamplingPolicy::AllMembers => {
            let unhealthy = members.iter().filter(|m| !m.state.is_healthy()).count();
            if unhealthy == 0 {
                (
                    HealthState::Healthy,
                    HealthCause::AllMembersHealthy {
                        members: members.len(),
                    },
                )
            } else {
                (
                    HealthState::Unhealthy,
                    HealthCause::UnhealthyMembers {
                        unhealthy,
                        members: members.len(),
                    },
                )
            }
        }
    };

    PoolHealth {
        pool: pool.clone(),
        state,
        cause,
    }
}

fn member_state(member: &MemberHealth) -> HealthState {
    if member.state.is_healthy() {
        HealthState::Healthy
    } else {
        HealthState::Unhealthy
    }
}
