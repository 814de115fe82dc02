//! Failover controller.
//!
//! Runs one evaluate → decide → redirect pass per invocation. Nothing is
//! kept between invocations, and two overlapping invocations are not
//! serialized against each other.

use crate::client::LoadBalancerApi;
use crate::config::{ConfigError, FailoverConfig};
use crate::failover::{
    decide, Decision, FailoverOutcome, InvocationResponse, ListenerMutator, OutcomeReason,
};
use crate::health::{HealthEvaluator, PoolHealth};
use crate::metrics::{InvocationResult, MetricsCollector, PoolRole};
use crate::resource::{ListenerRef, TargetPoolRef};
use crate::util::InvocationId;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Validated references for one invocation.
#[derive(Debug, Clone)]
pub struct FailoverTargets {
    pub active: TargetPoolRef,
    pub passive: TargetPoolRef,
    pub listener: ListenerRef,
}

impl FailoverTargets {
    /// Build the references, rejecting empty ones and a passive pool that
    /// is the active pool.
    pub fn from_config(config: &FailoverConfig) -> Result<Self, ConfigError> {
        let active = TargetPoolRef::new("active_pool_ref", config.active_pool_ref.as_str())?;
        let passive = TargetPoolRef::new("passive_pool_ref", config.passive_pool_ref.as_str())?;
        if active == passive {
            return Err(ConfigError::ValidationError(format!(
                "active and passive pools are the same ('{}')",
                active
            )));
        }

        Ok(Self {
            active,
            passive,
            listener: ListenerRef::new("listener_ref", config.listener_ref.as_str())?,
        })
    }
}

/// Orchestrates health evaluation, the decision and the listener mutation.
pub struct FailoverController {
    config: FailoverConfig,
    evaluator: HealthEvaluator,
    mutator: ListenerMutator,
    metrics: MetricsCollector,
}

impl FailoverController {
    /// Create a controller that talks to the load balancer through `api`.
    pub fn new(
        api: Arc<dyn LoadBalancerApi>,
        config: FailoverConfig,
        metrics: MetricsCollector,
    ) -> Self {
        Self {
            evaluator: HealthEvaluator::new(Arc::clone(&api), config.sampling),
            mutator: ListenerMutator::new(api),
            config,
            metrics,
        }
    }

    /// Metrics recorded by this controller.
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Run a single invocation.
    ///
    /// Only a configuration problem is returned as an error, and it is
    /// detected before any call goes out. Backend failures end up in the
    /// outcome.
    pub async fn run_once(&self) -> Result<FailoverOutcome, ConfigError> {
        let invocation_id = InvocationId::new();
        let span = info_span!("invocation", id = %invocation_id);
        self.execute(invocation_id).instrument(span).await
    }

    async fn execute(&self, invocation_id: InvocationId) -> Result<FailoverOutcome, ConfigError> {
        let started = Instant::now();

        let targets = match FailoverTargets::from_config(&self.config) {
            Ok(targets) => targets,
            Err(e) => {
                error!(error = %e, "invalid failover configuration");
                self.metrics
                    .record_invocation(InvocationResult::ConfigError, started.elapsed());
                return Err(e);
            }
        };

        info!(
            active = %targets.active,
            passive = %targets.passive,
            listener = %targets.listener,
            "checking active pool"
        );

        let active = self.evaluate(PoolRole::Active, &targets.active).await;
        let id = invocation_id.into_string();

        let outcome = match decide(active.state) {
            Decision::NoAction => {
                info!(state = %active.state, "active pool healthy, no action");
                FailoverOutcome::no_action(id, active)
            }
            Decision::FailoverToPassive => self.fail_over(id, &targets, active).await,
        };

        let result = match outcome.reason {
            OutcomeReason::ActiveHealthy => InvocationResult::NoAction,
            OutcomeReason::FailedOver => InvocationResult::FailedOver,
            OutcomeReason::MutationFailed => InvocationResult::MutationFailed,
            OutcomeReason::StandbyUnhealthy => InvocationResult::StandbyUnhealthy,
        };
        self.metrics.record_invocation(result, started.elapsed());

        debug!(
            triggered = outcome.triggered,
            success = outcome.success,
            duration_ms = started.elapsed().as_millis(),
            "invocation finished"
        );

        Ok(outcome)
    }

    async fn fail_over(
        &self,
        invocation_id: String,
        targets: &FailoverTargets,
        active: PoolHealth,
    ) -> FailoverOutcome {
        warn!(
            state = %active.state,
            cause = ?active.cause,
            passive = %targets.passive,
            "active pool is not healthy, failing over"
        );

        let standby = if self.config.require_healthy_passive {
            let standby = self.evaluate(PoolRole::Passive, &targets.passive).await;
            if !standby.is_healthy() {
                error!(
                    passive = %targets.passive,
                    state = %standby.state,
                    "passive pool is not healthy either, failover withheld"
                );
                return FailoverOutcome::withheld(invocation_id, active, standby);
            }
            Some(standby)
        } else {
            None
        };

        let result = self.mutator.redirect(&targets.listener, &targets.passive).await;
        self.metrics.record_mutation(result.is_ok());

        if result.is_ok() {
            info!(
                listener = %targets.listener,
                passive = %targets.passive,
                "failed over to passive pool"
            );
        }

        FailoverOutcome::attempted(
            invocation_id,
            active,
            standby,
            targets.passive.clone(),
            result.map_err(|e| e.to_string()),
        )
    }

    async fn evaluate(&self, role: PoolRole, pool: &TargetPoolRef) -> PoolHealth {
        let health = self.evaluator.evaluate(pool).await;
        self.metrics.record_health_query(
            role,
            pool.as_str(),
            !health.query_failed(),
            health.is_healthy(),
        );
        health
    }
}

/// Entry point for a trigger.
///
/// `payload` is whatever the trigger delivered; the controller does not look
/// at it. A completed invocation always reports status `200`.
pub async fn handle_invocation(
    controller: &FailoverController,
    payload: &serde_json::Value,
) -> InvocationResponse {
    debug!(payload = %payload, "invocation payload received");

    match controller.run_once().await {
        Ok(outcome) => InvocationResponse::completed(outcome),
        Err(e) => InvocationResponse::rejected(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(active: &str, passive: &str) -> FailoverConfig {
        FailoverConfig {
            active_pool_ref: active.to_string(),
            passive_pool_ref: passive.to_string(),
            listener_ref: "listener-1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_targets_from_config() {
        let targets = FailoverTargets::from_config(&config("tg-A", "tg-B")).unwrap();
        assert_eq!(targets.active.as_str(), "tg-A");
        assert_eq!(targets.passive.as_str(), "tg-B");
        assert_eq!(targets.listener.as_str(), "listener-1");
    }

    #[test]
    fn test_targets_reject_same_pool() {
        let err = FailoverTargets::from_config(&config("tg-A", "tg-A")).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("are the same"));
    }

    #[test]
    fn test_targets_reject_empty_passive() {
        let err = FailoverTargets::from_config(&config("tg-A", " ")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingReference("passive_pool_ref")));
    }
}
