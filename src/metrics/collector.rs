//! Metrics collector using prometheus-client.
//!
//! Provides metrics for invocations, health queries, pool health and
//! listener mutations.

use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use std::time::Duration;

/// Which of the two configured pools a metric refers to.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum PoolRole {
    Active,
    Passive,
}

/// How an invocation ended.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum InvocationResult {
    NoAction,
    FailedOver,
    MutationFailed,
    StandbyUnhealthy,
    ConfigError,
}

/// Outcome of a single control-plane call.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum CallResult {
    Success,
    Failure,
}

impl From<bool> for CallResult {
    fn from(ok: bool) -> Self {
        if ok {
            CallResult::Success
        } else {
            CallResult::Failure
        }
    }
}

/// Labels for invocation metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct InvocationLabels {
    pub result: InvocationResult,
}

/// Labels for health query metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HealthQueryLabels {
    pub role: PoolRole,
    pub result: CallResult,
}

/// Labels for pool health metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct PoolLabels {
    pub role: PoolRole,
    pub pool: String,
}

/// Labels for listener mutation metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MutationLabels {
    pub result: CallResult,
}

/// Collects and stores all metrics.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<MetricsCollectorInner>,
}

struct MetricsCollectorInner {
    /// Invocations by result.
    invocations_total: Family<InvocationLabels, Counter>,
    /// Invocation duration histogram (in seconds).
    invocation_duration_seconds: Histogram,
    /// Health queries by pool role and result.
    health_queries_total: Family<HealthQueryLabels, Counter>,
    /// Pool health gauge (1 = healthy, 0 = not healthy).
    pool_health: Family<PoolLabels, Gauge>,
    /// Listener mutations by result.
    mutations_total: Family<MutationLabels, Counter>,
    /// The prometheus registry.
    registry: Registry,
}

impl MetricsCollector {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let invocations_total = Family::<InvocationLabels, Counter>::default();
        // Buckets: 10ms up to ~20s
        let invocation_duration_seconds = Histogram::new(exponential_buckets(0.01, 2.5, 9));
        let health_queries_total = Family::<HealthQueryLabels, Counter>::default();
        let pool_health = Family::<PoolLabels, Gauge>::default();
        let mutations_total = Family::<MutationLabels, Counter>::default();

        registry.register(
            "lbfailover_invocations",
            "Total number of failover invocations",
            invocations_total.clone(),
        );
        registry.register(
            "lbfailover_invocation_duration_seconds",
            "Invocation duration in seconds",
            invocation_duration_seconds.clone(),
        );
        registry.register(
            "lbfailover_health_queries",
            "Total number of target health queries",
            health_queries_total.clone(),
        );
        registry.register(
            "lbfailover_pool_health",
            "Target pool health status (1=healthy, 0=not healthy)",
            pool_health.clone(),
        );
        registry.register(
            "lbfailover_mutations",
            "Total number of listener mutation calls",
            mutations_total.clone(),
        );

        Self {
            inner: Arc::new(MetricsCollectorInner {
                invocations_total,
                invocation_duration_seconds,
                health_queries_total,
                pool_health,
                mutations_total,
                registry,
            }),
        }
    }

    /// Get the prometheus registry for encoding.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Record a finished invocation.
    pub fn record_invocation(&self, result: InvocationResult, duration: Duration) {
        self.inner
            .invocations_total
            .get_or_create(&InvocationLabels { result })
            .inc();
        self.inner
            .invocation_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Record a health query and, when it got an answer, the pool's health.
    pub fn record_health_query(&self, role: PoolRole, pool: &str, answered: bool, healthy: bool) {
        let labels = HealthQueryLabels {
            role,
            result: answered.into(),
        };
        self.inner.health_queries_total.get_or_create(&labels).inc();

        if !answered {
            return;
        }

        let labels = PoolLabels {
            role,
            pool: pool.to_string(),
        };
        self.inner
            .pool_health
            .get_or_create(&labels)
            .set(if healthy { 1 } else { 0 });
    }

    /// Record a listener mutation call.
    pub fn record_mutation(&self, success: bool) {
        self.inner
            .mutations_total
            .get_or_create(&MutationLabels {
                result: success.into(),
            })
            .inc();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;

    fn encoded(collector: &MetricsCollector) -> String {
        let mut buffer = String::new();
        encode(&mut buffer, collector.registry()).unwrap();
        buffer
    }

    #[test]
    fn test_record_invocation() {
        let collector = MetricsCollector::new();
        collector.record_invocation(InvocationResult::FailedOver, Duration::from_millis(120));

        let buffer = encoded(&collector);
        assert!(buffer.contains("lbfailover_invocations_total{result=\"FailedOver\"} 1"));
        assert!(buffer.contains("lbfailover_invocation_duration_seconds_count 1"));
    }

    #[test]
    fn test_pool_health_gauge() {
        let collector = MetricsCollector::new();
        collector.record_health_query(PoolRole::Active, "tg-A", true, false);

        let buffer = encoded(&collector);
        assert!(buffer.contains("lbfailover_pool_health{role=\"Active\",pool=\"tg-A\"} 0"));
        assert!(buffer.contains("lbfailover_health_queries_total{role=\"Active\",result=\"Success\"} 1"));
    }

    #[test]
    fn test_mutation_counter() {
        let collector = MetricsCollector::new();
        collector.record_mutation(false);
        collector.record_mutation(false);

        let buffer = encoded(&collector);
        assert!(buffer.contains("lbfailover_mutations_total{result=\"Failure\"} 2"));
    }

    #[test]
    fn test_failed_query_leaves_pool_health_unset() {
        let collector = MetricsCollector::new();
        collector.record_health_query(PoolRole::Passive, "tg-B", false, false);

        let buffer = encoded(&collector);
        assert!(buffer.contains("lbfailover_health_queries_total{role=\"Passive\",result=\"Failure\"} 1"));
        assert!(!buffer.contains("pool=\"tg-B\""));
    }
}
