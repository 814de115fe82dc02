//! Metrics collection and exposition.

mod collector;
mod textfile;

pub use collector::{CallResult, InvocationResult, MetricsCollector, PoolRole};
pub use textfile::write_textfile;
