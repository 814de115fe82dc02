//! Health evaluation for target pools.

mod evaluator;
mod state;

pub use evaluator::{reduce, HealthEvaluator};
pub use state::{HealthCause, HealthState, PoolHealth};
