//! lbfailover - Active/passive failover for a load balancer listener
//!
//! This crate provides a single-pass failover controller that:
//! - Evaluates the health of the active target pool
//! - Decides whether traffic must move to the passive pool
//! - Repoints the listener's default forward action
//! - Reports a structured outcome and Prometheus metrics

pub mod client;
pub mod config;
pub mod failover;
pub mod health;
pub mod metrics;
pub mod resource;
pub mod util;

pub use config::Config;
pub use failover::{FailoverController, FailoverOutcome};
