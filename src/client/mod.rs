//! Load balancer control-plane client.
//!
//! The controller only talks to the load balancer through [`LoadBalancerApi`],
//! so any transport can be injected at construction time.

mod http;
mod types;

pub use http::{HttpLoadBalancerClient, ACTION_HEADER};
pub use types::{ApiError, ApiErrorKind, MemberHealth, TargetState};

use crate::resource::{ListenerRef, TargetPoolRef};
use async_trait::async_trait;

/// Operations the failover controller needs from the load balancer.
#[async_trait]
pub trait LoadBalancerApi: Send + Sync {
    /// Read the health of every target registered in `pool`.
    async fn describe_target_health(
        &self,
        pool: &TargetPoolRef,
    ) -> Result<Vec<MemberHealth>, ApiError>;

    /// Replace the default actions of `listener` with a single forward to `pool`.
    async fn set_default_forward(
        &self,
        listener: &ListenerRef,
        pool: &TargetPoolRef,
        order: u32,
    ) -> Result<(), ApiError>;
}
