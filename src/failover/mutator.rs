//! Listener default-action mutation.

use crate::client::{ApiError, LoadBalancerApi};
use crate::resource::{ListenerRef, TargetPoolRef};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Order value of the single default forward action.
pub const DEFAULT_ACTION_ORDER: u32 = 1;

/// The listener could not be repointed.
#[derive(Debug, Error)]
#[error("failed to repoint listener '{listener}' to '{target}': {source}")]
pub struct MutationError {
    pub listener: ListenerRef,
    pub target: TargetPoolRef,
    #[source]
    pub source: ApiError,
}

/// Repoints a listener's default forward action.
#[derive(Clone)]
pub struct ListenerMutator {
    api: Arc<dyn LoadBalancerApi>,
}

impl ListenerMutator {
    pub fn new(api: Arc<dyn LoadBalancerApi>) -> Self {
        Self { api }
    }

    /// Send all of `listener`'s default traffic to `target`.
    ///
    /// Issues exactly one mutation call, even when the listener already
    /// points at `target`. Failures are returned without retrying.
    pub async fn redirect(
        &self,
        listener: &ListenerRef,
        target: &TargetPoolRef,
    ) -> Result<(), MutationError> {
        match self
            .api
            .set_default_forward(listener, target, DEFAULT_ACTION_ORDER)
            .await
        {
            Ok(()) => {
                info!(listener = %listener, target = %target, "listener default action repointed");
                Ok(())
            }
            Err(e) => {
                error!(
                    listener = %listener,
                    target = %target,
                    error = %e,
                    kind = ?e.kind(),
                    "listener mutation failed"
                );
                Err(MutationError {
                    listener: listener.clone(),
                    target: target.clone(),
                    source: e,
                })
            }
        }
    }
}
