//! Active/passive failover.

mod controller;
mod decision;
mod mutator;
mod outcome;

pub use controller::{handle_invocation, FailoverController, FailoverTargets};
pub use decision::{decide, Decision};
pub use mutator::{ListenerMutator, MutationError, DEFAULT_ACTION_ORDER};
pub use outcome::{FailoverOutcome, InvocationBody, InvocationResponse, OutcomeReason};
