//! Utility functions and helpers.

mod invocation_id;
mod logging;

pub use invocation_id::InvocationId;
pub use logging::init_logging;
