//! Configuration loading, parsing, and validation.

mod loader;
mod types;
mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use types::*;
pub use validation::validate_config;
