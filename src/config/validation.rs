//! Configuration validation.

use crate::config::Config;
use hyper::Uri;

/// Validate the configuration.
///
/// Checks for:
/// - Non-empty active, passive and listener references
/// - Distinct active and passive pools
/// - An `http://` endpoint with a host
/// - Non-zero timeouts
/// - A known log level
///
/// # Returns
///
/// `Ok(())` if valid, or an error message describing every problem found.
pub fn validate_config(config: &Config) -> Result<(), String> {
    let mut errors = Vec::new();
    let failover = &config.failover;

    let references = [
        ("active_pool_ref", &failover.active_pool_ref),
        ("passive_pool_ref", &failover.passive_pool_ref),
        ("listener_ref", &failover.listener_ref),
    ];
    for (field, value) in references {
        if value.trim().is_empty() {
            errors.push(format!("{} must be set", field));
        }
    }

    if !failover.active_pool_ref.trim().is_empty()
        && failover.active_pool_ref == failover.passive_pool_ref
    {
        errors.push(format!(
            "active and passive pools are the same ('{}')",
            failover.active_pool_ref
        ));
    }

    // Endpoint
    match config.backend.endpoint.parse::<Uri>() {
        Ok(uri) => {
            if uri.scheme_str() != Some("http") {
                errors.push(format!(
                    "endpoint '{}' must use the http scheme",
                    config.backend.endpoint
                ));
            }
            if uri.host().is_none() {
                errors.push(format!("endpoint '{}' has no host", config.backend.endpoint));
            }
        }
        Err(e) => errors.push(format!(
            "invalid endpoint '{}': {}",
            config.backend.endpoint, e
        )),
    }

    if config.backend.request_timeout.is_zero() {
        errors.push("request_timeout must be greater than zero".to_string());
    }
    if config.backend.connect_timeout.is_zero() {
        errors.push("connect_timeout must be greater than zero".to_string());
    }

    // Validate log level
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.global.log_level.to_lowercase().as_str()) {
        errors.push(format!(
            "invalid log level '{}', must be one of: {}",
            config.global.log_level,
            valid_levels.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}
