//! Configuration data types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub global: GlobalConfig,

    /// Which pools and listener this controller manages
    #[serde(default)]
    pub failover: FailoverConfig,

    /// Load balancer control-plane endpoint settings
    #[serde(default)]
    pub backend: BackendApiConfig,
}

/// Global configuration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Json,
            metrics: MetricsConfig::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Metrics output configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Prometheus textfile to write after each invocation (node-exporter style)
    #[serde(default)]
    pub textfile: Option<PathBuf>,
}

/// The pools and listener handled by one invocation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FailoverConfig {
    /// Target pool currently serving traffic
    #[serde(default)]
    pub active_pool_ref: String,

    /// Standby target pool that receives traffic on failover
    #[serde(default)]
    pub passive_pool_ref: String,

    /// Listener whose default forward action is repointed
    #[serde(default)]
    pub listener_ref: String,

    /// How member health is reduced to a pool state
    #[serde(default)]
    pub sampling: SamplingPolicy,

    /// Withhold failover when the passive pool is not healthy either
    #[serde(default)]
    pub require_healthy_passive: bool,
}

/// How the members of a pool are reduced to a single health state.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// The first reported member decides the pool state.
    #[default]
    FirstMember,
    /// Every member must be healthy.
    AllMembers,
}

/// Load balancer control-plane endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendApiConfig {
    /// Base URL of the control-plane endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Upper bound for a single API call, connect included
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Timeout for establishing the TCP connection
    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for BackendApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// Values supplied by the entrypoint (flags or environment) that take
/// precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub active_pool_ref: Option<String>,
    pub passive_pool_ref: Option<String>,
    pub listener_ref: Option<String>,
    pub endpoint: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Apply entrypoint overrides on top of this configuration.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(v) = overrides.active_pool_ref {
            self.failover.active_pool_ref = v;
        }
        if let Some(v) = overrides.passive_pool_ref {
            self.failover.passive_pool_ref = v;
        }
        if let Some(v) = overrides.listener_ref {
            self.failover.listener_ref = v;
        }
        if let Some(v) = overrides.endpoint {
            self.backend.endpoint = v;
        }
        if let Some(v) = overrides.log_level {
            self.global.log_level = v;
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8600".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(2)
}

/// Custom serde module for humantime durations.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
