//! lbfailover - Active/passive failover for a load balancer listener
//!
//! Usage:
//!     lbfailover [--config <path>] [--active-pool <ref>] [--passive-pool <ref>] [--listener <ref>]
//!
//! See --help for more options.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use lbfailover::client::HttpLoadBalancerClient;
use lbfailover::config::{resolve_config, Config, ConfigOverrides};
use lbfailover::failover::{handle_invocation, FailoverController, InvocationResponse};
use lbfailover::metrics::{write_textfile, MetricsCollector};
use lbfailover::util::init_logging;

/// Fail a load balancer listener over from its active to its passive target pool.
#[derive(Parser, Debug)]
#[command(name = "lbfailover")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Active target pool reference
    #[arg(long, value_name = "REF", env = "ACTIVE_TG_ARN")]
    active_pool: Option<String>,

    /// Passive target pool reference
    #[arg(long, value_name = "REF", env = "PASSIVE_TG_ARN")]
    passive_pool: Option<String>,

    /// Listener whose default action is repointed
    #[arg(long, value_name = "REF", env = "ELB_LISTENER_ARN")]
    listener: Option<String>,

    /// Control-plane endpoint URL
    #[arg(long, value_name = "URL", env = "LBFAILOVER_ENDPOINT")]
    endpoint: Option<String>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Trigger payload, passed through to the invocation as JSON
    #[arg(long, value_name = "JSON", default_value = "{}")]
    event: String,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        active_pool_ref: cli.active_pool.clone(),
        passive_pool_ref: cli.passive_pool.clone(),
        listener_ref: cli.listener.clone(),
        endpoint: cli.endpoint.clone(),
        log_level: cli.log_level.clone(),
    };

    // Load configuration (CLI and environment override the file).
    // A rejected configuration still answers with a status object.
    let config = match resolve_config(cli.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            let response = InvocationResponse::rejected(&e);
            println!(
                "{}",
                serde_json::to_string(&response).context("failed to encode response")?
            );
            return Err(anyhow::Error::new(e).context("failed to load configuration"));
        }
    };

    // Initialize logging
    init_logging(&config.global.log_level, &config.global.log_format);

    // If --validate flag, just validate and exit
    if cli.validate {
        let client = HttpLoadBalancerClient::new(&config.backend)
            .context("failed to create control-plane client")?;
        info!("Configuration is valid");
        println!("Configuration is valid.");
        println!("  Active pool:  {}", config.failover.active_pool_ref);
        println!("  Passive pool: {}", config.failover.passive_pool_ref);
        println!("  Listener:     {}", config.failover.listener_ref);
        println!("  Sampling:     {:?}", config.failover.sampling);
        println!("  Endpoint:     {}", client.endpoint());
        return Ok(());
    }

    let payload: serde_json::Value =
        serde_json::from_str(&cli.event).context("--event is not valid JSON")?;

    info!(
        config_path = ?cli.config,
        endpoint = %config.backend.endpoint,
        sampling = ?config.failover.sampling,
        require_healthy_passive = config.failover.require_healthy_passive,
        "lbfailover starting"
    );

    let response = run(config, payload)?;

    println!(
        "{}",
        serde_json::to_string(&response).context("failed to encode response")?
    );

    if response.status_code != 200 {
        anyhow::bail!("invocation rejected with status {}", response.status_code);
    }

    Ok(())
}

/// Run a single invocation with the given configuration.
fn run(config: Config, payload: serde_json::Value) -> Result<InvocationResponse> {
    // Create tokio runtime
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(async { run_async(config, payload).await })
}

/// Async entry point for one invocation.
async fn run_async(config: Config, payload: serde_json::Value) -> Result<InvocationResponse> {
    let client = HttpLoadBalancerClient::new(&config.backend)
        .context("failed to create control-plane client")?;

    let metrics = MetricsCollector::new();
    let controller = FailoverController::new(Arc::new(client), config.failover, metrics.clone());

    let response = handle_invocation(&controller, &payload).await;

    match response.outcome() {
        Some(outcome) if outcome.triggered && !outcome.success => {
            error!(reason = ?outcome.reason, error = ?outcome.error, "failover did not complete");
        }
        Some(outcome) => {
            info!(
                triggered = outcome.triggered,
                success = outcome.success,
                reason = ?outcome.reason,
                "invocation complete"
            );
        }
        None => {}
    }

    if let Some(path) = &config.global.metrics.textfile {
        if let Err(e) = write_textfile(&metrics, path) {
            warn!(error = %e, path = %path.display(), "failed to write metrics textfile");
        }
    }

    Ok(response)
}
