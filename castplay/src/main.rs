//! castplay - Main entry point
//!
//! Receives media URLs over HTTP and opens them in a full-screen external
//! player, closing the previously opened player first.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use castplay::player::{PlaybackController, PlayerLauncher};
use castplay_common::config::{ConfigOverrides, ServiceConfig};
use castplay_common::logging;
use clap::Parser;
use tracing::{info, warn};

/// Command-line arguments for castplay
#[derive(Parser, Debug)]
#[command(name = "castplay")]
#[command(about = "Opens posted video URLs in a full-screen player")]
#[command(version)]
struct Args {
    /// Interface to listen on
    #[arg(long, env = "CASTPLAY_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CASTPLAY_PORT")]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long, env = "CASTPLAY_CONFIG")]
    config: Option<PathBuf>,

    /// Milliseconds a replaced player gets to exit before it is killed
    #[arg(long, env = "CASTPLAY_GRACE_PERIOD_MS")]
    grace_period_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CASTPLAY_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        ConfigOverrides {
            config_path: args.config,
            host: args.host,
            port: args.port,
            grace_period_ms: args.grace_period_ms,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging level comes from the config, so load it first
    let config = ServiceConfig::load(args.into()).context("Failed to load configuration")?;
    logging::init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!(
        "Starting castplay v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(ignored) = &config.ignored {
        warn!(
            "Ignoring config file {}: {}",
            ignored.path.display(),
            ignored.reason
        );
    }
    match &config.source {
        Some(path) => info!("Configuration file: {}", path.display()),
        None => info!("No usable configuration file, using defaults"),
    }

    let controller = Arc::new(PlaybackController::new(
        PlayerLauncher::system(),
        config.grace_period,
    ));
    info!("Player grace period: {:?}", controller.grace_period());

    castplay::api::run(&config, Arc::clone(&controller))
        .await
        .context("Server error")?;

    if config.stop_player_on_exit {
        info!("Stopping player before exit");
        controller.stop().await;
    } else {
        controller.release().await;
    }

    info!("Server shutdown complete");
    Ok(())
}
