//! CLI module for Guild Settings
//!
//! Provides subcommands operating on the configured cache and store:
//! - `get`: show a guild's settings, creating them on first sight
//! - `prefix`: run the `prefix` chat command for a guild
//! - `message`: handle a raw chat message the way the bot would
//! - `check`: verify both tiers are reachable

pub mod check;
pub mod get;
pub mod message;
pub mod prefix;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::observability::{init_metrics, PrometheusMetrics};
use crate::AppState;

/// Guild Settings - per-guild bot settings over a cache and a durable store
#[derive(Parser)]
#[command(name = "guild-settings")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a guild's settings
    Get(get::GetArgs),

    /// Run the prefix command for a guild
    Prefix(prefix::PrefixArgs),

    /// Handle a chat message sent in a guild
    Message(message::MessageArgs),

    /// Ping the cache and the store
    Check,
}

/// Everything a subcommand needs once start-up is done
pub(crate) struct Runtime {
    pub state: AppState,
    metrics: Option<PrometheusMetrics>,
}

impl Runtime {
    /// Loads `.env` and configuration, then wires both tiers
    pub async fn start() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig::load()?;
        init_logging(&config.logging)?;

        let metrics = init_metrics(&config.metrics);
        let state = crate::create_app_state_with_config(&config).await?;

        Ok(Self { state, metrics })
    }

    /// Logs the metrics snapshot collected during the run
    pub fn shutdown(self) {
        if let Some(metrics) = self.metrics {
            info!(snapshot = %metrics.render(), "Metrics at shutdown");
        }
    }
}
