//! Retention sweep for persisted credentials
//!
//! Deletes expired OAuth tokens and API keys past their retention period,
//! once or on an interval.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use rh_core::clock::SystemClock;
use rh_core::services::{CleanupConfig, CredentialCleanupService};
use rh_infra::database::{DatabasePool, MySqlApiKeyRepository, MySqlOAuthRepository};
use rh_infra::telemetry::init_tracing;
use rh_shared::config::AppConfig;

#[derive(Parser)]
#[command(name = "rh-identity-sweeper", about = "Purge expired OAuth tokens and API keys", version)]
struct Cli {
    /// Keep running and sweep every `--interval` seconds
    #[arg(long)]
    watch: bool,

    /// Seconds between sweeps in watch mode
    #[arg(long, default_value_t = 3600)]
    interval: u64,

    /// Override the API key retention period in days
    #[arg(long)]
    retention_days: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.logging);

    let database = DatabasePool::new(&config.database)
        .await
        .context("connecting to the database")?;
    let pool = database.get_pool().clone();

    let cleanup = Arc::new(CredentialCleanupService::new(
        Arc::new(MySqlOAuthRepository::new(pool.clone())),
        Arc::new(MySqlApiKeyRepository::new(pool)),
        Arc::new(SystemClock),
        CleanupConfig {
            interval_seconds: cli.interval,
            api_key_retention_days: cli
                .retention_days
                .unwrap_or(config.auth.api_keys.retention_days),
            enabled: true,
        },
    ));

    if cli.watch {
        let handle = cleanup
            .start_background_task()
            .context("cleanup is disabled")?;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
            result = handle => {
                if let Err(e) = result {
                    error!("Cleanup task ended unexpectedly: {}", e);
                }
            }
        }
    } else {
        let result = cleanup.run_cleanup().await?;
        info!(
            oauth_tokens = result.oauth_tokens_deleted,
            api_keys = result.api_keys_purged,
            "Sweep finished"
        );
        if !result.is_success() {
            anyhow::bail!("sweep finished with errors: {:?}", result.errors);
        }
    }

    database.close().await;
    Ok(())
}
