//! Waqf lifecycle sweeper, entry point.
//!
//! Starts a background task that periodically reads the persisted waqf
//! snapshot, runs the engine's completion, distribution and maturity checks
//! over it, and writes a report of what needs attention. Runs until Ctrl-C.

mod config;
mod errors;
mod report;
mod store;
mod sweeper;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    info!(
        "Reports go to {} (default lock {} months)",
        config.report_path.display(),
        config.engine.default_lock_period_months
    );

    // ─── Background sweeper ───────────────────────────────
    let sweeper = tokio::spawn(sweeper::run(Arc::new(config)));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    sweeper.abort();

    Ok(())
}
