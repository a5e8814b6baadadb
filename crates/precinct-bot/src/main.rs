//! Precinct bot binary.
//!
//! Loads `precinct.toml`, opens the SQLite store, restores open shifts,
//! starts the keep-alive stub, then bridges platform events over stdio.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use precinct_bot::{BotConfig, Dispatcher, StdioGateway, keepalive, stdio};
use precinct_core::detect::PhraseMatcher;
use precinct_service::{IncidentMonitor, ShiftTracker};
use precinct_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Precinct duty bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "precinct.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config = BotConfig::load(&cli.config)?;
  let tz = config.offset()?;

  let matcher = PhraseMatcher::new(&config.flagged_phrase)
    .context("bad flagged_phrase in config")?;

  // Open the store and rebuild the open-shift index.
  let store = Arc::new(
    SqliteStore::open(&config.store_path)
      .await
      .with_context(|| format!("failed to open store at {:?}", config.store_path))?,
  );

  let tracker = ShiftTracker::new(store.clone(), tz);
  let restored = tracker.restore().await;
  tracing::info!(restored, "open shifts restored");

  let monitor = IncidentMonitor::new(store, matcher);
  let dispatcher =
    Dispatcher::new(tracker, monitor, StdioGateway::new(), config.clone(), tz);

  // Keep-alive stub for the hosting platform's liveness probe.
  let (host, port) = (config.keepalive_host.clone(), config.keepalive_port);
  tokio::spawn(async move {
    if let Err(e) = keepalive::serve(host, port).await {
      tracing::error!(error = %e, "keep-alive server failed");
    }
  });

  dispatcher.announce().await;
  stdio::run_event_loop(&dispatcher).await
}
