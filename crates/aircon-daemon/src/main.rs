//! Aircon Daemon - Backend service for the control panel
//!
//! Serves unit state from JSON files in the data directory and applies
//! commands sent by the panel.

mod api;
mod config;
mod server;
mod state;
mod store;
mod validate;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "aircond")]
#[command(about = "Building AC state and command service")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "aircond.toml")]
    config: PathBuf,

    /// Bind address for the API server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write demo unit state into the data directory if none exists
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("aircond v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_config(&args.config)?;

    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }

    info!(
        data_dir = %config.data.dir.display(),
        min_set_temp = config.limits.min_set_temp,
        max_set_temp = config.limits.max_set_temp,
        "Configuration loaded"
    );

    let state = state::AppState::new(config.clone());

    if args.init && !state.store.init_demo().await? {
        info!("Data directory already initialized");
    }

    server::run(state, &config.daemon.bind, config.daemon.tls.as_ref()).await?;

    Ok(())
}
