//! Aircon Panel - Main entry point

use aircon_client::{AcClient, Session};
use anyhow::Result;
use bevy::app::AppExit;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "aircon-panel")]
#[command(about = "3D building AC control panel")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "aircon-panel.toml")]
    config: PathBuf,

    /// Backend base URL, overrides the configuration file
    #[arg(short, long)]
    backend: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

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

    info!("aircon-panel v{}", env!("CARGO_PKG_VERSION"));

    let mut config = aircon_panel::load_config(&args.config)?;
    if let Some(backend) = args.backend {
        config.backend.url = backend;
    }

    info!(
        backend = %config.backend.url,
        user = %config.backend.user,
        poll_secs = config.backend.poll_interval_secs,
        "Configuration loaded"
    );

    // Network work runs here; the Bevy loop owns the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let client = AcClient::new(config.backend.url.clone(), config.backend.user.clone())?;
    let session = Session::new(client);

    match aircon_panel::run(config, session, runtime) {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("panel exited with code {code}"),
    }
}
