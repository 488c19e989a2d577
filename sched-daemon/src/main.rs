//! Quantum Scheduler - shared network server.
//!
//! A single binary that:
//! - persists named schedule documents as JSON files
//! - serves the bundled web front-end
//! - probes a small port range and writes the bound port to a side file
//!   for the desktop tray controller to discover

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod migrate;
mod port;
mod server;

use config::Config;
use sched_core::{DefaultSchedule, ProjectStore};
use server::{create_router, AppState};

/// Quantum Scheduler shared network server
#[derive(Parser, Debug)]
#[command(name = "sched-daemon")]
#[command(about = "Quantum Scheduler shared network server")]
#[command(version)]
struct Cli {
    /// Directory where schedule data is stored
    #[arg(long, default_value = "./server")]
    data_dir: PathBuf,

    /// Front-end directory (overrides auto-detection next to the data dir)
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Legacy data folder checked once at startup for migration (repeatable)
    #[arg(long = "legacy-dir")]
    legacy_dirs: Vec<PathBuf>,

    /// Base port; this port and the nine after it are probed in order
    #[arg(short, long, env = "PORT", default_value_t = 8088)]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    std::fs::create_dir_all(&cli.data_dir)?;
    let data_dir = cli.data_dir.canonicalize().unwrap_or(cli.data_dir.clone());

    let config = Config::resolve(data_dir, cli.static_dir, cli.legacy_dirs, cli.port);
    info!("Data directory:   {:?}", config.data_dir);
    info!("Static directory: {:?}", config.static_dir);

    let legacy = DefaultSchedule::new(&config.data_dir);
    migrate::migrate_legacy_schedule(legacy.path(), &config.legacy_dirs);

    let store = ProjectStore::open(&config.data_dir)?;

    let state = AppState {
        store: Arc::new(store),
        legacy: Arc::new(legacy),
        static_dir: config.static_dir.clone(),
    };

    let (listener, bound_port) = match port::bind_first_free(config.base_port).await {
        Ok(bound) => bound,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };
    port::write_port_file(&config.port_file(), bound_port);

    let router = create_router(state);
    info!("Scheduler server listening on http://localhost:{}", bound_port);

    axum::serve(listener, router).await?;
    Ok(())
}
