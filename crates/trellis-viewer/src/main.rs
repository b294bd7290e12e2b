//! Trellis - IFC building-model viewer
//!
//! Parses arguments, sets up logging, loads the configuration file, and
//! hands off to the Bevy application.

mod app;
mod config;
mod loader;
mod model;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(about = "IFC building-model viewer with an orbit camera")]
#[command(version)]
struct Args {
    /// IFC file to load on startup
    model: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, default_value = "trellis.toml")]
    config: PathBuf,

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

    info!("Trellis v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config(&args.config)?;

    app::run(config, args.model);

    Ok(())
}
