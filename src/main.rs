//! Web Monitor Binary

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web_monitor::config::DEFAULT_CONFIG_PATH;
use web_monitor::{Config, WebMonitor};

#[derive(Debug, Parser)]
#[command(version, about = "Polls HTTP services and reports status changes")]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, env = "WM_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[actix_web::main]
async fn main() {
    initialize_tracing();

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Error reading config file {}: {}", args.config.display(), e);
            eprintln!("Error reading config file: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Loaded configuration from {} - {} services, interval {}s, port {}",
        args.config.display(),
        config.services.len(),
        config.interval,
        config.port
    );

    let mut monitor = match WebMonitor::new(config) {
        Ok(monitor) => monitor,
        Err(e) => {
            error!("Failed to initialize web monitor: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = monitor.start().await {
        error!("Web monitor failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize structured logging on stderr; stdout carries status output
fn initialize_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
