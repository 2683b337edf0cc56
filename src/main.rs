//! CloudStore server: sharing, visibility, and trash over a REST API.
//!
//! Entry point that loads configuration, sets up logging, and dispatches
//! the CLI command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use cloudstore_core::config::{AppConfig, LoggingConfig};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load_from(&cli.config_dir, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(config).await {
        tracing::error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing; `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
