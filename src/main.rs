//! # Kiosk CLI
//!
//! ## Usage
//!
//! ```bash
//! # Serve with settings from a config file
//! kiosk serve --config config.json
//!
//! # Listen on another address
//! kiosk serve --listen 127.0.0.1:8080 --config config.json
//!
//! # Verbose logs, as JSON
//! RUST_LOG=kiosk=debug KIOSK_LOG_JSON=1 kiosk serve --config config.json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kiosk::{
    Config, KioskError,
    backend::ImmichClient,
    server::{self, AppState, ServerConfig},
};

/// Kiosk - photo slideshow for Immich
#[derive(Parser, Debug)]
#[command(name = "kiosk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:3000")]
        listen: String,

        /// JSON config file (defaults are used when omitted)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Immich server URL (overrides the config file)
        #[arg(long)]
        immich_url: Option<String>,

        /// Immich API key (overrides the config file)
        #[arg(long)]
        immich_api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), KioskError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            config,
            immich_url,
            immich_api_key,
        } => {
            let mut base = match config {
                Some(path) => Config::load(path)?,
                None => Config::default(),
            };
            if let Some(url) = immich_url {
                base.immich_url = url;
            }
            if let Some(key) = immich_api_key {
                base.immich_api_key = key;
            }
            base.validate()?;

            if base.immich_url.is_empty() {
                return Err(KioskError::Config(
                    "no Immich URL configured (set immichUrl or --immich-url)".to_string(),
                ));
            }

            let backend = ImmichClient::new(&base.immich_url, &base.immich_api_key)?;
            let state = AppState::new(base, Arc::new(backend));

            server::serve(ServerConfig { listen_addr: listen }, state).await
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`), as JSON when
/// `KIOSK_LOG_JSON` is set to a truthy value.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("KIOSK_LOG_JSON")
        .ok()
        .and_then(|v| kiosk::overlay::parse_bool(&v))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
