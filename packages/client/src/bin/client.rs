//! Sportify terminal client.
//!
//! Logs in against the Sportify backend and lets you browse, join and leave
//! events from a prompt. The session survives restarts in a small JSON file.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sportify-client
//! cargo run --bin sportify-client -- --api-url http://localhost:8080/v1 --log-level debug
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use sportify_client::{config::ClientConfig, ui::run_client};
use sportify_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "sportify-client")]
#[command(about = "Terminal client for the Sportify event platform", long_about = None)]
struct Args {
    /// Backend base URL including the /v1 prefix (overrides SPORTIFY_API_URL)
    #[arg(short = 'u', long)]
    api_url: Option<String>,

    /// Session file (overrides SPORTIFY_STORAGE_PATH)
    #[arg(short = 's', long)]
    storage: Option<PathBuf>,

    /// Request timeout in seconds (overrides SPORTIFY_REQUEST_TIMEOUT_SECS)
    #[arg(short = 't', long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Default log level when RUST_LOG is not set
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = args.api_url {
        config.api_base_url = api_url;
    }
    if let Some(storage) = args.storage {
        config.storage_path = storage;
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout = Duration::from_secs(timeout);
    }

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
