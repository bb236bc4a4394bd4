//! Cinemock demo binary.
//!
//! Loads the three collection resources, then either runs a scripted
//! tour of the simulated endpoints or reads request paths
//! interactively.
//!
//! # Configuration
//!
//! Configuration is loaded from:
//! 1. Configuration files (config/cinemock.toml, /etc/cinemock/config.toml)
//! 2. Environment variables (prefixed with CINEMOCK)
//!
//! See `config.rs` for detailed configuration options.

use anyhow::{Context, Result};
use cinemock::prelude::*;
use cinemock::ServiceConfig;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The scripted endpoint tour shown in demo mode.
const DEMO_REQUESTS: &[&str] = &[
    "/api/movies",
    "/api/movies?limit=1&genre=dram",
    "/api/movies/1997",
    "/api/persons",
    "/api/persons/110756",
    "/api/producers/3448",
    "/api/search?q=brothers",
    "/api/search?q=sample&type=producers",
    "/api/movies/424242",
    "/api/search",
];

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.service);

    info!(
        service = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting movie database API simulator"
    );

    config.validate().context("Invalid configuration")?;

    let args: Vec<String> = std::env::args().collect();
    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("demo");

    match mode {
        "demo" => {
            let api = start_api(&config).await?;
            run_tour(&api)?;
        }
        "repl" => {
            let api = start_api(&config).await?;
            run_repl(&api).await?;
        }
        "sample" => {
            // Skip the loader entirely and serve the built-in data.
            let api = MovieDatabaseApi::with_store(
                config.query.clone(),
                Arc::new(RecordStore::sample()),
            );
            info!("Serving built-in sample data");
            run_tour(&api)?;
        }
        _ => usage(),
    }

    Ok(())
}

/// Initialize the tracing/logging subsystem.
fn init_logging(config: &ServiceConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.log_format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }
}

/// Load the collections from disk, report their statuses, and build
/// the API over whatever loaded.
async fn start_api(config: &Config) -> Result<MovieDatabaseApi> {
    let loader = DataLoader::new(FileFetcher::new(&config.data));

    let store = loader
        .load()
        .await
        .context("Initial data load failed for every collection")?;

    for status in loader.statuses() {
        info!(
            collection = status.collection.as_str(),
            state = ?status.state,
            records = status.records,
            error = status.error.as_deref().unwrap_or(""),
            "Collection status"
        );
    }

    Ok(MovieDatabaseApi::with_store(
        config.query.clone(),
        Arc::new(store),
    ))
}

/// Run the scripted endpoint tour, printing each request and its
/// envelope.
fn run_tour(api: &MovieDatabaseApi) -> Result<()> {
    for request in DEMO_REQUESTS {
        print_response(api, request)?;
    }
    Ok(())
}

/// Read request paths from stdin until EOF.
async fn run_repl(api: &MovieDatabaseApi) -> Result<()> {
    println!("Enter request paths (e.g. /api/search?q=brothers), Ctrl-D to exit.");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        print_response(api, line)?;
    }

    Ok(())
}

fn print_response(api: &MovieDatabaseApi, request: &str) -> Result<()> {
    let envelope = api.handle(request);
    println!("GET {}", request);
    println!("{} {}", envelope.status, envelope.status_text());
    println!(
        "{}",
        envelope
            .to_pretty_json()
            .context("Failed to render response envelope")?
    );
    println!();
    Ok(())
}

fn usage() {
    println!("Usage: cinemock [demo|repl|sample]");
    println!();
    println!("Modes:");
    println!("  demo   - Load the collection files and run the scripted endpoint tour (default)");
    println!("  repl   - Load the collection files and read request paths from stdin");
    println!("  sample - Serve the built-in sample data without touching the loader");
    println!();
    println!("Environment variables:");
    println!("  CINEMOCK__DATA__DIR                - Directory with the collection JSON files (default: data)");
    println!("  CINEMOCK__DATA__SIMULATED_DELAY_MS - Artificial per-fetch latency (default: 250)");
    println!("  CINEMOCK__QUERY__DEFAULT_LIMIT     - Default page size (default: 10)");
    println!("  CINEMOCK__SERVICE__LOG_LEVEL       - trace|debug|info|warn|error (default: info)");
}
