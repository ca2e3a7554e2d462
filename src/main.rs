//! Built-in web server.
//!
//! Serves the files of configured projects over HTTP on the loopback
//! interface, the way an IDE's built-in server previews a project.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ routing::matcher ──▶ routing::router
//!                     (request id,     (project by host     (top-level path
//!                      trace, timeout)  or path prefix)      handlers)
//!                                                                │
//!                                                                ▼
//!                                                      http::dispatcher
//!                     security::token ◀──────────────────────────┤
//!                     project (cache, resolver, index) ◀─────────┤
//!                     routing::redirect ◀────────────────────────┤
//!                     security::navigation, access_control ◀─────┤
//!                     handlers::chain ◀──────────────────────────┘
//!     Client Response
//!     ◀────────────── first handler response, redirect, 401/403/404
//!
//!     Cross-cutting: config (load, validate, watch), observability
//!     (logging, metrics), lifecycle (signals, shutdown)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use builtin_server::config::{load_config, ConfigWatcher, WebServerConfig};
use builtin_server::http::HttpServer;
use builtin_server::lifecycle::{signals, Shutdown};
use builtin_server::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "builtin-server", about = "Serve project files over HTTP")]
struct Cli {
    /// Configuration file (TOML). Watched for project changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,

    /// Answer 404 instead of 403 for forbidden resources.
    #[arg(long)]
    safe_mode: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WebServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if cli.safe_mode {
        config.serve.safe_mode = true;
    }

    logging::init_logging(&config.observability);
    tracing::info!("builtin-server v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        projects = config.projects.len(),
        safe_mode = config.serve.safe_mode,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server
    let (config_updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => (tokio::sync::mpsc::unbounded_channel().1, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
