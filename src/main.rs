//! Route table server.
//!
//! Serves the static routes declared in a TOML route table.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 TRIE ROUTER                  │
//!     Client Request │  ┌─────────┐    ┌──────────┐    ┌─────────┐ │
//!     ───────────────┼─▶│  http   │───▶│ routing  │───▶│ handler │ │
//!                    │  │ server  │    │  trie    │    │         │ │
//!                    │  └─────────┘    └──────────┘    └────┬────┘ │
//!     Client Response│                                      │      │
//!     ◀──────────────┼──────────────────────────────────────┘      │
//!                    │                                             │
//!                    │  ┌──────────┐ ┌──────────────┐ ┌──────────┐ │
//!                    │  │  config  │ │observability │ │lifecycle │ │
//!                    │  │ + reload │ │ logs/metrics │ │ shutdown │ │
//!                    │  └──────────┘ └──────────────┘ └──────────┘ │
//!                    └─────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use trie_router::config::{load_config, ConfigWatcher};
use trie_router::http::{build_route_table, HttpServer};
use trie_router::observability::{init_logging, metrics};
use trie_router::Shutdown;

#[derive(Parser)]
#[command(name = "trie-router")]
#[command(about = "Serve a static route table", long_about = None)]
struct Args {
    /// Route table file.
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    /// Reload the route table when the file changes.
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    init_logging(&config.observability);

    tracing::info!(
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::from_config(config.clone())?;

    let (table_tx, table_rx) = mpsc::unbounded_channel();
    let _watcher = if args.watch {
        let (watcher, mut config_rx) = ConfigWatcher::new(&args.config, config);
        let watcher = watcher.run()?;
        tokio::spawn(async move {
            while let Some(config) = config_rx.recv().await {
                match build_route_table(&config.routes) {
                    Ok(table) => {
                        if table_tx.send(table).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "Reloaded route table rejected"),
                }
            }
        });
        Some(watcher)
    } else {
        None
    };

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    server.run(listener, table_rx, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
