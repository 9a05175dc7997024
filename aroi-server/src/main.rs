//! Aroi Server
//!
//! A headless food-ordering backend: order intake, delivery fee tiers,
//! lifecycle tracking, and payment/refund reconciliation.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use aroi_core::handshake::HandshakeStore;
use aroi_core::processors::RefundNotifier;
use aroi_core::storage::InMemoryOrderStore;
use aroi_core::{events::refund_signal_channel, storage::OrderStore};
use clap::Parser;
use config::ConfigLoader;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Aroi - headless food-ordering backend
#[derive(Parser, Debug)]
#[command(name = "aroi-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./aroi-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting aroi-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Assemble the core: handshake store, order store, refund pipeline
    let handshake = HandshakeStore::new(loaded_config.handshake_ttl);
    let orders: Arc<dyn OrderStore> = Arc::new(InMemoryOrderStore::new());
    let (refund_tx, refund_rx) = refund_signal_channel();

    let (worker_shutdown_tx, worker_shutdown_rx) = watch::channel(false);
    let notifier = RefundNotifier::new(refund_rx, worker_shutdown_rx);
    let notifier_handle = tokio::spawn(notifier.run());

    // Create application state
    let state = AppState::new(handshake, orders, loaded_config.tiers, refund_tx);

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the background tasks to stop
    shutdown_notify.notify_one();
    let _ = worker_shutdown_tx.send(true);
    match notifier_handle.await {
        Ok(handled) => tracing::info!(refund_signals = handled, "Refund notifier drained"),
        Err(e) => tracing::error!("Refund notifier task failed: {}", e),
    }

    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
