// ABOUTME: Server binary for the Winter Arc tracker
// ABOUTME: Loads env configuration, initializes the store, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Winter Arc Tracker Server Binary
//!
//! Starts the habit-tracking API: environment-driven configuration, the
//! configured store backend (SQLite or flat-file CSV), and the axum route
//! tree with graceful shutdown on ctrl-c.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use winter_arc_server::{
    auth::AuthManager,
    config::environment::ServerConfig,
    database_plugins::{factory::Store, StoreProvider},
    logging,
    resources::ServerResources,
    routes,
};

#[derive(Parser)]
#[command(name = "winter-arc-server")]
#[command(about = "Winter Arc Tracker - habit tracking API with activity scoring and ranks")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the store URL (sqlite:… or csv:…)
    #[arg(long)]
    store_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment, then apply CLI overrides.
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(store_url) = args.store_url {
        config.store.url =
            winter_arc_server::config::environment::StoreUrl::parse_url(&store_url);
    }

    logging::init_from_env()?;

    info!("Starting Winter Arc Tracker");
    info!("{}", config.summary());

    let store = Store::new(&config.store.url).await?;
    store.migrate().await?;
    info!("Store initialized successfully: {}", store.backend_info());

    let resources = Arc::new(ServerResources::new(
        store,
        AuthManager::default(),
        Arc::new(config.clone()),
    ));

    let app = routes::router(resources);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {error}");
        return;
    }
    info!("Shutdown signal received");
}
