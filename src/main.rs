mod backend;
mod config;
mod error;
mod filter;
mod forms;
mod models;
mod repository;
mod routes;
mod session;
mod state;
mod views;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use models::NewListing;
use state::AppState;

/// One entry of a seed file: a listing plus already-hosted image URLs
#[derive(Debug, Deserialize)]
struct SeedListing {
    #[serde(flatten)]
    listing: NewListing,
    #[serde(default)]
    image_urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏠 Housing Listings");
    info!("==========================================");

    let config = Config::load()?;
    let state = AppState::new(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [command, path] if command == "seed" => seed(&config, &state, path).await,
        [] => serve(&config, state).await,
        _ => bail!("usage: housing-listings [seed <file.json>]"),
    }
}

async fn serve(config: &Config, state: Arc<AppState>) -> Result<()> {
    let app = routes::router(state);
    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!("🚀 Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 Server stopped");
    Ok(())
}

async fn seed(config: &Config, state: &AppState, path: &str) -> Result<()> {
    let Some(service_key) = config.service_key.as_deref() else {
        bail!("SUPABASE_SERVICE_KEY must be set to seed listings");
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {path}"))?;
    let entries: Vec<SeedListing> =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {path}"))?;

    info!("🌱 Seeding {} listings from {}", entries.len(), path);

    let mut stored = 0;
    for entry in &entries {
        match state
            .repository
            .seed(&entry.listing, &entry.image_urls, service_key)
            .await
        {
            Ok(property) => {
                stored += 1;
                info!("   {} -> {}", property.title, property.id);
            }
            Err(e) => warn!("   Skipping {}: {}", entry.listing.title, e),
        }
    }

    info!("💾 Stored {} of {} listings", stored, entries.len());
    if stored < entries.len() {
        bail!("{} listings could not be stored", entries.len() - stored);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
