//! Run the HTTP API.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::{load_config, open_catalog};
use crate::config::LoggingConfig;
use crate::generation::{GeminiClient, GenerationService};
use crate::http::{self, AppState};

/// Serve the API until Ctrl-C.
///
/// `--port` and `--host` override `[server]` from the config file.
pub async fn execute(
    config_path: Option<&Path>,
    port_override: Option<u16>,
    host_override: Option<&str>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    init_logging(&config.logging);

    if let Some(port) = port_override {
        config.server.port = port;
    }
    if let Some(host) = host_override {
        config.server.host = host.to_string();
    }

    let metrics = if config.metrics.enabled {
        Some(http::metrics::install_recorder()?)
    } else {
        None
    };

    let catalog = open_catalog(&config)?;
    // Load once so migration and genre provisioning happen before the first request.
    let snapshot = catalog.store().load().await?;

    let model = GeminiClient::new(&config.generation)?;
    if config.generation.api_key().is_none() {
        warn!(
            env = %config.generation.api_key_env,
            "Image model API key not set; generate and edit will fail"
        );
    }
    let generation =
        GenerationService::new(Arc::new(model), catalog.clone(), config.generation.timeout());

    let app = http::router(AppState {
        catalog,
        generation,
        metrics,
    });

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .with_context(|| {
                format!(
                    "Failed to bind {}:{}",
                    config.server.host, config.server.port
                )
            })?;
    let addr: SocketAddr = listener
        .local_addr()
        .context("Failed to read listener address")?;

    info!(
        %addr,
        images = snapshot.images.len(),
        folders = snapshot.folders.len(),
        model = %config.generation.model,
        metrics = config.metrics.enabled,
        "notecraft listening"
    );
    println!("notecraft listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Initialize stdout logging, JSON lines when `[logging] json = true`.
fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}
