use std::sync::Arc;

use anyhow::Context;
use bolt_client::ArgoClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod service;

use crate::api::AppState;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bolt_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bolt API...");

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        "Submitting workflows to namespace {} as {}",
        config.compiler.namespace,
        config.compiler.service_account
    );

    let client = ArgoClient::try_default()
        .await
        .context("Failed to create Argo client")?;

    // Build router with all API endpoints
    let app = api::create_router(AppState {
        config: Arc::new(config.compiler),
        submitter: Arc::new(client),
    });

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
