// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::event_service::EventService;
use crate::application::timeline_service::TimelineService;
use crate::application::upload_service::UploadService;
use crate::infrastructure::backend_client::BackendClient;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::filemanager_client::FileManagerClient;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create clients (infrastructure layer)
    let http = reqwest::Client::new();
    let events = Arc::new(BackendClient::new(http.clone(), config.backend.base_url.clone()));
    let media = Arc::new(FileManagerClient::new(
        http,
        config.backend.base_url.clone(),
        config.storage.endpoint_template.clone(),
    ));

    // Create services (application layer)
    let state = Arc::new(AppState {
        event_service: EventService::new(events.clone()),
        timeline_service: TimelineService::new(events),
        upload_service: UploadService::new(media),
        countdown_tick: config.countdown.tick_interval(),
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting construction-progress service on {} (backend {})", addr, config.backend.base_url);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
