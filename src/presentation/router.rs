// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    create_event, delete_event, get_timeline, health_check, list_events, stream_countdown,
    update_event, upload_media,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/timeline", get(get_timeline))
        .route("/api/countdown/stream", get(stream_countdown))
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/:id", patch(update_event).delete(delete_event))
        .route(
            "/api/uploads",
            post(upload_media).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
