// HTTP request handlers
use crate::application::countdown_task::CountdownTask;
use crate::application::media_store::progress_channel;
use crate::domain::event::{ConstructionEvent, CreateEventData, UpdateEventData};
use crate::domain::upload::{MediaFile, MediaKind, UploadOutcome};
use crate::infrastructure::chunked_json::ndjson_stream;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::AppError;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Same envelope the backend uses, so the admin panel can talk to either.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    fn ok(message: &str, data: Option<T>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            data,
        })
    }
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub file_name: String,
    pub kind: Option<MediaKind>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Rendered progress timeline plus countdown snapshot
pub async fn get_timeline(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let view = state.timeline_service.progress_view(Utc::now()).await?;
    Ok(json_response(&view, accepts_brotli(&headers)).await?)
}

/// Countdown ticks as NDJSON; the timer stops when the client disconnects
pub async fn stream_countdown(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let target = state.timeline_service.countdown_target().await?;
    let task = CountdownTask::spawn(target, state.countdown_tick);
    Ok(ndjson_stream(task.into_stream())?)
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<ConstructionEvent>>>, AppError> {
    let events = state.event_service.list_events().await?;
    Ok(Envelope::ok("Construction events retrieved", Some(events)))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(data): Json<CreateEventData>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.create_event(data).await?;
    Ok((
        StatusCode::CREATED,
        Envelope::ok("Event created successfully", Some(event)),
    ))
}

pub async fn update_event(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(data): Json<UpdateEventData>,
) -> Result<Json<Envelope<ConstructionEvent>>, AppError> {
    let event = state.event_service.update_event(&id, data).await?;
    Ok(Envelope::ok("Event updated successfully", Some(event)))
}

pub async fn delete_event(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<()>>, AppError> {
    state.event_service.delete_event(&id).await?;
    Ok(Envelope::ok("Event deleted successfully", None))
}

/// Upload a video or poster and answer with its delivery URL
pub async fn upload_media(
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let file = MediaFile::new(
        query.file_name,
        content_type,
        query.kind.unwrap_or(MediaKind::Video),
        body,
    )?;

    let (observer, mut progress) = progress_channel();
    let file_name = file.file_name.clone();
    tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            tracing::debug!("Upload {}: {}%", file_name, *progress.borrow());
        }
    });

    let outcome = state.upload_service.upload(file, &observer).await;
    let status = match outcome {
        UploadOutcome::Uploaded { .. } => StatusCode::OK,
        UploadOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(outcome)))
}
