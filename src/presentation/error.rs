use crate::application::event_repository::BackendError;
use crate::application::event_service::EventServiceError;
use crate::domain::event::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Internal error")]
    Internal(StatusCode),
}

impl From<EventServiceError> for AppError {
    fn from(err: EventServiceError) -> Self {
        match err {
            EventServiceError::Validation(e) => AppError::Validation(e),
            EventServiceError::Backend(e) => AppError::Backend(e),
        }
    }
}

impl From<StatusCode> for AppError {
    fn from(status: StatusCode) -> Self {
        AppError::Internal(status)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Backend(BackendError::Status { status: 404, .. }) => StatusCode::NOT_FOUND,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(status) => *status,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(json!({ "success": false, "message": self.to_string() }))).into_response()
    }
}
