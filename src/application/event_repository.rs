// Repository trait for construction event access
use crate::domain::event::{ConstructionEvent, CreateEventData, UpdateEventData};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message} (Status: {status})")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("Invalid response format from server: {0}")]
    Decode(String),
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Fetch every construction event
    async fn fetch_events(&self) -> Result<Vec<ConstructionEvent>, BackendError>;

    async fn create_event(&self, data: &CreateEventData) -> Result<ConstructionEvent, BackendError>;

    /// Apply a partial update to an existing event
    async fn update_event(&self, id: &str, data: &UpdateEventData) -> Result<ConstructionEvent, BackendError>;

    async fn delete_event(&self, id: &str) -> Result<(), BackendError>;
}
