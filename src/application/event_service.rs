// Event service - Admin use cases for managing construction events
use crate::application::event_repository::{BackendError, EventRepository};
use crate::domain::event::{ConstructionEvent, CreateEventData, UpdateEventData, ValidationError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Clone)]
pub struct EventService {
    repository: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_events(&self) -> Result<Vec<ConstructionEvent>, BackendError> {
        self.repository.fetch_events().await
    }

    pub async fn create_event(&self, data: CreateEventData) -> Result<ConstructionEvent, EventServiceError> {
        let data = data.validated()?;
        let created = self.repository.create_event(&data).await?;
        tracing::info!("Created construction event {} ({}%)", created.id, created.completion_percentage_at_event);
        Ok(created)
    }

    pub async fn update_event(&self, id: &str, data: UpdateEventData) -> Result<ConstructionEvent, EventServiceError> {
        let data = data.validated()?;
        let updated = self.repository.update_event(id, &data).await?;
        tracing::info!("Updated construction event {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), BackendError> {
        self.repository.delete_event(id).await?;
        tracing::info!("Deleted construction event {}", id);
        Ok(())
    }
}
