// REST backend client for construction events
use crate::application::event_repository::{BackendError, EventRepository};
use crate::domain::event::{ConstructionEvent, CreateEventData, UpdateEventData};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};

/// Envelope every backend endpoint answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn events_url(&self) -> String {
        format!("{}/api/construction-events", self.base_url)
    }

    fn event_url(&self, id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(id))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<Option<T>, BackendError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Network error talking to backend: {}", e);
            BackendError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| fallback.to_string());
            tracing::error!("Backend returned {}: {}", status, body);
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        if !envelope.success {
            let message = if envelope.message.is_empty() {
                fallback.to_string()
            } else {
                envelope.message
            };
            return Err(BackendError::Rejected(message));
        }

        Ok(envelope.data)
    }
}

#[async_trait]
impl EventRepository for BackendClient {
    async fn fetch_events(&self) -> Result<Vec<ConstructionEvent>, BackendError> {
        let url = self.events_url();
        tracing::debug!("Fetching construction events from {}", url);

        self.execute(self.client.get(&url), "Failed to fetch construction events")
            .await?
            .ok_or_else(|| BackendError::Rejected("Failed to fetch construction events".to_string()))
    }

    async fn create_event(&self, data: &CreateEventData) -> Result<ConstructionEvent, BackendError> {
        let url = self.events_url();
        tracing::debug!("Creating construction event at {}", url);

        self.execute(self.client.post(&url).json(data), "Failed to create construction event")
            .await?
            .ok_or_else(|| BackendError::Decode("response carried no event".to_string()))
    }

    async fn update_event(&self, id: &str, data: &UpdateEventData) -> Result<ConstructionEvent, BackendError> {
        let url = self.event_url(id);
        tracing::debug!("Updating construction event at {}", url);

        self.execute(self.client.patch(&url).json(data), "Failed to update construction event")
            .await?
            .ok_or_else(|| BackendError::Decode("response carried no event".to_string()))
    }

    async fn delete_event(&self, id: &str) -> Result<(), BackendError> {
        let url = self.event_url(id);
        tracing::debug!("Deleting construction event at {}", url);

        self.execute::<IgnoredAny>(self.client.delete(&url), "Failed to delete construction event")
            .await?;
        Ok(())
    }
}
