// In-memory fakes shared by application tests
use crate::application::event_repository::{BackendError, EventRepository};
use crate::application::media_store::{MediaStore, ProgressObserver};
use crate::domain::event::{ConstructionEvent, CreateEventData, UpdateEventData};
use crate::domain::upload::{MediaFile, UploadPolicy, UploadStep};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn sample_event(id: &str, pct: i32, expected_date: Option<&str>) -> ConstructionEvent {
    ConstructionEvent {
        id: id.to_string(),
        date: "2024-12-01T00:00:00.000Z".to_string(),
        title: format!("Milestone {id}"),
        url: None,
        poster: None,
        description: None,
        media_type: None,
        completion_percentage_at_event: pct,
        is_completed: None,
        created_at: None,
        updated_at: None,
        expected_date: expected_date.map(str::to_string),
    }
}

#[derive(Default)]
pub struct InMemoryEvents {
    events: Mutex<Vec<ConstructionEvent>>,
    calls: AtomicUsize,
    failure: Option<String>,
}

impl InMemoryEvents {
    pub fn with_events(events: Vec<ConstructionEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(BackendError::Network(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryEvents {
    async fn fetch_events(&self) -> Result<Vec<ConstructionEvent>, BackendError> {
        self.enter()?;
        Ok(self.events.lock().unwrap().clone())
    }

    async fn create_event(&self, data: &CreateEventData) -> Result<ConstructionEvent, BackendError> {
        self.enter()?;
        let mut events = self.events.lock().unwrap();
        let event = ConstructionEvent {
            id: format!("ev-{}", events.len() + 1),
            date: data.date.clone(),
            title: data.title.clone(),
            url: data.url.clone(),
            poster: data.poster.clone(),
            description: data.description.clone(),
            media_type: data.media_type,
            completion_percentage_at_event: data.completion_percentage_at_event,
            is_completed: Some(false),
            created_at: None,
            updated_at: None,
            expected_date: data.expected_date.clone(),
        };
        events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: &str, data: &UpdateEventData) -> Result<ConstructionEvent, BackendError> {
        self.enter()?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| BackendError::Status {
                status: 404,
                message: "Construction event not found".to_string(),
            })?;
        if let Some(pct) = data.completion_percentage_at_event {
            event.completion_percentage_at_event = pct;
        }
        if let Some(title) = &data.title {
            event.title = title.clone();
        }
        if let Some(date) = &data.date {
            event.date = date.clone();
        }
        if data.expected_date.is_some() {
            event.expected_date = data.expected_date.clone();
        }
        if data.is_completed.is_some() {
            event.is_completed = data.is_completed;
        }
        Ok(event.clone())
    }

    async fn delete_event(&self, id: &str) -> Result<(), BackendError> {
        self.enter()?;
        self.events.lock().unwrap().retain(|e| e.id != id);
        Ok(())
    }
}

/// Media store that records each handshake step and can fail at one of them.
#[derive(Default)]
pub struct ScriptedMediaStore {
    fail_at: Option<UploadStep>,
    steps: Mutex<Vec<UploadStep>>,
}

impl ScriptedMediaStore {
    pub fn failing_at(step: UploadStep) -> Self {
        Self {
            fail_at: Some(step),
            ..Default::default()
        }
    }

    pub fn steps(&self) -> Vec<UploadStep> {
        self.steps.lock().unwrap().clone()
    }

    fn enter(&self, step: UploadStep) -> anyhow::Result<()> {
        self.steps.lock().unwrap().push(step);
        if self.fail_at == Some(step) {
            anyhow::bail!("status 403");
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStore for ScriptedMediaStore {
    async fn request_policy(&self, file_name: &str) -> anyhow::Result<UploadPolicy> {
        self.enter(UploadStep::RequestPolicy)?;
        Ok(UploadPolicy {
            key: format!("uploads/{file_name}"),
            policy: "policy".to_string(),
            algorithm: "AWS4-HMAC-SHA256".to_string(),
            credential: "cred".to_string(),
            date: "20250101T000000Z".to_string(),
            signature: "sig".to_string(),
            bucket: "progress-media".to_string(),
            content_id: "cid-1".to_string(),
        })
    }

    async fn submit_object(
        &self,
        _policy: &UploadPolicy,
        _file: &MediaFile,
        progress: &ProgressObserver,
    ) -> anyhow::Result<()> {
        progress.send_replace(50);
        self.enter(UploadStep::SubmitObject)?;
        progress.send_replace(100);
        Ok(())
    }

    async fn register_content(&self, _storage_key: &str, _content_id: &str) -> anyhow::Result<String> {
        self.enter(UploadStep::RegisterContent)?;
        Ok("cid-registered".to_string())
    }

    async fn resolve_url(&self, content_id: &str) -> anyhow::Result<String> {
        self.enter(UploadStep::ResolveUrl)?;
        Ok(format!("https://cdn.example.com/content/{content_id}"))
    }
}
