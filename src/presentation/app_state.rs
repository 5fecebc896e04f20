// Application state for HTTP handlers
use crate::application::event_service::EventService;
use crate::application::timeline_service::TimelineService;
use crate::application::upload_service::UploadService;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub event_service: EventService,
    pub timeline_service: TimelineService,
    pub upload_service: UploadService,
    pub countdown_tick: Duration,
}
