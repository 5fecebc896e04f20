// Timeline service - Builds the public progress view from fetched events
use crate::application::event_repository::{BackendError, EventRepository};
use crate::domain::countdown::{CountdownSnapshot, CountdownTarget, select_target};
use crate::domain::timeline::{Timeline, render};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub timeline: Timeline,
    pub countdown: CountdownSnapshot,
    pub event_count: usize,
}

#[derive(Clone)]
pub struct TimelineService {
    repository: Arc<dyn EventRepository>,
}

impl TimelineService {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    /// Fetch the latest events and render them as of `now`.
    pub async fn progress_view(&self, now: DateTime<Utc>) -> Result<ProgressView, BackendError> {
        let events = self.repository.fetch_events().await?;
        tracing::debug!("Rendering timeline for {} events", events.len());

        let timeline = render(&events);
        tracing::debug!(
            "Timeline has {} markers, terminal at {:?}",
            timeline.segments.iter().filter(|s| s.has_marker()).count(),
            timeline.segments.iter().position(|s| s.is_terminal())
        );
        let countdown = CountdownSnapshot::at(select_target(&events), now);

        Ok(ProgressView {
            timeline,
            countdown,
            event_count: events.len(),
        })
    }

    pub async fn countdown_target(&self) -> Result<Option<CountdownTarget>, BackendError> {
        let events = self.repository.fetch_events().await?;
        let target = select_target(&events);
        match &target {
            Some(t) => tracing::debug!("Countdown target {} from event {}", t.at, t.event_id),
            None => tracing::debug!("No countdown target among {} events", events.len()),
        }
        Ok(target)
    }
}
