// Countdown task - Recurring, cancellable countdown ticks for one consumer
use crate::domain::countdown::{CountdownSnapshot, CountdownTarget};
use chrono::{DateTime, Utc};
use futures::stream::Stream;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

const TICK_BUFFER: usize = 8;

/// Per-consumer countdown state.
#[derive(Debug)]
pub struct CountdownTicker {
    target: Option<CountdownTarget>,
    overdue_logged: bool,
}

impl CountdownTicker {
    pub fn new(target: Option<CountdownTarget>) -> Self {
        Self {
            target,
            overdue_logged: false,
        }
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> CountdownSnapshot {
        let snapshot = CountdownSnapshot::at(self.target.clone(), now);
        let Some(target) = &self.target else {
            return snapshot;
        };

        if snapshot.remaining.overdue {
            // Log once per overdue stretch
            if !self.overdue_logged {
                tracing::warn!("Project is overdue! Target date: {}", target.at.format("%-m/%-d/%Y"));
                self.overdue_logged = true;
            }
        } else {
            self.overdue_logged = false;
            if snapshot.remaining.seconds == 0 {
                let r = &snapshot.remaining;
                tracing::debug!("Countdown: {}d {}h {}m {}s remaining", r.days, r.hours, r.minutes, r.seconds);
            }
        }

        snapshot
    }

    pub fn overdue_logged(&self) -> bool {
        self.overdue_logged
    }
}

/// Owned handle to a running countdown. Dropping it stops the timer.
pub struct CountdownTask {
    handle: JoinHandle<()>,
    ticks: mpsc::Receiver<CountdownSnapshot>,
}

impl CountdownTask {
    /// Tick immediately, then once per `period`.
    pub fn spawn(target: Option<CountdownTarget>, period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(TICK_BUFFER);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut intervals = IntervalStream::new(interval);
            let mut ticker = CountdownTicker::new(target);

            while intervals.next().await.is_some() {
                if tx.send(ticker.tick(Utc::now())).await.is_err() {
                    tracing::debug!("Countdown consumer gone, stopping timer (overdue: {})", ticker.overdue_logged());
                    break;
                }
            }
        });

        Self { handle, ticks: rx }
    }

    pub async fn next_tick(&mut self) -> Option<CountdownSnapshot> {
        self.ticks.recv().await
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Consume the task as a stream of ticks; the timer lives as long as the stream.
    pub fn into_stream(self) -> impl Stream<Item = CountdownSnapshot> + Send + 'static {
        let mut task = self;
        async_stream::stream! {
            while let Some(tick) = task.next_tick().await {
                yield tick;
            }
        }
    }
}

impl Drop for CountdownTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
