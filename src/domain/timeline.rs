// Progress timeline renderer
//
// Maps milestone events onto a fixed row of bars. Bar heights follow a cubic
// ease-in between neighbouring milestones; the bar nearest each milestone's
// percentage carries a marker.
use super::event::ConstructionEvent;
use super::media::{is_youtube_url, youtube_embed_url};
use serde::Serialize;

pub const NUM_BARS: usize = 200;
pub const BASE_HEIGHT: f64 = 36.0;
pub const INACTIVE_HEIGHT: f64 = 40.0;
const HEIGHT_PER_PERCENT: f64 = 2.0;
const CURVE_POWER: i32 = 3;
const MARKER_GAP: f64 = 12.0;
const TERMINAL_MARKER_GAP: f64 = 20.0;

pub const ACCENT_COLOR: &str = "#fde047";
pub const REACHED_COLOR: &str = "#ffffff";
pub const UNREACHED_COLOR: &str = "#666666";

/// Interpolation control point derived from one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPoint {
    pub bar_index: usize,
    pub percentage: u32,
}

impl EventPoint {
    const ORIGIN: EventPoint = EventPoint {
        bar_index: 0,
        percentage: 0,
    };

    fn height(&self) -> f64 {
        BASE_HEIGHT + self.percentage as f64 * HEIGHT_PER_PERCENT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentFill {
    /// Bar holding a marker.
    Accent,
    /// Inside an interpolation span, before the last milestone.
    Reached,
    /// Beyond the last milestone.
    Unreached,
}

impl SegmentFill {
    pub fn color(&self) -> &'static str {
        match self {
            SegmentFill::Accent => ACCENT_COLOR,
            SegmentFill::Reached => REACHED_COLOR,
            SegmentFill::Unreached => UNREACHED_COLOR,
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            SegmentFill::Accent | SegmentFill::Reached => 0.8,
            SegmentFill::Unreached => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentWidth {
    Narrow,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPlacement {
    /// Compact pill centred on the bar, preview expands on hover.
    Centered,
    /// Large preview anchored to the left edge of the bar.
    LeftAligned,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub event_id: String,
    pub title: String,
    pub percentage: u32,
    pub terminal: bool,
    pub placement: MarkerPlacement,
    /// Vertical offset at which the overlay sits above the baseline.
    pub anchor_height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Video is a YouTube embed rather than a direct file.
    pub embedded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub height: f64,
    pub fill: SegmentFill,
    pub color: &'static str,
    pub opacity: f64,
    pub width: SegmentWidth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

impl Segment {
    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    pub fn is_terminal(&self) -> bool {
        self.marker.as_ref().is_some_and(|m| m.terminal)
    }
}

/// "NN% Completed" annotation placed next to the terminal marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionSummary {
    pub percentage: u32,
    pub event_id: String,
    pub segment_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CompletionSummary>,
}

/// Clamp a stored percentage into the drawable range.
pub fn clamp_percentage(value: i32) -> u32 {
    value.clamp(0, 100) as u32
}

pub fn bar_index(percentage: u32) -> usize {
    ((percentage as f64 / 100.0) * (NUM_BARS - 1) as f64).round() as usize
}

/// Control points sorted by bar index. Ties keep event order.
pub fn event_points(events: &[ConstructionEvent]) -> Vec<EventPoint> {
    let mut points: Vec<EventPoint> = events
        .iter()
        .map(|e| {
            let percentage = clamp_percentage(e.completion_percentage_at_event);
            EventPoint {
                bar_index: bar_index(percentage),
                percentage,
            }
        })
        .collect();
    points.sort_by_key(|p| p.bar_index);
    points
}

/// Index of the first event holding the strictly highest percentage.
fn terminal_event(events: &[ConstructionEvent]) -> Option<usize> {
    if events.is_empty() {
        return None;
    }
    let mut terminal = 0;
    let mut highest = 0;
    for (idx, event) in events.iter().enumerate() {
        let pct = clamp_percentage(event.completion_percentage_at_event);
        if pct > highest {
            highest = pct;
            terminal = idx;
        }
    }
    Some(terminal)
}

/// The control points surrounding bar `index`.
fn enclosing_span(points: &[EventPoint], index: usize) -> (EventPoint, Option<EventPoint>) {
    let mut prev = EventPoint::ORIGIN;
    for point in points {
        if index < point.bar_index {
            return (prev, Some(*point));
        }
        prev = *point;
    }
    (prev, None)
}

fn interpolated_height(index: usize, prev: EventPoint, next: EventPoint) -> f64 {
    let span = next.bar_index.saturating_sub(prev.bar_index);
    let local_progress = if span == 0 {
        1.0
    } else {
        (index - prev.bar_index) as f64 / span as f64
    };
    let curved = local_progress.powi(CURVE_POWER);
    let min_height = prev.height();
    let max_height = next.height();
    let height = min_height + (max_height - min_height) * curved;
    height.max(BASE_HEIGHT)
}

fn marker_for(
    event: &ConstructionEvent,
    terminal: bool,
    bar_height: f64,
) -> Marker {
    let gap = if terminal { TERMINAL_MARKER_GAP } else { MARKER_GAP };
    Marker {
        event_id: event.id.clone(),
        title: event.title.clone(),
        percentage: clamp_percentage(event.completion_percentage_at_event),
        terminal,
        placement: if terminal {
            MarkerPlacement::LeftAligned
        } else {
            MarkerPlacement::Centered
        },
        anchor_height: bar_height.max(BASE_HEIGHT) + gap,
        video_url: event.url.as_deref().map(youtube_embed_url),
        embedded: event.url.as_deref().is_some_and(is_youtube_url),
        poster: event.poster.clone(),
    }
}

/// Render the progress timeline for `events`. Never fails; an empty list
/// yields a flat, unmarked row.
pub fn render(events: &[ConstructionEvent]) -> Timeline {
    for event in events {
        if !(0..=100).contains(&event.completion_percentage_at_event) {
            tracing::warn!(
                "Event {} has out-of-range completion {}%, clamping",
                event.id,
                event.completion_percentage_at_event
            );
        }
    }

    let points = event_points(events);
    let bar_indices: Vec<usize> = events
        .iter()
        .map(|e| bar_index(clamp_percentage(e.completion_percentage_at_event)))
        .collect();
    let terminal = terminal_event(events);

    let segments = (0..NUM_BARS)
        .map(|index| {
            // First event in list order wins a shared bar.
            let event_idx = bar_indices.iter().position(|&b| b == index);
            let (prev, next) = enclosing_span(&points, index);

            let (height, fill) = match next {
                Some(next) => (interpolated_height(index, prev, next), SegmentFill::Reached),
                None if event_idx.is_some() => (prev.height().max(INACTIVE_HEIGHT), SegmentFill::Unreached),
                None => (INACTIVE_HEIGHT, SegmentFill::Unreached),
            };

            let marker = event_idx.map(|idx| {
                let anchor_base = match next {
                    Some(next) => interpolated_height(index, prev, next),
                    None => prev.height(),
                };
                marker_for(&events[idx], Some(idx) == terminal, anchor_base)
            });
            let fill = if marker.is_some() { SegmentFill::Accent } else { fill };

            Segment {
                index,
                height,
                fill,
                color: fill.color(),
                opacity: fill.opacity(),
                width: if marker.is_some() {
                    SegmentWidth::Wide
                } else {
                    SegmentWidth::Narrow
                },
                marker,
            }
        })
        .collect();

    let summary = terminal.map(|idx| {
        let event = &events[idx];
        CompletionSummary {
            percentage: clamp_percentage(event.completion_percentage_at_event),
            event_id: event.id.clone(),
            segment_index: bar_indices[idx],
        }
    });

    Timeline { segments, summary }
}
