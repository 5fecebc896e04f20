// Countdown to the expected completion date
use super::event::{ConstructionEvent, parse_event_date};
use super::timeline::clamp_percentage;
use chrono::{DateTime, Utc};
use serde::Serialize;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    ExpectedDate,
    /// Fallback when no event carries an expected date.
    EventDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownTarget {
    pub at: DateTime<Utc>,
    pub source: TargetSource,
    pub percentage: u32,
    pub event_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_seconds: i64,
    pub overdue: bool,
}

fn highest_completion<'a, F>(events: &'a [ConstructionEvent], date_of: F) -> Option<(&'a ConstructionEvent, DateTime<Utc>)>
where
    F: Fn(&'a ConstructionEvent) -> Option<&'a str>,
{
    let mut best: Option<(&ConstructionEvent, DateTime<Utc>)> = None;
    for event in events {
        let Some(at) = date_of(event).and_then(parse_event_date) else {
            continue;
        };
        let replace = match best {
            None => true,
            Some((current, _)) => {
                clamp_percentage(event.completion_percentage_at_event)
                    > clamp_percentage(current.completion_percentage_at_event)
            }
        };
        if replace {
            best = Some((event, at));
        }
    }
    best
}

/// Pick the countdown target: the expected date of the most complete event,
/// falling back to its plain date when no event has an expected date.
pub fn select_target(events: &[ConstructionEvent]) -> Option<CountdownTarget> {
    let (event, at, source) =
        if let Some((event, at)) = highest_completion(events, |e| e.expected_date.as_deref()) {
            (event, at, TargetSource::ExpectedDate)
        } else if let Some((event, at)) = highest_completion(events, |e| Some(e.date.as_str())) {
            (event, at, TargetSource::EventDate)
        } else {
            return None;
        };

    Some(CountdownTarget {
        at,
        source,
        percentage: clamp_percentage(event.completion_percentage_at_event),
        event_id: event.id.clone(),
        title: event.title.clone(),
    })
}

/// Time left until `target`, floored to zero once it has passed.
pub fn remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> Remaining {
    let diff_ms = (target - now).num_milliseconds();
    if diff_ms <= 0 {
        return Remaining {
            overdue: true,
            ..Remaining::default()
        };
    }

    let total_seconds = diff_ms / 1000;
    Remaining {
        days: total_seconds / SECS_PER_DAY,
        hours: (total_seconds % SECS_PER_DAY) / SECS_PER_HOUR,
        minutes: (total_seconds % SECS_PER_HOUR) / SECS_PER_MINUTE,
        seconds: total_seconds % SECS_PER_MINUTE,
        total_seconds,
        overdue: false,
    }
}

pub fn target_label(target: Option<&CountdownTarget>, now: DateTime<Utc>) -> String {
    let Some(target) = target else {
        return "No target date set".to_string();
    };
    let date = target.at.format("%-m/%-d/%Y");
    let overdue = if target.at < now { " (Overdue)" } else { "" };
    match target.source {
        TargetSource::ExpectedDate => {
            format!("Expected Completion: {date} ({}%){overdue}", target.percentage)
        }
        TargetSource::EventDate => {
            format!("Target: {date} (Using date field, {}%){overdue}", target.percentage)
        }
    }
}

pub fn today_label(now: DateTime<Utc>) -> String {
    now.format("%a, %b %-d").to_string()
}

/// Everything the countdown widget shows at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<CountdownTarget>,
    pub remaining: Remaining,
    pub label: String,
    pub today: String,
}

impl CountdownSnapshot {
    pub fn at(target: Option<CountdownTarget>, now: DateTime<Utc>) -> Self {
        let remaining = target
            .as_ref()
            .map(|t| remaining(t.at, now))
            .unwrap_or_default();
        Self {
            label: target_label(target.as_ref(), now),
            today: today_label(now),
            remaining,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id: &str, pct: i32, date: &str, expected: Option<&str>) -> ConstructionEvent {
        ConstructionEvent {
            id: id.to_string(),
            date: date.to_string(),
            title: id.to_uppercase(),
            url: None,
            poster: None,
            description: None,
            media_type: None,
            completion_percentage_at_event: pct,
            is_completed: None,
            created_at: None,
            updated_at: None,
            expected_date: expected.map(str::to_string),
        }
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_highest_percentage_wins_regardless_of_order() {
        let a = event("a", 30, "2024-01-01", Some("2025-01-01"));
        let b = event("b", 80, "2024-02-01", Some("2025-06-01"));

        for events in [vec![a.clone(), b.clone()], vec![b, a]] {
            let target = select_target(&events).unwrap();
            assert_eq!(target.at, utc(2025, 6, 1));
            assert_eq!(target.source, TargetSource::ExpectedDate);
            assert_eq!(target.event_id, "b");
        }
    }

    #[test]
    fn test_over_range_percentages_compare_clamped() {
        let events = vec![
            event("a", 100, "2024-01-01", Some("2025-03-01")),
            event("b", 150, "2024-02-01", Some("2025-09-01")),
        ];
        let target = select_target(&events).unwrap();
        assert_eq!(target.event_id, "a");
        assert_eq!(target.percentage, 100);

        let timeline = crate::domain::timeline::render(&events);
        assert_eq!(timeline.summary.unwrap().event_id, target.event_id);
    }

    #[test]
    fn test_falls_back_to_event_date() {
        let events = vec![
            event("a", 10, "2025-02-01", None),
            event("b", 60, "2025-09-15", None),
        ];
        let target = select_target(&events).unwrap();
        assert_eq!(target.source, TargetSource::EventDate);
        assert_eq!(target.at, utc(2025, 9, 15));
        assert_eq!(
            target_label(Some(&target), utc(2025, 1, 1)),
            "Target: 9/15/2025 (Using date field, 60%)"
        );
    }

    #[test]
    fn test_expected_date_preferred_over_higher_plain_date() {
        let events = vec![
            event("a", 90, "2025-02-01", None),
            event("b", 40, "2025-03-01", Some("2026-01-01")),
        ];
        let target = select_target(&events).unwrap();
        assert_eq!(target.event_id, "b");
    }

    #[test]
    fn test_no_target() {
        assert!(select_target(&[]).is_none());
        let events = vec![event("a", 10, "", None)];
        assert!(select_target(&events).is_none());

        let snapshot = CountdownSnapshot::at(None, utc(2025, 1, 1));
        assert_eq!(snapshot.label, "No target date set");
        assert_eq!(snapshot.remaining, Remaining::default());
    }

    #[test]
    fn test_remaining_breakdown() {
        let now = utc(2025, 1, 1);
        let target = now + chrono::Duration::seconds(2 * SECS_PER_DAY + 3 * SECS_PER_HOUR + 4 * 60 + 5)
            + chrono::Duration::milliseconds(900);
        let left = remaining(target, now);
        assert_eq!((left.days, left.hours, left.minutes, left.seconds), (2, 3, 4, 5));
        assert!(!left.overdue);
    }

    #[test]
    fn test_remaining_is_floored_when_overdue() {
        let left = remaining(utc(2025, 1, 1), utc(2025, 1, 2));
        assert!(left.overdue);
        assert_eq!(left.total_seconds, 0);
        assert_eq!(left.days, 0);
    }

    #[test]
    fn test_labels() {
        let target = CountdownTarget {
            at: utc(2025, 6, 1),
            source: TargetSource::ExpectedDate,
            percentage: 80,
            event_id: "b".to_string(),
            title: "B".to_string(),
        };
        assert_eq!(
            target_label(Some(&target), utc(2025, 7, 1)),
            "Expected Completion: 6/1/2025 (80%) (Overdue)"
        );
        assert_eq!(today_label(utc(2026, 10, 19)), "Mon, Oct 19");
    }
}
