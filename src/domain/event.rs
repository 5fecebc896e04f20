// Construction event domain model
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    #[serde(other)]
    Unknown,
}

/// Accept whatever the backend stored as a percentage: integers, floats
/// (rounded), numeric strings. Null, NaN and garbage read as 0.
fn lenient_percentage<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct PercentageVisitor;

    fn from_f64(value: f64) -> i32 {
        if value.is_nan() {
            0
        } else {
            value.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
        }
    }

    impl<'de> Visitor<'de> for PercentageVisitor {
        type Value = i32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a completion percentage")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.min(i32::MAX as u64) as i32)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(from_f64(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.trim().parse::<f64>().map(from_f64).unwrap_or(0))
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(0)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(0)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(0)
        }
    }

    deserializer.deserialize_any(PercentageVisitor)
}

/// A construction milestone as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionEvent {
    pub id: String,
    pub date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default, deserialize_with = "lenient_percentage")]
    pub completion_percentage_at_event: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(
        rename = "expected_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventData {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub completion_percentage_at_event: i32,
    #[serde(
        rename = "expected_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_date: Option<String>,
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_percentage_at_event: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(
        rename = "expected_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Event title is required")]
    MissingTitle,
    #[error("Event date is required")]
    MissingDate,
    #[error("Expected completion date is required")]
    MissingExpectedDate,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Completion percentage must be between 0 and 100")]
    PercentageOutOfRange(i32),
    #[error("Please select a valid {expected} file (got {content_type})")]
    UnsupportedMedia {
        expected: &'static str,
        content_type: String,
    },
    #[error("File name is required")]
    MissingFileName,
}

fn percentage_in_range(value: i32) -> Result<(), ValidationError> {
    if (0..=100).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::PercentageOutOfRange(value))
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an ISO 8601 date or date-time. Bare dates resolve to UTC midnight.
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn normalize_date(value: &str) -> Result<String, ValidationError> {
    parse_event_date(value)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .ok_or_else(|| ValidationError::InvalidDate(value.to_string()))
}

impl CreateEventData {
    /// Validate and normalise the form before it is sent anywhere.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.date.trim().is_empty() {
            return Err(ValidationError::MissingDate);
        }
        let expected_date = trimmed(self.expected_date).ok_or(ValidationError::MissingExpectedDate)?;
        percentage_in_range(self.completion_percentage_at_event)?;

        Ok(Self {
            date: normalize_date(&self.date)?,
            title,
            url: trimmed(self.url),
            poster: trimmed(self.poster),
            description: trimmed(self.description),
            media_type: Some(MediaType::Video),
            completion_percentage_at_event: self.completion_percentage_at_event,
            expected_date: Some(expected_date),
        })
    }
}

impl UpdateEventData {
    /// Validate only the fields present in the patch.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let title = match self.title {
            Some(t) if t.trim().is_empty() => return Err(ValidationError::MissingTitle),
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };
        let date = match self.date {
            Some(d) if d.trim().is_empty() => return Err(ValidationError::MissingDate),
            Some(d) => Some(normalize_date(&d)?),
            None => None,
        };
        if let Some(p) = self.completion_percentage_at_event {
            percentage_in_range(p)?;
        }

        Ok(Self {
            date,
            title,
            url: trimmed(self.url),
            poster: trimmed(self.poster),
            description: trimmed(self.description),
            media_type: self.media_type.filter(|m| *m == MediaType::Video),
            completion_percentage_at_event: self.completion_percentage_at_event,
            is_completed: self.is_completed,
            expected_date: trimmed(self.expected_date),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CreateEventData {
        CreateEventData {
            date: "2025-03-01".to_string(),
            title: "  Foundation poured ".to_string(),
            url: Some("   ".to_string()),
            poster: None,
            description: Some(" Slab done ".to_string()),
            media_type: None,
            completion_percentage_at_event: 20,
            expected_date: Some("2025-12-01".to_string()),
        }
    }

    #[test]
    fn test_deserialize_backend_event() {
        let json = r#"{
            "id": "ev-1",
            "date": "2025-03-01T00:00:00.000Z",
            "title": "Foundation",
            "mediaType": "video",
            "completionPercentageAtEvent": 20,
            "expected_date": "2025-12-01",
            "isCompleted": false
        }"#;
        let event: ConstructionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.completion_percentage_at_event, 20);
        assert_eq!(event.expected_date.as_deref(), Some("2025-12-01"));
        assert_eq!(event.media_type, Some(MediaType::Video));
        assert!(event.url.is_none());
    }

    #[test]
    fn test_malformed_backend_fields_degrade() {
        let json = r#"[
            { "id": "a", "date": "2025-01-01", "title": "A", "completionPercentageAtEvent": 45.5 },
            { "id": "b", "date": "2025-01-01", "title": "B", "completionPercentageAtEvent": null },
            { "id": "c", "date": "2025-01-01", "title": "C" },
            { "id": "d", "date": "2025-01-01", "title": "D", "completionPercentageAtEvent": "70" },
            { "id": "e", "date": "2025-01-01", "title": "E", "completionPercentageAtEvent": 20, "mediaType": "image" }
        ]"#;
        let events: Vec<ConstructionEvent> = serde_json::from_str(json).unwrap();
        let pcts: Vec<i32> = events.iter().map(|e| e.completion_percentage_at_event).collect();
        assert_eq!(pcts, vec![46, 0, 0, 70, 20]);
        assert_eq!(events[4].media_type, Some(MediaType::Unknown));
    }

    #[test]
    fn test_create_validation_normalises_fields() {
        let data = form().validated().unwrap();
        assert_eq!(data.title, "Foundation poured");
        assert_eq!(data.date, "2025-03-01T00:00:00.000Z");
        assert_eq!(data.url, None);
        assert_eq!(data.description.as_deref(), Some("Slab done"));
        assert_eq!(data.media_type, Some(MediaType::Video));
    }

    #[test]
    fn test_create_validation_rejects_missing_fields() {
        let mut data = form();
        data.title = "   ".to_string();
        assert_eq!(data.validated(), Err(ValidationError::MissingTitle));

        let mut data = form();
        data.date = String::new();
        assert_eq!(data.validated(), Err(ValidationError::MissingDate));

        let mut data = form();
        data.expected_date = Some(" ".to_string());
        assert_eq!(data.validated(), Err(ValidationError::MissingExpectedDate));

        let mut data = form();
        data.completion_percentage_at_event = 101;
        assert_eq!(data.validated(), Err(ValidationError::PercentageOutOfRange(101)));

        let mut data = form();
        data.date = "next tuesday".to_string();
        assert!(matches!(data.validated(), Err(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn test_update_validation_only_checks_present_fields() {
        let patch = UpdateEventData {
            completion_percentage_at_event: Some(-1),
            ..Default::default()
        };
        assert_eq!(patch.validated(), Err(ValidationError::PercentageOutOfRange(-1)));

        let patch = UpdateEventData {
            is_completed: Some(true),
            ..Default::default()
        };
        let patch = patch.validated().unwrap();
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "isCompleted": true }));
    }

    #[test]
    fn test_parse_event_date() {
        let midnight = parse_event_date("2025-06-01").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2025-06-01T00:00:00+00:00");

        let offset = parse_event_date("2025-06-01T10:00:00+02:00").unwrap();
        assert_eq!(offset.to_rfc3339(), "2025-06-01T08:00:00+00:00");

        assert!(parse_event_date("").is_none());
        assert!(parse_event_date("soon").is_none());
    }
}
