use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request payload for creating a TeamUp event
///
/// Only `subcalendar_ids` and `title` carry required information; the
/// datetime defaults make an event span the whole of the current day.
/// Unset optional fields serialize as explicit `null`, which the API
/// treats as "clear/default this field".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Target subcalendars, must not be empty
    pub subcalendar_ids: Vec<u64>,
    pub title: String,
    /// Timezone-naive start, ISO-8601 on the wire
    pub start_dt: NaiveDateTime,
    /// Timezone-naive end, ISO-8601 on the wire
    pub end_dt: NaiveDateTime,
    /// Not derived from start/end; callers set it explicitly
    pub all_day: bool,
    pub rrule: Option<String>,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub who: Option<String>,
    pub signup_enabled: bool,
    pub comments_enabled: bool,
    /// Custom field values keyed by field name
    pub custom: Option<BTreeMap<String, CustomFieldValue>>,
}

impl CalendarEvent {
    /// Create an event with default values: today 00:00:00 to 23:59:59
    ///
    /// Defaults are evaluated here, not at load time, so events built on
    /// different days get different date windows.
    pub fn new(subcalendar_ids: Vec<u64>, title: impl Into<String>) -> Self {
        let today = Local::now().date_naive();
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);

        CalendarEvent {
            subcalendar_ids,
            title: title.into(),
            start_dt: today.and_time(NaiveTime::MIN),
            end_dt: today.and_time(end_of_day),
            all_day: false,
            rrule: None,
            notes: None,
            location: None,
            who: None,
            signup_enabled: false,
            comments_enabled: false,
            custom: None,
        }
    }

    /// Serialize to the JSON shape the events endpoint expects
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Value of a custom event field: a string or a list of strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomFieldValue {
    Text(String),
    List(Vec<String>),
}

/// Scope of a recurring-event deletion
///
/// Omitting the mode defers to the remote default of deleting only the
/// targeted occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringDeletionMode {
    Single,
    Future,
    All,
}

impl RecurringDeletionMode {
    /// Wire value for the deletion scope query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringDeletionMode::Single => "single",
            RecurringDeletionMode::Future => "future",
            RecurringDeletionMode::All => "all",
        }
    }
}

impl std::fmt::Display for RecurringDeletionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subcalendar record as returned by the API
///
/// Only `id` and `name` are interpreted; everything else the API sends is
/// preserved in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcalendar {
    pub id: u64,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Date range constraint for event listing
///
/// With no query the API applies its own default range of "today".
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventQuery {
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl EventQuery {
    /// Constrain the listing to an inclusive date range
    pub fn for_range(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        EventQuery {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    /// Constrain the listing to a single date
    pub fn for_date(date: NaiveDate) -> Self {
        Self::for_range(date, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_new_defaults_span_the_current_day() {
        let event = CalendarEvent::new(vec![1], "Standup");
        let today = Local::now().date_naive();

        assert_eq!(event.start_dt.date(), today);
        assert_eq!(event.end_dt.date(), today);
        assert_eq!(event.start_dt.time(), NaiveTime::MIN);
        assert_eq!(
            event.end_dt.time(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        assert!(!event.all_day);
        assert!(!event.signup_enabled);
        assert!(!event.comments_enabled);
        assert_eq!(event.rrule, None);
        assert_eq!(event.custom, None);
    }

    #[test]
    fn test_serialization_renders_iso_8601_datetimes() {
        let mut event = CalendarEvent::new(vec![13458686], "testing new creation");
        event.start_dt = ymd_hms(2024, 7, 19, 22, 0, 0);
        event.end_dt = ymd_hms(2024, 7, 19, 23, 0, 0);

        let value = event.to_json().unwrap();
        assert_eq!(value["start_dt"], json!("2024-07-19T22:00:00"));
        assert_eq!(value["end_dt"], json!("2024-07-19T23:00:00"));
        assert_eq!(value["subcalendar_ids"], json!([13458686]));
        assert_eq!(value["title"], json!("testing new creation"));
    }

    #[test]
    fn test_serialization_keeps_explicit_nulls() {
        let event = CalendarEvent::new(vec![1], "Standup");
        let value = event.to_json().unwrap();

        // Null means "clear/default" to the API, so unset options must
        // still appear in the payload.
        assert!(value.get("rrule").is_some());
        assert_eq!(value["rrule"], serde_json::Value::Null);
        assert_eq!(value["notes"], serde_json::Value::Null);
        assert_eq!(value["location"], serde_json::Value::Null);
        assert_eq!(value["who"], serde_json::Value::Null);
        assert_eq!(value["custom"], serde_json::Value::Null);
        assert_eq!(value["all_day"], json!(false));
    }

    #[test]
    fn test_serialization_is_deterministic_for_explicit_datetimes() {
        let mut event = CalendarEvent::new(vec![1, 2], "Weekly review");
        event.start_dt = ymd_hms(2024, 7, 19, 9, 30, 0);
        event.end_dt = ymd_hms(2024, 7, 19, 10, 0, 0);
        event.notes = Some("agenda attached".to_string());

        let first = serde_json::to_string(&event).unwrap();
        let second = serde_json::to_string(&event).unwrap();
        assert_eq!(first, second);

        // Round-trip: deserialize-then-serialize yields the same strings.
        let reparsed: CalendarEvent = serde_json::from_str(&first).unwrap();
        assert_eq!(reparsed, event);
        assert_eq!(serde_json::to_string(&reparsed).unwrap(), first);
    }

    #[test]
    fn test_custom_fields_serialize_untagged() {
        let mut event = CalendarEvent::new(vec![1], "Standup");
        let mut custom = BTreeMap::new();
        custom.insert(
            "attendance".to_string(),
            CustomFieldValue::List(vec!["alice".to_string(), "bob".to_string()]),
        );
        custom.insert(
            "room".to_string(),
            CustomFieldValue::Text("3B".to_string()),
        );
        event.custom = Some(custom);

        let value = event.to_json().unwrap();
        assert_eq!(value["custom"]["room"], json!("3B"));
        assert_eq!(value["custom"]["attendance"], json!(["alice", "bob"]));
    }

    #[test]
    fn test_recurring_deletion_mode_wire_values() {
        assert_eq!(RecurringDeletionMode::Single.as_str(), "single");
        assert_eq!(RecurringDeletionMode::Future.as_str(), "future");
        assert_eq!(RecurringDeletionMode::All.as_str(), "all");
        assert_eq!(RecurringDeletionMode::All.to_string(), "all");
    }

    #[test]
    fn test_event_query_serializes_wire_parameter_names() {
        let query = EventQuery::for_range(
            NaiveDate::from_ymd_opt(2024, 7, 19).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 21).unwrap(),
        );
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, json!({"startDate": "2024-07-19", "endDate": "2024-07-21"}));

        // Unset bounds are omitted entirely rather than sent as empty.
        let value = serde_json::to_value(EventQuery::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_subcalendar_preserves_unknown_fields() {
        let subcalendar: Subcalendar = serde_json::from_value(json!({
            "id": 13458686,
            "name": "habit",
            "color": 14,
            "active": true
        }))
        .unwrap();

        assert_eq!(subcalendar.id, 13458686);
        assert_eq!(subcalendar.name, "habit");
        assert_eq!(subcalendar.extra["color"], json!(14));
        assert_eq!(subcalendar.extra["active"], json!(true));
    }
}
