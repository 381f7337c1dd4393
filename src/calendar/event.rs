use std::fmt;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::datetime::parse_datetime;

/// Server-assigned identifier. Kept in whatever JSON type the backend uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{n}"),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

/// The editable part of an event, as sent to and received from the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

/// A persisted event as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    #[serde(flatten)]
    pub fields: EventFields,
}

/// A record placed on the calendar, with its date strings resolved to instants.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub record: EventRecord,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarEvent {
    /// Returns `None` when either date string cannot be parsed.
    pub fn from_record(record: EventRecord) -> Option<Self> {
        let start = parse_datetime(&record.fields.start_date)?;
        let end = parse_datetime(&record.fields.end_date)?;
        Some(Self { record, start, end })
    }

    pub fn id(&self) -> &EventId {
        &self.record.id
    }

    pub fn title(&self) -> &str {
        &self.record.fields.title
    }

    pub fn description(&self) -> &str {
        &self.record.fields.description
    }

    pub fn local_start(&self) -> DateTime<Local> {
        self.start.with_timezone(&Local)
    }

    pub fn local_end(&self) -> DateTime<Local> {
        self.end.with_timezone(&Local)
    }

    /// Whether any part of the event falls on `date` in local time.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        let first = self.local_start().date_naive();
        let last = self.local_end().date_naive().max(first);
        first <= date && date <= last
    }

    pub fn duration_display(&self) -> String {
        let start = self.local_start();
        let end = self.local_end();
        if start.date_naive() == end.date_naive() {
            format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
        } else {
            format!("{} - {}", start.format("%H:%M"), end.format("%b %d %H:%M"))
        }
    }
}
