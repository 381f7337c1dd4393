use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Minute-precision format used for editable date strings.
pub const EDIT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Render an instant as an editable `YYYY-MM-DDTHH:MM` string in UTC.
pub fn format_minutes(instant: DateTime<Utc>) -> String {
    instant.format(EDIT_FORMAT).to_string()
}

/// Parse a date string coming from the backend or the form.
///
/// Strings carrying an offset are converted to UTC; strings without one
/// are read as UTC, which keeps them symmetric with [`format_minutes`].
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}
