use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub enum Format {
    Date,
    DateTime,
    Rfc3339,
}

pub const FORMAT_DATE: &str = "%Y-%m-%d";
pub const FORMAT_DATETIME: &str = "%Y-%m-%d %H:%M:%S";
/// Display layout for list rows, e.g. `05 Mar 2025`.
pub const FORMAT_DISPLAY: &str = "%d %b %Y";

impl Format {
    /// parse with this layout only, naive values are taken as UTC
    pub fn parse(&self, value: &str) -> Option<DateTime<Utc>> {
        match self {
            Format::Rfc3339 => {
                DateTime::parse_from_rfc3339(value).ok().map(|d| d.with_timezone(&Utc))
            },
            Format::DateTime => {
                NaiveDateTime::parse_from_str(value, FORMAT_DATETIME).ok().map(|n| n.and_utc())
            },
            Format::Date => NaiveDate::parse_from_str(value, FORMAT_DATE)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|n| n.and_utc()),
        }
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2025-03-05T10:00:00.000Z`, what the API sends for
/// `createdAt`), `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`, and epoch milliseconds.
/// Anything else is unknown and yields `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in [Format::Rfc3339, Format::DateTime, Format::Date] {
        if let Some(parsed) = format.parse(value) {
            return Some(parsed);
        }
    }

    value.parse::<i64>().ok().and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

/// `N/A` when unknown.
pub fn display_date(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(d) => d.format(FORMAT_DISPLAY).to_string(),
        None => "N/A".to_string(),
    }
}
