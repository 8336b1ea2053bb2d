// Date-time parsing and inclusive date ranges

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Naive layouts the backend emits; interpreted as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a record or constraint date-time string
///
/// Accepts RFC 3339, the naive layouts above, and a bare `YYYY-MM-DD`
/// (start of day). Returns None for blank or unparseable input.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    parse_with_day_edge(value, NaiveTime::MIN)
}

/// Like `parse_datetime`, but a bare date means the last millisecond of that day
pub fn parse_end_of_day(value: &str) -> Option<DateTime<Utc>> {
    parse_with_day_edge(value, end_of_day())
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

fn parse_with_day_edge(value: &str, day_edge: NaiveTime) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(day_edge)))
}

/// Inclusive date range constraint `[desde, hasta]`
///
/// Bounds stay as the strings the caller supplied (date pickers hand over
/// text). A missing or blank bound is open on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    pub desde: Option<String>,
    pub hasta: Option<String>,
}

impl DateRange {
    /// Build a range from optional bounds; None when both sides are open
    pub fn from_bounds(desde: Option<String>, hasta: Option<String>) -> Option<Self> {
        let range = Self { desde, hasta };
        if range.is_unbounded() { None } else { Some(range) }
    }

    pub fn is_unbounded(&self) -> bool {
        bound(&self.desde).is_none() && bound(&self.hasta).is_none()
    }

    /// Check whether a record's date falls inside the range
    ///
    /// A missing or unparseable record date never matches a bounded range,
    /// and neither does anything when a bound itself cannot be parsed.
    pub fn contains(&self, value: Option<&str>) -> bool {
        if self.is_unbounded() {
            return true;
        }

        let Some(instant) = value.and_then(parse_datetime) else {
            return false;
        };

        if let Some(desde) = bound(&self.desde) {
            match parse_datetime(desde) {
                Some(start) if instant >= start => {}
                _ => return false,
            }
        }

        if let Some(hasta) = bound(&self.hasta) {
            match parse_end_of_day(hasta) {
                Some(end) if instant <= end => {}
                _ => return false,
            }
        }

        true
    }
}

fn bound(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// True if `value` parses to an instant within `window` before `now` (inclusive)
pub fn within_window(value: Option<&str>, now: DateTime<Utc>, window: Duration) -> bool {
    match value.and_then(parse_datetime) {
        Some(instant) => instant <= now && now.checked_sub_signed(window).is_none_or(|start| instant >= start),
        None => false,
    }
}
