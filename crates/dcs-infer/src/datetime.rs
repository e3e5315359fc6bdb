//! Permissive date/time parsing used by the classifier.
//!
//! Accepts ISO 8601 / RFC 3339, RFC 2822, and the common US, European and
//! spelled-out month layouts. Bare numbers are never dates.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dcs_model::CellValue;
use regex::Regex;

/// Date-only layouts, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Date-and-time layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Substring patterns that hint at a date even when full parsing fails.
static DATE_HINTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d{4}-\d{2}-\d{2}",
        r"\d{2}/\d{2}/\d{4}",
        r"\d{2}-\d{2}-\d{4}",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid date hint regex"))
    .collect()
});

/// Parse a text value as a date or datetime.
///
/// Dates without a time component resolve to midnight.
///
/// ```
/// use dcs_infer::datetime::parse_datetime;
///
/// assert!(parse_datetime("2024-01-15").is_some());
/// assert!(parse_datetime("01/15/2024 08:30").is_some());
/// assert!(parse_datetime("15 March 2024").is_some());
/// assert!(parse_datetime("2024").is_none());
/// assert!(parse_datetime("1000.50").is_none());
/// ```
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parse a cell as a datetime. Only text and datetime cells can succeed.
pub fn parse_cell(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Text(text) => parse_datetime(text),
        _ => None,
    }
}

/// Returns true if the text contains a date-shaped substring.
pub fn has_date_pattern(text: &str) -> bool {
    DATE_HINTS.iter().any(|re| re.is_match(text))
}
