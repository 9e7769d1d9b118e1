use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::domain::Tender;

/// Parse an upstream deadline. Offsets are honoured; naive timestamps and
/// bare dates are read as UTC, dates at midnight.
pub fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

/// True when the deadline is present, parseable, and strictly after `now`.
pub fn is_open(tender: &Tender, now: DateTime<Utc>) -> bool {
    tender
        .deadline
        .as_deref()
        .and_then(parse_deadline)
        .map(|deadline| deadline > now)
        .unwrap_or(false)
}
