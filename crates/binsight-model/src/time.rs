use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as the ISO-8601 string the record model stores,
/// millisecond precision with a `Z` suffix.
#[must_use]
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp. Returns `None` for anything that is not a
/// well-formed RFC 3339 instant; callers fall back to the raw string.
#[must_use]
pub fn parse_iso(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
