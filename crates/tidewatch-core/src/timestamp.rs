use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Parse an event timestamp: RFC 3339 first, then epoch seconds (the
/// backend stamps ingested events with `str(time.time())`).
pub fn parse_instant(ts: &str) -> Option<OffsetDateTime> {
    let ts = ts.trim();
    if let Ok(dt) = OffsetDateTime::parse(ts, &Rfc3339) {
        return Some(dt);
    }
    let secs: f64 = ts.parse().ok()?;
    if !secs.is_finite() {
        return None;
    }
    let nanos = (secs * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
}

/// `HH:MM:SS` in UTC, or the raw text when it cannot be parsed.
pub fn display_clock(ts: &str) -> String {
    match parse_instant(ts) {
        Some(dt) => {
            let dt = dt.to_offset(UtcOffset::UTC);
            format!("{:02}:{:02}:{:02}", dt.hour(), dt.minute(), dt.second())
        }
        None => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_with_fraction() {
        assert_eq!(display_clock("2025-03-04T12:34:56.789012Z"), "12:34:56");
    }

    #[test]
    fn rfc3339_with_offset_is_shown_in_utc() {
        assert_eq!(display_clock("2025-03-04T12:34:56+02:00"), "10:34:56");
    }

    #[test]
    fn epoch_seconds() {
        // 2023-11-14T22:13:20Z
        assert_eq!(display_clock("1700000000.25"), "22:13:20");
    }

    #[test]
    fn garbage_is_verbatim() {
        assert_eq!(display_clock("yesterday"), "yesterday");
        assert!(parse_instant("NaN").is_none());
    }
}
