//! Timestamp formatting and HTTP date parsing.
//!
//! Two renderings are needed: ISO 8601 for log lines and the IMF-fixdate
//! form of RFC 9110 for `Expires` and `Last-Modified` headers. Conditional
//! requests also need the reverse direction.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

const ISO8601: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format as `2024-01-15T10:30:00.123Z`.
pub fn iso8601(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(ISO8601).to_string()
}

/// Current time as ISO 8601.
#[inline]
pub fn iso8601_now() -> String {
    Utc::now().format(ISO8601).to_string()
}

/// Format as IMF-fixdate: `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(IMF_FIXDATE).to_string()
}

/// Parse an HTTP date header value.
///
/// Accepts IMF-fixdate and the other RFC 2822 forms with a numeric or
/// `GMT` zone. Returns `None` for anything else.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let parsed = DateTime::parse_from_rfc2822(value.trim()).ok()?;
    Some(SystemTime::from(parsed.with_timezone(&Utc)))
}

/// Whole seconds since the epoch; earlier times clamp to zero.
#[inline]
pub fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
