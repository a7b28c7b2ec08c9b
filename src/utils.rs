//! Helper functions shared by models/, services/ and webhook/

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a UTC instant as ISO-8601 with millisecond precision, e.g.
/// `2024-05-01T08:30:00.123Z`
pub fn to_iso_timestamp(when: DateTime<Utc>) -> String {
    when.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current instant formatted by [to_iso_timestamp]
pub fn now_iso_timestamp() -> String {
    to_iso_timestamp(Utc::now())
}
