//! Time utilities: manual HHMM entry, confirmation payload timestamps.

use chrono::{DateTime, NaiveTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static HHMM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

/// Parse a manual entry such as `0930` or `2020`.
/// Anything but exactly four ASCII digits with hour 00-23 and minute 00-59
/// is rejected.
pub fn parse_hhmm(text: &str) -> Option<NaiveTime> {
    if !HHMM.is_match(text) {
        return None;
    }
    let n: u32 = text.parse().ok()?;
    NaiveTime::from_hms_opt(n / 100, n % 100, 0)
}

/// Extract the timestamp from a confirmation payload
/// (`confirm_in&time=1573631535`). Everything after the first `time=` must
/// be a decimal number naming an instant chrono can represent.
pub fn parse_confirm_time(payload: &str) -> Option<i64> {
    let pos = payload.find("time=")?;
    let digits = &payload[pos + "time=".len()..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let ts: i64 = digits.parse().ok()?;
    DateTime::<Utc>::from_timestamp(ts, 0).map(|_| ts)
}

/// Render `confirm_in&time=<ts>` / `confirm_out&time=<ts>`.
pub fn confirm_payload(prefix: &str, ts: i64) -> String {
    format!("{}&time={}", prefix, ts)
}
