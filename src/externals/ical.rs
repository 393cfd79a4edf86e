//! Minimal iCalendar rendering for attendance events.

use crate::errors::{AppError, AppResult};
use crate::utils::date::local_date_time;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub struct IcalEvent<'a> {
    pub uid: &'a str,
    pub summary: &'a str,
    /// Owner account, stored as the event description.
    pub description: &'a str,
    pub begin: i64,
    pub end: i64,
    /// Only set when the event is created.
    pub created: bool,
}

fn local_stamp(tz: Tz, ts: i64) -> AppResult<String> {
    let dt = local_date_time(tz, ts)
        .ok_or_else(|| AppError::InvalidDate(format!("timestamp {} out of range", ts)))?;
    Ok(format!("TZID={}:{}", tz.name(), dt.format("%Y%m%dT%H%M%S")))
}

fn utc_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

/// RFC 5545 text escaping for SUMMARY / DESCRIPTION.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

pub fn render(ev: &IcalEvent, tz: Tz, now: DateTime<Utc>) -> AppResult<String> {
    let stamp = utc_stamp(now);
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "PRODID:timeclock-bot".to_string(),
        "VERSION:2.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", ev.uid),
    ];
    if ev.created {
        lines.push(format!("CREATED:{}", stamp));
    }
    lines.push(format!("DESCRIPTION:{}", escape(ev.description)));
    lines.push(format!("SUMMARY:{}", escape(ev.summary)));
    lines.push(format!("DTSTART;{}", local_stamp(tz, ev.begin)?));
    lines.push(format!("DTEND;{}", local_stamp(tz, ev.end)?));
    lines.push(format!("LAST-MODIFIED:{}", stamp));
    lines.push(format!("DTSTAMP:{}", stamp));
    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    Ok(out)
}
