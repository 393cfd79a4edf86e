use chrono::NaiveDate;
use serde::Serialize;

/// Placeholder length of a fresh check-in event; check-out overwrites it.
pub const CHECK_IN_PLACEHOLDER_SECS: i64 = 60;

/// One `bot_calendar_record` row: the calendar event mirroring a workday.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub schedule_id: String,
    pub account: String,
    pub date: NaiveDate,
    pub begin_time: i64, // Unix seconds
    pub end_time: i64,   // Unix seconds
}

impl ScheduleEntry {
    /// Worked time up to `end`, split into whole hours and minutes.
    pub fn elapsed_until(&self, end: i64) -> (i64, i64) {
        let secs = end - self.begin_time;
        (secs / 3600, (secs % 3600) / 60)
    }
}
