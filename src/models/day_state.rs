use super::progress::{Process, Status};
use chrono::NaiveDate;
use serde::Serialize;

/// One `bot_process_status` row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DayState {
    pub account: String,
    pub date: NaiveDate,            // ⇔ cur_date (TEXT "YYYY-MM-DD")
    pub status: Option<Status>,     // ⇔ status (NULL when nothing is expected)
    pub process: Option<Process>,   // ⇔ process (NULL before any check-in)
    pub updated_at: String,         // ⇔ update_time (RFC 3339)
}

impl DayState {
    /// Expected input, with NULL folded into `Status::None`.
    pub fn expecting(&self) -> Status {
        self.status.unwrap_or(Status::None)
    }

    /// Progress, with NULL folded into `Process::None`.
    pub fn progress(&self) -> Process {
        self.process.unwrap_or(Process::None)
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
