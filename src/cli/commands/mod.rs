pub mod clean;
pub mod init;
pub mod serve;
pub mod status;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::utils::date::{parse_date, today};
use chrono::{NaiveDate, Utc};

/// `--date` if given, today in the configured timezone otherwise.
pub(crate) fn resolve_date(arg: Option<&str>, cfg: &Config) -> AppResult<NaiveDate> {
    match arg {
        Some(s) => parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string())),
        None => Ok(today(cfg.tz()?, Utc::now())),
    }
}
