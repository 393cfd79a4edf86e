use super::resolve_date;
use crate::config::Config;
use crate::db::log::{day_target, load_log};
use crate::db::pool::DbPool;
use crate::db::schedule::get_schedule;
use crate::db::status::get_status;
use crate::errors::AppResult;
use crate::ui::messages::{field, info};
use crate::utils::date::{date_str, local_date_time};

const LOG_LINES: usize = 20;

fn fmt_ts(cfg: &Config, ts: i64) -> AppResult<String> {
    let tz = cfg.tz()?;
    Ok(local_date_time(tz, ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S %Z").to_string())
        .unwrap_or_else(|| ts.to_string()))
}

/// Handle the `status` command: print both rows for (account, date).
pub fn handle(cfg: &Config, account: &str, date: Option<&str>, with_log: bool) -> AppResult<()> {
    let date = resolve_date(date, cfg)?;
    let pool = DbPool::open(&cfg.database)?;

    let (state, schedule) = pool.with_conn(|conn| {
        Ok((
            get_status(conn, account, &date)?,
            get_schedule(conn, account, &date)?,
        ))
    })?;

    info(format!("{} on {}", account, date_str(&date)));

    match state {
        Some(s) => {
            field("status", s.status.map(|v| v.to_db_str()).unwrap_or("-"));
            field("process", s.process.map(|v| v.to_db_str()).unwrap_or("-"));
            field("updated", &s.updated_at);
        }
        None => field("state", "no state recorded"),
    }

    match schedule {
        Some(e) => {
            field("schedule", &e.schedule_id);
            field("begin", fmt_ts(cfg, e.begin_time)?);
            field("end", fmt_ts(cfg, e.end_time)?);
        }
        None => field("schedule", "none"),
    }

    if with_log {
        let target = day_target(account, &date_str(&date));
        let lines = pool.with_conn(|conn| load_log(conn, &target, LOG_LINES))?;
        if lines.is_empty() {
            field("log", "empty");
        }
        for (when, op, msg) in lines {
            println!("  {}  {:<16} {}", when, op, msg);
        }
    }

    Ok(())
}
