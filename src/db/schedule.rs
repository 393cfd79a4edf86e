//! `bot_calendar_record` access: the calendar event backing each workday.

use crate::errors::{AppError, AppResult};
use crate::models::schedule_entry::ScheduleEntry;
use crate::utils::date::date_str;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<ScheduleEntry> {
    let date_str: String = row.get("cur_date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    Ok(ScheduleEntry {
        schedule_id: row.get("schedule_id")?,
        account: row.get("account")?,
        date,
        begin_time: row.get("begin_time")?,
        end_time: row.get("end_time")?,
    })
}

pub fn get_schedule(
    conn: &Connection,
    account: &str,
    date: &NaiveDate,
) -> AppResult<Option<ScheduleEntry>> {
    let entry = conn
        .query_row(
            "SELECT schedule_id, account, cur_date, begin_time, end_time
             FROM bot_calendar_record
             WHERE account = ?1 AND cur_date = ?2",
            params![account, date_str(date)],
            map_row,
        )
        .optional()?;
    Ok(entry)
}

/// Insert the day's schedule. A second row for the same (account, date) is a
/// double check-in and surfaces as an internal-data error.
pub fn insert_schedule(conn: &Connection, entry: &ScheduleEntry) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();
    let res = conn.execute(
        "INSERT INTO bot_calendar_record
            (schedule_id, account, cur_date, begin_time, end_time, create_time, update_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            entry.schedule_id,
            entry.account,
            date_str(&entry.date),
            entry.begin_time,
            entry.end_time,
            now
        ],
    );

    match res {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(AppError::data_integrity(
                &entry.account,
                &date_str(&entry.date),
                "schedule already exists",
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Move the end of an existing schedule. Returns the number of rows touched.
pub fn update_schedule_end(conn: &Connection, schedule_id: &str, end: i64) -> AppResult<usize> {
    let changed = conn.execute(
        "UPDATE bot_calendar_record SET end_time = ?2, update_time = ?3
         WHERE schedule_id = ?1",
        params![schedule_id, end, Utc::now().to_rfc3339()],
    )?;
    Ok(changed)
}

pub fn delete_schedule(conn: &Connection, account: &str, date: &NaiveDate) -> AppResult<usize> {
    let changed = conn.execute(
        "DELETE FROM bot_calendar_record WHERE account = ?1 AND cur_date = ?2",
        params![account, date_str(date)],
    )?;
    Ok(changed)
}
