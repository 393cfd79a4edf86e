//! `bot_process_status` access, keyed by (account, date).

use crate::errors::{AppError, AppResult};
use crate::models::day_state::DayState;
use crate::models::progress::{Process, Status};
use crate::utils::date::date_str;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn conversion_error(value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::InvalidStatus(value.to_string())),
    )
}

pub fn map_row(row: &Row) -> rusqlite::Result<DayState> {
    let date_str: String = row.get("cur_date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let status = match row.get::<_, Option<String>>("status")? {
        Some(s) => Some(Status::from_db_str(&s).ok_or_else(|| conversion_error(&s))?),
        None => None,
    };

    let process = match row.get::<_, Option<String>>("process")? {
        Some(p) => Some(Process::from_db_str(&p).ok_or_else(|| conversion_error(&p))?),
        None => None,
    };

    Ok(DayState {
        account: row.get("account")?,
        date,
        status,
        process,
        updated_at: row.get("update_time")?,
    })
}

pub fn get_status(conn: &Connection, account: &str, date: &NaiveDate) -> AppResult<Option<DayState>> {
    let state = conn
        .query_row(
            "SELECT account, cur_date, status, process, update_time
             FROM bot_process_status
             WHERE account = ?1 AND cur_date = ?2",
            params![account, date_str(date)],
            map_row,
        )
        .optional()?;
    Ok(state)
}

/// Refuse a process value that would move the day backwards.
fn ensure_forward(
    conn: &Connection,
    account: &str,
    date: &NaiveDate,
    next: Option<Process>,
) -> AppResult<()> {
    let Some(next) = next else {
        return Ok(());
    };
    if let Some(current) = get_status(conn, account, date)?.and_then(|s| s.process)
        && !current.can_become(next)
    {
        return Err(AppError::data_integrity(
            account,
            &date_str(date),
            format!(
                "process cannot go from {} to {}",
                current.to_db_str(),
                next.to_db_str()
            ),
        ));
    }
    Ok(())
}

/// Insert the row or overwrite its status. `process` is only written when given;
/// an existing process is kept otherwise.
pub fn insert_replace_status(
    conn: &Connection,
    account: &str,
    date: &NaiveDate,
    status: Status,
    process: Option<Process>,
) -> AppResult<()> {
    ensure_forward(conn, account, date, process)?;
    let now = Utc::now().to_rfc3339();

    match process {
        Some(p) => conn.execute(
            "INSERT INTO bot_process_status (account, cur_date, status, process, create_time, update_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(account, cur_date)
             DO UPDATE SET status = excluded.status, process = excluded.process, update_time = excluded.update_time",
            params![account, date_str(date), status.to_db_str(), p.to_db_str(), now],
        )?,
        None => conn.execute(
            "INSERT INTO bot_process_status (account, cur_date, status, create_time, update_time)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(account, cur_date)
             DO UPDATE SET status = excluded.status, update_time = excluded.update_time",
            params![account, date_str(date), status.to_db_str(), now],
        )?,
    };
    Ok(())
}

/// Update an existing row. Fields passed as None are left untouched; a missing
/// row is not created.
pub fn set_status(
    conn: &Connection,
    account: &str,
    date: &NaiveDate,
    status: Option<Status>,
    process: Option<Process>,
) -> AppResult<usize> {
    ensure_forward(conn, account, date, process)?;
    let now = Utc::now().to_rfc3339();

    let changed = conn.execute(
        "UPDATE bot_process_status
         SET status = COALESCE(?3, status),
             process = COALESCE(?4, process),
             update_time = ?5
         WHERE account = ?1 AND cur_date = ?2",
        params![
            account,
            date_str(date),
            status.map(|s| s.to_db_str()),
            process.map(|p| p.to_db_str()),
            now
        ],
    )?;
    Ok(changed)
}

/// Forget which input is expected; progress is kept.
pub fn clear_status(conn: &Connection, account: &str, date: &NaiveDate) -> AppResult<usize> {
    let changed = conn.execute(
        "UPDATE bot_process_status SET status = NULL, update_time = ?3
         WHERE account = ?1 AND cur_date = ?2",
        params![account, date_str(date), Utc::now().to_rfc3339()],
    )?;
    Ok(changed)
}

pub fn delete_status(conn: &Connection, account: &str, date: &NaiveDate) -> AppResult<usize> {
    let changed = conn.execute(
        "DELETE FROM bot_process_status WHERE account = ?1 AND cur_date = ?2",
        params![account, date_str(date)],
    )?;
    Ok(changed)
}
