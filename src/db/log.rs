use crate::errors::AppResult;
use chrono::Utc;
use rusqlite::{Connection, params};

/// Write an audit line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Audit target for a user's day: `account@YYYY-MM-DD`.
pub fn day_target(account: &str, date: &str) -> String {
    format!("{}@{}", account, date)
}

/// Most recent audit lines for one target, newest first.
pub fn load_log(
    conn: &Connection,
    target: &str,
    limit: usize,
) -> AppResult<Vec<(String, String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT date, operation, message FROM log
         WHERE target = ?1
         ORDER BY id DESC
         LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![target, limit as i64], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
