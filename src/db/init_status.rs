//! `system_init_status`: results of one-time startup work (calendar id,
//! rich menu id) so a restart does not create them again.

use crate::errors::AppResult;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

pub const CALENDAR: &str = "calendar";
pub const RICH_MENU: &str = "rich_menu";

pub fn get_init_status(conn: &Connection, action: &str) -> AppResult<Option<String>> {
    let extra: Option<Option<String>> = conn
        .query_row(
            "SELECT extra FROM system_init_status WHERE action = ?1",
            [action],
            |row| row.get(0),
        )
        .optional()?;
    Ok(extra.flatten())
}

pub fn insert_init_status(conn: &Connection, action: &str, extra: &str) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO system_init_status (action, extra, create_time, update_time)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(action) DO UPDATE SET extra = excluded.extra, update_time = excluded.update_time",
        params![action, extra, now],
    )?;
    Ok(())
}

pub fn delete_init_status(conn: &Connection, action: &str) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM system_init_status WHERE action = ?1", [action])?)
}
