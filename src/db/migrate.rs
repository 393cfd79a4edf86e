use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Per-user, per-day progress. NULL status/process means "not set yet".
fn create_process_status_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS bot_process_status (
            account      TEXT NOT NULL,
            cur_date     TEXT NOT NULL,
            status       TEXT DEFAULT NULL
                         CHECK(status IN ('none','wait_in','in_done','wait_out','out_done')),
            process      TEXT DEFAULT NULL
                         CHECK(process IN ('none','sign_in_done','sign_out_done')),
            create_time  TEXT NOT NULL,
            update_time  TEXT NOT NULL,
            PRIMARY KEY (account, cur_date)
        );
        "#,
    )?;
    Ok(())
}

/// Calendar event mirroring a user's workday.
fn create_calendar_record_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS bot_calendar_record (
            schedule_id  TEXT NOT NULL PRIMARY KEY,
            account      TEXT NOT NULL,
            cur_date     TEXT NOT NULL,
            begin_time   INTEGER NOT NULL,
            end_time     INTEGER NOT NULL,
            create_time  TEXT NOT NULL,
            update_time  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Values produced by startup initialisation (calendar id, rich menu id).
fn create_init_status_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS system_init_status (
            action       TEXT NOT NULL PRIMARY KEY,
            extra        TEXT DEFAULT NULL,
            create_time  TEXT NOT NULL,
            update_time  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// One schedule row per (account, date). A second check-in for the same day
/// must fail at the storage level, not only in the state machine.
fn migrate_unique_schedule_per_day(conn: &Connection) -> Result<()> {
    let version = "20250301_0001_unique_schedule_per_day";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_calendar_account_date
         ON bot_calendar_record(account, cur_date);",
    )?;

    mark_applied(conn, version, "Unique (account, cur_date) on bot_calendar_record")?;
    info!("migration applied: {}", version);
    Ok(())
}

fn migrate_status_date_index(conn: &Connection) -> Result<()> {
    let version = "20250301_0002_status_date_index";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_status_date ON bot_process_status(cur_date);",
    )?;

    mark_applied(conn, version, "Index on bot_process_status(cur_date)")?;
    info!("migration applied: {}", version);
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    if !table_exists(conn, "bot_process_status")? {
        create_process_status_table(conn)?;
        info!("created table bot_process_status");
    }

    if !table_exists(conn, "bot_calendar_record")? {
        create_calendar_record_table(conn)?;
        info!("created table bot_calendar_record");
    }

    if !table_exists(conn, "system_init_status")? {
        create_init_status_table(conn)?;
        info!("created table system_init_status");
    }

    migrate_unique_schedule_per_day(conn)?;
    migrate_status_date_index(conn)?;

    Ok(())
}
