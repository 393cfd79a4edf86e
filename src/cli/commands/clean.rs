use super::resolve_date;
use crate::config::Config;
use crate::db::log::{day_target, ttlog};
use crate::db::pool::DbPool;
use crate::db::schedule::delete_schedule;
use crate::db::status::delete_status;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::date_str;
use std::io::{self, Write};

/// Ask a yes/no confirmation from the operator
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

/// Handle the `clean` command: same reset the bot performs on "clean".
/// The calendar event, if any, is left in place.
pub fn handle(cfg: &Config, account: &str, date: Option<&str>, yes: bool) -> AppResult<()> {
    let date = resolve_date(date, cfg)?;
    let day = date_str(&date);

    if !yes
        && !ask_confirmation(&format!(
            "Delete state and schedule of {} for {}? This action is irreversible.",
            account, day
        ))
    {
        info("Operation cancelled.");
        return Ok(());
    }

    let pool = DbPool::open(&cfg.database)?;
    let (states, schedules) = pool.with_conn(|conn| {
        let tx = conn.transaction()?;
        let states = delete_status(&tx, account, &date)?;
        let schedules = delete_schedule(&tx, account, &date)?;
        ttlog(&tx, "clean", &day_target(account, &day), "operator reset")?;
        tx.commit()?;
        Ok((states, schedules))
    })?;

    if states + schedules == 0 {
        info(format!("Nothing stored for {} on {}.", account, day));
    } else {
        success(format!(
            "Removed {} state row(s) and {} schedule row(s) for {} on {}.",
            states, schedules, account, day
        ));
    }
    Ok(())
}
