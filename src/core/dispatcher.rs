//! Executes one inbound event end to end.
//!
//! Order per request: route, lock (account, date), snapshot, `decide`,
//! calendar/messenger side effects, store writes in one transaction, pushes.
//! Any failure before the commit leaves the stores untouched; a failed push
//! after it is only logged.

use super::action::{Action, route};
use super::locks::KeyedLocks;
use super::machine::{Context, SideEffect, Snapshot, StoreWrite, Transition, decide};
use super::reply::Reply;
use super::startup::BotSettings;
use crate::db::log::{day_target, ttlog};
use crate::db::pool::DbPool;
use crate::db::schedule::{delete_schedule, get_schedule, insert_schedule, update_schedule_end};
use crate::db::status::{
    clear_status, delete_status, get_status, insert_replace_status, set_status,
};
use crate::errors::{AppError, AppResult, ErrorKind};
use crate::externals::calendar::{CalendarApi, EventRequest};
use crate::externals::messenger::MessengerApi;
use crate::models::inbound::InboundEvent;
use crate::models::schedule_entry::ScheduleEntry;
use crate::ui::texts::Msg;
use crate::utils::date::{date_str, today};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info_span, warn};

pub struct Dispatcher {
    pool: Arc<DbPool>,
    calendar: Arc<dyn CalendarApi>,
    messenger: Arc<dyn MessengerApi>,
    settings: BotSettings,
    locks: KeyedLocks,
}

impl Dispatcher {
    pub fn new(
        pool: Arc<DbPool>,
        calendar: Arc<dyn CalendarApi>,
        messenger: Arc<dyn MessengerApi>,
        settings: BotSettings,
    ) -> Self {
        Self {
            pool,
            calendar,
            messenger,
            settings,
            locks: KeyedLocks::new(),
        }
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Process `event` as received at `now`. Returns the replies that were pushed.
    pub async fn handle(&self, event: &InboundEvent, now: DateTime<Utc>) -> AppResult<Vec<Reply>> {
        let action = route(event)?;
        let date = today(self.settings.tz, now);
        let account = event.account_id.as_str();

        let span = info_span!("transition", %account, date = %date, action = action.name());
        let result = self
            .transition(account, date, &action, now)
            .instrument(span)
            .await;

        if let Err(e) = &result {
            match e.kind() {
                ErrorKind::Fatal => error!(%account, date = %date, action = action.name(), error = %e, "transition aborted"),
                ErrorKind::Client => warn!(%account, date = %date, error = %e, "request rejected"),
            }
        }
        result
    }

    async fn transition(
        &self,
        account: &str,
        date: NaiveDate,
        action: &Action,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Reply>> {
        let _guard = self.locks.acquire(account, date).await;

        let snap = self.pool.with_conn(|conn| {
            Ok(Snapshot {
                state: get_status(conn, account, &date)?,
                schedule: get_schedule(conn, account, &date)?,
            })
        })?;

        let ctx = Context {
            account: account.to_string(),
            date,
            now: now.timestamp(),
            tz: self.settings.tz,
        };
        let t = decide(&snap, action, &ctx)?;
        debug!(?t, "decided");

        let event_id = self.run_effects(account, &t).await?;

        if !t.writes.is_empty() {
            self.pool.with_conn(|conn| {
                let tx = conn.transaction()?;
                apply_writes(&tx, account, &date, &t.writes, event_id.as_deref())?;
                audit(&tx, account, &date, action)?;
                tx.commit()?;
                Ok(())
            })?;
        }

        // The transition is committed; a lost push must not turn into a retry.
        let payloads = self.settings.composer.compose(&t.replies);
        if !payloads.is_empty()
            && let Err(e) = self.messenger.push(account, &payloads).await
        {
            warn!(%account, date = %date, error = %e, "push failed after commit");
        }
        Ok(t.replies)
    }

    /// Run external calls. Returns the id of a newly created calendar event.
    async fn run_effects(&self, account: &str, t: &Transition) -> AppResult<Option<String>> {
        let composer = &self.settings.composer;
        let mut created = None;

        for effect in &t.effects {
            match effect {
                SideEffect::LinkRichMenu => {
                    self.messenger
                        .set_user_rich_menu(&self.settings.rich_menu_id, account)
                        .await?;
                }
                SideEffect::CreateEvent { begin, end } => {
                    let req = EventRequest {
                        begin: *begin,
                        end: *end,
                        title: composer.event_title(Msg::CheckInTitle, account, *begin),
                        owner: account.to_string(),
                    };
                    let id = self
                        .calendar
                        .create_event(&self.settings.calendar_id, &req)
                        .await?;
                    created = Some(id);
                }
                SideEffect::UpdateEvent {
                    schedule_id,
                    begin,
                    end,
                } => {
                    let req = EventRequest {
                        begin: *begin,
                        end: *end,
                        title: composer.event_title(Msg::WorkingHoursTitle, account, *begin),
                        owner: account.to_string(),
                    };
                    self.calendar
                        .update_event(&self.settings.calendar_id, schedule_id, &req)
                        .await?;
                }
            }
        }
        Ok(created)
    }
}

fn apply_writes(
    conn: &Connection,
    account: &str,
    date: &NaiveDate,
    writes: &[StoreWrite],
    event_id: Option<&str>,
) -> AppResult<()> {
    for write in writes {
        match write {
            StoreWrite::UpsertStatus { status, process } => {
                insert_replace_status(conn, account, date, *status, *process)?;
            }
            StoreWrite::SetStatus(status) => {
                set_status(conn, account, date, Some(*status), None)?;
            }
            StoreWrite::ClearStatus => {
                clear_status(conn, account, date)?;
            }
            StoreWrite::InsertSchedule { begin, end } => {
                let schedule_id = event_id.ok_or_else(|| {
                    AppError::data_integrity(account, &date_str(date), "no calendar event to record")
                })?;
                insert_schedule(
                    conn,
                    &ScheduleEntry {
                        schedule_id: schedule_id.to_string(),
                        account: account.to_string(),
                        date: *date,
                        begin_time: *begin,
                        end_time: *end,
                    },
                )?;
            }
            StoreWrite::UpdateScheduleEnd { schedule_id, end } => {
                if update_schedule_end(conn, schedule_id, *end)? == 0 {
                    return Err(AppError::data_integrity(
                        account,
                        &date_str(date),
                        format!("schedule {} vanished", schedule_id),
                    ));
                }
            }
            StoreWrite::DeleteStatus => {
                delete_status(conn, account, date)?;
            }
            StoreWrite::DeleteSchedule => {
                delete_schedule(conn, account, date)?;
            }
        }
    }
    Ok(())
}

/// Record the resulting state of the day in the `log` table.
fn audit(conn: &Connection, account: &str, date: &NaiveDate, action: &Action) -> AppResult<()> {
    let message = match get_status(conn, account, date)? {
        Some(state) => format!(
            "status={} process={}",
            state.status.map(|s| s.to_db_str()).unwrap_or("null"),
            state.process.map(|p| p.to_db_str()).unwrap_or("null"),
        ),
        None => "no state".to_string(),
    };
    ttlog(conn, action.name(), &day_target(account, &date_str(date)), &message)
}
