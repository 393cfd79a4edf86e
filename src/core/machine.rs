//! Check-in / check-out state machine.
//!
//! `decide` is pure: it reads an immutable snapshot of the day and returns
//! what should happen. The dispatcher performs the calendar calls, the store
//! writes and the pushes, in that order.

use super::action::Action;
use super::reply::Reply;
use crate::errors::{AppError, AppResult};
use crate::models::day_state::DayState;
use crate::models::progress::{Process, Status};
use crate::models::schedule_entry::{CHECK_IN_PLACEHOLDER_SECS, ScheduleEntry};
use crate::utils::date::{at_local, date_str};
use crate::utils::time::parse_hhmm;
use chrono::NaiveDate;
use chrono_tz::Tz;

/// Stored rows for (account, date) at the start of the request.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub state: Option<DayState>,
    pub schedule: Option<ScheduleEntry>,
}

impl Snapshot {
    fn status(&self) -> Status {
        self.state.as_ref().map(DayState::expecting).unwrap_or(Status::None)
    }

    fn process(&self) -> Process {
        self.state.as_ref().map(DayState::progress).unwrap_or(Process::None)
    }
}

/// Request-scoped facts the decision depends on.
#[derive(Debug, Clone)]
pub struct Context {
    pub account: String,
    /// Local date of the request in `tz`.
    pub date: NaiveDate,
    /// Request time, Unix seconds.
    pub now: i64,
    pub tz: Tz,
}

/// External calls, executed before any store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Attach the bot's rich menu to the user.
    LinkRichMenu,
    /// Create the day's calendar event. Its id feeds `StoreWrite::InsertSchedule`.
    CreateEvent { begin: i64, end: i64 },
    UpdateEvent {
        schedule_id: String,
        begin: i64,
        end: i64,
    },
}

/// Store mutations for (account, date), applied in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    UpsertStatus {
        status: Status,
        process: Option<Process>,
    },
    SetStatus(Status),
    ClearStatus,
    InsertSchedule { begin: i64, end: i64 },
    UpdateScheduleEnd { schedule_id: String, end: i64 },
    DeleteStatus,
    DeleteSchedule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub effects: Vec<SideEffect>,
    pub writes: Vec<StoreWrite>,
    pub replies: Vec<Reply>,
}

impl Transition {
    fn reply(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            ..Self::default()
        }
    }
}

pub fn decide(snap: &Snapshot, action: &Action, ctx: &Context) -> AppResult<Transition> {
    match action {
        Action::Start => Ok(Transition {
            effects: vec![SideEffect::LinkRichMenu],
            writes: vec![],
            replies: vec![Reply::Greeting, Reply::Introduction],
        }),
        Action::Clean => Ok(Transition {
            effects: vec![],
            writes: vec![StoreWrite::DeleteStatus, StoreWrite::DeleteSchedule],
            replies: vec![],
        }),
        Action::ToFirst => Ok(Transition::reply(vec![Reply::ToFirst])),
        Action::SignIn => Ok(sign_in(snap)),
        Action::DirectSignIn => Ok(direct_sign_in(snap, ctx)),
        Action::ManualSignIn => Ok(manual_sign_in(snap)),
        Action::SignOut => Ok(sign_out(snap)),
        Action::DirectSignOut => direct_sign_out(snap, ctx),
        Action::ManualSignOut => Ok(manual_sign_out(snap)),
        Action::ConfirmIn(ts) => confirm_in(snap, ctx, *ts),
        Action::ConfirmOut(ts) => confirm_out(snap, ctx, *ts),
        Action::TimeEntry(text) => time_entry(snap, ctx, text),
    }
}

fn sign_in(snap: &Snapshot) -> Transition {
    if snap.process().is_started() {
        return Transition::reply(vec![Reply::AlreadyClockedIn]);
    }
    let mut t = Transition::reply(vec![Reply::SignInMenu]);
    if snap.status() == Status::WaitIn {
        t.writes.push(StoreWrite::ClearStatus);
    }
    t
}

fn direct_sign_in(snap: &Snapshot, ctx: &Context) -> Transition {
    if snap.process().is_started() {
        return Transition::reply(vec![Reply::InvalidAction]);
    }
    let mut t = Transition::reply(vec![Reply::ConfirmCheckIn { at: ctx.now }]);
    if matches!(snap.status(), Status::WaitIn | Status::InDone) {
        t.writes.push(StoreWrite::ClearStatus);
    }
    t
}

fn manual_sign_in(snap: &Snapshot) -> Transition {
    if snap.process().is_started() {
        return Transition::reply(vec![Reply::InvalidAction]);
    }
    Transition {
        effects: vec![],
        writes: vec![StoreWrite::UpsertStatus {
            status: Status::WaitIn,
            process: None,
        }],
        replies: vec![Reply::ManualSignInPrompt, Reply::TimeFormatHint],
    }
}

fn sign_out(snap: &Snapshot) -> Transition {
    match snap.process() {
        Process::None => Transition::reply(vec![Reply::NotClockedIn]),
        Process::SignOutDone => Transition::reply(vec![Reply::AlreadyClockedOut]),
        Process::SignInDone => {
            let mut t = Transition::reply(vec![Reply::SignOutMenu]);
            if snap.status() == Status::WaitOut {
                t.writes.push(StoreWrite::SetStatus(Status::InDone));
            }
            t
        }
    }
}

fn direct_sign_out(snap: &Snapshot, ctx: &Context) -> AppResult<Transition> {
    if snap.process() != Process::SignInDone {
        return Ok(Transition::reply(vec![Reply::InvalidAction]));
    }
    let schedule = require_schedule(snap, ctx)?;

    if ctx.now < schedule.begin_time {
        return Ok(check_out_too_early());
    }

    let mut t = Transition::reply(vec![Reply::ConfirmCheckOut { at: ctx.now }]);
    if matches!(snap.status(), Status::WaitOut | Status::OutDone) {
        t.writes.push(StoreWrite::SetStatus(Status::InDone));
    }
    Ok(t)
}

fn manual_sign_out(snap: &Snapshot) -> Transition {
    if snap.process() != Process::SignInDone {
        return Transition::reply(vec![Reply::InvalidAction]);
    }
    Transition {
        effects: vec![],
        writes: vec![StoreWrite::SetStatus(Status::WaitOut)],
        replies: vec![Reply::ManualSignOutPrompt, Reply::TimeFormatHint],
    }
}

fn confirm_in(snap: &Snapshot, ctx: &Context, ts: i64) -> AppResult<Transition> {
    if snap.schedule.is_some() {
        return Err(AppError::data_integrity(
            &ctx.account,
            &date_str(&ctx.date),
            "check-in confirmed but a schedule already exists",
        ));
    }
    let end = ts.checked_add(CHECK_IN_PLACEHOLDER_SECS).ok_or_else(|| {
        AppError::InvalidConfirmation(format!("check-in time {} out of range", ts))
    })?;
    Ok(Transition {
        effects: vec![SideEffect::CreateEvent { begin: ts, end }],
        writes: vec![
            StoreWrite::InsertSchedule { begin: ts, end },
            StoreWrite::UpsertStatus {
                status: Status::InDone,
                process: Some(Process::SignInDone),
            },
        ],
        replies: vec![Reply::CheckedIn],
    })
}

fn confirm_out(snap: &Snapshot, ctx: &Context, ts: i64) -> AppResult<Transition> {
    let schedule = require_schedule(snap, ctx)?;
    // A stale confirmation can carry a time before check-in.
    if ts < schedule.begin_time {
        return Ok(check_out_too_early());
    }
    let (hours, minutes) = schedule.elapsed_until(ts);
    Ok(Transition {
        effects: vec![SideEffect::UpdateEvent {
            schedule_id: schedule.schedule_id.clone(),
            begin: schedule.begin_time,
            end: ts,
        }],
        writes: vec![
            StoreWrite::UpdateScheduleEnd {
                schedule_id: schedule.schedule_id.clone(),
                end: ts,
            },
            StoreWrite::UpsertStatus {
                status: Status::OutDone,
                process: Some(Process::SignOutDone),
            },
        ],
        replies: vec![Reply::CheckedOut {
            at: schedule.begin_time,
            hours,
            minutes,
        }],
    })
}

fn time_entry(snap: &Snapshot, ctx: &Context, text: &str) -> AppResult<Transition> {
    let status = snap.status();
    if !status.is_waiting() {
        return Err(AppError::NotExpected(format!(
            "text received while status is {}",
            status.to_db_str()
        )));
    }

    let Some(ts) = parse_hhmm(text).and_then(|t| at_local(ctx.tz, ctx.date, t)) else {
        return Ok(Transition::reply(vec![
            Reply::CouldNotUnderstand,
            Reply::TimeFormatHint,
        ]));
    };

    match status {
        Status::WaitIn => confirm_in(snap, ctx, ts),
        _ => {
            let schedule = require_schedule(snap, ctx)?;
            if ts < schedule.begin_time {
                return Ok(Transition::reply(vec![
                    Reply::CheckOutBeforeCheckIn,
                    Reply::TimeFormatHint,
                ]));
            }
            confirm_out(snap, ctx, ts)
        }
    }
}

/// Re-prompt for a check-out time and wait for text input.
fn check_out_too_early() -> Transition {
    Transition {
        effects: vec![],
        writes: vec![StoreWrite::SetStatus(Status::WaitOut)],
        replies: vec![Reply::CheckOutBeforeCheckIn, Reply::TimeFormatHint],
    }
}

fn require_schedule<'a>(snap: &'a Snapshot, ctx: &Context) -> AppResult<&'a ScheduleEntry> {
    snap.schedule.as_ref().ok_or_else(|| {
        AppError::data_integrity(
            &ctx.account,
            &date_str(&ctx.date),
            "check-in recorded but no schedule found",
        )
    })
}
