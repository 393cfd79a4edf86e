//! Routing of a normalized inbound event to exactly one action.

use crate::errors::{AppError, AppResult};
use crate::models::inbound::{EventKind, InboundEvent};
use crate::utils::time::parse_confirm_time;

/// Payloads that are commands even when typed as free text.
const RESERVED: [&str; 2] = ["start", "clean"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    Clean,
    ToFirst,
    SignIn,
    SignOut,
    DirectSignIn,
    DirectSignOut,
    ManualSignIn,
    ManualSignOut,
    ConfirmIn(i64),
    ConfirmOut(i64),
    /// Free text, expected to be a HHMM time entry.
    TimeEntry(String),
}

impl Action {
    /// Short name used in audit lines and tracing spans.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Clean => "clean",
            Action::ToFirst => "to_first",
            Action::SignIn => "sign_in",
            Action::SignOut => "sign_out",
            Action::DirectSignIn => "direct_sign_in",
            Action::DirectSignOut => "direct_sign_out",
            Action::ManualSignIn => "manual_sign_in",
            Action::ManualSignOut => "manual_sign_out",
            Action::ConfirmIn(_) => "confirm_in",
            Action::ConfirmOut(_) => "confirm_out",
            Action::TimeEntry(_) => "time_entry",
        }
    }
}

fn is_confirmation(payload: &str) -> bool {
    payload.contains("confirm_in") || payload.contains("confirm_out")
}

/// Select the action for `event`. First match wins:
///
/// 1. free text that is neither reserved nor a confirmation → time entry
/// 2. postback/command `start`
/// 3. `clean`
/// 4. the structural commands
/// 5. payloads containing `confirm_in` / `confirm_out`
pub fn route(event: &InboundEvent) -> AppResult<Action> {
    let payload = event.payload.as_str();

    if event.kind == EventKind::FreeText
        && !RESERVED.contains(&payload)
        && !is_confirmation(payload)
    {
        return Ok(Action::TimeEntry(payload.to_string()));
    }

    if matches!(event.kind, EventKind::Postback | EventKind::Command) && payload == "start" {
        return Ok(Action::Start);
    }

    if event.kind != EventKind::Other && payload == "clean" {
        return Ok(Action::Clean);
    }

    let structural = match payload {
        "to_first" => Some(Action::ToFirst),
        "sign_in" => Some(Action::SignIn),
        "sign_out" => Some(Action::SignOut),
        "direct_sign_in" => Some(Action::DirectSignIn),
        "direct_sign_out" => Some(Action::DirectSignOut),
        "manual_sign_in" => Some(Action::ManualSignIn),
        "manual_sign_out" => Some(Action::ManualSignOut),
        _ => None,
    };
    if let Some(action) = structural
        && event.kind != EventKind::Other
    {
        return Ok(action);
    }

    if is_confirmation(payload) {
        let ts = parse_confirm_time(payload).ok_or_else(|| {
            AppError::InvalidConfirmation(format!("no timestamp in '{}'", payload))
        })?;
        // `confirm_in` is checked first; a payload naming both is treated as check-in.
        return Ok(if payload.contains("confirm_in") {
            Action::ConfirmIn(ts)
        } else {
            Action::ConfirmOut(ts)
        });
    }

    Err(AppError::Unrecognized(format!(
        "{:?} event with payload '{}'",
        event.kind, payload
    )))
}
