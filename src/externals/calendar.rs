//! Calendar service: one shared calendar, one event per user workday.

use super::ical::{self, IcalEvent};
use super::{ApiClient, ensure_success};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use reqwest::Method;
use serde_json::{Value, json};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub begin: i64,
    pub end: i64,
    pub title: String,
    /// Account the event belongs to.
    pub owner: String,
}

#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Create the bot calendar and return its id.
    async fn create_calendar(&self, name: &str) -> AppResult<String>;

    /// Create an event and return the id used to update it later.
    async fn create_event(&self, calendar_id: &str, ev: &EventRequest) -> AppResult<String>;

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        ev: &EventRequest,
    ) -> AppResult<()>;
}

pub struct HttpCalendar {
    api: ApiClient,
    /// Account owning the calendar; all calendar URLs are scoped to it.
    admin_account: String,
    tz: Tz,
}

impl HttpCalendar {
    pub fn new(api: ApiClient, admin_account: &str, tz: Tz) -> Self {
        Self {
            api,
            admin_account: admin_account.to_string(),
            tz,
        }
    }

    fn events_path(&self, calendar_id: &str) -> String {
        format!(
            "calendar/v1/{}/calendars/{}/events",
            self.admin_account, calendar_id
        )
    }
}

#[async_trait]
impl CalendarApi for HttpCalendar {
    async fn create_calendar(&self, name: &str) -> AppResult<String> {
        let body = json!({
            "name": name,
            "description": name,
            "invitationUserList": [{
                "email": self.admin_account,
                "actionType": "insert",
                "roleId": 2
            }]
        });
        let path = format!("calendar/v1/{}/calendarList", self.admin_account);
        let resp = self.api.send(Method::POST, &path, &body).await?;
        ensure_success(&resp, "create calendar")?;

        let id = match resp.get("returnValue") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(o)) => o
                .get("calendarId")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| AppError::Upstream("create calendar: no calendarId".into()))?,
            _ => return Err(AppError::Upstream("create calendar: no returnValue".into())),
        };
        info!(calendar_id = %id, "calendar created");
        Ok(id)
    }

    async fn create_event(&self, calendar_id: &str, ev: &EventRequest) -> AppResult<String> {
        let uid = format!("{}{}", uuid::Uuid::new_v4(), ev.owner);
        let ical = ical::render(
            &IcalEvent {
                uid: &uid,
                summary: &ev.title,
                description: &ev.owner,
                begin: ev.begin,
                end: ev.end,
                created: true,
            },
            self.tz,
            Utc::now(),
        )?;

        let resp = self
            .api
            .send(Method::POST, &self.events_path(calendar_id), &json!({ "ical": ical }))
            .await?;
        ensure_success(&resp, "create event")?;

        resp.get("returnValue")
            .and_then(|v| v.get("icalUid"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::Upstream("create event: no icalUid".into()))
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        ev: &EventRequest,
    ) -> AppResult<()> {
        let ical = ical::render(
            &IcalEvent {
                uid: event_id,
                summary: &ev.title,
                description: &ev.owner,
                begin: ev.begin,
                end: ev.end,
                created: false,
            },
            self.tz,
            Utc::now(),
        )?;

        let path = format!("{}/{}", self.events_path(calendar_id), event_id);
        let resp = self
            .api
            .send(Method::PUT, &path, &json!({ "ical": ical }))
            .await?;
        ensure_success(&resp, "update event")
    }
}
