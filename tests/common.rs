#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use timeclock_bot::core::dispatcher::Dispatcher;
use timeclock_bot::core::startup::BotSettings;
use timeclock_bot::db::pool::DbPool;
use timeclock_bot::errors::{AppError, AppResult};
use timeclock_bot::externals::calendar::{CalendarApi, EventRequest};
use timeclock_bot::externals::messenger::MessengerApi;
use timeclock_bot::models::inbound::{EventKind, InboundEvent};
use timeclock_bot::ui::texts::Lang;

pub const ACCOUNT: &str = "alice@example.com";
pub const CALENDAR_ID: &str = "cal-1";
pub const RICH_MENU_ID: &str = "menu-1";

pub fn tbot() -> Command {
    cargo_bin_cmd!("timeclock-bot")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timeclock_bot.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Config path that does not exist, so the CLI runs on defaults.
pub fn missing_config(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timeclock_bot_absent.conf", name));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn tz() -> Tz {
    chrono_tz::Asia::Tokyo
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

/// `hh:mm` on the test day in the bot's timezone.
pub fn local(h: u32, m: u32) -> DateTime<Utc> {
    tz().with_ymd_and_hms(2025, 3, 10, h, m, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCall {
    CreateCalendar(String),
    Create {
        calendar_id: String,
        req: EventRequest,
    },
    Update {
        calendar_id: String,
        event_id: String,
        req: EventRequest,
    },
}

/// Records every call. `fail` makes every call return an upstream error.
#[derive(Default)]
pub struct FakeCalendar {
    pub calls: Mutex<Vec<CalendarCall>>,
    pub fail: AtomicBool,
    next_id: AtomicUsize,
}

impl FakeCalendar {
    pub fn calls(&self) -> Vec<CalendarCall> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("calendar unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarApi for FakeCalendar {
    async fn create_calendar(&self, name: &str) -> AppResult<String> {
        self.check()?;
        self.calls
            .lock()
            .unwrap()
            .push(CalendarCall::CreateCalendar(name.to_string()));
        Ok(CALENDAR_ID.to_string())
    }

    async fn create_event(&self, calendar_id: &str, ev: &EventRequest) -> AppResult<String> {
        self.check()?;
        self.calls.lock().unwrap().push(CalendarCall::Create {
            calendar_id: calendar_id.to_string(),
            req: ev.clone(),
        });
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(format!("event-{}", n + 1))
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        ev: &EventRequest,
    ) -> AppResult<()> {
        self.check()?;
        self.calls.lock().unwrap().push(CalendarCall::Update {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            req: ev.clone(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    pub pushes: Mutex<Vec<(String, Vec<Value>)>>,
    pub linked: Mutex<Vec<(String, String)>>,
    pub rich_menus: Mutex<Vec<Value>>,
    pub fail_push: AtomicBool,
}

impl FakeMessenger {
    pub fn pushes(&self) -> Vec<(String, Vec<Value>)> {
        self.pushes.lock().unwrap().clone()
    }

    /// Default-language text of every pushed payload, in order.
    pub fn texts(&self) -> Vec<String> {
        self.pushes()
            .into_iter()
            .flat_map(|(_, payloads)| payloads)
            .map(|p| {
                p.get("text")
                    .or_else(|| p.get("contentText"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }
}

#[async_trait]
impl MessengerApi for FakeMessenger {
    async fn push(&self, account_id: &str, payloads: &[Value]) -> AppResult<()> {
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("push: 503".into()));
        }
        self.pushes
            .lock()
            .unwrap()
            .push((account_id.to_string(), payloads.to_vec()));
        Ok(())
    }

    async fn create_rich_menu(&self, body: &Value) -> AppResult<String> {
        self.rich_menus.lock().unwrap().push(body.clone());
        Ok(RICH_MENU_ID.to_string())
    }

    async fn set_user_rich_menu(&self, rich_menu_id: &str, account_id: &str) -> AppResult<()> {
        self.linked
            .lock()
            .unwrap()
            .push((rich_menu_id.to_string(), account_id.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub dispatcher: Arc<Dispatcher>,
    pub pool: Arc<DbPool>,
    pub calendar: Arc<FakeCalendar>,
    pub messenger: Arc<FakeMessenger>,
}

pub fn settings() -> BotSettings {
    BotSettings::new(
        tz(),
        Lang::En,
        "http://bot.example.com/",
        CALENDAR_ID,
        RICH_MENU_ID,
    )
}

pub fn harness() -> Harness {
    let pool = Arc::new(DbPool::open_in_memory().expect("in-memory db"));
    let calendar = Arc::new(FakeCalendar::default());
    let messenger = Arc::new(FakeMessenger::default());
    let dispatcher = Arc::new(Dispatcher::new(
        pool.clone(),
        calendar.clone(),
        messenger.clone(),
        settings(),
    ));
    Harness {
        dispatcher,
        pool,
        calendar,
        messenger,
    }
}

pub fn postback(data: &str) -> InboundEvent {
    InboundEvent::new(ACCOUNT, EventKind::Postback, data)
}

pub fn command(data: &str) -> InboundEvent {
    InboundEvent::new(ACCOUNT, EventKind::Command, data)
}

pub fn text(body: &str) -> InboundEvent {
    InboundEvent::new(ACCOUNT, EventKind::FreeText, body)
}
