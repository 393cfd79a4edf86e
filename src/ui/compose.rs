//! Turns structural replies into message payloads.

use super::payload::{self, I18n};
use super::texts::{Lang, Msg, template};
use crate::core::reply::Reply;
use crate::utils::date::local_date_time;
use crate::utils::time::confirm_payload;
use chrono_tz::Tz;
use serde_json::Value;

/// Introduction carousel images, served from `/static`.
pub const CAROUSEL_IMAGES: [&str; 3] = ["carousel_1.png", "carousel_2.png", "carousel_3.png"];

const RICH_MENU_WIDTH: u32 = 2500;
const RICH_MENU_HEIGHT: u32 = 1686;

#[derive(Debug, Clone)]
pub struct Composer {
    pub lang: Lang,
    pub tz: Tz,
    pub public_url: String,
}

impl Composer {
    pub fn new(lang: Lang, tz: Tz, public_url: &str) -> Self {
        Self {
            lang,
            tz,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Default language first, then the others.
    fn languages(&self) -> Vec<Lang> {
        let mut out = vec![self.lang];
        out.extend(Lang::ALL.iter().copied().filter(|l| *l != self.lang));
        out
    }

    fn plain(&self, msg: Msg) -> I18n {
        self.languages()
            .into_iter()
            .map(|l| (l, template(msg, l).to_string()))
            .collect()
    }

    fn filled<F>(&self, msg: Msg, fill: F) -> I18n
    where
        F: Fn(Lang, &str) -> String,
    {
        self.languages()
            .into_iter()
            .map(|l| (l, fill(l, template(msg, l))))
            .collect()
    }

    fn format_ts(&self, ts: i64, pattern: &str) -> String {
        local_date_time(self.tz, ts)
            .map(|dt| dt.format(pattern).to_string())
            .unwrap_or_else(|| ts.to_string())
    }

    fn text(&self, msg: Msg) -> Value {
        payload::text(&self.plain(msg), self.lang)
    }

    fn method_menu(&self, msg: Msg, direct: &str, manual: &str) -> Value {
        let actions = vec![
            payload::message_action(direct, &self.plain(Msg::CurrentTime), self.lang),
            payload::message_action(manual, &self.plain(Msg::ManuallyEnter), self.lang),
        ];
        payload::button_template(&self.plain(msg), actions, self.lang)
    }

    fn confirmation(&self, msg: Msg, at: i64, confirm: &str, back: &str) -> Value {
        let texts = self.filled(msg, |l, t| {
            t.replace("{date}", &self.format_ts(at, l.date_time_format()))
        });
        let actions = vec![
            payload::postback_action(&confirm_payload(confirm, at), &self.plain(Msg::Yes), self.lang),
            payload::postback_action(back, &self.plain(Msg::No), self.lang),
        ];
        payload::with_quick_reply(payload::text(&texts, self.lang), actions)
    }

    fn checked_out(&self, at: i64, hours: i64, minutes: i64) -> Value {
        let msg = if hours == 0 {
            Msg::CheckedOutMinutes
        } else {
            Msg::CheckedOut
        };
        let texts = self.filled(msg, |l, t| {
            t.replace("{date}", &self.format_ts(at, l.date_format()))
                .replace("{hours}", &hours.to_string())
                .replace("{minutes}", &minutes.to_string())
        });
        payload::text(&texts, self.lang)
    }

    fn introduction(&self) -> Value {
        let columns = CAROUSEL_IMAGES
            .iter()
            .map(|img| {
                (
                    format!("{}/static/{}", self.public_url, img),
                    payload::postback_action("start", &self.plain(Msg::TryNow), self.lang),
                )
            })
            .collect();
        payload::image_carousel(columns)
    }

    /// One payload per reply, in order.
    pub fn compose(&self, replies: &[Reply]) -> Vec<Value> {
        replies.iter().map(|r| self.compose_one(r)).collect()
    }

    pub fn compose_one(&self, reply: &Reply) -> Value {
        match reply {
            Reply::Greeting => self.text(Msg::Greeting),
            Reply::Introduction => self.introduction(),
            Reply::ToFirst => self.text(Msg::ToFirst),
            Reply::SignInMenu => self.method_menu(Msg::SignInMenu, "direct_sign_in", "manual_sign_in"),
            Reply::SignOutMenu => {
                self.method_menu(Msg::SignOutMenu, "direct_sign_out", "manual_sign_out")
            }
            Reply::AlreadyClockedIn => self.text(Msg::AlreadyClockedIn),
            Reply::AlreadyClockedOut => self.text(Msg::AlreadyClockedOut),
            Reply::NotClockedIn => self.text(Msg::NotClockedIn),
            Reply::InvalidAction => self.text(Msg::InvalidAction),
            Reply::ConfirmCheckIn { at } => {
                self.confirmation(Msg::ConfirmCheckIn, *at, "confirm_in", "sign_in")
            }
            Reply::ConfirmCheckOut { at } => {
                self.confirmation(Msg::ConfirmCheckOut, *at, "confirm_out", "sign_out")
            }
            Reply::ManualSignInPrompt => self.text(Msg::ManualSignInPrompt),
            Reply::ManualSignOutPrompt => self.text(Msg::ManualSignOutPrompt),
            Reply::TimeFormatHint => self.text(Msg::TimeFormatHint),
            Reply::CouldNotUnderstand => self.text(Msg::CouldNotUnderstand),
            Reply::CheckOutBeforeCheckIn => self.text(Msg::CheckOutBeforeCheckIn),
            Reply::CheckedIn => self.text(Msg::CheckedIn),
            Reply::CheckedOut { at, hours, minutes } => self.checked_out(*at, *hours, *minutes),
        }
    }

    /// Calendar event title, in the default language.
    pub fn event_title(&self, msg: Msg, account: &str, at: i64) -> String {
        template(msg, self.lang)
            .replace("{account}", account)
            .replace("{date}", &self.format_ts(at, self.lang.date_format()))
    }

    /// Bot-wide rich menu: clock-in and clock-out on top, "start over" below.
    pub fn rich_menu(&self, name: &str) -> Value {
        let areas = vec![
            payload::rich_menu_area(
                0,
                0,
                1250,
                1286,
                payload::postback_action("sign_in", &self.plain(Msg::RecordClockIn), self.lang),
            ),
            payload::rich_menu_area(
                1250,
                0,
                1250,
                1286,
                payload::postback_action("sign_out", &self.plain(Msg::RecordClockOut), self.lang),
            ),
            payload::rich_menu_area(
                0,
                1286,
                2500,
                400,
                payload::postback_action("to_first", &self.plain(Msg::StartOver), self.lang),
            ),
        ];
        payload::rich_menu(name, RICH_MENU_WIDTH, RICH_MENU_HEIGHT, areas)
    }
}
