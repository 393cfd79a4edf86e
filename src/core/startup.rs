//! One-time initialisation before the webhook starts serving.

use crate::config::Config;
use crate::db::init_status::{CALENDAR, RICH_MENU, get_init_status, insert_init_status};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::externals::calendar::CalendarApi;
use crate::externals::messenger::MessengerApi;
use crate::ui::compose::Composer;
use crate::ui::texts::Lang;
use chrono_tz::Tz;
use tracing::info;

/// Process-wide, read-only after startup.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub tz: Tz,
    pub lang: Lang,
    pub calendar_id: String,
    pub rich_menu_id: String,
    pub composer: Composer,
}

impl BotSettings {
    pub fn new(tz: Tz, lang: Lang, public_url: &str, calendar_id: &str, rich_menu_id: &str) -> Self {
        Self {
            tz,
            lang,
            calendar_id: calendar_id.to_string(),
            rich_menu_id: rich_menu_id.to_string(),
            composer: Composer::new(lang, tz, public_url),
        }
    }
}

/// Resolve the calendar and rich menu ids, creating them on first start.
/// Created ids are cached in `system_init_status`.
pub async fn init_settings(
    cfg: &Config,
    pool: &DbPool,
    calendar: &dyn CalendarApi,
    messenger: &dyn MessengerApi,
) -> AppResult<BotSettings> {
    let tz = cfg.tz()?;
    let lang = Lang::from_code(&cfg.default_lang)
        .ok_or_else(|| AppError::Config(format!("unsupported language '{}'", cfg.default_lang)))?;
    let composer = Composer::new(lang, tz, &cfg.public_url);

    let calendar_id = match pool.with_conn(|conn| get_init_status(conn, CALENDAR))? {
        Some(id) => id,
        None => {
            let id = calendar.create_calendar(&cfg.calendar_name).await?;
            pool.with_conn(|conn| insert_init_status(conn, CALENDAR, &id))?;
            id
        }
    };
    info!(%calendar_id, "calendar ready");

    let rich_menu_id = match pool.with_conn(|conn| get_init_status(conn, RICH_MENU))? {
        Some(id) => id,
        None => {
            let id = messenger
                .create_rich_menu(&composer.rich_menu(&cfg.rich_menu_name))
                .await?;
            pool.with_conn(|conn| insert_init_status(conn, RICH_MENU, &id))?;
            id
        }
    };
    info!(%rich_menu_id, "rich menu ready");

    Ok(BotSettings {
        tz,
        lang,
        calendar_id,
        rich_menu_id,
        composer,
    })
}
