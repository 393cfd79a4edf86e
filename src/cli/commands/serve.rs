use crate::config::Config;
use crate::core::dispatcher::Dispatcher;
use crate::core::startup::init_settings;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::externals::ApiClient;
use crate::externals::calendar::{CalendarApi, HttpCalendar};
use crate::externals::messenger::{HttpMessenger, MessengerApi};
use crate::server::{self, AppState};
use std::sync::Arc;
use tracing::info;

/// Handle the `serve` command: startup initialisation, then the webhook loop.
pub async fn handle(cfg: &Config, listen: Option<&str>) -> AppResult<()> {
    cfg.validate_for_serve()?;

    let pool = Arc::new(DbPool::open(&cfg.database)?);
    let api = ApiClient::new(cfg)?;
    let calendar: Arc<dyn CalendarApi> =
        Arc::new(HttpCalendar::new(api.clone(), &cfg.admin_account, cfg.tz()?));
    let messenger: Arc<dyn MessengerApi> = Arc::new(HttpMessenger::new(api, &cfg.bot_no));

    let settings = init_settings(cfg, &pool, calendar.as_ref(), messenger.as_ref()).await?;
    info!(timezone = settings.tz.name(), lang = ?settings.lang, "bot settings loaded");

    let dispatcher = Arc::new(Dispatcher::new(pool, calendar, messenger, settings));
    let app = server::build_router(AppState::new(dispatcher), &cfg.image_dir);

    server::start(listen.unwrap_or(&cfg.listen), app).await
}
