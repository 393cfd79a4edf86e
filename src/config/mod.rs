use crate::errors::{AppError, AppResult};
use crate::utils::date::parse_timezone;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_lang")]
    pub default_lang: String,

    /// Root of the platform's open API, e.g. `https://apis.worksmobile.com/r/<api id>`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub bot_no: String,
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub server_token: String,
    /// Account that owns the shared attendance calendar.
    #[serde(default)]
    pub admin_account: String,

    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,
    #[serde(default = "default_rich_menu_name")]
    pub rich_menu_name: String,

    /// Directory served under `/static`.
    #[serde(default = "default_image_dir")]
    pub image_dir: String,
    /// Public address of this server, used to build carousel image URLs.
    #[serde(default = "default_public_url")]
    pub public_url: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}
fn default_lang() -> String {
    "en".to_string()
}
fn default_api_base_url() -> String {
    "https://apis.worksmobile.com/r/API_ID".to_string()
}
fn default_calendar_name() -> String {
    "Attendance management bot".to_string()
}
fn default_rich_menu_name() -> String {
    "attendance_management_bot_rich_menu".to_string()
}
fn default_image_dir() -> String {
    Config::config_dir().join("image").to_string_lossy().to_string()
}
fn default_public_url() -> String {
    "http://localhost:8080/".to_string()
}
fn default_http_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            listen: default_listen(),
            timezone: default_timezone(),
            default_lang: default_lang(),
            api_base_url: default_api_base_url(),
            bot_no: String::new(),
            consumer_key: String::new(),
            server_token: String::new(),
            admin_account: String::new(),
            calendar_name: default_calendar_name(),
            rich_menu_name: default_rich_menu_name(),
            image_dir: default_image_dir(),
            public_url: default_public_url(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".timeclock-bot")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timeclock-bot.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timeclock-bot.sqlite")
    }

    /// Load configuration from `path`, or return defaults if the file is missing
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn tz(&self) -> AppResult<Tz> {
        parse_timezone(&self.timezone)
    }

    /// Fields that `serve` cannot run without.
    pub fn validate_for_serve(&self) -> AppResult<()> {
        self.tz()?;
        if self.bot_no.is_empty() {
            return Err(AppError::Config("'bot_no' is not set".into()));
        }
        if self.admin_account.is_empty() {
            return Err(AppError::Config("'admin_account' is not set".into()));
        }
        Ok(())
    }

    /// Write a default config file (unless `is_test`) and create an empty DB file.
    /// Returns the configuration that was written.
    pub fn init_all(
        config_path: &Path,
        custom_db: Option<String>,
        is_test: bool,
    ) -> AppResult<Config> {
        let dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_dir);
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => dir.join("timeclock-bot.sqlite"),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(config_path)?;
            file.write_all(yaml.as_bytes())?;
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
