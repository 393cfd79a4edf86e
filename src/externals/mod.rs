//! HTTP clients for the messaging platform's open API.

pub mod calendar;
pub mod ical;
pub mod messenger;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Authenticated JSON client shared by the calendar and messenger clients.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    consumer_key: String,
    server_token: String,
}

impl ApiClient {
    pub fn new(cfg: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("timeclock-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            consumer_key: cfg.consumer_key.clone(),
            server_token: cfg.server_token.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send `body` and return the parsed response. Non-2xx is an upstream error;
    /// an empty body yields `Value::Null`.
    pub async fn send(&self, method: Method, path: &str, body: &Value) -> AppResult<Value> {
        let url = self.url(path);
        debug!(%method, %url, "api request");

        let resp = self
            .http
            .request(method.clone(), &url)
            .header("consumerKey", &self.consumer_key)
            .bearer_auth(&self.server_token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            warn!(%method, %url, %status, body = %text, "api request failed");
            return Err(AppError::Upstream(format!(
                "{} {} returned {}",
                method,
                path,
                status_label(status)
            )));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn status_label(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// Calendar responses carry `"result": "success"` on success.
pub fn ensure_success(resp: &Value, what: &str) -> AppResult<()> {
    match resp.get("result").and_then(Value::as_str) {
        Some("success") => Ok(()),
        other => Err(AppError::Upstream(format!(
            "{}: result was {:?}",
            what,
            other.unwrap_or("missing")
        ))),
    }
}
