//! Bot messaging: pushes and rich menus.

use super::ApiClient;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};

#[async_trait]
pub trait MessengerApi: Send + Sync {
    /// Push each payload to `account_id`, in order. Stops at the first failure.
    async fn push(&self, account_id: &str, payloads: &[Value]) -> AppResult<()>;

    /// Register a rich menu and return its id.
    async fn create_rich_menu(&self, body: &Value) -> AppResult<String>;

    async fn set_user_rich_menu(&self, rich_menu_id: &str, account_id: &str) -> AppResult<()>;
}

pub struct HttpMessenger {
    api: ApiClient,
    bot_no: String,
}

impl HttpMessenger {
    pub fn new(api: ApiClient, bot_no: &str) -> Self {
        Self {
            api,
            bot_no: bot_no.to_string(),
        }
    }

    fn bot_path(&self, rest: &str) -> String {
        format!("message/v1/bot/{}/{}", self.bot_no, rest)
    }
}

#[async_trait]
impl MessengerApi for HttpMessenger {
    async fn push(&self, account_id: &str, payloads: &[Value]) -> AppResult<()> {
        let path = self.bot_path("message/push");
        for content in payloads {
            let body = json!({ "accountId": account_id, "content": content });
            self.api.send(Method::POST, &path, &body).await?;
        }
        Ok(())
    }

    async fn create_rich_menu(&self, body: &Value) -> AppResult<String> {
        let resp = self
            .api
            .send(Method::POST, &self.bot_path("richmenu"), body)
            .await?;
        resp.get("richMenuId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::Upstream("create rich menu: no richMenuId".into()))
    }

    async fn set_user_rich_menu(&self, rich_menu_id: &str, account_id: &str) -> AppResult<()> {
        let path = self.bot_path(&format!("richmenu/{}/account/{}", rich_menu_id, account_id));
        self.api.send(Method::POST, &path, &json!({})).await?;
        Ok(())
    }
}
