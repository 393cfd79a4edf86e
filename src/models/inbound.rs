//! Inbound webhook body and its normalized form.
//!
//! The messaging platform posts one JSON document per user interaction.
//! Only the fields the dispatcher routes on are modelled; everything else in
//! the body is ignored.

use crate::errors::{AppError, AppResult};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    pub source: Option<Source>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<String>,
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct Source {
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub postback: Option<String>,
    pub text: Option<String>,
}

/// Where the payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A button press that posts back a string (`type: postback`).
    Postback,
    /// A message action carrying an inline postback (`content.postback`).
    Command,
    /// Text typed by the user.
    FreeText,
    /// Any other message type (stickers, images, ...).
    Other,
}

/// Immutable, normalized view of one webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub account_id: String,
    pub kind: EventKind,
    pub payload: String,
}

impl InboundEvent {
    pub fn new(account_id: &str, kind: EventKind, payload: &str) -> Self {
        Self {
            account_id: account_id.to_string(),
            kind,
            payload: payload.to_string(),
        }
    }

    /// Parse a raw request body. Malformed JSON or a missing
    /// `source.accountId` / `type` is a client error.
    pub fn from_json(body: &str) -> AppResult<Self> {
        let body: WebhookBody = serde_json::from_str(body)
            .map_err(|e| AppError::BadRequest(format!("body is not json: {}", e)))?;
        Self::from_body(body)
    }

    pub fn from_body(body: WebhookBody) -> AppResult<Self> {
        let account_id = body
            .source
            .and_then(|s| s.account_id)
            .ok_or_else(|| AppError::BadRequest("can't find 'accountId' field".into()))?;

        let kind = body
            .kind
            .ok_or_else(|| AppError::BadRequest("can't find 'type' field".into()))?;

        let (event_kind, payload) = match kind.as_str() {
            "postback" => (EventKind::Postback, body.data.unwrap_or_default()),
            "message" => match body.content {
                Some(Content {
                    postback: Some(pb), ..
                }) if !pb.is_empty() => (EventKind::Command, pb),
                Some(Content {
                    kind: Some(t),
                    text: Some(text),
                    ..
                }) if t == "text" => (EventKind::FreeText, text),
                _ => (EventKind::Other, String::new()),
            },
            _ => (EventKind::Other, String::new()),
        };

        Ok(Self {
            account_id,
            kind: event_kind,
            payload,
        })
    }
}
