//! Unified application error type.
//! Every layer (db, core, externals, server) returns AppError so the webhook
//! handler can map a failure to a status code in one place.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Inbound request errors
    // ---------------------------
    #[error("Malformed webhook body: {0}")]
    BadRequest(String),

    #[error("Unrecognized event: {0}")]
    Unrecognized(String),

    #[error("Message does not need to be processed: {0}")]
    NotExpected(String),

    #[error("Invalid confirmation payload: {0}")]
    InvalidConfirmation(String),

    // ---------------------------
    // Fatal for the current request
    // ---------------------------
    #[error("Internal data error for {account} on {date}: {reason}")]
    DataIntegrity {
        account: String,
        date: String,
        reason: String,
    },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid status value: {0}")]
    InvalidStatus(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
}

/// Coarse classification used by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input, nothing was mutated.
    Client,
    /// The request aborted; operator attention needed.
    Fatal,
}

impl AppError {
    pub fn data_integrity(account: &str, date: &str, reason: impl Into<String>) -> Self {
        AppError::DataIntegrity {
            account: account.to_string(),
            date: date.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest(_)
            | AppError::Unrecognized(_)
            | AppError::NotExpected(_)
            | AppError::InvalidConfirmation(_) => ErrorKind::Client,
            _ => ErrorKind::Fatal,
        }
    }

    /// Status codes follow the messaging platform's conventions: body problems
    /// and unexpected messages are 403, an unknown callback is 400.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::NotExpected(_) => StatusCode::FORBIDDEN,
            AppError::Unrecognized(_) | AppError::InvalidConfirmation(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        // Fatal details stay in the operator log.
        let body = match self.kind() {
            ErrorKind::Client => self.to_string(),
            ErrorKind::Fatal => "internal error".to_string(),
        };
        (code, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
