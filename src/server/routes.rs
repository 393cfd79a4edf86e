use super::AppState;
use crate::errors::AppResult;
use crate::models::inbound::InboundEvent;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

/// Inbound webhook. Success is an empty 200; failures map through `AppError`.
pub async fn callback(State(state): State<AppState>, body: String) -> AppResult<StatusCode> {
    let event = InboundEvent::from_json(&body)?;
    state.dispatcher.handle(&event, (state.clock)()).await?;
    Ok(StatusCode::OK)
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "timeclock-bot",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
