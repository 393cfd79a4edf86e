//! Webhook HTTP server.

pub mod routes;

use crate::core::dispatcher::Dispatcher;
use crate::errors::AppResult;
use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Source of the request time.
pub type Clock = fn() -> DateTime<Utc>;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            clock: Utc::now,
        }
    }
}

pub fn build_router(state: AppState, image_dir: &str) -> Router {
    Router::new()
        .route("/callback", post(routes::callback))
        .route("/health", get(routes::health_check))
        .nest_service("/static", ServeDir::new(image_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `listen` and serve until the process is stopped.
pub async fn start(listen: &str, app: Router) -> AppResult<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("webhook listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
