//! HTTP front end: webhook delivery plus two static health checks.
//!
//! GET  /         liveness banner
//! GET  /health   health check
//! POST /webhook  Telegram update payload

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use teloxide::types::Update;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::router::{dispatch_update, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({"status": "Bot is running", "message": "Telegram bot is active"}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

/// Acknowledge immediately; the update is handled on its own task.
async fn webhook(State(state): State<Arc<AppState>>, body: Bytes) -> (StatusCode, Json<Value>) {
    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => {
            tokio::spawn(dispatch_update(update, state));
            (StatusCode::OK, Json(json!({"status": "ok"})))
        }
        Err(e) => {
            tracing::error!(error = %e, "rejected webhook payload");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}

/// Bind the listening socket up front so a taken port is a startup error.
pub async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to {addr}: {e}"))
}

pub async fn serve(
    state: Arc<AppState>,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = bind(port).await?;
    serve_on(listener, state, shutdown).await
}

pub async fn serve_on(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "http server listening");
    }

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
