//! `/` and `/health` for uptime checkers.

use std::net::SocketAddr;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::supervisor::{unix_now, SharedStatus};

pub const SERVICE_NAME: &str = "Telegram Music Bot";

pub fn router(status: SharedStatus) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .with_state(status)
}

/// Binds `0.0.0.0:port` and serves until the process ends.
pub async fn serve(port: u16, status: SharedStatus) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;

    log::info!("Starting health server on http://{}", addr);
    log::info!("  /        - Bot status summary");
    log::info!("  /health  - Health check");

    axum::serve(listener, router(status)).await?;
    Ok(())
}

/// GET / - status summary
async fn index_handler(State(status): State<SharedStatus>) -> Json<Value> {
    let status = status.read().await;
    Json(json!({
        "status": if status.running { "Bot is running" } else { "Bot starting" },
        "service": SERVICE_NAME,
        "message": "Bot is active and processing messages",
        "last_seen": status.last_seen.unwrap_or(0.0),
        "restarts": status.restarts,
    }))
}

/// GET /health - always 200 while this process is alive
async fn health_handler(State(status): State<SharedStatus>) -> Json<Value> {
    let running = status.read().await.running;
    Json(json!({
        "status": "healthy",
        "timestamp": unix_now(),
        "bot_running": running,
    }))
}
