//! Axum router wiring.
//!
//! - `/data`    : one-shot fixture snapshot
//! - `/stream`  : chunked JSON lines, one per tick
//! - `/ws`      : WebSocket scalar feed
//! - `/healthz`, `/metrics` : ops

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/data", get(transport::http::snapshot))
        .route("/stream", get(transport::http::stream))
        .route("/ws", get(transport::ws::ws_upgrade))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
