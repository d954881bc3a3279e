//! Streaming routes (e.g., /api/v1/ws/*)

use axum::{routing::get, Router};
use crate::api::controller::stream::StreamController;
use crate::app_state::AppState;

pub fn stream_routes() -> Router<AppState> {
    Router::new()
        .route("/logs/{namespace}/{pod}", get(StreamController::pod_logs))
        .route("/events", get(StreamController::events))
}
