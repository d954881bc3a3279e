//! Health routes (e.g., /api/v1/health/*)

use axum::{routing::get, Router};
use crate::api::controller::system::SystemController;
use crate::app_state::AppState;

pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(SystemController::health))
        .route("/live", get(SystemController::health))
        .route("/ready", get(SystemController::health))
}
