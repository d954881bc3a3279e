//! Configuration status routes (e.g., /api/v1/config/*)

use axum::{routing::get, Router};
use crate::api::controller::system::SystemController;
use crate::app_state::AppState;

pub fn config_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(SystemController::config_status))
        .route("/integrations", get(SystemController::config_integrations))
}
