//! System controller: connects routes to health and configuration status usecases

use axum::extract::State;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::system::dto::system_response::{
    ConfigStatusResponse, HealthResponse, IntegrationStatus,
};
use crate::errors::AppError;

pub struct SystemController;

impl SystemController {
    pub async fn health(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<HealthResponse>>, AppError> {
        to_json(state.system_service.health().await)
    }

    pub async fn config_status(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<ConfigStatusResponse>>, AppError> {
        to_json(state.config_status_service.status().await)
    }

    pub async fn config_integrations(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<IntegrationStatus>>>, AppError> {
        to_json(state.config_status_service.integrations().await)
    }
}
