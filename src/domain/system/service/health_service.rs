use anyhow::Result;
use chrono::Utc;

use crate::core::config::APP_VERSION;
use crate::domain::system::dto::system_response::HealthResponse;

/// Liveness and readiness share one answer: the process is up and serving.
pub async fn health() -> Result<HealthResponse> {
    Ok(HealthResponse {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        timestamp: Utc::now(),
    })
}
