use axum::{
    http::{HeaderValue, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::app_state::AppState;
use crate::core::config::{APP_NAME, APP_VERSION};
use crate::errors::AppError;

/// Build the main application router
pub fn app_router(cors_origins: &[String]) -> Router<AppState> {
    let api_v1 = Router::new()
        .nest("/kubernetes", crate::api::routes::kubernetes_routes::kubernetes_routes())
        .nest("/health", crate::api::routes::system_routes::system_routes())
        .nest("/config", crate::api::routes::config_routes::config_routes())
        .nest("/ws", crate::api::routes::stream_routes::stream_routes());

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", api_v1)
        .fallback(handler_404)
        .layer(cors_layer(cors_origins))
}

/// `*` anywhere in the list opens CORS up completely.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": APP_NAME,
        "version": APP_VERSION,
        "health": "/api/v1/health",
    }))
}

async fn handler_404(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
