//! API route declarations (e.g., /api/v1/*)

pub mod config_routes;
pub mod kubernetes_routes;
pub mod stream_routes;
pub mod system_routes;
