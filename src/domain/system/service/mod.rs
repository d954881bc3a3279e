pub mod config_status_service;
pub mod health_service;
