pub mod cluster_service;
pub mod demo_data;
pub mod metric_service;
pub mod resource_service;
pub mod stream_service;
