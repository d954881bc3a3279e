// Kube-rs based Kubernetes client
pub mod kube_client;
pub mod kube_resources;
pub mod kubeconfig;
pub mod cluster_api;
pub mod cluster_error;
pub mod metrics;

// Per-resource fetch helpers
pub mod nodes;
pub mod pods;
pub mod deployments;
pub mod services;
pub mod mappers;
pub mod namespaces;

// Streaming
pub mod pod_logs;
pub mod events;
