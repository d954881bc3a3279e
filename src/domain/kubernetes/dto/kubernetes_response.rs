//! Response payloads of the kubernetes operations that are not plain model lists.

use serde::{Deserialize, Serialize};

use crate::domain::kubernetes::model::ClusterInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterListResponse {
    pub clusters: Vec<ClusterInfo>,
    /// First connected cluster, if any
    pub active_cluster: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchContextResponse {
    pub success: bool,
    pub context: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentContextResponse {
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleResult {
    pub success: bool,
    pub namespace: String,
    pub deployment: String,
    pub previous_replicas: i32,
    pub current_replicas: i32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartResult {
    pub success: bool,
    pub namespace: String,
    pub deployment: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
    pub namespace: String,
    pub pod: String,
    pub message: String,
}
