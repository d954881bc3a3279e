//! Cluster-facing views returned by the kubernetes services.
//!
//! Live and demo data share these shapes, so a consumer cannot tell them apart
//! structurally.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    Connected,
    Disconnected,
    Error,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Healthy,
    Warning,
    Error,
    Pending,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    Worker,
    ControlPlane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodPhase {
    /// Unrecognized or missing phases read as `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("Pending") => PodPhase::Pending,
            Some("Running") => PodPhase::Running,
            Some("Succeeded") => PodPhase::Succeeded,
            Some("Failed") => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }
}

/// One snapshot per registry enumeration; identity is `context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub name: String,
    pub context: String,
    pub status: ClusterStatus,
    pub server_url: Option<String>,
    pub version: Option<String>,
    pub node_count: usize,
    pub namespace_count: usize,
    pub pod_count: usize,
    pub error: Option<String>,
}

impl ClusterInfo {
    /// An entry with no counts, used for failed or unknown clusters.
    pub fn unreachable(
        name: impl Into<String>,
        context: impl Into<String>,
        status: ClusterStatus,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            status,
            server_url: None,
            version: None,
            node_count: 0,
            namespace_count: 0,
            pod_count: 0,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub cpu_usage_percent: f64,
    pub cpu_capacity_cores: f64,
    pub cpu_allocatable_cores: f64,
    pub memory_usage_percent: f64,
    pub memory_capacity_bytes: i64,
    pub memory_allocatable_bytes: i64,
    pub pod_count: usize,
    pub pod_capacity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    pub status: ResourceStatus,
    pub role: NodeRole,
    pub kubernetes_version: String,
    pub os_image: String,
    pub container_runtime: String,
    pub internal_ip: Option<String>,
    pub external_ip: Option<String>,
    pub conditions: BTreeMap<String, bool>,
    pub labels: BTreeMap<String, String>,
    pub taints: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub metrics: Option<NodeMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerStatusInfo {
    pub name: String,
    pub ready: bool,
    pub restart_count: i32,
    /// `running`, `waiting: <reason>`, `terminated: <reason>` or `unknown`
    pub state: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    pub status: ResourceStatus,
    pub node_name: Option<String>,
    pub pod_ip: Option<String>,
    pub containers: Vec<ContainerStatusInfo>,
    pub restart_count: i32,
    pub labels: BTreeMap<String, String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    pub name: String,
    pub status: ResourceStatus,
    pub pod_count: usize,
    pub deployment_count: usize,
    pub service_count: usize,
    pub created_at: Option<DateTime<Utc>>,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub name: String,
    pub namespace: String,
    pub replicas: i32,
    pub available_replicas: i32,
    pub ready_replicas: i32,
    pub updated_replicas: i32,
    pub image: String,
    pub strategy: String,
}

/// Summed container usage of one pod, keyed `"<namespace>/<name>"` by the metrics service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodMetrics {
    pub cpu_cores: f64,
    pub memory_bytes: i64,
    pub containers: usize,
}

/// One record pushed to a log or event stream consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamRecord {
    Info { message: String },
    Log(LogRecord),
    Event(EventRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub namespace: String,
    pub pod: String,
    pub container: Option<String>,
    pub message: String,
}

/// `event_type` is `ADDED`, `MODIFIED` or `DELETED`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub namespace: Option<String>,
    pub name: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub kind: Option<String>,
    pub object_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enums_use_wire_names() {
        assert_eq!(serde_json::to_value(ClusterStatus::Disconnected).unwrap(), json!("disconnected"));
        assert_eq!(serde_json::to_value(ResourceStatus::Warning).unwrap(), json!("warning"));
        assert_eq!(serde_json::to_value(NodeRole::ControlPlane).unwrap(), json!("control-plane"));
        assert_eq!(serde_json::to_value(PodPhase::Succeeded).unwrap(), json!("Succeeded"));
    }

    #[test]
    fn stream_records_are_tagged_by_type() {
        let info = StreamRecord::Info { message: "hello".to_string() };
        assert_eq!(serde_json::to_value(&info).unwrap(), json!({ "type": "info", "message": "hello" }));

        let log = serde_json::to_value(StreamRecord::Log(LogRecord {
            timestamp: Utc::now(),
            namespace: "default".to_string(),
            pod: "web-1".to_string(),
            container: None,
            message: "ready".to_string(),
        }))
        .unwrap();
        assert_eq!(log["type"], "log");
        assert_eq!(log["pod"], "web-1");
        assert!(log["container"].is_null());
    }

    #[test]
    fn unknown_phase_strings_fall_back() {
        assert_eq!(PodPhase::parse(Some("Running")), PodPhase::Running);
        assert_eq!(PodPhase::parse(Some("Evicted")), PodPhase::Unknown);
        assert_eq!(PodPhase::parse(None), PodPhase::Unknown);
    }
}
