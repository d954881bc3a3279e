/// Maps kube-rs / k8s-openapi types → cluster-facing domain models
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::core::client::events::ObservedEvent;
use crate::core::client::kube_resources::{ContainerState, Deployment, Namespace, Node, Pod, Time};
use crate::domain::kubernetes::model::{
    ContainerStatusInfo, DeploymentInfo, EventRecord, NamespaceInfo, NodeInfo, NodeRole, PodInfo,
    PodPhase, ResourceStatus,
};

/// Pods restarting more often than this are flagged regardless of phase.
pub const RESTART_WARNING_THRESHOLD: i32 = 5;

const UNKNOWN: &str = "unknown";

/// Converts an API timestamp via its RFC 3339 wire form.
fn to_utc(ts: Option<&Time>) -> Option<DateTime<Utc>> {
    let raw = serde_json::to_value(ts?).ok()?;
    DateTime::parse_from_rfc3339(raw.as_str()?)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn labels_of(labels: Option<&BTreeMap<String, String>>) -> BTreeMap<String, String> {
    labels.cloned().unwrap_or_default()
}

/// Any label key mentioning `control-plane` or `master` marks a control-plane node.
pub fn derive_node_role(labels: &BTreeMap<String, String>) -> NodeRole {
    if labels
        .keys()
        .any(|key| key.contains("control-plane") || key.contains("master"))
    {
        NodeRole::ControlPlane
    } else {
        NodeRole::Worker
    }
}

/// Phase-derived status, overridden to `Warning` above the restart threshold.
pub fn derive_pod_status(phase: PodPhase, total_restarts: i32) -> ResourceStatus {
    if total_restarts > RESTART_WARNING_THRESHOLD {
        return ResourceStatus::Warning;
    }
    match phase {
        PodPhase::Running | PodPhase::Succeeded => ResourceStatus::Healthy,
        PodPhase::Pending => ResourceStatus::Pending,
        PodPhase::Failed => ResourceStatus::Error,
        PodPhase::Unknown => ResourceStatus::Unknown,
    }
}

fn describe_container_state(state: Option<&ContainerState>) -> String {
    let Some(state) = state else {
        return UNKNOWN.to_string();
    };

    if state.running.is_some() {
        "running".to_string()
    } else if let Some(waiting) = &state.waiting {
        format!("waiting: {}", waiting.reason.as_deref().unwrap_or(UNKNOWN))
    } else if let Some(terminated) = &state.terminated {
        format!("terminated: {}", terminated.reason.as_deref().unwrap_or(UNKNOWN))
    } else {
        UNKNOWN.to_string()
    }
}

/// Converts a k8s-openapi Node into a NodeInfo. Metrics are attached separately.
pub fn map_node_to_info(node: &Node) -> NodeInfo {
    let metadata = &node.metadata;
    let status = node.status.as_ref();
    let spec = node.spec.as_ref();

    // Ready alone decides the status; the other conditions are only reported
    let mut node_status = ResourceStatus::Unknown;
    let mut conditions = BTreeMap::new();
    for condition in status.and_then(|s| s.conditions.as_ref()).into_iter().flatten() {
        let is_true = condition.status == "True";
        conditions.insert(condition.type_.clone(), is_true);
        if condition.type_ == "Ready" {
            node_status = if is_true {
                ResourceStatus::Healthy
            } else {
                ResourceStatus::Error
            };
        }
    }

    let addresses = status.and_then(|s| s.addresses.as_ref());
    let first_address = |kind: &str| {
        addresses
            .and_then(|list| list.iter().find(|addr| addr.type_ == kind))
            .map(|addr| addr.address.clone())
    };

    let (kubernetes_version, os_image, container_runtime) = status
        .and_then(|s| s.node_info.as_ref())
        .map(|info| {
            (
                info.kubelet_version.clone(),
                info.os_image.clone(),
                info.container_runtime_version.clone(),
            )
        })
        .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string(), UNKNOWN.to_string()));

    let taints = spec
        .and_then(|s| s.taints.as_ref())
        .map(|taints| {
            taints
                .iter()
                .map(|taint| {
                    format!(
                        "{}={}:{}",
                        taint.key,
                        taint.value.as_deref().unwrap_or(""),
                        taint.effect
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let labels = labels_of(metadata.labels.as_ref());

    NodeInfo {
        name: metadata.name.clone().unwrap_or_default(),
        status: node_status,
        role: derive_node_role(&labels),
        kubernetes_version,
        os_image,
        container_runtime,
        internal_ip: first_address("InternalIP"),
        external_ip: first_address("ExternalIP"),
        conditions,
        labels,
        taints,
        created_at: to_utc(metadata.creation_timestamp.as_ref()),
        metrics: None,
    }
}

/// Converts a k8s-openapi Pod into a PodInfo
pub fn map_pod_to_info(pod: &Pod) -> PodInfo {
    let metadata = &pod.metadata;
    let status = pod.status.as_ref();

    let containers: Vec<ContainerStatusInfo> = status
        .and_then(|s| s.container_statuses.as_ref())
        .into_iter()
        .flatten()
        .map(|cs| ContainerStatusInfo {
            name: cs.name.clone(),
            ready: cs.ready,
            restart_count: cs.restart_count,
            state: describe_container_state(cs.state.as_ref()),
            image: cs.image.clone(),
        })
        .collect();

    let restart_count = containers.iter().map(|c| c.restart_count).sum();
    let phase = PodPhase::parse(status.and_then(|s| s.phase.as_deref()));

    PodInfo {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        phase,
        status: derive_pod_status(phase, restart_count),
        node_name: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
        pod_ip: status.and_then(|s| s.pod_ip.clone()),
        containers,
        restart_count,
        labels: labels_of(metadata.labels.as_ref()),
        created_at: to_utc(metadata.creation_timestamp.as_ref()),
    }
}

/// Converts a k8s-openapi Namespace plus its resource counts into a NamespaceInfo
pub fn map_namespace_to_info(
    namespace: &Namespace,
    pod_count: usize,
    deployment_count: usize,
    service_count: usize,
) -> NamespaceInfo {
    let metadata = &namespace.metadata;
    let phase = namespace.status.as_ref().and_then(|s| s.phase.as_deref());

    NamespaceInfo {
        name: metadata.name.clone().unwrap_or_default(),
        status: if phase == Some("Active") {
            ResourceStatus::Healthy
        } else {
            ResourceStatus::Warning
        },
        pod_count,
        deployment_count,
        service_count,
        created_at: to_utc(metadata.creation_timestamp.as_ref()),
        labels: labels_of(metadata.labels.as_ref()),
    }
}

/// Converts a k8s-openapi Deployment into a DeploymentInfo
pub fn map_deployment_to_info(deployment: &Deployment) -> DeploymentInfo {
    let metadata = &deployment.metadata;
    let spec = deployment.spec.as_ref();
    let status = deployment.status.as_ref();

    let image = spec
        .and_then(|s| s.template.spec.as_ref())
        .and_then(|pod_spec| pod_spec.containers.first())
        .and_then(|container| container.image.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let strategy = spec
        .and_then(|s| s.strategy.as_ref())
        .and_then(|strategy| strategy.type_.clone())
        .unwrap_or_else(|| "RollingUpdate".to_string());

    DeploymentInfo {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        replicas: spec.and_then(|s| s.replicas).unwrap_or(0),
        available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
        ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
        updated_replicas: status.and_then(|s| s.updated_replicas).unwrap_or(0),
        image,
        strategy,
    }
}

/// Stamped with the event's last occurrence, or the time it was observed.
pub fn map_event_to_record(observed: &ObservedEvent) -> EventRecord {
    let event = &observed.event;
    EventRecord {
        event_type: observed.change.as_str().to_string(),
        timestamp: to_utc(event.last_timestamp.as_ref()).unwrap_or_else(Utc::now),
        namespace: event.metadata.namespace.clone(),
        name: event.metadata.name.clone(),
        reason: event.reason.clone(),
        message: event.message.clone(),
        kind: event.involved_object.kind.clone(),
        object_name: event.involved_object.name.clone(),
    }
}
