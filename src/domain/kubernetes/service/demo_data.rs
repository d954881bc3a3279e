//! Synthetic datasets served whenever no live cluster can be reached.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::kubernetes::model::{
    ClusterInfo, ClusterStatus, ContainerStatusInfo, DeploymentInfo, NamespaceInfo, NodeInfo,
    EventRecord, NodeMetrics, NodeRole, PodInfo, PodPhase, ResourceStatus,
};

const NODE_JITTER: f64 = 3.0;
const KUBELET_VERSION: &str = "v1.28.0";
const OS_IMAGE: &str = "Ubuntu 22.04 LTS";
const CONTAINER_RUNTIME: &str = "containerd://1.7.0";

/// `{}` is replaced by a number in 1..=1000.
const LOG_TEMPLATES: &[&str] = &[
    "INFO: Request processed successfully",
    "DEBUG: Connection established to database",
    "INFO: Health check passed",
    "DEBUG: Cache hit for key: user_session_{}",
    "INFO: Processing batch job #{}",
    "WARN: Slow query detected ({}ms)",
    "INFO: API response sent in {}ms",
    "DEBUG: Memory usage: {}MB",
    "INFO: Scheduled task completed",
    "DEBUG: WebSocket connection active",
    "INFO: Authentication successful for user_{}",
    "DEBUG: Loading configuration from environment",
    "INFO: Service ready on port 8080",
    "DEBUG: Metrics exported successfully",
];

/// `(reason, message, involved kind)`
const EVENT_TEMPLATES: &[(&str, &str, &str)] = &[
    ("Scheduled", "Successfully assigned pod to node", "Pod"),
    ("Pulled", "Container image pulled successfully", "Pod"),
    ("Created", "Created container", "Pod"),
    ("Started", "Started container", "Pod"),
    ("ScalingReplicaSet", "Scaled up replica set to 3", "Deployment"),
    ("SuccessfulCreate", "Created pod: app-abc123", "ReplicaSet"),
    ("Sync", "Successfully synced resources", "Deployment"),
    ("FailedScheduling", "Insufficient cpu", "Pod"),
    ("BackOff", "Back-off restarting failed container", "Pod"),
    ("Unhealthy", "Liveness probe failed", "Pod"),
];

const EVENT_NAMESPACES: &[&str] = &["default", "kube-system", "monitoring", "backend"];

const LOG_DELAY_MS: RangeInclusive<u64> = 500..=3_000;
const EVENT_DELAY_MS: RangeInclusive<u64> = 2_000..=10_000;

/// Demo data generator. Metric percentages jitter around fixed baselines; seed it
/// for reproducible output.
pub struct DemoDataGenerator {
    rng: Mutex<StdRng>,
}

impl DemoDataGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng: Mutex::new(rng) }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    fn jitter(&self, base: f64) -> f64 {
        let value = base + self.with_rng(|rng| rng.random_range(-NODE_JITTER..=NODE_JITTER));
        (value.clamp(0.0, 100.0) * 10.0).round() / 10.0
    }

    pub fn clusters(&self) -> Vec<ClusterInfo> {
        vec![
            ClusterInfo {
                name: "demo-local".to_string(),
                context: "demo-local".to_string(),
                status: ClusterStatus::Connected,
                server_url: None,
                version: Some("1.28".to_string()),
                node_count: 3,
                namespace_count: 8,
                pod_count: 24,
                error: None,
            },
            ClusterInfo::unreachable(
                "demo-staging",
                "demo-staging",
                ClusterStatus::Disconnected,
                "Demo cluster - not connected",
            ),
        ]
    }

    pub fn nodes(&self) -> Vec<NodeInfo> {
        let node = |name: &str,
                    status: ResourceStatus,
                    role: NodeRole,
                    ip: &str,
                    memory_pressure: bool,
                    label: (&str, &str),
                    metrics: NodeMetrics| NodeInfo {
            name: name.to_string(),
            status,
            role,
            kubernetes_version: KUBELET_VERSION.to_string(),
            os_image: OS_IMAGE.to_string(),
            container_runtime: CONTAINER_RUNTIME.to_string(),
            internal_ip: Some(ip.to_string()),
            external_ip: None,
            conditions: BTreeMap::from([
                ("Ready".to_string(), true),
                ("MemoryPressure".to_string(), memory_pressure),
                ("DiskPressure".to_string(), false),
            ]),
            labels: BTreeMap::from([(label.0.to_string(), label.1.to_string())]),
            taints: Vec::new(),
            created_at: None,
            metrics: Some(metrics),
        };

        let large_metrics = |cpu: f64, memory: f64, pods: usize| NodeMetrics {
            cpu_usage_percent: self.jitter(cpu),
            cpu_capacity_cores: 2.0,
            cpu_allocatable_cores: 1.9,
            memory_usage_percent: self.jitter(memory),
            memory_capacity_bytes: 4_294_967_296,
            memory_allocatable_bytes: 3_758_096_384,
            pod_count: pods,
            pod_capacity: 110,
        };

        vec![
            node(
                "demo-control-plane",
                ResourceStatus::Healthy,
                NodeRole::ControlPlane,
                "10.0.0.1",
                false,
                ("node-role.kubernetes.io/control-plane", ""),
                NodeMetrics {
                    cpu_usage_percent: self.jitter(35.2),
                    cpu_capacity_cores: 4.0,
                    cpu_allocatable_cores: 3.8,
                    memory_usage_percent: self.jitter(62.5),
                    memory_capacity_bytes: 8_589_934_592,
                    memory_allocatable_bytes: 7_516_192_768,
                    pod_count: 12,
                    pod_capacity: 110,
                },
            ),
            node(
                "demo-worker-1",
                ResourceStatus::Healthy,
                NodeRole::Worker,
                "10.0.0.2",
                false,
                ("node.kubernetes.io/instance-type", "m5.large"),
                large_metrics(45.8, 71.3, 8),
            ),
            node(
                "demo-worker-2",
                ResourceStatus::Healthy,
                NodeRole::Worker,
                "10.0.0.3",
                true,
                ("node.kubernetes.io/instance-type", "m5.large"),
                large_metrics(78.2, 89.1, 15),
            ),
        ]
    }

    pub fn pods(&self, namespace: Option<&str>) -> Vec<PodInfo> {
        let now = Utc::now();
        let pod = |name: &str,
                   ns: &str,
                   node: &str,
                   ip: &str,
                   container: ContainerStatusInfo,
                   labels: &[(&str, &str)]| {
            let restart_count = container.restart_count;
            PodInfo {
                name: name.to_string(),
                namespace: ns.to_string(),
                phase: PodPhase::Running,
                status: if container.ready {
                    ResourceStatus::Healthy
                } else {
                    ResourceStatus::Warning
                },
                node_name: Some(node.to_string()),
                pod_ip: Some(ip.to_string()),
                containers: vec![container],
                restart_count,
                labels: labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                created_at: Some(now),
            }
        };
        let running = |name: &str, image: &str, restarts: i32| ContainerStatusInfo {
            name: name.to_string(),
            ready: true,
            restart_count: restarts,
            state: "running".to_string(),
            image: image.to_string(),
        };

        let pods = vec![
            pod(
                "nginx-deployment-abc123",
                "default",
                "demo-worker-1",
                "10.244.0.5",
                running("nginx", "nginx:1.25", 0),
                &[("app", "nginx"), ("tier", "frontend")],
            ),
            pod(
                "api-server-xyz789",
                "backend",
                "demo-worker-1",
                "10.244.0.8",
                running("api", "myapp/api:v1.2.3", 2),
                &[("app", "api-server"), ("tier", "backend")],
            ),
            pod(
                "redis-master-0",
                "cache",
                "demo-worker-2",
                "10.244.1.3",
                running("redis", "redis:7.2", 0),
                &[("app", "redis"), ("role", "master")],
            ),
            pod(
                "crashloop-pod-def456",
                "default",
                "demo-worker-2",
                "10.244.1.7",
                ContainerStatusInfo {
                    name: "buggy-app".to_string(),
                    ready: false,
                    restart_count: 15,
                    state: "waiting: CrashLoopBackOff".to_string(),
                    image: "myapp/buggy:latest".to_string(),
                },
                &[("app", "buggy-app")],
            ),
        ];

        match namespace {
            Some(ns) => pods.into_iter().filter(|p| p.namespace == ns).collect(),
            None => pods,
        }
    }

    pub fn namespaces(&self) -> Vec<NamespaceInfo> {
        let now = Utc::now();
        let namespace = |name: &str, counts: (usize, usize, usize), labels: &[(&str, &str)]| NamespaceInfo {
            name: name.to_string(),
            status: ResourceStatus::Healthy,
            pod_count: counts.0,
            deployment_count: counts.1,
            service_count: counts.2,
            created_at: Some(now),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };

        vec![
            namespace("default", (5, 2, 3), &[]),
            namespace(
                "kube-system",
                (12, 4, 2),
                &[("kubernetes.io/metadata.name", "kube-system")],
            ),
            namespace("backend", (8, 3, 4), &[("env", "production"), ("team", "platform")]),
            namespace("monitoring", (6, 3, 5), &[("env", "production"), ("team", "sre")]),
        ]
    }

    pub fn deployments(&self, namespace: Option<&str>) -> Vec<DeploymentInfo> {
        let deployment = |name: &str, ns: &str, replicas: i32, image: &str, strategy: &str| DeploymentInfo {
            name: name.to_string(),
            namespace: ns.to_string(),
            replicas,
            available_replicas: replicas,
            ready_replicas: replicas,
            updated_replicas: replicas,
            image: image.to_string(),
            strategy: strategy.to_string(),
        };

        let deployments = vec![
            deployment("frontend", "default", 3, "myapp/frontend:v2.1.0", "RollingUpdate"),
            deployment("backend-api", "backend", 5, "myapp/api:v1.8.3", "RollingUpdate"),
            deployment("worker", "backend", 2, "myapp/worker:v1.4.0", "RollingUpdate"),
            deployment("prometheus", "monitoring", 1, "prom/prometheus:v2.45.0", "Recreate"),
        ];

        match namespace {
            Some(ns) => deployments.into_iter().filter(|d| d.namespace == ns).collect(),
            None => deployments,
        }
    }

    /// One synthetic application log line.
    pub fn log_message(&self) -> String {
        self.with_rng(|rng| {
            let template = LOG_TEMPLATES[rng.random_range(0..LOG_TEMPLATES.len())];
            if template.contains("{}") {
                template.replace("{}", &rng.random_range(1..=1000).to_string())
            } else {
                template.to_string()
            }
        })
    }

    /// A synthetic event in `namespace`, or in one of the demo namespaces.
    pub fn event_record(&self, namespace: Option<&str>) -> EventRecord {
        self.with_rng(|rng| {
            let (reason, message, kind) = EVENT_TEMPLATES[rng.random_range(0..EVENT_TEMPLATES.len())];
            let namespace = match namespace {
                Some(ns) => ns.to_string(),
                None => EVENT_NAMESPACES[rng.random_range(0..EVENT_NAMESPACES.len())].to_string(),
            };
            let event_type = if rng.random_bool(0.8) { "ADDED" } else { "MODIFIED" };

            EventRecord {
                event_type: event_type.to_string(),
                timestamp: Utc::now(),
                namespace: Some(namespace),
                name: Some(format!("event-{}", rng.random_range(1000..=9999))),
                reason: Some(reason.to_string()),
                message: Some(message.to_string()),
                kind: Some(kind.to_string()),
                object_name: Some(format!("{}-{}", kind.to_lowercase(), rng.random_range(100..=999))),
            }
        })
    }

    pub fn log_delay(&self) -> Duration {
        Duration::from_millis(self.with_rng(|rng| rng.random_range(LOG_DELAY_MS)))
    }

    pub fn event_delay(&self) -> Duration {
        Duration::from_millis(self.with_rng(|rng| rng.random_range(EVENT_DELAY_MS)))
    }
}
