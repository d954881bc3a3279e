//! Live usage from metrics-server joined with node capacity.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::core::client::cluster_api::{ClusterApi, ClusterConnector};
use crate::core::client::kube_resources::{Node, Quantity};
use crate::core::client::metrics::{NodeMetricsItem, PodMetricsItem};
use crate::core::util::quantity_util::QuantityUtil;
use crate::domain::kubernetes::model::{NodeMetrics, PodMetrics};

const DEFAULT_CPU_CAPACITY: &str = "1";
const DEFAULT_POD_CAPACITY: i64 = 110;

pub struct MetricService {
    connector: Arc<dyn ClusterConnector>,
}

impl MetricService {
    pub fn new(connector: Arc<dyn ClusterConnector>) -> Self {
        Self { connector }
    }

    /// Per-node usage keyed by node name. Empty when metrics-server or the
    /// cluster cannot be reached.
    pub async fn get_node_metrics(&self, cluster: Option<&str>) -> BTreeMap<String, NodeMetrics> {
        match self.try_node_metrics(cluster).await {
            Ok(metrics) => metrics,
            Err(err) => {
                warn!("Node metrics unavailable: {}", err);
                BTreeMap::new()
            }
        }
    }

    async fn try_node_metrics(&self, cluster: Option<&str>) -> Result<BTreeMap<String, NodeMetrics>> {
        let api = self.connector.connect(cluster).await?;
        let usage = api.node_metrics().await?;
        let nodes = api.list_nodes().await?;
        let pods_per_node = count_pods_per_node(api.as_ref()).await?;

        let nodes_by_name: HashMap<&str, &Node> = nodes
            .iter()
            .filter_map(|n| n.metadata.name.as_deref().map(|name| (name, n)))
            .collect();

        let mut result = BTreeMap::new();
        for item in &usage.items {
            let Some(node) = nodes_by_name.get(item.metadata.name.as_str()) else {
                debug!("Skipping metrics for unknown node {}", item.metadata.name);
                continue;
            };
            let pod_count = pods_per_node.get(&item.metadata.name).copied().unwrap_or(0);
            result.insert(item.metadata.name.clone(), node_metrics(item, node, pod_count));
        }

        debug!("Computed metrics for {} node(s)", result.len());
        Ok(result)
    }

    /// Summed container usage keyed `"<namespace>/<name>"`.
    pub async fn get_pod_metrics(
        &self,
        namespace: Option<&str>,
        cluster: Option<&str>,
    ) -> BTreeMap<String, PodMetrics> {
        let fetched = async {
            let api = self.connector.connect(cluster).await?;
            api.pod_metrics(namespace).await
        };

        match fetched.await {
            Ok(list) => list
                .items
                .iter()
                .map(|item| (pod_key(item), pod_metrics(item)))
                .collect(),
            Err(err) => {
                warn!("Pod metrics unavailable: {}", err);
                BTreeMap::new()
            }
        }
    }
}

/// One pod list for the whole cluster, bucketed by `spec.nodeName`.
async fn count_pods_per_node(api: &dyn ClusterApi) -> Result<HashMap<String, usize>> {
    let pods = api.list_pods(None).await?;
    let mut counts = HashMap::new();
    for node_name in pods
        .iter()
        .filter_map(|p| p.spec.as_ref().and_then(|s| s.node_name.clone()))
    {
        *counts.entry(node_name).or_insert(0) += 1;
    }
    Ok(counts)
}

fn quantity<'a>(map: Option<&'a BTreeMap<String, Quantity>>, key: &str) -> Option<&'a str> {
    map.and_then(|m| m.get(key)).map(|q| q.0.as_str())
}

fn node_metrics(item: &NodeMetricsItem, node: &Node, pod_count: usize) -> NodeMetrics {
    let status = node.status.as_ref();
    let capacity = status.and_then(|s| s.capacity.as_ref());
    let allocatable = status.and_then(|s| s.allocatable.as_ref());

    let cpu_capacity_raw = quantity(capacity, "cpu").unwrap_or(DEFAULT_CPU_CAPACITY);
    let cpu_capacity = QuantityUtil::parse_cpu(cpu_capacity_raw);
    let cpu_allocatable = QuantityUtil::parse_cpu(quantity(allocatable, "cpu").unwrap_or(cpu_capacity_raw));

    let memory_capacity_raw = quantity(capacity, "memory").unwrap_or("0");
    let memory_capacity = QuantityUtil::parse_memory(memory_capacity_raw);
    let memory_allocatable =
        QuantityUtil::parse_memory(quantity(allocatable, "memory").unwrap_or(memory_capacity_raw));

    let pod_capacity = quantity(allocatable, "pods")
        .and_then(|p| p.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_POD_CAPACITY);

    let cpu_used = item.usage.get("cpu").map(|v| QuantityUtil::parse_cpu(v)).unwrap_or(0.0);
    let memory_used = item.usage.get("memory").map(|v| QuantityUtil::parse_memory(v)).unwrap_or(0);

    NodeMetrics {
        cpu_usage_percent: round1(QuantityUtil::usage_percent(cpu_used, cpu_capacity)),
        cpu_capacity_cores: cpu_capacity,
        cpu_allocatable_cores: cpu_allocatable,
        memory_usage_percent: round1(QuantityUtil::usage_percent(memory_used as f64, memory_capacity as f64)),
        memory_capacity_bytes: memory_capacity,
        memory_allocatable_bytes: memory_allocatable,
        pod_count,
        pod_capacity,
    }
}

fn pod_key(item: &PodMetricsItem) -> String {
    format!(
        "{}/{}",
        item.metadata.namespace.as_deref().unwrap_or_default(),
        item.metadata.name
    )
}

fn pod_metrics(item: &PodMetricsItem) -> PodMetrics {
    let (cpu_cores, memory_bytes) = item.containers.iter().fold((0.0, 0i64), |(cpu, mem), c| {
        let c_cpu = c.usage.get("cpu").map(|v| QuantityUtil::parse_cpu(v)).unwrap_or(0.0);
        let c_mem = c.usage.get("memory").map(|v| QuantityUtil::parse_memory(v)).unwrap_or(0);
        (cpu + c_cpu, mem.saturating_add(c_mem))
    });

    PodMetrics {
        cpu_cores,
        memory_bytes,
        containers: item.containers.len(),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
