//! metrics.k8s.io (metrics-server) access.
//!
//! The aggregation API is not a typed k8s-openapi resource, so requests go
//! through the raw client and are decoded into the minimal shapes below.

use std::collections::BTreeMap;

use http::{Method, Request as HttpRequest};
use kube::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::core::client::cluster_error::ClusterError;

const METRICS_API_BASE: &str = "/apis/metrics.k8s.io/v1beta1";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeMetricsList {
    #[serde(default)]
    pub items: Vec<NodeMetricsItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeMetricsItem {
    pub metadata: MetricsMetadata,
    #[serde(default)]
    pub usage: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodMetricsList {
    #[serde(default)]
    pub items: Vec<PodMetricsItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PodMetricsItem {
    pub metadata: MetricsMetadata,
    #[serde(default)]
    pub containers: Vec<ContainerMetricsItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainerMetricsItem {
    pub name: String,
    #[serde(default)]
    pub usage: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsMetadata {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Fetch usage for every node from metrics-server
pub async fn fetch_node_metrics(client: &Client) -> Result<NodeMetricsList, ClusterError> {
    let url = format!("{}/nodes", METRICS_API_BASE);
    let list: NodeMetricsList = request_json(client, &url).await?;

    debug!("Fetched metrics for {} node(s)", list.items.len());
    Ok(list)
}

/// Fetch usage for pods, optionally scoped to one namespace
pub async fn fetch_pod_metrics(
    client: &Client,
    namespace: Option<&str>,
) -> Result<PodMetricsList, ClusterError> {
    let url = match namespace {
        Some(ns) => format!("{}/namespaces/{}/pods", METRICS_API_BASE, ns),
        None => format!("{}/pods", METRICS_API_BASE),
    };
    let list: PodMetricsList = request_json(client, &url).await?;

    debug!("Fetched metrics for {} pod(s)", list.items.len());
    Ok(list)
}

async fn request_json<T>(client: &Client, url: &str) -> Result<T, ClusterError>
where
    T: DeserializeOwned,
{
    let req = HttpRequest::builder()
        .method(Method::GET)
        .uri(url)
        .body(vec![])
        .map_err(|e| ClusterError::Request(format!("Failed to build request: {}", e)))?;

    let body = client.request_text(req).await?;
    serde_json::from_str(&body).map_err(|e| ClusterError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_node_metrics_payload() {
        let payload = json!({
            "kind": "NodeMetricsList",
            "items": [{
                "metadata": { "name": "worker-1" },
                "timestamp": "2024-01-15T10:30:00Z",
                "window": "20s",
                "usage": { "cpu": "250000000n", "memory": "2048Mi" }
            }]
        });

        let list: NodeMetricsList = serde_json::from_value(payload).unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].metadata.name, "worker-1");
        assert_eq!(list.items[0].usage.get("cpu").map(String::as_str), Some("250000000n"));
    }

    #[test]
    fn decodes_pod_metrics_without_usage() {
        let payload = json!({
            "items": [{
                "metadata": { "name": "api-0", "namespace": "backend" },
                "containers": [{ "name": "api" }]
            }]
        });

        let list: PodMetricsList = serde_json::from_value(payload).unwrap();
        assert_eq!(list.items[0].metadata.namespace.as_deref(), Some("backend"));
        assert!(list.items[0].containers[0].usage.is_empty());
    }
}
