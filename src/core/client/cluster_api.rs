//! Seams between the domain services and a live cluster.
//!
//! `ClusterConnector` resolves credentials and hands out connections;
//! `ClusterApi` is one live connection. Services only ever see these traits, so
//! tests substitute in-memory doubles.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use kube::Client;
use serde_json::Value;
use tracing::debug;

use crate::core::client::cluster_error::ClusterError;
use crate::core::client::events::{self, ObservedEvent};
use crate::core::client::kube_resources::{Deployment, Namespace, Node, Pod, Service};
use crate::core::client::kubeconfig::KubeContexts;
use crate::core::client::metrics::{self, NodeMetricsList, PodMetricsList};
use crate::core::client::pod_logs::{self, LogRequest};
use crate::core::client::{deployments, namespaces, nodes, pods, services};

pub type LogLines = BoxStream<'static, Result<String, ClusterError>>;
pub type EventFeed = BoxStream<'static, Result<ObservedEvent, ClusterError>>;

#[async_trait]
pub trait ClusterConnector: Send + Sync {
    /// Constructor-time capability flag; `false` behaves like a resolution failure.
    fn is_available(&self) -> bool;

    async fn list_contexts(&self) -> Result<KubeContexts, ClusterError>;

    async fn connect(&self, context: Option<&str>) -> Result<Arc<dyn ClusterApi>, ClusterError>;

    async fn switch_context(&self, name: &str) -> Result<(), ClusterError>;

    async fn current_context(&self) -> Option<String>;
}

#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// `"<major>.<minor>"` of the API server.
    async fn server_version(&self) -> Result<String, ClusterError>;

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError>;

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError>;

    async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, ClusterError>;

    async fn list_services(&self, namespace: &str) -> Result<Vec<Service>, ClusterError>;

    async fn list_deployments(&self, namespace: Option<&str>) -> Result<Vec<Deployment>, ClusterError>;

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, ClusterError>;

    async fn patch_deployment(
        &self,
        namespace: &str,
        name: &str,
        patch: &Value,
    ) -> Result<(), ClusterError>;

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), ClusterError>;

    async fn node_metrics(&self) -> Result<NodeMetricsList, ClusterError>;

    async fn pod_metrics(&self, namespace: Option<&str>) -> Result<PodMetricsList, ClusterError>;

    /// Log lines of one pod; `Err` when the server refuses to open the log.
    async fn pod_logs(&self, namespace: &str, pod: &str, request: &LogRequest) -> Result<LogLines, ClusterError>;

    async fn watch_events(&self, namespace: Option<&str>) -> Result<EventFeed, ClusterError>;
}

/// `ClusterApi` backed by a kube-rs client.
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    async fn server_version(&self) -> Result<String, ClusterError> {
        let info = self.client.apiserver_version().await?;
        debug!("API server reports {}", info.git_version);
        Ok(format!("{}.{}", info.major, info.minor))
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        nodes::fetch_nodes(&self.client).await
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError> {
        namespaces::fetch_namespaces(&self.client).await
    }

    async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, ClusterError> {
        match namespace {
            Some(ns) => pods::fetch_pods_by_namespace(&self.client, ns).await,
            None => pods::fetch_pods(&self.client).await,
        }
    }

    async fn list_services(&self, namespace: &str) -> Result<Vec<Service>, ClusterError> {
        services::fetch_services_by_namespace(&self.client, namespace).await
    }

    async fn list_deployments(&self, namespace: Option<&str>) -> Result<Vec<Deployment>, ClusterError> {
        match namespace {
            Some(ns) => deployments::fetch_deployments_by_namespace(&self.client, ns).await,
            None => deployments::fetch_deployments(&self.client).await,
        }
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, ClusterError> {
        deployments::fetch_deployment_by_name_and_namespace(&self.client, namespace, name).await
    }

    async fn patch_deployment(
        &self,
        namespace: &str,
        name: &str,
        patch: &Value,
    ) -> Result<(), ClusterError> {
        deployments::patch_deployment(&self.client, namespace, name, patch).await
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        pods::delete_pod(&self.client, namespace, name).await
    }

    async fn node_metrics(&self) -> Result<NodeMetricsList, ClusterError> {
        metrics::fetch_node_metrics(&self.client).await
    }

    async fn pod_metrics(&self, namespace: Option<&str>) -> Result<PodMetricsList, ClusterError> {
        metrics::fetch_pod_metrics(&self.client, namespace).await
    }

    async fn pod_logs(&self, namespace: &str, pod: &str, request: &LogRequest) -> Result<LogLines, ClusterError> {
        pod_logs::stream_pod_logs(&self.client, namespace, pod, request).await
    }

    async fn watch_events(&self, namespace: Option<&str>) -> Result<EventFeed, ClusterError> {
        Ok(events::watch_events(&self.client, namespace))
    }
}
