use std::sync::Arc;

use anyhow::Result;
use futures::try_join;
use tracing::{debug, error, warn};
use validator::Validate;

use crate::core::client::cluster_api::ClusterConnector;
use crate::core::client::cluster_error::ClusterError;
use crate::core::client::kubeconfig::KubeContext;
use crate::domain::kubernetes::dto::kubernetes_response::{
    ClusterListResponse, CurrentContextResponse, SwitchContextResponse,
};
use crate::domain::kubernetes::dto::switch_context_request::SwitchContextRequest;
use crate::domain::kubernetes::model::{ClusterInfo, ClusterStatus};
use crate::domain::kubernetes::service::demo_data::DemoDataGenerator;

/// Enumerates kubeconfig contexts into cluster snapshots and owns context switching.
pub struct ClusterService {
    connector: Arc<dyn ClusterConnector>,
    demo: Arc<DemoDataGenerator>,
}

impl ClusterService {
    pub fn new(connector: Arc<dyn ClusterConnector>, demo: Arc<DemoDataGenerator>) -> Self {
        Self { connector, demo }
    }

    /// One entry per context. A context that fails to answer becomes an
    /// `error` entry without affecting the others.
    pub async fn list_clusters(&self) -> Vec<ClusterInfo> {
        let contexts = match self.connector.list_contexts().await {
            Ok(contexts) => contexts.contexts,
            Err(err) => {
                warn!("Cannot enumerate contexts, serving demo clusters: {}", err);
                return self.demo.clusters();
            }
        };

        if contexts.is_empty() {
            warn!("Kubeconfig has no contexts, serving demo clusters");
            return self.demo.clusters();
        }

        let mut clusters = Vec::with_capacity(contexts.len());
        for ctx in &contexts {
            clusters.push(self.probe(ctx).await);
        }
        clusters
    }

    async fn probe(&self, ctx: &KubeContext) -> ClusterInfo {
        let probe = async {
            let api = self.connector.connect(Some(&ctx.name)).await?;
            let (version, nodes, namespaces, pods) = try_join!(
                api.server_version(),
                api.list_nodes(),
                api.list_namespaces(),
                api.list_pods(None),
            )?;
            Ok::<_, ClusterError>(ClusterInfo {
                name: ctx.cluster.clone(),
                context: ctx.name.clone(),
                status: ClusterStatus::Connected,
                server_url: ctx.server_url.clone(),
                version: Some(version),
                node_count: nodes.len(),
                namespace_count: namespaces.len(),
                pod_count: pods.len(),
                error: None,
            })
        };

        match probe.await {
            Ok(info) => info,
            Err(err) => {
                warn!("Failed to probe context {}: {}", ctx.name, err);
                ClusterInfo {
                    server_url: ctx.server_url.clone(),
                    ..ClusterInfo::unreachable(&ctx.cluster, &ctx.name, ClusterStatus::Error, err.to_string())
                }
            }
        }
    }

    pub async fn list_clusters_response(&self) -> ClusterListResponse {
        let clusters = self.list_clusters().await;
        let active_cluster = active_cluster(&clusters);
        ClusterListResponse {
            clusters,
            active_cluster,
        }
    }

    /// Matches by cluster name or context name.
    pub async fn get_cluster_detail(&self, name: &str) -> ClusterInfo {
        self.list_clusters()
            .await
            .into_iter()
            .find(|c| c.name == name || c.context == name)
            .unwrap_or_else(|| {
                ClusterInfo::unreachable(
                    name,
                    name,
                    ClusterStatus::Disconnected,
                    format!("cluster '{}' not found", name),
                )
            })
    }

    pub async fn switch_context_checked(&self, req: SwitchContextRequest) -> Result<SwitchContextResponse> {
        req.validate()?;
        Ok(self.switch_context(&req.context).await)
    }

    pub async fn switch_context(&self, context: &str) -> SwitchContextResponse {
        match self.connector.switch_context(context).await {
            Ok(()) => {
                debug!("Context switch to {} accepted", context);
                SwitchContextResponse {
                    success: true,
                    context: context.to_string(),
                    error: None,
                }
            }
            Err(err) => {
                error!("Failed to switch context to {}: {}", context, err);
                SwitchContextResponse {
                    success: false,
                    context: context.to_string(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub async fn current_context(&self) -> CurrentContextResponse {
        CurrentContextResponse {
            context: self.connector.current_context().await,
        }
    }
}

/// Name of the first connected cluster.
pub fn active_cluster(clusters: &[ClusterInfo]) -> Option<String> {
    clusters
        .iter()
        .find(|c| c.status == ClusterStatus::Connected)
        .map(|c| c.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kubernetes::test_support::{namespace, node, pod, FakeCluster, FakeConnector};
    use serde_json::json;

    fn healthy(version: &str, nodes: usize) -> FakeCluster {
        FakeCluster {
            version: version.to_string(),
            nodes: (0..nodes)
                .map(|i| node(&format!("n{}", i), Some("True"), json!({})))
                .collect(),
            namespaces: vec![namespace("default", Some("Active"))],
            pods: vec![pod("default", "p", "Running", Some("n0"), &[0])],
            ..Default::default()
        }
    }

    fn service_with(connector: FakeConnector) -> ClusterService {
        ClusterService::new(Arc::new(connector), Arc::new(DemoDataGenerator::new(Some(5))))
    }

    #[tokio::test]
    async fn failing_context_is_isolated() {
        let service = service_with(FakeConnector::with_contexts(vec![
            ("prod", "prod-cluster", healthy("1.30", 3)),
            (
                "staging",
                "staging-cluster",
                FakeCluster::failing(ClusterError::Request("connection refused".to_string())),
            ),
            ("dev", "dev-cluster", healthy("1.31", 1)),
        ]));

        let clusters = service.list_clusters().await;

        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].status, ClusterStatus::Connected);
        assert_eq!(clusters[0].name, "prod-cluster");
        assert_eq!(clusters[0].context, "prod");
        assert_eq!(clusters[0].version.as_deref(), Some("1.30"));
        assert_eq!((clusters[0].node_count, clusters[0].namespace_count, clusters[0].pod_count), (3, 1, 1));
        assert_eq!(clusters[0].server_url.as_deref(), Some("https://prod-cluster.example.com:6443"));

        assert_eq!(clusters[1].status, ClusterStatus::Error);
        assert_eq!(clusters[1].error.as_deref(), Some("request failed: connection refused"));
        assert_eq!(clusters[1].node_count, 0);

        assert_eq!(clusters[2].status, ClusterStatus::Connected);
        assert_eq!(clusters[2].node_count, 1);
    }

    #[tokio::test]
    async fn missing_kubeconfig_serves_demo_set() {
        let service = service_with(FakeConnector::without_kubeconfig());

        let clusters = service.list_clusters().await;
        let summary: Vec<_> = clusters.iter().map(|c| (c.name.as_str(), c.status)).collect();
        assert_eq!(
            summary,
            vec![
                ("demo-local", ClusterStatus::Connected),
                ("demo-staging", ClusterStatus::Disconnected)
            ]
        );
    }

    #[tokio::test]
    async fn empty_kubeconfig_and_disabled_client_serve_demo_set() {
        let empty = service_with(FakeConnector::with_contexts(Vec::new()));
        assert_eq!(empty.list_clusters().await.len(), 2);

        let disabled = service_with(FakeConnector::unavailable());
        assert_eq!(disabled.list_clusters().await[0].name, "demo-local");
    }

    #[tokio::test]
    async fn active_cluster_is_first_connected() {
        let service = service_with(FakeConnector::with_contexts(vec![
            (
                "broken",
                "broken-cluster",
                FakeCluster::failing(ClusterError::Request("timeout".to_string())),
            ),
            ("dev", "dev-cluster", healthy("1.31", 1)),
        ]));

        let response = service.list_clusters_response().await;
        assert_eq!(response.active_cluster.as_deref(), Some("dev-cluster"));
    }

    #[tokio::test]
    async fn detail_matches_name_or_context() {
        let service = service_with(FakeConnector::with_contexts(vec![(
            "prod",
            "prod-cluster",
            healthy("1.30", 2),
        )]));

        assert_eq!(service.get_cluster_detail("prod").await.node_count, 2);
        assert_eq!(service.get_cluster_detail("prod-cluster").await.context, "prod");
    }

    #[tokio::test]
    async fn unknown_cluster_reads_as_disconnected() {
        let service = service_with(FakeConnector::without_kubeconfig());

        let detail = service.get_cluster_detail("nonexistent").await;
        assert_eq!(detail.status, ClusterStatus::Disconnected);
        assert_eq!(detail.context, "nonexistent");
        assert_eq!(detail.error.as_deref(), Some("cluster 'nonexistent' not found"));
    }

    #[tokio::test]
    async fn switch_updates_current_context() {
        let service = service_with(FakeConnector::with_contexts(vec![
            ("prod", "prod-cluster", healthy("1.30", 1)),
            ("dev", "dev-cluster", healthy("1.31", 1)),
        ]));
        assert_eq!(service.current_context().await.context.as_deref(), Some("prod"));

        let switched = service.switch_context("dev").await;
        assert!(switched.success);
        assert_eq!(service.current_context().await.context.as_deref(), Some("dev"));

        let rejected = service.switch_context("missing").await;
        assert!(!rejected.success);
        assert_eq!(rejected.error.as_deref(), Some("context 'missing' not found"));
        assert_eq!(service.current_context().await.context.as_deref(), Some("dev"));
    }

    #[tokio::test]
    async fn blank_context_is_rejected_before_switching() {
        let service = service_with(FakeConnector::single(healthy("1.31", 1)));

        let outcome = service
            .switch_context_checked(SwitchContextRequest { context: String::new() })
            .await;

        assert!(outcome.is_err());
        assert_eq!(service.current_context().await.context.as_deref(), Some("test"));
    }
}
