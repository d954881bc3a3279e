//! Reads and mutations against one cluster context.
//!
//! Failure policy: reads degrade to demo data, mutations degrade to a simulated
//! success when no connection can be resolved, and report `success=false` with
//! the upstream reason when a live call is rejected.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use futures::try_join;
use serde_json::json;
use tracing::{debug, error, warn};
use validator::Validate;

use crate::core::client::cluster_api::{ClusterApi, ClusterConnector};
use crate::core::client::cluster_error::ClusterError;
use crate::core::client::mappers::{
    map_deployment_to_info, map_namespace_to_info, map_node_to_info, map_pod_to_info,
};
use crate::domain::kubernetes::dto::kubernetes_response::{DeleteResult, RestartResult, ScaleResult};
use crate::domain::kubernetes::dto::scale_deployment_request::ScaleDeploymentRequest;
use crate::domain::kubernetes::model::{DeploymentInfo, NamespaceInfo, NodeInfo, PodInfo};
use crate::domain::kubernetes::service::demo_data::DemoDataGenerator;

pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

/// Outcome of resolving a connection for a mutation.
enum Connection {
    Live(Arc<dyn ClusterApi>),
    Simulated,
}

pub struct ResourceService {
    connector: Arc<dyn ClusterConnector>,
    demo: Arc<DemoDataGenerator>,
}

impl ResourceService {
    pub fn new(connector: Arc<dyn ClusterConnector>, demo: Arc<DemoDataGenerator>) -> Self {
        Self { connector, demo }
    }

    async fn connect_for_mutation(&self, cluster: Option<&str>) -> Result<Connection, ClusterError> {
        match self.connector.connect(cluster).await {
            Ok(api) => Ok(Connection::Live(api)),
            Err(err) if err.is_resolution_failure() => {
                warn!("No cluster connection ({}), simulating mutation", err);
                Ok(Connection::Simulated)
            }
            Err(err) => Err(err),
        }
    }

    // --- Reads ---

    pub async fn list_nodes(&self, cluster: Option<&str>) -> Vec<NodeInfo> {
        let live = async {
            let api = self.connector.connect(cluster).await?;
            let nodes = api.list_nodes().await?;
            Ok::<_, ClusterError>(nodes.iter().map(map_node_to_info).collect())
        };

        match live.await {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!("Falling back to demo nodes: {}", err);
                self.demo.nodes()
            }
        }
    }

    pub async fn list_pods(&self, namespace: Option<&str>, cluster: Option<&str>) -> Vec<PodInfo> {
        let live = async {
            let api = self.connector.connect(cluster).await?;
            let pods = api.list_pods(namespace).await?;
            Ok::<_, ClusterError>(pods.iter().map(map_pod_to_info).collect())
        };

        match live.await {
            Ok(pods) => pods,
            Err(err) => {
                warn!("Falling back to demo pods: {}", err);
                self.demo.pods(namespace)
            }
        }
    }

    pub async fn list_namespaces(&self, cluster: Option<&str>) -> Vec<NamespaceInfo> {
        match self.try_list_namespaces(cluster).await {
            Ok(namespaces) => namespaces,
            Err(err) => {
                warn!("Falling back to demo namespaces: {}", err);
                self.demo.namespaces()
            }
        }
    }

    /// Three counting queries per namespace.
    async fn try_list_namespaces(&self, cluster: Option<&str>) -> Result<Vec<NamespaceInfo>, ClusterError> {
        let api = self.connector.connect(cluster).await?;
        let namespaces = api.list_namespaces().await?;

        let mut result = Vec::with_capacity(namespaces.len());
        for ns in &namespaces {
            let name = ns.metadata.name.as_deref().unwrap_or_default();
            let (pods, deployments, services) = try_join!(
                api.list_pods(Some(name)),
                api.list_deployments(Some(name)),
                api.list_services(name),
            )?;
            result.push(map_namespace_to_info(
                ns,
                pods.len(),
                deployments.len(),
                services.len(),
            ));
        }

        debug!("Mapped {} namespace(s) with resource counts", result.len());
        Ok(result)
    }

    pub async fn list_deployments(
        &self,
        namespace: Option<&str>,
        cluster: Option<&str>,
    ) -> Vec<DeploymentInfo> {
        let live = async {
            let api = self.connector.connect(cluster).await?;
            let deployments = api.list_deployments(namespace).await?;
            Ok::<_, ClusterError>(deployments.iter().map(map_deployment_to_info).collect())
        };

        match live.await {
            Ok(deployments) => deployments,
            Err(err) => {
                warn!("Falling back to demo deployments: {}", err);
                self.demo.deployments(namespace)
            }
        }
    }

    // --- Mutations ---

    /// Validates the requested replica count before anything touches the cluster.
    pub async fn scale_deployment_checked(
        &self,
        namespace: &str,
        name: &str,
        req: ScaleDeploymentRequest,
        cluster: Option<&str>,
    ) -> Result<ScaleResult> {
        req.validate()?;
        Ok(self.scale_deployment(namespace, name, req.replicas, cluster).await)
    }

    /// Bounds on `replicas` are the caller's job; see `scale_deployment_checked`.
    pub async fn scale_deployment(
        &self,
        namespace: &str,
        name: &str,
        replicas: i32,
        cluster: Option<&str>,
    ) -> ScaleResult {
        let result = |success: bool, previous: i32, current: i32, message: String| ScaleResult {
            success,
            namespace: namespace.to_string(),
            deployment: name.to_string(),
            previous_replicas: previous,
            current_replicas: current,
            message,
        };

        let outcome = async {
            let api = match self.connect_for_mutation(cluster).await? {
                Connection::Live(api) => api,
                Connection::Simulated => {
                    return Ok(result(true, 3, replicas, "Demo mode - scale simulated".to_string()));
                }
            };

            let current = api.get_deployment(namespace, name).await?;
            let previous = current.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);

            api.patch_deployment(namespace, name, &json!({ "spec": { "replicas": replicas } }))
                .await?;

            Ok::<_, ClusterError>(result(
                true,
                previous,
                replicas,
                format!("Scaled from {} to {} replicas", previous, replicas),
            ))
        };

        outcome.await.unwrap_or_else(|err| {
            error!("Failed to scale deployment {}/{}: {}", namespace, name, err);
            result(false, 0, 0, err.to_string())
        })
    }

    pub async fn restart_deployment(
        &self,
        namespace: &str,
        name: &str,
        cluster: Option<&str>,
    ) -> RestartResult {
        let result = |success: bool, message: String| RestartResult {
            success,
            namespace: namespace.to_string(),
            deployment: name.to_string(),
            message,
        };

        let outcome = async {
            let api = match self.connect_for_mutation(cluster).await? {
                Connection::Live(api) => api,
                Connection::Simulated => {
                    return Ok(result(true, "Demo mode - restart simulated".to_string()));
                }
            };

            let now = Utc::now().to_rfc3339();
            let patch = json!({
                "spec": {
                    "template": {
                        "metadata": {
                            "annotations": { RESTARTED_AT_ANNOTATION: now }
                        }
                    }
                }
            });
            api.patch_deployment(namespace, name, &patch).await?;

            Ok::<_, ClusterError>(result(
                true,
                format!("Deployment restart initiated at {}", now),
            ))
        };

        outcome.await.unwrap_or_else(|err| {
            error!("Failed to restart deployment {}/{}: {}", namespace, name, err);
            result(false, err.to_string())
        })
    }

    /// Unconditional delete. No ownership check is made.
    pub async fn delete_pod(&self, namespace: &str, name: &str, cluster: Option<&str>) -> DeleteResult {
        let result = |success: bool, message: String| DeleteResult {
            success,
            namespace: namespace.to_string(),
            pod: name.to_string(),
            message,
        };

        let outcome = async {
            let api = match self.connect_for_mutation(cluster).await? {
                Connection::Live(api) => api,
                Connection::Simulated => {
                    return Ok(result(true, "Demo mode - delete simulated".to_string()));
                }
            };

            api.delete_pod(namespace, name).await?;

            Ok::<_, ClusterError>(result(
                true,
                format!(
                    "Pod {} deleted successfully. Pods managed by a controller will be recreated automatically",
                    name
                ),
            ))
        };

        outcome.await.unwrap_or_else(|err| {
            error!("Failed to delete pod {}/{}: {}", namespace, name, err);
            result(false, err.to_string())
        })
    }
}
