//! Kubernetes controller: connects routes to the cluster, resource and metric services

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::dto::kubernetes_query::{ClusterQuery, NamespacedQuery};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::kubernetes::dto::kubernetes_response::{
    ClusterListResponse, CurrentContextResponse, DeleteResult, RestartResult, ScaleResult,
    SwitchContextResponse,
};
use crate::domain::kubernetes::dto::scale_deployment_request::ScaleDeploymentRequest;
use crate::domain::kubernetes::dto::switch_context_request::SwitchContextRequest;
use crate::domain::kubernetes::model::{
    ClusterInfo, DeploymentInfo, NamespaceInfo, NodeInfo, NodeMetrics, PodInfo, PodMetrics,
};
use crate::errors::AppError;

pub struct KubernetesController;

impl KubernetesController {
    pub async fn list_clusters(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<ClusterListResponse>>, AppError> {
        to_json(Ok(state.cluster_service.list_clusters_response().await))
    }

    pub async fn get_cluster(
        State(state): State<AppState>,
        Path(name): Path<String>,
    ) -> Result<Json<ApiResponse<ClusterInfo>>, AppError> {
        to_json(Ok(state.cluster_service.get_cluster_detail(&name).await))
    }

    pub async fn list_nodes(
        State(state): State<AppState>,
        Query(q): Query<ClusterQuery>,
    ) -> Result<Json<ApiResponse<Vec<NodeInfo>>>, AppError> {
        to_json(Ok(state.resource_service.list_nodes(q.cluster.as_deref()).await))
    }

    pub async fn list_namespaces(
        State(state): State<AppState>,
        Query(q): Query<ClusterQuery>,
    ) -> Result<Json<ApiResponse<Vec<NamespaceInfo>>>, AppError> {
        to_json(Ok(state.resource_service.list_namespaces(q.cluster.as_deref()).await))
    }

    pub async fn list_pods(
        State(state): State<AppState>,
        Query(q): Query<NamespacedQuery>,
    ) -> Result<Json<ApiResponse<Vec<PodInfo>>>, AppError> {
        to_json(Ok(state
            .resource_service
            .list_pods(q.namespace.as_deref(), q.cluster.as_deref())
            .await))
    }

    pub async fn list_namespace_pods(
        State(state): State<AppState>,
        Path(namespace): Path<String>,
        Query(q): Query<ClusterQuery>,
    ) -> Result<Json<ApiResponse<Vec<PodInfo>>>, AppError> {
        to_json(Ok(state
            .resource_service
            .list_pods(Some(&namespace), q.cluster.as_deref())
            .await))
    }

    pub async fn get_context(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<CurrentContextResponse>>, AppError> {
        to_json(Ok(state.cluster_service.current_context().await))
    }

    pub async fn switch_context(
        State(state): State<AppState>,
        Json(payload): Json<SwitchContextRequest>,
    ) -> Result<Json<ApiResponse<SwitchContextResponse>>, AppError> {
        to_json(state.cluster_service.switch_context_checked(payload).await)
    }

    pub async fn get_node_metrics(
        State(state): State<AppState>,
        Query(q): Query<ClusterQuery>,
    ) -> Result<Json<ApiResponse<BTreeMap<String, NodeMetrics>>>, AppError> {
        to_json(Ok(state.metric_service.get_node_metrics(q.cluster.as_deref()).await))
    }

    pub async fn get_pod_metrics(
        State(state): State<AppState>,
        Query(q): Query<NamespacedQuery>,
    ) -> Result<Json<ApiResponse<BTreeMap<String, PodMetrics>>>, AppError> {
        to_json(Ok(state
            .metric_service
            .get_pod_metrics(q.namespace.as_deref(), q.cluster.as_deref())
            .await))
    }

    pub async fn list_deployments(
        State(state): State<AppState>,
        Query(q): Query<NamespacedQuery>,
    ) -> Result<Json<ApiResponse<Vec<DeploymentInfo>>>, AppError> {
        to_json(Ok(state
            .resource_service
            .list_deployments(q.namespace.as_deref(), q.cluster.as_deref())
            .await))
    }

    pub async fn scale_deployment(
        State(state): State<AppState>,
        Path((namespace, name)): Path<(String, String)>,
        Query(q): Query<ClusterQuery>,
        Json(payload): Json<ScaleDeploymentRequest>,
    ) -> Result<Json<ApiResponse<ScaleResult>>, AppError> {
        to_json(
            state
                .resource_service
                .scale_deployment_checked(&namespace, &name, payload, q.cluster.as_deref())
                .await,
        )
    }

    pub async fn restart_deployment(
        State(state): State<AppState>,
        Path((namespace, name)): Path<(String, String)>,
        Query(q): Query<ClusterQuery>,
    ) -> Result<Json<ApiResponse<RestartResult>>, AppError> {
        to_json(Ok(state
            .resource_service
            .restart_deployment(&namespace, &name, q.cluster.as_deref())
            .await))
    }

    pub async fn delete_pod(
        State(state): State<AppState>,
        Path((namespace, name)): Path<(String, String)>,
        Query(q): Query<ClusterQuery>,
    ) -> Result<Json<ApiResponse<DeleteResult>>, AppError> {
        to_json(Ok(state
            .resource_service
            .delete_pod(&namespace, &name, q.cluster.as_deref())
            .await))
    }
}
