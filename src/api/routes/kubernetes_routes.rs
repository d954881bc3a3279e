//! Kubernetes routes (e.g., /api/v1/kubernetes/*)

use axum::{routing::{delete, get, post}, Router};
use crate::api::controller::kubernetes::KubernetesController;
use crate::app_state::AppState;

pub fn kubernetes_routes() -> Router<AppState> {
    Router::new()
        .route("/clusters", get(KubernetesController::list_clusters))
        .route("/clusters/{name}", get(KubernetesController::get_cluster))
        .route(
            "/context",
            get(KubernetesController::get_context).post(KubernetesController::switch_context),
        )

        .route("/nodes", get(KubernetesController::list_nodes))
        .route("/namespaces", get(KubernetesController::list_namespaces))
        .route("/namespaces/{namespace}/pods", get(KubernetesController::list_namespace_pods))
        .route("/pods", get(KubernetesController::list_pods))
        .route("/pods/{namespace}/{name}", delete(KubernetesController::delete_pod))

        .route("/deployments", get(KubernetesController::list_deployments))
        .route(
            "/deployments/{namespace}/{name}/scale",
            post(KubernetesController::scale_deployment),
        )
        .route(
            "/deployments/{namespace}/{name}/restart",
            post(KubernetesController::restart_deployment),
        )

        .route("/metrics/nodes", get(KubernetesController::get_node_metrics))
        .route("/metrics/pods", get(KubernetesController::get_pod_metrics))
}
