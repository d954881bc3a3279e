use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client};
use serde_json::Value;
use tracing::debug;

use crate::core::client::cluster_error::ClusterError;
use crate::core::client::kube_resources::Deployment;

/// Fetch all deployments in the cluster
pub async fn fetch_deployments(client: &Client) -> Result<Vec<Deployment>, ClusterError> {
    let deployments: Api<Deployment> = Api::all(client.clone());
    let deployment_list = deployments.list(&ListParams::default()).await?;

    debug!("Discovered {} deployment(s)", deployment_list.items.len());
    Ok(deployment_list.items)
}

/// Fetch deployments in a specific namespace
pub async fn fetch_deployments_by_namespace(
    client: &Client,
    namespace: &str,
) -> Result<Vec<Deployment>, ClusterError> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deployment_list = deployments.list(&ListParams::default()).await?;

    debug!(
        "Discovered {} deployment(s) in namespace '{}'",
        deployment_list.items.len(),
        namespace
    );
    Ok(deployment_list.items)
}

/// Fetch a single deployment by name and namespace
pub async fn fetch_deployment_by_name_and_namespace(
    client: &Client,
    namespace: &str,
    deployment_name: &str,
) -> Result<Deployment, ClusterError> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deployment = deployments.get(deployment_name).await?;

    debug!("Fetched deployment: {}/{}", namespace, deployment_name);
    Ok(deployment)
}

/// Apply a JSON merge patch to a deployment
pub async fn patch_deployment(
    client: &Client,
    namespace: &str,
    deployment_name: &str,
    patch: &Value,
) -> Result<(), ClusterError> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    deployments
        .patch(deployment_name, &PatchParams::default(), &Patch::Merge(patch))
        .await?;

    debug!("Patched deployment: {}/{}", namespace, deployment_name);
    Ok(())
}
