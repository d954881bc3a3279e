use kube::api::ListParams;
use kube::{Api, Client};
use tracing::debug;

use crate::core::client::cluster_error::ClusterError;
use crate::core::client::kube_resources::Namespace;

/// Fetch all namespaces in the cluster
pub async fn fetch_namespaces(client: &Client) -> Result<Vec<Namespace>, ClusterError> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let namespace_list = namespaces.list(&ListParams::default()).await?;

    debug!("Discovered {} namespace(s)", namespace_list.items.len());
    Ok(namespace_list.items)
}
