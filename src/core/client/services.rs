use kube::api::ListParams;
use kube::{Api, Client};
use tracing::debug;

use crate::core::client::cluster_error::ClusterError;
use crate::core::client::kube_resources::Service;

/// Fetch services in a specific namespace
pub async fn fetch_services_by_namespace(
    client: &Client,
    namespace: &str,
) -> Result<Vec<Service>, ClusterError> {
    let services: Api<Service> = Api::namespaced(client.clone(), namespace);
    let svc_list = services.list(&ListParams::default()).await?;

    debug!(
        "Discovered {} service(s) in namespace '{}'",
        svc_list.items.len(),
        namespace
    );
    Ok(svc_list.items)
}
