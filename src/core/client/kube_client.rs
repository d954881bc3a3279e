use std::time::Duration;

use kube::{Client, Config};
use tracing::debug;

use crate::core::client::cluster_error::ClusterError;

/// Applies the request timeout to a resolved config. `None` leaves kube's defaults.
pub fn apply_timeout(mut config: Config, timeout: Option<Duration>) -> Config {
    if let Some(timeout) = timeout {
        config.connect_timeout = Some(timeout);
        config.read_timeout = Some(timeout);
    }
    config
}

/// Creates a Kubernetes client from a resolved config
pub fn build_kube_client(config: Config) -> Result<Client, ClusterError> {
    let cluster_url = config.cluster_url.to_string();
    let client = Client::try_from(config)
        .map_err(|e| ClusterError::Resolution(format!("failed to build client: {}", e)))?;

    debug!("Kubernetes client initialized for {}", cluster_url);
    Ok(client)
}
