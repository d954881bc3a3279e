use serde::Deserialize;

/// `?cluster=<context>`
#[derive(Debug, Default, Deserialize)]
pub struct ClusterQuery {
    pub cluster: Option<String>,
}

/// `?namespace=<ns>&cluster=<context>`
#[derive(Debug, Default, Deserialize)]
pub struct NamespacedQuery {
    pub namespace: Option<String>,
    pub cluster: Option<String>,
}
