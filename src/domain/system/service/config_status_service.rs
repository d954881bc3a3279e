use std::sync::Arc;

use anyhow::Result;

use crate::core::config::AppConfig;
use crate::domain::kubernetes::model::ClusterStatus;
use crate::domain::kubernetes::service::cluster_service::ClusterService;
use crate::domain::system::dto::system_response::{ConfigStatusResponse, IntegrationStatus};

/// Reports which integrations are configured and whether any cluster answers.
pub struct ConfigStatusService {
    config: Arc<AppConfig>,
    cluster_service: Arc<ClusterService>,
}

impl ConfigStatusService {
    pub fn new(config: Arc<AppConfig>, cluster_service: Arc<ClusterService>) -> Self {
        Self {
            config,
            cluster_service,
        }
    }

    pub async fn status(&self) -> Result<ConfigStatusResponse> {
        let integrations = self.config.integration_status();
        let configured = |name: &str| integrations.get(name).copied().unwrap_or(false);

        let k8s_connected = self
            .cluster_service
            .list_clusters()
            .await
            .iter()
            .any(|c| c.status == ClusterStatus::Connected);

        let mut details = vec![IntegrationStatus {
            name: "kubernetes".to_string(),
            configured: configured("kubernetes"),
            connected: k8s_connected,
            error: (!k8s_connected).then(|| "No cluster connected".to_string()),
        }];

        // Only the cluster connection is probed; the rest report configuration alone.
        for name in ["prometheus", "argocd", "github"] {
            let is_configured = configured(name);
            details.push(IntegrationStatus {
                name: name.to_string(),
                configured: is_configured,
                connected: false,
                error: is_configured.then(|| "Not implemented".to_string()),
            });
        }

        Ok(ConfigStatusResponse {
            mode: self.config.mode.clone(),
            integrations,
            details,
        })
    }

    pub async fn integrations(&self) -> Result<Vec<IntegrationStatus>> {
        Ok(self.status().await?.details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kubernetes::service::demo_data::DemoDataGenerator;
    use crate::domain::kubernetes::test_support::{FakeCluster, FakeConnector};
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Arc<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap())
    }

    fn service(config: Arc<AppConfig>, connector: FakeConnector) -> ConfigStatusService {
        let clusters = ClusterService::new(Arc::new(connector), Arc::new(DemoDataGenerator::new(Some(1))));
        ConfigStatusService::new(config, Arc::new(clusters))
    }

    #[tokio::test]
    async fn connected_cluster_and_configured_integrations() {
        let service = service(
            config(&[
                ("KUBECONFIG_DEFAULT", "/etc/opssight/kubeconfig"),
                ("OPSSIGHT_MODE", "docker"),
                ("PROMETHEUS_URL", "http://prometheus:9090"),
                ("ARGOCD_URL", "https://argocd.example.com"),
            ]),
            FakeConnector::single(FakeCluster {
                version: "1.31".to_string(),
                ..Default::default()
            }),
        );

        let status = service.status().await.unwrap();

        assert_eq!(status.mode, "docker");
        assert_eq!(status.integrations["kubernetes"], true);
        assert_eq!(status.integrations["prometheus"], true);
        assert_eq!(status.integrations["argocd"], false);

        let kubernetes = &status.details[0];
        assert_eq!(kubernetes.name, "kubernetes");
        assert!(kubernetes.connected);
        assert!(kubernetes.error.is_none());

        let prometheus = status.details.iter().find(|d| d.name == "prometheus").unwrap();
        assert!(!prometheus.connected);
        assert_eq!(prometheus.error.as_deref(), Some("Not implemented"));

        let github = status.details.iter().find(|d| d.name == "github").unwrap();
        assert!(!github.configured);
        assert!(github.error.is_none());
    }

    #[tokio::test]
    async fn failing_cluster_reports_no_connection() {
        let service = service(
            config(&[("OPSSIGHT_K8S_ENABLED", "false")]),
            FakeConnector::single(FakeCluster::failing(
                crate::core::client::cluster_error::ClusterError::Request("timeout".to_string()),
            )),
        );

        let details = service.integrations().await.unwrap();

        assert_eq!(details.len(), 4);
        assert!(!details[0].configured);
        assert!(!details[0].connected);
        assert_eq!(details[0].error.as_deref(), Some("No cluster connected"));
    }
}
