use std::sync::Arc;

use crate::core::client::cluster_api::ClusterConnector;
use crate::core::client::kubeconfig::KubeconfigResolver;
use crate::core::config::AppConfig;
use crate::domain::kubernetes::service::cluster_service::ClusterService;
use crate::domain::kubernetes::service::demo_data::DemoDataGenerator;
use crate::domain::kubernetes::service::metric_service::MetricService;
use crate::domain::kubernetes::service::resource_service::ResourceService;
use crate::domain::kubernetes::service::stream_service::StreamService;
use crate::domain::system::service::config_status_service::ConfigStatusService;

macro_rules! delegate_async_service {
    ($(fn $name:ident($($arg:ident : $typ:ty),*) -> $ret:ty => $path:path;)+) => {
        $(
            pub async fn $name(&self, $($arg: $typ),*) -> anyhow::Result<$ret> {
                $path($($arg),*).await
            }
        )+
    };
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub system_service: Arc<SystemService>,
    pub cluster_service: Arc<ClusterService>,
    pub resource_service: Arc<ResourceService>,
    pub metric_service: Arc<MetricService>,
    pub stream_service: Arc<StreamService>,
    pub config_status_service: Arc<ConfigStatusService>,
}

/// Wire services against the kubeconfig named by `config`.
pub fn build_app_state(config: AppConfig) -> AppState {
    let resolver = KubeconfigResolver::new(
        config.kubeconfig_path.clone(),
        config.k8s_enabled,
        config.request_timeout,
    );
    build_app_state_with(config, Arc::new(resolver))
}

/// Same wiring over any connector.
pub fn build_app_state_with(config: AppConfig, connector: Arc<dyn ClusterConnector>) -> AppState {
    let config = Arc::new(config);
    let demo = Arc::new(DemoDataGenerator::new(config.demo_seed));
    let cluster_service = Arc::new(ClusterService::new(connector.clone(), demo.clone()));

    AppState {
        system_service: Arc::new(SystemService::default()),
        resource_service: Arc::new(ResourceService::new(connector.clone(), demo.clone())),
        stream_service: Arc::new(StreamService::new(connector.clone(), demo)),
        metric_service: Arc::new(MetricService::new(connector)),
        config_status_service: Arc::new(ConfigStatusService::new(config.clone(), cluster_service.clone())),
        cluster_service,
        config,
    }
}

#[derive(Clone, Default)]
pub struct SystemService;

impl SystemService {
    delegate_async_service! {
        fn health() -> crate::domain::system::dto::system_response::HealthResponse => crate::domain::system::service::health_service::health;
    }
}
