//! Kubeconfig discovery and context resolution.
//!
//! Source order: the configured path, then `~/.kube/config`, then in-cluster
//! service-account credentials. A configured path that is missing on disk is an
//! error of its own and never falls through to in-cluster.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Config;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::client::cluster_api::{ClusterApi, ClusterConnector, KubeClusterApi};
use crate::core::client::cluster_error::ClusterError;
use crate::core::client::kube_client::{apply_timeout, build_kube_client};

pub const IN_CLUSTER_CONTEXT: &str = "in-cluster";

/// One context entry of the resolved kubeconfig.
#[derive(Debug, Clone, PartialEq)]
pub struct KubeContext {
    pub name: String,
    pub cluster: String,
    pub namespace: Option<String>,
    pub server_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct KubeContexts {
    pub contexts: Vec<KubeContext>,
    pub current_context: Option<String>,
}

/// A config ready for client construction, plus the context it was built for.
pub struct ResolvedConfig {
    pub config: Config,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq)]
enum ConfigSource {
    File(PathBuf),
    InCluster,
}

pub struct KubeconfigResolver {
    explicit_path: Option<PathBuf>,
    default_path: Option<PathBuf>,
    in_cluster: bool,
    client_available: bool,
    request_timeout: Option<Duration>,
    current_context: RwLock<Option<String>>,
}

impl KubeconfigResolver {
    pub fn new(
        explicit_path: Option<PathBuf>,
        client_available: bool,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self {
            explicit_path,
            default_path: dirs::home_dir().map(|h| h.join(".kube").join("config")),
            in_cluster: std::env::var_os("KUBERNETES_SERVICE_HOST").is_some(),
            client_available,
            request_timeout,
            current_context: RwLock::new(None),
        }
    }

    pub fn with_default_path(mut self, path: Option<PathBuf>) -> Self {
        self.default_path = path;
        self
    }

    pub fn with_in_cluster(mut self, in_cluster: bool) -> Self {
        self.in_cluster = in_cluster;
        self
    }

    fn source(&self) -> Result<ConfigSource, ClusterError> {
        if !self.client_available {
            return Err(ClusterError::Unavailable);
        }

        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                return Err(ClusterError::Resolution(format!(
                    "kubeconfig not found at {}",
                    path.display()
                )));
            }
            return Ok(ConfigSource::File(path.clone()));
        }

        match &self.default_path {
            Some(path) if path.exists() => Ok(ConfigSource::File(path.clone())),
            _ if self.in_cluster => Ok(ConfigSource::InCluster),
            _ => Err(ClusterError::Resolution(
                "no kubeconfig found and not running in-cluster".to_string(),
            )),
        }
    }

    fn load_kubeconfig(path: &Path) -> Result<Kubeconfig, ClusterError> {
        let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
            ClusterError::Resolution(format!(
                "failed to load kubeconfig {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(
            "Loaded kubeconfig {} with {} context(s)",
            path.display(),
            kubeconfig.contexts.len()
        );
        Ok(kubeconfig)
    }

    /// Builds a client config for `context`, or the switched / file-current context.
    pub async fn resolve_config(&self, context: Option<&str>) -> Result<ResolvedConfig, ClusterError> {
        match self.source()? {
            ConfigSource::InCluster => {
                let config = Config::incluster()
                    .map_err(|e| ClusterError::Resolution(format!("in-cluster config: {}", e)))?;
                Ok(ResolvedConfig {
                    config: apply_timeout(config, self.request_timeout),
                    context: IN_CLUSTER_CONTEXT.to_string(),
                })
            }
            ConfigSource::File(path) => {
                let kubeconfig = Self::load_kubeconfig(&path)?;

                let switched = self.current_context.read().await.clone();
                let context = context
                    .map(str::to_string)
                    .or(switched)
                    .or_else(|| kubeconfig.current_context.clone())
                    .ok_or_else(|| {
                        ClusterError::Resolution("kubeconfig has no current context".to_string())
                    })?;

                let options = KubeConfigOptions {
                    context: Some(context.clone()),
                    ..Default::default()
                };
                let config = Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| {
                        ClusterError::Resolution(format!("context '{}': {}", context, e))
                    })?;

                Ok(ResolvedConfig {
                    config: apply_timeout(config, self.request_timeout),
                    context,
                })
            }
        }
    }
}

#[async_trait]
impl ClusterConnector for KubeconfigResolver {
    fn is_available(&self) -> bool {
        self.client_available
    }

    async fn list_contexts(&self) -> Result<KubeContexts, ClusterError> {
        let path = match self.source()? {
            ConfigSource::File(path) => path,
            ConfigSource::InCluster => {
                let resolved = self.resolve_config(None).await?;
                return Ok(KubeContexts {
                    contexts: vec![KubeContext {
                        name: IN_CLUSTER_CONTEXT.to_string(),
                        cluster: IN_CLUSTER_CONTEXT.to_string(),
                        namespace: Some(resolved.config.default_namespace.clone()),
                        server_url: Some(resolved.config.cluster_url.to_string()),
                    }],
                    current_context: Some(IN_CLUSTER_CONTEXT.to_string()),
                });
            }
        };

        let kubeconfig = Self::load_kubeconfig(&path)?;

        let cluster_servers: HashMap<String, String> = kubeconfig
            .clusters
            .iter()
            .filter_map(|nc| {
                let server = nc.cluster.as_ref()?.server.clone()?;
                Some((nc.name.clone(), server))
            })
            .collect();

        let contexts = kubeconfig
            .contexts
            .into_iter()
            .filter_map(|named| {
                let ctx = named.context?;
                Some(KubeContext {
                    server_url: cluster_servers.get(&ctx.cluster).cloned(),
                    name: named.name,
                    cluster: ctx.cluster,
                    namespace: ctx.namespace,
                })
            })
            .collect();

        let switched = self.current_context.read().await.clone();
        Ok(KubeContexts {
            contexts,
            current_context: switched.or(kubeconfig.current_context),
        })
    }

    async fn connect(&self, context: Option<&str>) -> Result<Arc<dyn ClusterApi>, ClusterError> {
        let resolved = self.resolve_config(context).await?;
        debug!("Connecting to context '{}'", resolved.context);

        let client = build_kube_client(resolved.config)?;
        Ok(Arc::new(KubeClusterApi::new(client)))
    }

    async fn switch_context(&self, name: &str) -> Result<(), ClusterError> {
        if let ConfigSource::InCluster = self.source()? {
            return Err(ClusterError::Resolution("no kubeconfig found".to_string()));
        }

        self.resolve_config(Some(name)).await?;
        *self.current_context.write().await = Some(name.to_string());

        info!("Switched Kubernetes context to '{}'", name);
        Ok(())
    }

    async fn current_context(&self) -> Option<String> {
        if let Some(switched) = self.current_context.read().await.clone() {
            return Some(switched);
        }

        match self.source().ok()? {
            ConfigSource::InCluster => Some(IN_CLUSTER_CONTEXT.to_string()),
            ConfigSource::File(path) => Self::load_kubeconfig(&path).ok()?.current_context,
        }
    }
}
