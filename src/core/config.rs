//! Process configuration, read once at startup.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const APP_NAME: &str = "OpsSight API";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:5174,http://localhost:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub kubeconfig_path: Option<PathBuf>,
    pub mode: String,
    pub k8s_enabled: bool,
    pub request_timeout: Option<Duration>,
    pub demo_seed: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub prometheus_url: Option<String>,
    pub argocd_url: Option<String>,
    pub argocd_token: Option<String>,
    pub github_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("API_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("API_PORT must be a port number, got '{}'", raw))?,
            None => 8000,
        };

        let k8s_enabled = match get("OPSSIGHT_K8S_ENABLED") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("OPSSIGHT_K8S_ENABLED must be a boolean, got '{}'", raw))?,
            None => true,
        };

        let timeout_secs = match get("K8S_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().with_context(|| {
                format!("K8S_REQUEST_TIMEOUT_SECS must be whole seconds, got '{}'", raw)
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let demo_seed = get("OPSSIGHT_DEMO_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("OPSSIGHT_DEMO_SEED must be an integer, got '{}'", raw))
            })
            .transpose()?;

        let cors_origins = get("API_CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host: get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            cors_origins,
            kubeconfig_path: get("KUBECONFIG_DEFAULT").map(PathBuf::from),
            mode: get("OPSSIGHT_MODE").unwrap_or_else(|| "local".to_string()),
            k8s_enabled,
            request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            demo_seed,
            log_dir: get("OPSSIGHT_LOG_DIR").map(PathBuf::from),
            prometheus_url: get("PROMETHEUS_URL"),
            argocd_url: get("ARGOCD_URL"),
            argocd_token: get("ARGOCD_TOKEN"),
            github_token: get("GITHUB_TOKEN"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// A kubeconfig is configured explicitly or present at `~/.kube/config`.
    pub fn kubernetes_configured(&self) -> bool {
        if !self.k8s_enabled {
            return false;
        }
        self.kubeconfig_path.is_some()
            || dirs::home_dir()
                .map(|h| h.join(".kube").join("config").exists())
                .unwrap_or(false)
    }

    pub fn integration_status(&self) -> BTreeMap<String, bool> {
        BTreeMap::from([
            ("kubernetes".to_string(), self.kubernetes_configured()),
            ("prometheus".to_string(), self.prometheus_url.is_some()),
            (
                "argocd".to_string(),
                self.argocd_url.is_some() && self.argocd_token.is_some(),
            ),
            ("github".to_string(), self.github_token.is_some()),
        ])
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.mode, "local");
        assert!(config.k8s_enabled);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.cors_origins.len(), 3);
        assert!(config.kubeconfig_path.is_none());
        assert!(config.demo_seed.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("API_PORT", "9090"),
            ("API_CORS_ORIGINS", "https://ops.example.com, https://admin.example.com"),
            ("KUBECONFIG_DEFAULT", "/etc/opssight/kubeconfig"),
            ("OPSSIGHT_MODE", "kubernetes"),
            ("OPSSIGHT_K8S_ENABLED", "false"),
            ("K8S_REQUEST_TIMEOUT_SECS", "0"),
            ("OPSSIGHT_DEMO_SEED", "42"),
        ])
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(
            config.cors_origins,
            vec!["https://ops.example.com", "https://admin.example.com"]
        );
        assert_eq!(
            config.kubeconfig_path,
            Some(PathBuf::from("/etc/opssight/kubeconfig"))
        );
        assert_eq!(config.mode, "kubernetes");
        assert!(!config.k8s_enabled);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.demo_seed, Some(42));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(config_from(&[("API_PORT", "eighty")]).is_err());
        assert!(config_from(&[("OPSSIGHT_K8S_ENABLED", "maybe")]).is_err());
        assert!(config_from(&[("OPSSIGHT_DEMO_SEED", "-1")]).is_err());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("GITHUB_TOKEN", "  "), ("API_HOST", "")]).unwrap();

        assert!(config.github_token.is_none());
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn integration_status_needs_both_argocd_values() {
        let config = config_from(&[
            ("ARGOCD_URL", "https://argocd.example.com"),
            ("GITHUB_TOKEN", "ghp_x"),
            ("KUBECONFIG_DEFAULT", "/tmp/kubeconfig"),
        ])
        .unwrap();
        let status = config.integration_status();

        assert_eq!(status["argocd"], false);
        assert_eq!(status["github"], true);
        assert_eq!(status["prometheus"], false);
        assert_eq!(status["kubernetes"], true);
    }
}
