//! In-memory cluster doubles and k8s-openapi fixtures for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};

use crate::core::client::cluster_api::{ClusterApi, ClusterConnector, EventFeed, LogLines};
use crate::core::client::cluster_error::ClusterError;
use crate::core::client::events::ObservedEvent;
use crate::core::client::kube_resources::{Deployment, Event, Namespace, Node, Pod, Service};
use crate::core::client::pod_logs::LogRequest;
use crate::core::client::kubeconfig::{KubeContext, KubeContexts};
use crate::core::client::metrics::{NodeMetricsList, PodMetricsList};

pub fn node(name: &str, ready: Option<&str>, labels: Value) -> Node {
    let mut conditions = vec![json!({ "type": "MemoryPressure", "status": "False" })];
    if let Some(ready) = ready {
        conditions.push(json!({ "type": "Ready", "status": ready }));
    }

    serde_json::from_value(json!({
        "metadata": { "name": name, "labels": labels },
        "status": {
            "conditions": conditions,
            "addresses": [
                { "type": "Hostname", "address": name },
                { "type": "InternalIP", "address": "10.0.0.1" }
            ],
            "capacity": { "cpu": "4", "memory": "8Gi", "pods": "110" },
            "allocatable": { "cpu": "3800m", "memory": "7Gi", "pods": "100" },
            "nodeInfo": {
                "architecture": "amd64",
                "bootID": "boot",
                "containerRuntimeVersion": "containerd://1.7.0",
                "kernelVersion": "6.1.0",
                "kubeProxyVersion": "v1.31.0",
                "kubeletVersion": "v1.31.0",
                "machineID": "machine",
                "operatingSystem": "linux",
                "osImage": "Ubuntu 22.04 LTS",
                "systemUUID": "uuid"
            }
        }
    }))
    .unwrap()
}

pub fn pod(namespace: &str, name: &str, phase: &str, node_name: Option<&str>, restarts: &[i32]) -> Pod {
    let statuses: Vec<Value> = restarts
        .iter()
        .enumerate()
        .map(|(i, count)| {
            json!({
                "name": format!("c{}", i),
                "image": "nginx:1.25",
                "imageID": "",
                "ready": true,
                "restartCount": count,
                "state": { "running": {} }
            })
        })
        .collect();

    serde_json::from_value(json!({
        "metadata": { "name": name, "namespace": namespace, "labels": { "app": name } },
        "spec": { "nodeName": node_name, "containers": [] },
        "status": { "phase": phase, "podIP": "10.244.0.5", "containerStatuses": statuses }
    }))
    .unwrap()
}

pub fn namespace(name: &str, phase: Option<&str>) -> Namespace {
    serde_json::from_value(json!({
        "metadata": { "name": name },
        "status": { "phase": phase }
    }))
    .unwrap()
}

pub fn deployment(namespace: &str, name: &str, replicas: i32, image: Option<&str>) -> Deployment {
    let containers: Vec<Value> = image
        .map(|image| vec![json!({ "name": name, "image": image })])
        .unwrap_or_default();

    serde_json::from_value(json!({
        "metadata": { "name": name, "namespace": namespace },
        "spec": {
            "replicas": replicas,
            "selector": { "matchLabels": { "app": name } },
            "template": { "spec": { "containers": containers } }
        },
        "status": {
            "availableReplicas": replicas,
            "readyReplicas": replicas,
            "updatedReplicas": replicas
        }
    }))
    .unwrap()
}

pub fn service(namespace: &str, name: &str) -> Service {
    serde_json::from_value(json!({
        "metadata": { "name": name, "namespace": namespace }
    }))
    .unwrap()
}

pub fn event(namespace: &str, name: &str, reason: &str, kind: &str, object: &str) -> Event {
    serde_json::from_value(json!({
        "metadata": { "name": name, "namespace": namespace, "uid": format!("uid-{}", name) },
        "involvedObject": { "kind": kind, "name": object, "namespace": namespace },
        "reason": reason,
        "message": format!("{} {}", reason, object),
        "lastTimestamp": "2024-05-01T12:00:00Z",
        "type": "Normal"
    }))
    .unwrap()
}

/// A scripted cluster. `fail_with` makes every call fail.
#[derive(Default)]
pub struct FakeCluster {
    pub version: String,
    pub nodes: Vec<Node>,
    pub namespaces: Vec<Namespace>,
    pub pods: Vec<Pod>,
    pub services: Vec<Service>,
    pub deployments: Vec<Deployment>,
    pub node_metrics: Option<NodeMetricsList>,
    pub pod_metrics: Option<PodMetricsList>,
    pub fail_with: Option<ClusterError>,
    pub mutation_error: Option<ClusterError>,
    pub patches: Mutex<Vec<(String, String, Value)>>,
    pub deleted: Mutex<Vec<(String, String)>>,
    /// Items replayed by `pod_logs`; the stream ends after the last one.
    pub log_lines: Vec<Result<String, ClusterError>>,
    pub log_error: Option<ClusterError>,
    pub log_requests: Mutex<Vec<(String, String, LogRequest)>>,
    pub events: Vec<Result<ObservedEvent, ClusterError>>,
    pub watched_namespaces: Mutex<Vec<Option<String>>>,
}

impl FakeCluster {
    pub fn failing(err: ClusterError) -> Self {
        Self {
            fail_with: Some(err),
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), ClusterError> {
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub fn patch_count(&self) -> usize {
        self.patches.lock().unwrap().len()
    }
}

fn in_namespace<T, F>(items: &[T], namespace: Option<&str>, ns_of: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<&String>,
{
    items
        .iter()
        .filter(|item| namespace.is_none() || ns_of(*item).map(String::as_str) == namespace)
        .cloned()
        .collect()
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn server_version(&self) -> Result<String, ClusterError> {
        self.check()?;
        Ok(self.version.clone())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        self.check()?;
        Ok(self.nodes.clone())
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError> {
        self.check()?;
        Ok(self.namespaces.clone())
    }

    async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, ClusterError> {
        self.check()?;
        Ok(in_namespace(&self.pods, namespace, |p| p.metadata.namespace.as_ref()))
    }

    async fn list_services(&self, namespace: &str) -> Result<Vec<Service>, ClusterError> {
        self.check()?;
        Ok(in_namespace(&self.services, Some(namespace), |s| s.metadata.namespace.as_ref()))
    }

    async fn list_deployments(&self, namespace: Option<&str>) -> Result<Vec<Deployment>, ClusterError> {
        self.check()?;
        Ok(in_namespace(&self.deployments, namespace, |d| d.metadata.namespace.as_ref()))
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, ClusterError> {
        self.check()?;
        self.deployments
            .iter()
            .find(|d| {
                d.metadata.namespace.as_deref() == Some(namespace)
                    && d.metadata.name.as_deref() == Some(name)
            })
            .cloned()
            .ok_or_else(|| ClusterError::Api {
                code: 404,
                reason: "NotFound".to_string(),
                message: format!("deployments.apps \"{}\" not found", name),
            })
    }

    async fn patch_deployment(&self, namespace: &str, name: &str, patch: &Value) -> Result<(), ClusterError> {
        self.check()?;
        if let Some(err) = &self.mutation_error {
            return Err(err.clone());
        }
        self.patches
            .lock()
            .unwrap()
            .push((namespace.to_string(), name.to_string(), patch.clone()));
        Ok(())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.check()?;
        if let Some(err) = &self.mutation_error {
            return Err(err.clone());
        }
        self.deleted
            .lock()
            .unwrap()
            .push((namespace.to_string(), name.to_string()));
        Ok(())
    }

    async fn node_metrics(&self) -> Result<NodeMetricsList, ClusterError> {
        self.check()?;
        self.node_metrics
            .clone()
            .ok_or_else(|| ClusterError::Api {
                code: 404,
                reason: "NotFound".to_string(),
                message: "the server could not find the requested resource".to_string(),
            })
    }

    async fn pod_metrics(&self, namespace: Option<&str>) -> Result<PodMetricsList, ClusterError> {
        self.check()?;
        let mut list = self.pod_metrics.clone().ok_or_else(|| ClusterError::Api {
            code: 404,
            reason: "NotFound".to_string(),
            message: "the server could not find the requested resource".to_string(),
        })?;
        if let Some(ns) = namespace {
            list.items.retain(|item| item.metadata.namespace.as_deref() == Some(ns));
        }
        Ok(list)
    }

    async fn pod_logs(&self, namespace: &str, pod: &str, request: &LogRequest) -> Result<LogLines, ClusterError> {
        self.check()?;
        self.log_requests
            .lock()
            .unwrap()
            .push((namespace.to_string(), pod.to_string(), request.clone()));
        if let Some(err) = &self.log_error {
            return Err(err.clone());
        }
        Ok(stream::iter(self.log_lines.clone()).boxed())
    }

    async fn watch_events(&self, namespace: Option<&str>) -> Result<EventFeed, ClusterError> {
        self.check()?;
        self.watched_namespaces
            .lock()
            .unwrap()
            .push(namespace.map(str::to_string));
        Ok(stream::iter(self.events.clone()).boxed())
    }
}

/// A kubeconfig stand-in: named contexts mapped to scripted clusters.
pub struct FakeConnector {
    available: bool,
    resolution_error: Option<ClusterError>,
    contexts: Vec<KubeContext>,
    file_current: Option<String>,
    clusters: HashMap<String, Arc<FakeCluster>>,
    switched: Mutex<Option<String>>,
    pub connects: Mutex<Vec<Option<String>>>,
}

impl FakeConnector {
    /// Contexts as `(context, cluster, backing cluster)`; the first one is current.
    pub fn with_contexts(entries: Vec<(&str, &str, FakeCluster)>) -> Self {
        let mut contexts = Vec::new();
        let mut clusters = HashMap::new();
        for (context, cluster, fake) in entries {
            contexts.push(KubeContext {
                name: context.to_string(),
                cluster: cluster.to_string(),
                namespace: None,
                server_url: Some(format!("https://{}.example.com:6443", cluster)),
            });
            clusters.insert(context.to_string(), Arc::new(fake));
        }

        Self {
            available: true,
            resolution_error: None,
            file_current: contexts.first().map(|c| c.name.clone()),
            contexts,
            clusters,
            switched: Mutex::new(None),
            connects: Mutex::new(Vec::new()),
        }
    }

    pub fn single(cluster: FakeCluster) -> Self {
        Self::with_contexts(vec![("test", "test-cluster", cluster)])
    }

    pub fn without_kubeconfig() -> Self {
        Self {
            resolution_error: Some(ClusterError::Resolution(
                "no kubeconfig found and not running in-cluster".to_string(),
            )),
            ..Self::with_contexts(Vec::new())
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::with_contexts(Vec::new())
        }
    }

    pub fn cluster(&self, context: &str) -> Arc<FakeCluster> {
        self.clusters[context].clone()
    }

    fn check(&self) -> Result<(), ClusterError> {
        if !self.available {
            return Err(ClusterError::Unavailable);
        }
        match &self.resolution_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ClusterConnector for FakeConnector {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn list_contexts(&self) -> Result<KubeContexts, ClusterError> {
        self.check()?;
        Ok(KubeContexts {
            contexts: self.contexts.clone(),
            current_context: self.current_context().await,
        })
    }

    async fn connect(&self, context: Option<&str>) -> Result<Arc<dyn ClusterApi>, ClusterError> {
        self.check()?;
        self.connects.lock().unwrap().push(context.map(str::to_string));

        let switched = self.switched.lock().unwrap().clone();
        let name = context
            .map(str::to_string)
            .or(switched)
            .or_else(|| self.file_current.clone())
            .ok_or_else(|| ClusterError::Resolution("kubeconfig has no current context".to_string()))?;

        match self.clusters.get(&name) {
            Some(cluster) => Ok(cluster.clone() as Arc<dyn ClusterApi>),
            None => Err(ClusterError::Resolution(format!("context '{}' not found", name))),
        }
    }

    async fn switch_context(&self, name: &str) -> Result<(), ClusterError> {
        self.check()?;
        if !self.clusters.contains_key(name) {
            return Err(ClusterError::Resolution(format!("context '{}' not found", name)));
        }
        *self.switched.lock().unwrap() = Some(name.to_string());
        Ok(())
    }

    async fn current_context(&self) -> Option<String> {
        if self.check().is_err() {
            return None;
        }
        self.switched
            .lock()
            .unwrap()
            .clone()
            .or_else(|| self.file_current.clone())
    }
}
