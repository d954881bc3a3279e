/// Re-export the Kubernetes resource types the cluster layer works with.
/// Keeps k8s-openapi paths in one place.

pub use k8s_openapi::api::core::v1::{ContainerState, Event, Namespace, Node, Pod, Service};

pub use k8s_openapi::api::apps::v1::Deployment;

pub use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
