use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScaleDeploymentRequest {
    /// Desired replica count
    #[validate(range(min = 0, max = 100))]
    pub replicas: i32,
}
