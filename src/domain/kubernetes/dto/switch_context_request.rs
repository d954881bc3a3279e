use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwitchContextRequest {
    #[validate(length(min = 1))]
    pub context: String,
}
