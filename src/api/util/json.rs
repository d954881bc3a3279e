use anyhow::Result;
use axum::Json;
use validator::ValidationErrors;

use crate::api::dto::ApiResponse;
use crate::errors::{internal_error, AppError};

pub fn to_json<T: serde::Serialize>(
    result: Result<T>
) -> Result<Json<ApiResponse<T>>, AppError> {
    match result {
        Ok(value) => Ok(Json(ApiResponse::ok(value))),
        Err(err) => match err.downcast_ref::<ValidationErrors>() {
            Some(validation) => Err(AppError::ValidationError(validation.to_string())),
            None => Err(internal_error(err)), // preserves original error string
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kubernetes::dto::scale_deployment_request::ScaleDeploymentRequest;
    use validator::Validate;

    #[test]
    fn validation_failures_become_bad_request() {
        let err = ScaleDeploymentRequest { replicas: 150 }.validate().unwrap_err();

        let result = to_json::<()>(Err(err.into()));

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn other_failures_become_internal() {
        let result = to_json::<()>(Err(anyhow::anyhow!("disk on fire")));

        match result {
            Err(AppError::InternalServerError(msg)) => assert!(msg.contains("disk on fire")),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
