use thiserror::Error;

/// Failure of a single cluster interaction.
///
/// Callers branch on this explicitly: reads fall back to demo data, writes to
/// a simulated success (for `Unavailable` / `Resolution`) or `success=false`.
#[derive(Debug, Clone, Error)]
pub enum ClusterError {
    #[error("kubernetes client unavailable")]
    Unavailable,

    #[error("{0}")]
    Resolution(String),

    #[error("API error: {reason}")]
    Api {
        code: u16,
        reason: String,
        message: String,
    },

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClusterError {
    /// True when no connection could be established at all.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, ClusterError::Unavailable | ClusterError::Resolution(_))
    }
}

impl From<kube::Error> for ClusterError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => ClusterError::Api {
                code: resp.code,
                reason: resp.reason.clone(),
                message: resp.message.clone(),
            },
            kube::Error::SerdeError(e) => ClusterError::Decode(e.to_string()),
            other => ClusterError::Request(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_surfaces_upstream_reason() {
        let err = ClusterError::Api {
            code: 403,
            reason: "Forbidden".to_string(),
            message: "deployments.apps is forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "API error: Forbidden");
        assert!(!err.is_resolution_failure());
    }

    #[test]
    fn resolution_failures_are_flagged() {
        assert!(ClusterError::Unavailable.is_resolution_failure());
        assert!(ClusterError::Resolution("no kubeconfig".into()).is_resolution_failure());
        assert!(!ClusterError::Request("timeout".into()).is_resolution_failure());
    }

    #[test]
    fn kube_api_status_keeps_code_and_reason() {
        let status = serde_json::from_value(serde_json::json!({
            "status": "Failure",
            "message": "deployments.apps \"cart\" is forbidden",
            "reason": "Forbidden",
            "code": 403
        }))
        .unwrap();

        let err = ClusterError::from(kube::Error::Api(status));

        match &err {
            ClusterError::Api { code, reason, message } => {
                assert_eq!(*code, 403);
                assert_eq!(reason, "Forbidden");
                assert!(message.contains("forbidden"));
            }
            other => panic!("expected Api, got {:?}", other),
        }
        assert_eq!(err.to_string(), "API error: Forbidden");
    }

    #[test]
    fn other_kube_errors_map_to_request_or_decode() {
        let io = std::io::Error::other("connection reset by peer");
        let err = ClusterError::from(kube::Error::ReadEvents(io));
        assert!(matches!(err, ClusterError::Request(ref msg) if msg.contains("connection reset")));

        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ClusterError::from(kube::Error::SerdeError(serde_err));
        assert!(matches!(err, ClusterError::Decode(_)));
    }
}
