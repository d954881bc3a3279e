use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::client::pod_logs::LogRequest;

pub const DEFAULT_TAIL_LINES: i64 = 100;

fn default_tail_lines() -> i64 {
    DEFAULT_TAIL_LINES
}

/// `?container=<name>&tail_lines=<n>&cluster=<context>` on the log stream.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogStreamRequest {
    pub container: Option<String>,

    /// Lines of history sent before following
    #[serde(default = "default_tail_lines")]
    #[validate(range(min = 1, max = 1000))]
    pub tail_lines: i64,

    pub cluster: Option<String>,
}

impl LogStreamRequest {
    pub fn to_log_request(&self) -> LogRequest {
        LogRequest {
            container: self.container.clone(),
            tail_lines: self.tail_lines,
            follow: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tail_lines: i64) -> LogStreamRequest {
        LogStreamRequest {
            container: None,
            tail_lines,
            cluster: None,
        }
    }

    #[test]
    fn tail_lines_must_stay_within_bounds() {
        assert!(request(1).validate().is_ok());
        assert!(request(1000).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(1001).validate().is_err());
    }

    #[test]
    fn tail_lines_default_to_one_hundred() {
        let parsed: LogStreamRequest = serde_json::from_value(serde_json::json!({ "container": "app" })).unwrap();

        assert_eq!(parsed.tail_lines, DEFAULT_TAIL_LINES);
        let log = parsed.to_log_request();
        assert!(log.follow);
        assert_eq!(log.container.as_deref(), Some("app"));
    }
}
