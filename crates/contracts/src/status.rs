//! ConnectionStatus - result of a connectivity check

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of `check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Succeeded,
    Failed,
}

/// Connection status reported to the host
///
/// `check` never returns an error; failures become `Failed` with a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConnectionStatus {
    /// Successful check
    pub fn succeeded() -> Self {
        Self {
            status: Status::Succeeded,
            message: None,
        }
    }

    /// Failed check with a human-readable reason
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Succeeded
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.message) {
            (Status::Succeeded, _) => write!(f, "✓ connection check passed"),
            (Status::Failed, Some(msg)) => write!(f, "✗ connection check failed: {msg}"),
            (Status::Failed, None) => write!(f, "✗ connection check failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ConnectionStatus::failed("boom")).unwrap();
        assert_eq!(json, r#"{"status":"FAILED","message":"boom"}"#);

        let json = serde_json::to_string(&ConnectionStatus::succeeded()).unwrap();
        assert_eq!(json, r#"{"status":"SUCCEEDED"}"#);
    }
}
