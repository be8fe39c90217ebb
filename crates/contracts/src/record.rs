//! Record - a single emitted row

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Immutable record emitted by a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Logical stream name
    pub stream: String,

    /// Emission time, epoch milliseconds
    pub emitted_at: i64,

    /// Payload
    pub data: Map<String, Value>,
}

impl Record {
    /// Create a record stamped with the current time
    pub fn new(stream: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            stream: stream.into(),
            emitted_at: Utc::now().timestamp_millis(),
            data,
        }
    }
}

/// Opaque per-run state passed back to a source on the next read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceState(pub Value);
