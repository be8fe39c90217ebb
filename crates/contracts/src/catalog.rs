//! Catalog types for describing available streams

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Catalog of streams a source can emit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Available streams
    pub streams: Vec<StreamDescriptor>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with a single stream
    pub fn single_stream(name: impl Into<String>, json_schema: Value) -> Self {
        Self {
            streams: vec![StreamDescriptor::new(name, json_schema)],
        }
    }

    /// Find a stream by name
    pub fn find_stream(&self, name: &str) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.name == name)
    }
}

/// A logical stream and the JSON schema of its records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Stream name
    pub name: String,

    /// Namespace (schema, database, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// JSON Schema of the stream's records
    pub json_schema: Value,

    /// Supported sync modes
    #[serde(default = "default_sync_modes")]
    pub supported_sync_modes: Vec<SyncMode>,

    /// Primary key field paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_defined_primary_key: Option<Vec<Vec<String>>>,
}

fn default_sync_modes() -> Vec<SyncMode> {
    vec![SyncMode::FullRefresh]
}

impl StreamDescriptor {
    /// Create a full-refresh stream
    pub fn new(name: impl Into<String>, json_schema: Value) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            json_schema,
            supported_sync_modes: default_sync_modes(),
            source_defined_primary_key: None,
        }
    }
}

/// How a source reads a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    #[default]
    FullRefresh,
    Incremental,
}

/// How a destination applies incoming records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationSyncMode {
    #[default]
    Append,
    Overwrite,
    AppendDedup,
}

/// Catalog as selected by the host for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    /// Selected streams
    pub streams: Vec<ConfiguredStream>,
}

/// A stream selected for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    /// Stream definition
    pub stream: StreamDescriptor,

    /// Source side mode
    #[serde(default)]
    pub sync_mode: SyncMode,

    /// Destination side mode
    #[serde(default)]
    pub destination_sync_mode: DestinationSyncMode,
}

impl ConfiguredCatalog {
    /// Select every stream of `catalog` with the given modes
    pub fn from_catalog(
        catalog: &Catalog,
        sync_mode: SyncMode,
        destination_sync_mode: DestinationSyncMode,
    ) -> Self {
        Self {
            streams: catalog
                .streams
                .iter()
                .map(|stream| ConfiguredStream {
                    stream: stream.clone(),
                    sync_mode,
                    destination_sync_mode,
                })
                .collect(),
        }
    }

    /// Find a selected stream by name
    pub fn find_stream(&self, name: &str) -> Option<&ConfiguredStream> {
        self.streams.iter().find(|s| s.stream.name == name)
    }

    /// Whether `name` is selected
    pub fn contains(&self, name: &str) -> bool {
        self.find_stream(name).is_some()
    }
}
