//! Destination trait - write path of a connector

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ConfiguredCatalog, ConnectionStatus, ConnectorConfig, ContractError, RecordStream};

/// Destination lifecycle
///
/// Implementations are responsible for their own internal thread-safety;
/// callers may invoke them concurrently.
#[trait_variant::make(Destination: Send)]
pub trait LocalDestination {
    /// Side-effect-free connectivity check
    async fn check(&self, config: &ConnectorConfig) -> ConnectionStatus;

    /// Consume `records` until end of data
    ///
    /// The destination closes `records` before returning, on success and on error.
    async fn write<S: RecordStream>(
        &self,
        config: &ConnectorConfig,
        catalog: &ConfiguredCatalog,
        records: &mut S,
    ) -> Result<WriteSummary, ContractError>;
}

/// Totals of a finished write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
    /// Total records accepted
    pub records_written: u64,
    /// Records accepted per stream
    pub per_stream: BTreeMap<String, u64>,
    /// Staged batches handed off for loading
    pub batches: u64,
}

impl WriteSummary {
    /// Count one record for `stream`
    pub fn add_record(&mut self, stream: &str) {
        self.records_written += 1;
        *self.per_stream.entry(stream.to_string()).or_default() += 1;
    }
}
