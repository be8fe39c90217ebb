//! Source trait - connector lifecycle for data sources
//!
//! A source exposes three operations, called by the host in order:
//! `check` -> `discover` -> `read`.

use crate::{Catalog, ConfiguredCatalog, ConnectionStatus, ConnectorConfig, ContractError};
use crate::{RecordStream, SourceState};

/// Data source lifecycle
#[trait_variant::make(Source: Send)]
pub trait LocalSource {
    /// Stream type returned by `read`
    type Stream: RecordStream;

    /// Side-effect-free connectivity check
    ///
    /// Never fails: every problem is reported as `Status::Failed` with a message.
    async fn check(&self, config: &ConnectorConfig) -> ConnectionStatus;

    /// Describe available streams
    ///
    /// Each call returns an independent value; mutating it never affects
    /// later calls.
    async fn discover(&self, config: &ConnectorConfig) -> Result<Catalog, ContractError>;

    /// Open a lazily evaluated record stream
    ///
    /// The caller owns the returned stream and must close it.
    async fn read(
        &self,
        config: &ConnectorConfig,
        catalog: &ConfiguredCatalog,
        state: Option<&SourceState>,
    ) -> Result<Self::Stream, ContractError>;
}
