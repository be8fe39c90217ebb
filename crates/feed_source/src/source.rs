//! FeedSource - the synthetic counter source

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use contracts::{
    Catalog, ConfiguredCatalog, ConnectionStatus, ConnectorConfig, ContractError, NoopObserver,
    Source, SourceState, StreamObserver,
};

use crate::catalog::{feed_catalog, STREAM_NAME};
use crate::pacing::{PacingPolicy, Sleeper, TokioSleeper};
use crate::stream::PacedRecordStream;

/// Source emitting an increasing counter on the `data` stream
///
/// Stateless between calls: every `read` starts counting from 1.
pub struct FeedSource<S = TokioSleeper> {
    sleeper: S,
    observer: Arc<dyn StreamObserver>,
    cancellation: Option<CancellationToken>,
}

impl FeedSource {
    pub fn new() -> Self {
        Self {
            sleeper: TokioSleeper,
            observer: Arc::new(NoopObserver),
            cancellation: None,
        }
    }
}

impl Default for FeedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sleeper + Clone> FeedSource<S> {
    /// Replace the sleeper used between records
    pub fn with_sleeper<T: Sleeper + Clone>(self, sleeper: T) -> FeedSource<T> {
        FeedSource {
            sleeper,
            observer: self.observer,
            cancellation: self.cancellation,
        }
    }

    /// Report stream progress to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn StreamObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Derive every stream's token from `token`
    ///
    /// Cancelling the parent interrupts all open streams; closing one stream
    /// leaves the others running.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn stream_token(&self) -> CancellationToken {
        self.cancellation
            .as_ref()
            .map_or_else(CancellationToken::new, CancellationToken::child_token)
    }
}

impl<S: Sleeper + Clone> Source for FeedSource<S> {
    type Stream = PacedRecordStream<S>;

    #[instrument(name = "feed_check", skip_all)]
    async fn check(&self, config: &ConnectorConfig) -> ConnectionStatus {
        match PacingPolicy::from_config(config) {
            Ok(_) => ConnectionStatus::succeeded(),
            Err(e) => {
                warn!(error = %e, "feed source check failed");
                ConnectionStatus::failed(e.to_string())
            }
        }
    }

    async fn discover(&self, _config: &ConnectorConfig) -> Result<Catalog, ContractError> {
        Ok(feed_catalog())
    }

    #[instrument(name = "feed_read", skip_all)]
    async fn read(
        &self,
        config: &ConnectorConfig,
        catalog: &ConfiguredCatalog,
        _state: Option<&SourceState>,
    ) -> Result<Self::Stream, ContractError> {
        let policy = PacingPolicy::from_config(config)?;

        if !catalog.contains(STREAM_NAME) {
            warn!(
                stream = STREAM_NAME,
                selected = catalog.streams.len(),
                "configured catalog does not select the feed stream"
            );
        }

        info!(
            max_records = ?policy.max_records,
            interval_ms = ?policy.interval.map(|d| d.as_millis()),
            "opening feed stream"
        );

        Ok(PacedRecordStream::new(
            policy,
            self.sleeper.clone(),
            self.stream_token(),
            self.observer.clone(),
        ))
    }
}
