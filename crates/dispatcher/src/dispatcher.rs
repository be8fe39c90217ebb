//! SwitchingDestination - routes every call to the strategy its configuration selects

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, instrument, warn};

use contracts::{
    ConfiguredCatalog, ConnectionStatus, ConnectorConfig, ContractError, Destination,
    RecordStream, WriteSummary,
};

use crate::discriminator::Discriminator;
use crate::metrics::DispatcherMetrics;
use crate::registry::StrategyRegistry;
use crate::resolver::TypeResolver;

/// Destination that delegates to one of several interchangeable strategies
///
/// Each call resolves the discriminator from the supplied configuration, then
/// looks up (or lazily builds and caches) the strategy for it. At most one
/// live strategy exists per discriminator; strategies are never evicted.
pub struct SwitchingDestination<K: Discriminator, D> {
    resolver: Box<dyn TypeResolver<K>>,
    registry: StrategyRegistry<K, D>,
    cache: Mutex<HashMap<K, Arc<D>>>,
    metrics: Arc<DispatcherMetrics>,
}

impl<K: Discriminator, D> SwitchingDestination<K, D> {
    /// Create a dispatcher from a resolver and a complete registry
    pub fn new(resolver: impl TypeResolver<K> + 'static, registry: StrategyRegistry<K, D>) -> Self {
        Self {
            resolver: Box::new(resolver),
            registry,
            cache: Mutex::new(HashMap::new()),
            metrics: Arc::new(DispatcherMetrics::new()),
        }
    }

    /// Resolve the discriminator for `config`
    pub fn resolve(&self, config: &ConnectorConfig) -> Result<K, ContractError> {
        self.resolver.resolve(config).inspect_err(|e| {
            self.metrics.inc_resolution_failures();
            warn!(error = %e, "failed to resolve backend");
        })
    }

    /// Strategy for `config`, constructed on first use
    ///
    /// Construction runs while the cache lock is held, so concurrent callers
    /// resolving to the same discriminator build it exactly once. A failed
    /// construction is not cached; the next call retries.
    #[instrument(name = "switching_strategy_for", skip(self, config))]
    pub fn strategy_for(&self, config: &ConnectorConfig) -> Result<Arc<D>, ContractError> {
        let kind = self.resolve(config)?;

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(strategy) = cache.get(&kind) {
            self.metrics.inc_cache_hits();
            debug!(backend = %kind, "using cached strategy");
            return Ok(Arc::clone(strategy));
        }

        let factory = self.registry.factory(kind).ok_or_else(|| {
            ContractError::backend_initialization(kind.to_string(), "no strategy registered")
        })?;

        let strategy = factory(config).map(Arc::new).map_err(|e| {
            self.metrics.inc_construction_failures();
            warn!(backend = %kind, error = %e, "strategy construction failed");
            into_initialization_error(kind, e)
        })?;

        cache.insert(kind, Arc::clone(&strategy));
        self.metrics.inc_constructions();
        info!(backend = %kind, "strategy constructed");

        Ok(strategy)
    }

    /// Discriminators with a live strategy, in `K::ALL` order
    pub fn cached_kinds(&self) -> Vec<K> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        K::ALL
            .iter()
            .copied()
            .filter(|k| cache.contains_key(k))
            .collect()
    }

    /// Get dispatcher metrics
    pub fn metrics(&self) -> &Arc<DispatcherMetrics> {
        &self.metrics
    }
}

fn into_initialization_error<K: Discriminator>(kind: K, error: ContractError) -> ContractError {
    match error {
        e @ ContractError::BackendInitialization { .. } => e,
        other => ContractError::backend_initialization(kind.to_string(), other.to_string()),
    }
}

impl<K: Discriminator, D> fmt::Debug for SwitchingDestination<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchingDestination")
            .field("registry", &self.registry)
            .field("cached", &self.cached_kinds())
            .finish()
    }
}

impl<K, D> Destination for SwitchingDestination<K, D>
where
    K: Discriminator,
    D: Destination + Send + Sync + 'static,
{
    #[instrument(name = "switching_check", skip(self, config))]
    async fn check(&self, config: &ConnectorConfig) -> ConnectionStatus {
        match self.strategy_for(config) {
            Ok(strategy) => strategy.check(config).await,
            Err(e) => ConnectionStatus::failed(e.to_string()),
        }
    }

    #[instrument(name = "switching_write", skip(self, config, catalog, records))]
    async fn write<S: RecordStream>(
        &self,
        config: &ConnectorConfig,
        catalog: &ConfiguredCatalog,
        records: &mut S,
    ) -> Result<WriteSummary, ContractError> {
        let strategy = match self.strategy_for(config) {
            Ok(strategy) => strategy,
            Err(e) => {
                if let Err(close_err) = records.close().await {
                    warn!(error = %close_err, "failed to release record stream");
                }
                return Err(e);
            }
        };
        strategy.write(config, catalog, records).await
    }
}
