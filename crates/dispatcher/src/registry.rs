//! StrategyRegistry - immutable discriminator to factory mapping

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use contracts::{ConnectorConfig, ContractError};

use crate::discriminator::Discriminator;

/// Constructor for a strategy instance
pub type StrategyFactory<D> =
    Arc<dyn Fn(&ConnectorConfig) -> Result<D, ContractError> + Send + Sync>;

/// Immutable registry built once at startup
pub struct StrategyRegistry<K, D> {
    factories: HashMap<K, StrategyFactory<D>>,
}

impl<K: Discriminator, D> StrategyRegistry<K, D> {
    /// Start building a registry
    pub fn builder() -> StrategyRegistryBuilder<K, D> {
        StrategyRegistryBuilder::new()
    }

    /// Factory registered for `kind`
    pub fn factory(&self, kind: K) -> Option<&StrategyFactory<D>> {
        self.factories.get(&kind)
    }

    /// Registered kinds, in `K::ALL` order
    pub fn kinds(&self) -> Vec<K> {
        K::ALL
            .iter()
            .copied()
            .filter(|k| self.factories.contains_key(k))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<K: Discriminator, D> fmt::Debug for StrategyRegistry<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Builder for [`StrategyRegistry`]
pub struct StrategyRegistryBuilder<K, D> {
    factories: HashMap<K, StrategyFactory<D>>,
    duplicates: Vec<K>,
}

impl<K: Discriminator, D> StrategyRegistryBuilder<K, D> {
    fn new() -> Self {
        Self {
            factories: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Register the factory for `kind`
    pub fn register<F>(mut self, kind: K, factory: F) -> Self
    where
        F: Fn(&ConnectorConfig) -> Result<D, ContractError> + Send + Sync + 'static,
    {
        if self.factories.insert(kind, Arc::new(factory)).is_some() {
            self.duplicates.push(kind);
        }
        self
    }

    /// Finish the registry
    ///
    /// # Errors
    /// Returns `ConfigValidation` if a kind was registered twice or if any
    /// value of `K::ALL` has no factory.
    pub fn build(self) -> Result<StrategyRegistry<K, D>, ContractError> {
        if let Some(kind) = self.duplicates.first() {
            return Err(ContractError::config_validation(
                format!("registry[{kind}]"),
                "strategy registered more than once",
            ));
        }

        let missing: Vec<String> = K::ALL
            .iter()
            .filter(|k| !self.factories.contains_key(k))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ContractError::config_validation(
                "registry",
                format!("no strategy registered for: {}", missing.join(", ")),
            ));
        }

        Ok(StrategyRegistry {
            factories: self.factories,
        })
    }
}
