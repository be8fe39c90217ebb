//! TypeResolver - configuration to discriminator

use contracts::{ConnectorConfig, ContractError};

/// Pure, deterministic mapping from configuration to a discriminator
///
/// Identical configuration content must always yield the same value, the
/// dispatcher cache relies on it.
pub trait TypeResolver<K>: Send + Sync {
    /// # Errors
    /// Returns `ContractError::Configuration` when hints are missing or unrecognized
    fn resolve(&self, config: &ConnectorConfig) -> Result<K, ContractError>;
}

impl<K, F> TypeResolver<K> for F
where
    F: Fn(&ConnectorConfig) -> Result<K, ContractError> + Send + Sync,
{
    fn resolve(&self, config: &ConnectorConfig) -> Result<K, ContractError> {
        self(config)
    }
}
