//! Catalog validation
//!
//! Rules:
//! - stream names are non-empty
//! - stream names are unique within a configured catalog

use std::collections::HashSet;

use contracts::{ConfiguredCatalog, ContractError};

/// Validate a configured catalog
///
/// Returns the first error encountered, or Ok(()).
pub fn validate_catalog(catalog: &ConfiguredCatalog) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (index, configured) in catalog.streams.iter().enumerate() {
        let name = &configured.stream.name;
        if name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("streams[{index}].stream.name"),
                "stream name must not be empty",
            ));
        }
        if !seen.insert(name) {
            return Err(ContractError::config_validation(
                format!("streams[name={name}]"),
                "duplicate stream name",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Catalog, DestinationSyncMode, StreamDescriptor, SyncMode};
    use serde_json::json;

    fn catalog_of(names: &[&str]) -> ConfiguredCatalog {
        let catalog = Catalog {
            streams: names
                .iter()
                .map(|n| StreamDescriptor::new(*n, json!({"type": "object"})))
                .collect(),
        };
        ConfiguredCatalog::from_catalog(&catalog, SyncMode::FullRefresh, DestinationSyncMode::Append)
    }

    #[test]
    fn test_valid_catalog() {
        assert!(validate_catalog(&catalog_of(&["data", "users"])).is_ok());
    }

    #[test]
    fn test_duplicate_stream_name() {
        let err = validate_catalog(&catalog_of(&["data", "data"])).unwrap_err();
        assert!(err.to_string().contains("duplicate stream name"));
    }

    #[test]
    fn test_empty_stream_name() {
        let err = validate_catalog(&catalog_of(&[" "])).unwrap_err();
        assert!(err.to_string().contains("streams[0].stream.name"));
    }
}
