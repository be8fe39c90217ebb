//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse JSON/TOML connector configuration documents
//! - Parse configured catalogs and source state
//! - Validate catalog legality
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("config.json")).unwrap();
//! println!("keys: {}", config.len());
//! ```

mod parser;
mod validator;

pub use contracts::ConnectorConfig;
pub use parser::ConfigFormat;
pub use validator::validate_catalog;

use contracts::{ConfiguredCatalog, ContractError, SourceState};
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load documents from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load connector configuration from file path
    ///
    /// Automatically detects format from file extension (.json / .toml).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Document root is not an object
    pub fn load_from_path(path: &Path) -> Result<ConnectorConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load connector configuration from string
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ConnectorConfig, ContractError> {
        let document = parser::parse_document(content, format)?;
        ConnectorConfig::from_value(document)
    }

    /// Load a configured catalog from file path
    ///
    /// # Errors
    /// Parse failure or catalog validation failure
    pub fn load_catalog_from_path(path: &Path) -> Result<ConfiguredCatalog, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_catalog_from_str(&content, format)
    }

    /// Load a configured catalog from string
    pub fn load_catalog_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ConfiguredCatalog, ContractError> {
        let catalog: ConfiguredCatalog = parser::parse(content, format)?;
        validator::validate_catalog(&catalog)?;
        Ok(catalog)
    }

    /// Load source state from file path
    pub fn load_state_from_path(path: &Path) -> Result<SourceState, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        parser::parse_document(&content, format).map(SourceState)
    }
}

impl ConfigLoader {
    /// Infer format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
