//! ConnectorConfig - opaque configuration document
//!
//! Owned by the host and supplied per call. Connectors only ever read from it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ContractError;

/// Key/value configuration document handed to every lifecycle operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ConnectorConfig {
    entries: Map<String, Value>,
}

impl ConnectorConfig {
    /// Create empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON document
    ///
    /// # Errors
    /// Returns `ConfigParse` if the document is not an object
    pub fn from_value(value: Value) -> Result<Self, ContractError> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(ContractError::config_parse(format!(
                "configuration must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Raw value for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether `key` is present (even if null)
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// String value for `key`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Optional non-negative integer for `key`
    ///
    /// # Errors
    /// Returns `ConfigValidation` when the key is present but not a non-negative integer
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, ContractError> {
        match self.entries.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                ContractError::config_validation(
                    key,
                    format!("expected a non-negative integer, got {value}"),
                )
            }),
        }
    }

    /// Nested object stored under `key`
    ///
    /// Returns `None` when the key is absent, `Some(Err)` when it is not an object.
    pub fn section(&self, key: &str) -> Option<Result<&Map<String, Value>, ContractError>> {
        self.entries.get(key).map(|value| {
            value.as_object().ok_or_else(|| {
                ContractError::config_validation(
                    key,
                    format!("expected an object, got {}", json_kind(value)),
                )
            })
        })
    }

    /// Deserialize a typed view of the whole document
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ContractError> {
        T::deserialize(Value::Object(self.entries.clone())).map_err(|e| {
            ContractError::ConfigParse {
                message: e.to_string(),
                source: Some(Box::new(e)),
            }
        })
    }

    /// Deserialize a typed view of the nested object under `key`
    pub fn parse_section<T: DeserializeOwned>(&self, key: &str) -> Result<T, ContractError> {
        let value = self
            .entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        T::deserialize(value).map_err(|e| ContractError::ConfigParse {
            message: format!("{key}: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Borrow the underlying entries
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Value> for ConnectorConfig {
    type Error = ContractError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<ConnectorConfig> for Value {
    fn from(config: ConnectorConfig) -> Self {
        Value::Object(config.entries)
    }
}

impl From<Map<String, Value>> for ConnectorConfig {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
