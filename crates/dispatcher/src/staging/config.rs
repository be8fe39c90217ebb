//! Typed views of the warehouse destination configuration

use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::Validate;

use contracts::{ConnectorConfig, ContractError};

use super::kind::LOADING_METHOD;

/// Warehouse connection settings (top level of the document)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WarehouseConfig {
    /// Account host, e.g. `acme.snowflakecomputing.com`
    #[validate(length(min = 1))]
    pub host: String,

    /// Target database
    #[validate(length(min = 1))]
    pub database: String,

    /// Target schema
    #[validate(length(min = 1))]
    pub schema: String,

    /// Compute warehouse
    #[serde(default)]
    pub warehouse: Option<String>,

    /// Role used for loading
    #[serde(default)]
    pub role: Option<String>,
}

/// Settings shared by every loading method
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoadingOptions {
    /// Records per staged file
    #[serde(default = "default_batch_size")]
    #[validate(range(min = 1, max = 1_000_000))]
    pub batch_size: usize,

    /// Remove staged files once loaded
    #[serde(default = "default_true")]
    pub purge_staging_data: bool,
}

fn default_batch_size() -> usize {
    10_000
}

fn default_true() -> bool {
    true
}

/// S3 staging bucket
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct S3StagingConfig {
    #[validate(length(min = 3, max = 63))]
    pub s3_bucket_name: String,

    #[validate(length(min = 1))]
    pub s3_bucket_region: String,

    /// Prefix inside the bucket
    #[serde(default)]
    pub s3_bucket_path: Option<String>,

    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default)]
    pub secret_access_key: Option<String>,
}

/// Google Cloud Storage staging bucket
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GcsStagingConfig {
    #[validate(length(min = 1))]
    pub project_id: String,

    #[validate(length(min = 1))]
    pub bucket_name: String,

    #[validate(length(min = 1))]
    pub credentials_json: String,
}

/// Azure Blob Storage staging container
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AzureBlobStagingConfig {
    #[validate(length(min = 1))]
    pub azure_blob_storage_account_name: String,

    #[validate(length(min = 1))]
    pub azure_blob_storage_container_name: String,

    #[validate(length(min = 1))]
    pub azure_blob_storage_sas_token: String,

    #[serde(default = "default_azure_endpoint")]
    #[validate(length(min = 1))]
    pub azure_blob_storage_endpoint_domain_name: String,
}

fn default_azure_endpoint() -> String {
    "blob.core.windows.net".to_string()
}

/// Parse and validate the top-level warehouse settings
pub fn parse_warehouse(config: &ConnectorConfig) -> Result<WarehouseConfig, ContractError> {
    let warehouse: WarehouseConfig = config.parse()?;
    check(&warehouse, "warehouse")?;
    Ok(warehouse)
}

/// Parse and validate a typed view of the `loading_method` section
pub fn parse_loading_method<T>(config: &ConnectorConfig) -> Result<T, ContractError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = config.parse_section(LOADING_METHOD)?;
    check(&parsed, LOADING_METHOD)?;
    Ok(parsed)
}

fn check<T: Validate>(value: &T, field: &str) -> Result<(), ContractError> {
    value
        .validate()
        .map_err(|e| ContractError::config_validation(field, e.to_string()))
}
