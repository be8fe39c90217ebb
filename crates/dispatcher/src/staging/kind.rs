//! StagingType - how records reach the warehouse, and its resolver

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use contracts::{ConnectorConfig, ContractError};

use crate::discriminator::Discriminator;

/// Key holding the loading method section
pub const LOADING_METHOD: &str = "loading_method";
/// Explicit method name inside the loading method section
pub const METHOD: &str = "method";

/// Warehouse loading strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StagingType {
    /// Stage files in S3, load with COPY
    #[serde(rename = "COPY_via_S3")]
    CopyS3,
    /// Stage files in Google Cloud Storage, load with COPY
    #[serde(rename = "COPY_via_GCS")]
    CopyGcs,
    /// Stage files in Azure Blob Storage, load with COPY
    #[serde(rename = "COPY_via_AzureBlob")]
    CopyAzureBlob,
    /// Stage files in the warehouse's own stage
    #[serde(rename = "InternalStaging")]
    InternalStaging,
}

impl StagingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CopyS3 => "COPY_via_S3",
            Self::CopyGcs => "COPY_via_GCS",
            Self::CopyAzureBlob => "COPY_via_AzureBlob",
            Self::InternalStaging => "InternalStaging",
        }
    }

    /// Map an explicit `loading_method.method` value
    fn from_method_name(name: &str) -> Option<Self> {
        match name {
            "S3 Staging" => Some(Self::CopyS3),
            "GCS Staging" => Some(Self::CopyGcs),
            "Azure Blob Staging" => Some(Self::CopyAzureBlob),
            "Internal Staging" | "Standard" => Some(Self::InternalStaging),
            _ => None,
        }
    }
}

impl fmt::Display for StagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Discriminator for StagingType {
    const ALL: &'static [Self] = &[
        Self::CopyS3,
        Self::CopyGcs,
        Self::CopyAzureBlob,
        Self::InternalStaging,
    ];
}

/// Resolve the staging type from a destination configuration
///
/// Precedence:
/// 1. no `loading_method` -> internal staging
/// 2. explicit `loading_method.method` name
/// 3. inferred from keys: `s3_bucket_name`, then `project_id`, then
///    `azure_blob_storage_account_name`, otherwise internal staging
///
/// # Errors
/// `ContractError::Configuration` if `loading_method` is not an object or the
/// method name is not recognized.
pub fn resolve_staging_type(config: &ConnectorConfig) -> Result<StagingType, ContractError> {
    let Some(section) = config.get(LOADING_METHOD) else {
        return Ok(StagingType::InternalStaging);
    };

    let Value::Object(method) = section else {
        return Err(ContractError::configuration(format!(
            "'{LOADING_METHOD}' must be an object"
        )));
    };

    if let Some(name) = method.get(METHOD) {
        let name = name.as_str().ok_or_else(|| {
            ContractError::configuration(format!("'{LOADING_METHOD}.{METHOD}' must be a string"))
        })?;
        return StagingType::from_method_name(name).ok_or_else(|| {
            ContractError::configuration(format!("unrecognized loading method '{name}'"))
        });
    }

    let kind = if method.contains_key("s3_bucket_name") {
        StagingType::CopyS3
    } else if method.contains_key("project_id") {
        StagingType::CopyGcs
    } else if method.contains_key("azure_blob_storage_account_name") {
        StagingType::CopyAzureBlob
    } else {
        StagingType::InternalStaging
    };
    Ok(kind)
}
