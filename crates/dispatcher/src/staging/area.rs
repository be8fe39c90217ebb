//! StagingArea - where staged files land and how they are loaded

use chrono::{DateTime, Utc};

use contracts::{ConnectorConfig, ContractError};

use super::config::{
    parse_loading_method, AzureBlobStagingConfig, GcsStagingConfig, S3StagingConfig,
    WarehouseConfig,
};
use super::kind::StagingType;

/// Staging location per staging type
#[derive(Debug, Clone)]
pub enum StagingArea {
    S3(S3StagingConfig),
    Gcs(GcsStagingConfig),
    AzureBlob(AzureBlobStagingConfig),
    Internal,
}

impl StagingArea {
    /// Build the staging area `kind` requires from `config`
    ///
    /// # Errors
    /// Parse or validation failure of the `loading_method` section
    pub fn from_config(kind: StagingType, config: &ConnectorConfig) -> Result<Self, ContractError> {
        match kind {
            StagingType::CopyS3 => {
                let s3: S3StagingConfig = parse_loading_method(config)?;
                if s3.access_key_id.is_some() != s3.secret_access_key.is_some() {
                    return Err(ContractError::config_validation(
                        "loading_method.access_key_id",
                        "access_key_id and secret_access_key must be set together",
                    ));
                }
                Ok(Self::S3(s3))
            }
            StagingType::CopyGcs => Ok(Self::Gcs(parse_loading_method(config)?)),
            StagingType::CopyAzureBlob => Ok(Self::AzureBlob(parse_loading_method(config)?)),
            StagingType::InternalStaging => Ok(Self::Internal),
        }
    }

    pub fn kind(&self) -> StagingType {
        match self {
            Self::S3(_) => StagingType::CopyS3,
            Self::Gcs(_) => StagingType::CopyGcs,
            Self::AzureBlob(_) => StagingType::CopyAzureBlob,
            Self::Internal => StagingType::InternalStaging,
        }
    }

    /// Location of staged file number `batch` for `stream`
    ///
    /// Files are partitioned by stream and hour of staging.
    pub fn staging_location(
        &self,
        warehouse: &WarehouseConfig,
        stream: &str,
        batch: u64,
        staged_at: DateTime<Utc>,
    ) -> String {
        let stream = sanitize_identifier(stream);
        let partition = staged_at.format("%Y/%m/%d/%H");
        let file = format!("{stream}/{partition}/{batch:06}.jsonl");

        match self {
            Self::S3(s3) => match s3.s3_bucket_path.as_deref().map(|p| p.trim_matches('/')) {
                Some(prefix) if !prefix.is_empty() => {
                    format!("s3://{}/{prefix}/{file}", s3.s3_bucket_name)
                }
                _ => format!("s3://{}/{file}", s3.s3_bucket_name),
            },
            Self::Gcs(gcs) => format!("gcs://{}/{file}", gcs.bucket_name),
            Self::AzureBlob(azure) => format!(
                "azure://{}.{}/{}/{file}",
                azure.azure_blob_storage_account_name,
                azure.azure_blob_storage_endpoint_domain_name,
                azure.azure_blob_storage_container_name
            ),
            Self::Internal => format!(
                "@\"{}\".\"{}\".\"{stream}_stage\"/{partition}/{batch:06}.jsonl",
                warehouse.database, warehouse.schema
            ),
        }
    }

    /// COPY statement loading `location` into `table`
    ///
    /// Credentials are never rendered; the executor attaches them.
    pub fn copy_statement(
        &self,
        warehouse: &WarehouseConfig,
        table: &str,
        location: &str,
        purge: bool,
    ) -> String {
        let mut statement = format!(
            "COPY INTO \"{}\".\"{}\".\"{}\" FROM '{location}' FILE_FORMAT = (TYPE = JSON)",
            warehouse.database,
            warehouse.schema,
            sanitize_identifier(table)
        );
        if purge {
            statement.push_str(" PURGE = TRUE");
        }
        statement
    }
}

/// Raw table receiving records of `stream`
pub fn raw_table_name(stream: &str) -> String {
    format!("raw_{}", sanitize_identifier(stream))
}

fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
