//! StagingDestination - stages records in batches and plans their COPY load

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use contracts::{
    ConfiguredCatalog, ConnectionStatus, ConnectorConfig, ContractError, Destination,
    RecordStream, WriteSummary,
};

use super::area::{raw_table_name, StagingArea};
use super::config::{parse_loading_method, parse_warehouse, LoadingOptions, WarehouseConfig};
use super::kind::StagingType;

/// A staged file ready for loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedBatch {
    pub stream: String,
    pub location: String,
    pub copy_statement: String,
    pub records: usize,
    pub bytes: usize,
}

/// Outcome of one staging run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingReport {
    pub summary: WriteSummary,
    pub batches: Vec<StagedBatch>,
}

/// Warehouse settings of a single call
#[derive(Debug)]
struct StagingPlan {
    area: StagingArea,
    warehouse: WarehouseConfig,
    options: LoadingOptions,
}

impl StagingPlan {
    fn from_config(kind: StagingType, config: &ConnectorConfig) -> Result<Self, ContractError> {
        Ok(Self {
            warehouse: parse_warehouse(config)?,
            options: parse_loading_method(config)?,
            area: StagingArea::from_config(kind, config)?,
        })
    }
}

/// Warehouse strategy for one staging type
///
/// Only the staging type and the batch sequence live in the instance; bucket,
/// database and batching settings come from the configuration of each call.
/// Uploading staged files and executing the COPY statements is left to the
/// storage executor; this type decides batching, locations and statements.
#[derive(Debug)]
pub struct StagingDestination {
    kind: StagingType,
    next_batch: AtomicU64,
}

impl StagingDestination {
    /// Construct the strategy for `kind`
    ///
    /// # Errors
    /// Parse or validation failure of the warehouse or loading method settings
    #[instrument(name = "staging_destination_new", skip(config))]
    pub fn from_config(kind: StagingType, config: &ConnectorConfig) -> Result<Self, ContractError> {
        let plan = StagingPlan::from_config(kind, config)?;
        info!(
            host = %plan.warehouse.host,
            database = %plan.warehouse.database,
            batch_size = plan.options.batch_size,
            "staging destination ready"
        );

        Ok(Self {
            kind,
            next_batch: AtomicU64::new(0),
        })
    }

    pub fn kind(&self) -> StagingType {
        self.kind
    }

    /// Stage every record of `records` with the settings of `config`
    ///
    /// The stream is always closed, whatever the outcome.
    ///
    /// # Errors
    /// Invalid settings, a record for a stream outside `catalog`, or a stream error
    #[instrument(name = "staging_stage", skip_all, fields(backend = %self.kind))]
    pub async fn stage<S: RecordStream>(
        &self,
        config: &ConnectorConfig,
        catalog: &ConfiguredCatalog,
        records: &mut S,
    ) -> Result<StagingReport, ContractError> {
        let result = match StagingPlan::from_config(self.kind, config) {
            Ok(plan) => self.stage_records(&plan, catalog, records).await,
            Err(e) => Err(e),
        };
        let closed = records.close().await;

        let report = result?;
        if let Err(e) = closed {
            warn!(error = %e, "failed to release record stream");
            return Err(e);
        }

        info!(
            records = report.summary.records_written,
            batches = report.summary.batches,
            "write completed"
        );
        Ok(report)
    }

    async fn stage_records<S: RecordStream>(
        &self,
        plan: &StagingPlan,
        catalog: &ConfiguredCatalog,
        records: &mut S,
    ) -> Result<StagingReport, ContractError> {
        let mut report = StagingReport::default();
        let mut buffers: BTreeMap<String, Vec<String>> = BTreeMap::new();

        while let Some(record) = records.next().await? {
            if !catalog.contains(&record.stream) {
                return Err(ContractError::staging_write(
                    record.stream,
                    "stream is not part of the configured catalog",
                ));
            }

            let line = serde_json::to_string(&record)?;
            report.summary.add_record(&record.stream);

            let buffer = buffers.entry(record.stream.clone()).or_default();
            buffer.push(line);
            if buffer.len() >= plan.options.batch_size {
                let lines = std::mem::take(buffer);
                self.stage_batch(plan, &mut report, &record.stream, lines);
            }
        }

        for (stream, lines) in buffers {
            if !lines.is_empty() {
                self.stage_batch(plan, &mut report, &stream, lines);
            }
        }

        Ok(report)
    }

    fn stage_batch(
        &self,
        plan: &StagingPlan,
        report: &mut StagingReport,
        stream: &str,
        lines: Vec<String>,
    ) {
        let batch = self.next_batch.fetch_add(1, Ordering::Relaxed);
        let location = plan
            .area
            .staging_location(&plan.warehouse, stream, batch, Utc::now());
        let copy_statement = plan.area.copy_statement(
            &plan.warehouse,
            &raw_table_name(stream),
            &location,
            plan.options.purge_staging_data,
        );
        let bytes = lines.iter().map(|l| l.len() + 1).sum();

        info!(
            stream,
            records = lines.len(),
            bytes,
            location = %location,
            "batch staged"
        );
        debug!(statement = %copy_statement, "copy planned");

        report.summary.batches += 1;
        report.batches.push(StagedBatch {
            stream: stream.to_string(),
            location,
            copy_statement,
            records: lines.len(),
            bytes,
        });
    }
}

impl Destination for StagingDestination {
    #[instrument(name = "staging_check", skip(self, config), fields(backend = %self.kind))]
    async fn check(&self, config: &ConnectorConfig) -> ConnectionStatus {
        match StagingPlan::from_config(self.kind, config) {
            Ok(_) => ConnectionStatus::succeeded(),
            Err(e) => ConnectionStatus::failed(e.to_string()),
        }
    }

    async fn write<S: RecordStream>(
        &self,
        config: &ConnectorConfig,
        catalog: &ConfiguredCatalog,
        records: &mut S,
    ) -> Result<WriteSummary, ContractError> {
        self.stage(config, catalog, records)
            .await
            .map(|report| report.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        Catalog, DestinationSyncMode, Record, StreamDescriptor, SyncMode, VecRecordStream,
    };
    use serde_json::{json, Map};

    fn config(value: serde_json::Value) -> ConnectorConfig {
        ConnectorConfig::from_value(value).unwrap()
    }

    fn internal_config(batch_size: usize) -> ConnectorConfig {
        config(json!({
            "host": "acme.example.com",
            "database": "ANALYTICS",
            "schema": "PUBLIC",
            "loading_method": {"method": "Internal Staging", "batch_size": batch_size}
        }))
    }

    fn catalog(names: &[&str]) -> ConfiguredCatalog {
        let catalog = Catalog {
            streams: names
                .iter()
                .map(|n| StreamDescriptor::new(*n, json!({"type": "object"})))
                .collect(),
        };
        ConfiguredCatalog::from_catalog(&catalog, SyncMode::FullRefresh, DestinationSyncMode::Append)
    }

    fn record(stream: &str, n: u64) -> Record {
        let mut data = Map::new();
        data.insert("column1".to_string(), json!(n));
        Record::new(stream, data)
    }

    #[test]
    fn test_construction_requires_warehouse_settings() {
        let err = StagingDestination::from_config(StagingType::InternalStaging, &config(json!({})))
            .unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[tokio::test]
    async fn test_write_batches_per_stream() {
        let destination =
            StagingDestination::from_config(StagingType::InternalStaging, &internal_config(2))
                .unwrap();

        let mut stream = VecRecordStream::new(vec![
            record("data", 1),
            record("data", 2),
            record("users", 1),
            record("data", 3),
        ]);
        let summary = destination
            .write(&internal_config(2), &catalog(&["data", "users"]), &mut stream)
            .await
            .unwrap();

        assert_eq!(summary.records_written, 4);
        assert_eq!(summary.per_stream["data"], 3);
        assert_eq!(summary.per_stream["users"], 1);
        assert_eq!(summary.batches, 3);
        assert!(stream.is_closed());

    }

    #[tokio::test]
    async fn test_each_stage_reports_only_its_own_batches() {
        let destination =
            StagingDestination::from_config(StagingType::InternalStaging, &internal_config(2))
                .unwrap();

        for _ in 0..2 {
            let mut stream = VecRecordStream::new(vec![record("data", 1), record("data", 2)]);
            let report = destination
                .stage(&internal_config(2), &catalog(&["data"]), &mut stream)
                .await
                .unwrap();

            assert_eq!(report.batches.len(), 1);
            assert_eq!(report.batches[0].stream, "data");
            assert_eq!(report.batches[0].records, 2);
            assert!(report.batches[0].copy_statement.contains("\"raw_data\""));
        }
    }

    #[tokio::test]
    async fn test_stage_uses_settings_of_each_call() {
        let s3 = |bucket: &str, database: &str| {
            config(json!({
                "host": "acme.example.com",
                "database": database,
                "schema": "PUBLIC",
                "loading_method": {"s3_bucket_name": bucket, "s3_bucket_region": "us-east-1"}
            }))
        };
        let destination =
            StagingDestination::from_config(StagingType::CopyS3, &s3("bucket-a", "DB_A")).unwrap();

        let mut stream = VecRecordStream::new(vec![record("data", 1)]);
        let report = destination
            .stage(&s3("bucket-b", "DB_B"), &catalog(&["data"]), &mut stream)
            .await
            .unwrap();

        let batch = &report.batches[0];
        assert!(batch.location.starts_with("s3://bucket-b/data/"));
        assert!(batch.copy_statement.starts_with("COPY INTO \"DB_B\".\"PUBLIC\".\"raw_data\""));
        assert!(!batch.copy_statement.contains("bucket-a"));
    }

    #[tokio::test]
    async fn test_invalid_call_settings_fail_and_close() {
        let destination =
            StagingDestination::from_config(StagingType::InternalStaging, &internal_config(10))
                .unwrap();

        let mut stream = VecRecordStream::new(vec![record("data", 1)]);
        let err = destination
            .write(&config(json!({"host": "h"})), &catalog(&["data"]), &mut stream)
            .await
            .unwrap_err();

        assert!(matches!(err, ContractError::ConfigParse { .. }));
        assert!(stream.is_closed());
    }

    #[tokio::test]
    async fn test_write_rejects_unknown_stream_and_closes() {
        let destination =
            StagingDestination::from_config(StagingType::InternalStaging, &internal_config(10))
                .unwrap();

        let mut stream = VecRecordStream::new(vec![record("orders", 1)]);
        let err = destination
            .write(&internal_config(10), &catalog(&["data"]), &mut stream)
            .await
            .unwrap_err();

        assert!(matches!(err, ContractError::StagingWrite { ref stream, .. } if stream == "orders"));
        assert!(stream.is_closed());
    }

    #[tokio::test]
    async fn test_check_validates_supplied_config() {
        let destination =
            StagingDestination::from_config(StagingType::InternalStaging, &internal_config(10))
                .unwrap();

        assert!(destination.check(&internal_config(10)).await.is_success());

        let status = destination
            .check(&config(json!({"host": "h", "database": "d"})))
            .await;
        assert!(!status.is_success());
        assert!(status.message.unwrap().contains("schema"));
    }
}
