//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract serialization snapshots
//! - Feed source -> warehouse destination runs
//! - Strategy switching across configurations

#[cfg(test)]
mod contract_tests {
    use contracts::{ConnectionStatus, StreamEnd};

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_value(ConnectionStatus::failed("bad host")).unwrap();
        assert_eq!(json["status"], "FAILED");
        assert_eq!(json["message"], "bad host");
    }

    #[test]
    fn test_feed_catalog_wire_format() {
        let json = serde_json::to_value(feed_source::feed_catalog()).unwrap();
        assert_eq!(json["streams"][0]["name"], "data");
        assert_eq!(
            json["streams"][0]["json_schema"]["properties"]["column1"]["type"],
            "number"
        );
        assert_eq!(json["streams"][0]["supported_sync_modes"][0], "full_refresh");
    }

    #[test]
    fn test_stream_end_labels() {
        assert_eq!(StreamEnd::Cancelled.as_str(), "cancelled");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        ConfiguredCatalog, ContractError, Destination, DestinationSyncMode, RecordStream, Source,
        SyncMode,
    };
    use dispatcher::{warehouse_destination, Discriminator, StagingType};
    use feed_source::FeedSource;
    use observability::MetricsObserver;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    fn configured_feed() -> ConfiguredCatalog {
        ConfiguredCatalog::from_catalog(
            &feed_source::feed_catalog(),
            SyncMode::FullRefresh,
            DestinationSyncMode::Append,
        )
    }

    fn warehouse_config(loading_method: serde_json::Value) -> contracts::ConnectorConfig {
        contracts::ConnectorConfig::from_value(json!({
            "host": "acme.example.com",
            "database": "ANALYTICS",
            "schema": "PUBLIC",
            "loading_method": loading_method
        }))
        .unwrap()
    }

    /// FeedSource -> SwitchingDestination(S3 staging)
    #[tokio::test]
    async fn test_e2e_feed_into_s3_staging() {
        let source_config = ConfigLoader::load_from_str(
            "max_records = 25\nmessage_interval = 0\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        let observer = Arc::new(MetricsObserver::new());
        let source = FeedSource::new().with_observer(observer.clone());

        assert!(source.check(&source_config).await.is_success());
        let mut stream = source
            .read(&source_config, &configured_feed(), None)
            .await
            .unwrap();

        let destination = warehouse_destination().unwrap();
        let destination_config = warehouse_config(json!({
            "method": "S3 Staging",
            "s3_bucket_name": "stage-bucket",
            "s3_bucket_region": "us-east-1",
            "s3_bucket_path": "loads",
            "batch_size": 10
        }));

        let summary = destination
            .write(&destination_config, &configured_feed(), &mut stream)
            .await
            .unwrap();

        assert_eq!(summary.records_written, 25);
        assert_eq!(summary.per_stream["data"], 25);
        assert_eq!(summary.batches, 3);

        let strategy = destination.strategy_for(&destination_config).unwrap();
        assert_eq!(strategy.kind(), StagingType::CopyS3);
        let mut stream = source
            .read(&source_config, &configured_feed(), None)
            .await
            .unwrap();
        let report = strategy
            .stage(&destination_config, &configured_feed(), &mut stream)
            .await
            .unwrap();
        assert_eq!(
            report.batches.iter().map(|b| b.records).collect::<Vec<_>>(),
            vec![10, 10, 5]
        );
        assert!(report
            .batches
            .iter()
            .all(|b| b.location.starts_with("s3://stage-bucket/loads/data/")));

        // both streams were drained before the destination closed them
        let stats = observer.summary();
        assert_eq!(stats.total_records, 50);
        assert_eq!(stats.finished["exhausted"], 2);
        assert!(!stats.finished.contains_key("released"));
    }

    /// One destination instance switching between staging types
    #[tokio::test]
    async fn test_strategy_switching_across_configs() {
        let destination = warehouse_destination().unwrap();
        let configs = [
            warehouse_config(json!({"s3_bucket_name": "bkt", "s3_bucket_region": "eu-west-1"})),
            warehouse_config(json!({
                "project_id": "proj",
                "bucket_name": "gcs-stage",
                "credentials_json": "{}"
            })),
            warehouse_config(json!({
                "azure_blob_storage_account_name": "acct",
                "azure_blob_storage_container_name": "stage",
                "azure_blob_storage_sas_token": "sv=1"
            })),
            warehouse_config(json!({"method": "Standard"})),
        ];

        for config in configs.iter().chain(configs.iter()) {
            let status = destination.check(config).await;
            assert!(status.is_success(), "{status}");
        }

        assert_eq!(destination.cached_kinds(), StagingType::ALL.to_vec());
        let metrics = destination.metrics().snapshot();
        assert_eq!(metrics.constructions, 4);
        assert_eq!(metrics.cache_hits, 4);
    }

    #[tokio::test]
    async fn test_unrecognized_loading_method_fails_check_and_write() {
        let destination = warehouse_destination().unwrap();
        let config = warehouse_config(json!({"method": "FTP Staging"}));

        let status = destination.check(&config).await;
        assert!(!status.is_success());

        let source = FeedSource::new();
        let mut stream = source
            .read(
                &ConfigLoader::load_from_str(r#"{"max_records": 3}"#, ConfigFormat::Json)
                    .unwrap(),
                &configured_feed(),
                None,
            )
            .await
            .unwrap();
        let err = destination
            .write(&config, &configured_feed(), &mut stream)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Configuration { .. }));

        // the stream was released by the destination
        assert!(stream.next().await.unwrap().is_none());
    }

    /// Host cancellation interrupts a paced read feeding a destination
    #[tokio::test(start_paused = true)]
    async fn test_host_cancellation_stops_paced_write() {
        let token = CancellationToken::new();
        let source = FeedSource::new().with_cancellation(token.clone());
        let config =
            ConfigLoader::load_from_str(r#"{"message_interval": 1000}"#, ConfigFormat::Json)
                .unwrap();
        let mut stream = source.read(&config, &configured_feed(), None).await.unwrap();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            token.cancel();
        });

        let destination = warehouse_destination().unwrap();
        let err = destination
            .write(
                &warehouse_config(json!({"method": "Internal Staging"})),
                &configured_feed(),
                &mut stream,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ContractError::StreamCancelled { emitted: 3 }));
    }
}
