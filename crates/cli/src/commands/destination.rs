//! `destination` command implementations.

use anyhow::{Context, Result};
use contracts::{ConfiguredCatalog, Destination, DestinationSyncMode, SyncMode};
use tokio::io::BufReader;
use tracing::info;

use super::{load_config, report_check};
use crate::cli::{DestinationCommand, WriteArgs};
use crate::input::LinesRecordStream;

/// Execute a `destination` subcommand
pub async fn run_destination(command: &DestinationCommand) -> Result<()> {
    match command {
        DestinationCommand::Check(args) => {
            let config = load_config(&args.config)?;
            let destination = dispatcher::warehouse_destination()?;
            let status = destination.check(&config).await;
            record_constructed(&destination);
            report_check("destination", status)
        }
        DestinationCommand::Write(args) => write(args).await,
    }
}

async fn write(args: &WriteArgs) -> Result<()> {
    let config = load_config(&args.config.config)?;
    let catalog = match &args.catalog {
        Some(path) => config_loader::ConfigLoader::load_catalog_from_path(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => ConfiguredCatalog::from_catalog(
            &feed_source::feed_catalog(),
            SyncMode::FullRefresh,
            DestinationSyncMode::Append,
        ),
    };

    let destination = dispatcher::warehouse_destination()?;
    info!(streams = catalog.streams.len(), "Writing records from stdin");

    let mut records = LinesRecordStream::new(BufReader::new(tokio::io::stdin()));
    let summary = destination
        .write(&config, &catalog, &mut records)
        .await
        .context("Writing to destination failed")?;
    record_constructed(&destination);
    info!(
        staging = ?destination.cached_kinds(),
        records = summary.records_written,
        batches = summary.batches,
        "Write completed"
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn record_constructed(destination: &dispatcher::WarehouseDestination) {
    for kind in destination.cached_kinds() {
        observability::record_strategy_constructed(kind.as_str());
    }
}
