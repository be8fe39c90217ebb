//! `source` command implementations.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{
    ConfiguredCatalog, ContractError, DestinationSyncMode, RecordStream, Source, SyncMode,
};
use feed_source::FeedSource;
use observability::MetricsObserver;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{load_config, report_check, shutdown_signal};
use crate::cli::{ReadArgs, SourceCommand};

/// Execute a `source` subcommand
pub async fn run_source(command: &SourceCommand) -> Result<()> {
    match command {
        SourceCommand::Check(args) => {
            let config = load_config(&args.config)?;
            let status = FeedSource::new().check(&config).await;
            report_check("source", status)
        }
        SourceCommand::Discover(args) => {
            let config = load_config(&args.config)?;
            let catalog = FeedSource::new().discover(&config).await?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
            Ok(())
        }
        SourceCommand::Read(args) => read(args).await,
    }
}

async fn read(args: &ReadArgs) -> Result<()> {
    let config = load_config(&args.config.config)?;

    let token = CancellationToken::new();
    let observer = Arc::new(MetricsObserver::new());
    let source = FeedSource::new()
        .with_observer(observer.clone())
        .with_cancellation(token.clone());

    let catalog = match &args.catalog {
        Some(path) => config_loader::ConfigLoader::load_catalog_from_path(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => ConfiguredCatalog::from_catalog(
            &source.discover(&config).await?,
            SyncMode::FullRefresh,
            DestinationSyncMode::Append,
        ),
    };
    let state = args
        .state
        .as_deref()
        .map(config_loader::ConfigLoader::load_state_from_path)
        .transpose()
        .context("Failed to load state")?;

    let signal = tokio::spawn({
        let token = token.clone();
        async move {
            shutdown_signal().await;
            warn!("Received shutdown signal, cancelling stream...");
            token.cancel();
        }
    });

    let start = Instant::now();
    let mut stream = source.read(&config, &catalog, state.as_ref()).await?;
    let limit = (args.limit > 0).then_some(args.limit);

    let result = pump(&mut stream, limit).await;
    let closed = stream.close().await;
    signal.abort();

    let emitted = match result {
        Ok(emitted) => emitted,
        Err(ContractError::StreamCancelled { emitted }) => {
            warn!(emitted, "Stream cancelled");
            emitted
        }
        Err(e) => return Err(e).context("Reading from source failed"),
    };
    closed.context("Failed to close stream")?;

    info!(
        records = emitted,
        duration_secs = start.elapsed().as_secs_f64(),
        "Read completed"
    );
    eprint!("{}", observer.summary());
    Ok(())
}

/// Copy records to stdout as JSON lines
async fn pump<S: RecordStream>(stream: &mut S, limit: Option<u64>) -> Result<u64, ContractError> {
    let mut emitted = 0;
    while limit.is_none_or(|max| emitted < max) {
        let Some(record) = stream.next().await? else {
            break;
        };
        let line = serde_json::to_string(&record)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")?;
        emitted += 1;
    }
    std::io::stdout().flush()?;
    Ok(emitted)
}
