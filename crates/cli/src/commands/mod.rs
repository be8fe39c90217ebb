//! Command implementations.

mod destination;
mod source;

pub use destination::run_destination;
pub use source::run_source;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{ConnectionStatus, ConnectorConfig};
use tracing::info;

use crate::error::CliError;

/// Load a connector configuration file
fn load_config(path: &Path) -> Result<ConnectorConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    let config = config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    info!(config = %path.display(), keys = config.len(), "Configuration loaded");
    Ok(config)
}

/// Print a check result and turn a failed status into an error
fn report_check(connector: &str, status: ConnectionStatus) -> Result<()> {
    observability::record_check_status(connector, status.is_success());
    println!("{}", serde_json::to_string(&status)?);

    if status.is_success() {
        Ok(())
    } else {
        let message = status.message.unwrap_or_default();
        Err(CliError::check_failed(connector, message).into())
    }
}

/// Wait for Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
