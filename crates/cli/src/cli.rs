//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Connector host - runs the feed source and the warehouse destination
#[derive(Parser, Debug)]
#[command(
    name = "connector",
    author,
    version,
    about = "Feed source and warehouse destination connectors",
    long_about = "Runs connector lifecycle operations from the command line.\n\n\
                  Sources write records to stdout as JSON lines; destinations read \n\
                  JSON lines from stdin and load them through the staging strategy \n\
                  selected by their configuration."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "CONNECTOR_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "CONNECTOR_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "CONNECTOR_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feed source operations
    #[command(subcommand)]
    Source(SourceCommand),

    /// Warehouse destination operations
    #[command(subcommand)]
    Destination(DestinationCommand),
}

#[derive(Subcommand, Debug)]
pub enum SourceCommand {
    /// Validate the source configuration
    Check(ConfigArgs),

    /// Print the source catalog
    Discover(ConfigArgs),

    /// Emit records as JSON lines
    Read(ReadArgs),
}

#[derive(Subcommand, Debug)]
pub enum DestinationCommand {
    /// Validate the destination configuration
    Check(ConfigArgs),

    /// Load JSON line records from stdin
    Write(WriteArgs),
}

/// Connector configuration file
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to configuration file (JSON or TOML)
    #[arg(short, long, env = "CONNECTOR_CONFIG")]
    pub config: PathBuf,
}

/// Arguments for `source read`
#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Configured catalog (defaults to every discovered stream)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// State from a previous run
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Stop after this many records (0 = no limit)
    #[arg(long, default_value = "0")]
    pub limit: u64,
}

/// Arguments for `destination write`
#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Configured catalog (defaults to the feed catalog)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
