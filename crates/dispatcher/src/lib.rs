//! # Dispatcher
//!
//! Destination dispatch module.
//!
//! Responsible for:
//! - Resolving a backend discriminator from each configuration
//! - Lazily building and caching one strategy per discriminator
//! - Forwarding lifecycle calls to the selected strategy unchanged
//! - The warehouse staging strategies (S3, GCS, Azure Blob, internal)

pub mod discriminator;
pub mod dispatcher;
pub mod metrics;
pub mod registry;
pub mod resolver;
pub mod staging;

pub use contracts::{Destination, RecordStream};
pub use discriminator::Discriminator;
pub use dispatcher::SwitchingDestination;
pub use metrics::{DispatcherMetrics, MetricsSnapshot};
pub use registry::{StrategyFactory, StrategyRegistry, StrategyRegistryBuilder};
pub use resolver::TypeResolver;
pub use staging::{
    resolve_staging_type, warehouse_destination, StagedBatch, StagingDestination, StagingReport,
    StagingType, WarehouseDestination,
};
