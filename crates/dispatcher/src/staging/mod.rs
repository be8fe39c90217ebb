//! Warehouse staging strategies
//!
//! Four interchangeable ways to load records into the warehouse, selected per
//! configuration by [`resolve_staging_type`].

mod area;
mod config;
mod destination;
mod kind;

pub use self::area::{raw_table_name, StagingArea};
pub use self::config::{
    AzureBlobStagingConfig, GcsStagingConfig, LoadingOptions, S3StagingConfig, WarehouseConfig,
};
pub use self::destination::{StagedBatch, StagingDestination, StagingReport};
pub use self::kind::{resolve_staging_type, StagingType, LOADING_METHOD, METHOD};

use contracts::ContractError;

use crate::discriminator::Discriminator;
use crate::dispatcher::SwitchingDestination;
use crate::registry::StrategyRegistry;

/// Switching destination over the warehouse staging strategies
pub type WarehouseDestination = SwitchingDestination<StagingType, StagingDestination>;

/// Build the warehouse destination with every staging type registered
pub fn warehouse_destination() -> Result<WarehouseDestination, ContractError> {
    let registry = StagingType::ALL
        .iter()
        .copied()
        .fold(
            StrategyRegistry::<StagingType, StagingDestination>::builder(),
            |builder, kind| {
                builder.register(kind, move |config| {
                    StagingDestination::from_config(kind, config)
                })
            },
        )
        .build()?;

    Ok(SwitchingDestination::new(resolve_staging_type, registry))
}
