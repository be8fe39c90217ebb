//! # Contracts
//!
//! Frozen interface contracts shared by every connector crate.
//! Business crates depend only on this crate, reverse dependencies are prohibited.
//!
//! ## Lifecycle
//! A connector is driven by its host in the order `check` -> `discover` -> `read`
//! (sources) or `check` -> `write` (destinations). Records are pulled one at a
//! time through [`RecordStream`].

mod catalog;
mod config;
mod destination;
mod error;
mod observer;
mod record;
mod source;
mod status;
mod stream;

pub use catalog::*;
pub use config::ConnectorConfig;
pub use destination::{Destination, LocalDestination, WriteSummary};
pub use error::*;
pub use observer::{NoopObserver, StreamEnd, StreamObserver};
pub use record::{Record, SourceState};
pub use source::{LocalSource, Source};
pub use status::{ConnectionStatus, Status};
pub use stream::{LocalRecordStream, RecordStream, VecRecordStream};
