//! # Feed Source
//!
//! Synthetic source emitting a monotonically increasing counter on the `data`
//! stream, optionally bounded by `max_records` and paced by `message_interval`.
//!
//! ## Usage
//!
//! ```ignore
//! use contracts::{ConfiguredCatalog, RecordStream, Source};
//! use feed_source::FeedSource;
//!
//! let source = FeedSource::new();
//! let mut stream = source.read(&config, &catalog, None).await?;
//! while let Some(record) = stream.next().await? {
//!     // {"column1": 1}, {"column1": 2}, ...
//! }
//! stream.close().await?;
//! ```

mod catalog;
mod pacing;
mod source;
mod stream;

pub use catalog::{feed_catalog, COUNTER_FIELD, STREAM_NAME};
pub use pacing::{PacingPolicy, Sleeper, TokioSleeper, MAX_RECORDS, MESSAGE_INTERVAL};
pub use source::FeedSource;
pub use stream::{PacedRecordStream, StreamState};
