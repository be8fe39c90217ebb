//! Pacing policy and the sleep abstraction behind it

use std::future::Future;
use std::time::Duration;

use contracts::{ConnectorConfig, ContractError};

/// Config key bounding the number of records
pub const MAX_RECORDS: &str = "max_records";
/// Config key holding the delay between records, in milliseconds
pub const MESSAGE_INTERVAL: &str = "message_interval";

/// How many records to emit and how fast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacingPolicy {
    /// Stop after this many records; unbounded when `None`
    pub max_records: Option<u64>,
    /// Delay before every record but the first; none when `None`
    pub interval: Option<Duration>,
}

impl PacingPolicy {
    /// Read the policy from `max_records` and `message_interval`
    ///
    /// Other keys are ignored. A zero interval means no delay.
    ///
    /// # Errors
    /// `ConfigValidation` when either value is not a non-negative integer
    pub fn from_config(config: &ConnectorConfig) -> Result<Self, ContractError> {
        let max_records = config.get_u64(MAX_RECORDS)?;
        let interval = config
            .get_u64(MESSAGE_INTERVAL)?
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);

        Ok(Self {
            max_records,
            interval,
        })
    }

    /// Whether `emitted` records already satisfy the bound
    pub fn is_exhausted(&self, emitted: u64) -> bool {
        self.max_records.is_some_and(|max| emitted >= max)
    }
}

/// Suspends the stream between records
pub trait Sleeper: Send + Sync + 'static {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
