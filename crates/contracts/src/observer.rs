//! StreamObserver - optional observability hook for record streams
//!
//! Streams call these methods at well-defined points. Every method defaults to
//! a no-op so implementations only override what they record.

use std::time::Duration;

/// Why a stream stopped producing records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Maximum record count reached
    Exhausted,
    /// Pacing delay interrupted by cancellation
    Cancelled,
    /// Released by the host
    Released,
}

impl StreamEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::Cancelled => "cancelled",
            Self::Released => "released",
        }
    }
}

/// Hook invoked by record streams
pub trait StreamObserver: Send + Sync {
    /// A record was produced; `cursor` counts records emitted so far
    fn on_record(&self, _stream: &str, _cursor: u64) {}

    /// The stream is about to wait before the next record
    fn on_delay(&self, _delay: Duration) {}

    /// The stream reached a terminal state
    fn on_finish(&self, _end: StreamEnd, _emitted: u64) {}
}

/// Observer that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StreamObserver for NoopObserver {}
