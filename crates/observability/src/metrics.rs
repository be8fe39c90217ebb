//! Connector metrics
//!
//! Counters and histograms go through the `metrics` facade; whichever
//! recorder is installed (Prometheus by default) receives them.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use contracts::{StreamEnd, StreamObserver};
use metrics::{counter, histogram};

/// Record that a destination strategy was built for `kind`
pub fn record_strategy_constructed(kind: &str) {
    counter!(
        "connector_strategies_constructed_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record the outcome of a `check`
pub fn record_check_status(connector: &str, success: bool) {
    let status = if success { "succeeded" } else { "failed" };
    counter!(
        "connector_checks_total",
        "connector" => connector.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Stream observer publishing metrics and keeping a local summary
#[derive(Debug, Default)]
pub struct MetricsObserver {
    aggregator: Mutex<StreamStatsAggregator>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary of everything observed so far
    pub fn summary(&self) -> StreamSummary {
        self.aggregator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .summary()
    }

    fn update(&self, f: impl FnOnce(&mut StreamStatsAggregator)) {
        let mut aggregator = self.aggregator.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *aggregator);
    }
}

impl StreamObserver for MetricsObserver {
    fn on_record(&self, stream: &str, _cursor: u64) {
        counter!("connector_records_emitted_total", "stream" => stream.to_string()).increment(1);
        self.update(|agg| agg.record(stream));
    }

    fn on_delay(&self, delay: Duration) {
        let ms = delay.as_secs_f64() * 1000.0;
        histogram!("connector_stream_delay_ms").record(ms);
        self.update(|agg| agg.delays.push(ms));
    }

    fn on_finish(&self, end: StreamEnd, _emitted: u64) {
        counter!("connector_streams_finished_total", "reason" => end.as_str()).increment(1);
        self.update(|agg| agg.finish(end));
    }
}

/// In-memory aggregation of stream activity
#[derive(Debug, Clone, Default)]
pub struct StreamStatsAggregator {
    /// Records per stream
    pub records: BTreeMap<String, u64>,

    /// Pacing delays
    pub delays: DelayStats,

    /// Finished streams per reason
    pub finished: BTreeMap<&'static str, u64>,
}

impl StreamStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stream: &str) {
        *self.records.entry(stream.to_string()).or_insert(0) += 1;
    }

    pub fn finish(&mut self, end: StreamEnd) {
        *self.finished.entry(end.as_str()).or_insert(0) += 1;
    }

    pub fn summary(&self) -> StreamSummary {
        StreamSummary {
            total_records: self.records.values().sum(),
            records_per_stream: self.records.clone(),
            delays: self.delays,
            finished: self.finished.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Snapshot produced by [`StreamStatsAggregator::summary`]
#[derive(Debug, Clone, Default)]
pub struct StreamSummary {
    pub total_records: u64,
    pub records_per_stream: BTreeMap<String, u64>,
    pub delays: DelayStats,
    pub finished: BTreeMap<&'static str, u64>,
}

impl std::fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Stream Summary ===")?;
        writeln!(f, "Total records: {}", self.total_records)?;
        for (stream, count) in &self.records_per_stream {
            writeln!(f, "  {stream}: {count}")?;
        }
        writeln!(f, "Delays: {}", self.delays)?;

        if !self.finished.is_empty() {
            writeln!(f, "Finished streams:")?;
            for (reason, count) in &self.finished {
                writeln!(f, "  {reason}: {count}")?;
            }
        }

        Ok(())
    }
}

/// Pacing delays seen across streams, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DelayStats {
    pub count: u64,
    pub total_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl DelayStats {
    pub fn push(&mut self, ms: f64) {
        if self.count == 0 {
            self.min_ms = ms;
            self.max_ms = ms;
        } else {
            self.min_ms = self.min_ms.min(ms);
            self.max_ms = self.max_ms.max(ms);
        }
        self.count += 1;
        self.total_ms += ms;
    }

    pub fn mean_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

impl std::fmt::Display for DelayStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "none");
        }
        write!(
            f,
            "{} waits, {:.0} ms total (min={:.0}, max={:.0}, mean={:.1})",
            self.count,
            self.total_ms,
            self.min_ms,
            self.max_ms,
            self.mean_ms()
        )
    }
}
