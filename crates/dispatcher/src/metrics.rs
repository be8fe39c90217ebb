//! Dispatcher metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single dispatcher
#[derive(Debug, Default)]
pub struct DispatcherMetrics {
    /// Strategies constructed and cached
    constructions: AtomicU64,
    /// Calls served by an already cached strategy
    cache_hits: AtomicU64,
    /// Strategy constructions that failed
    construction_failures: AtomicU64,
    /// Configurations that could not be resolved
    resolution_failures: AtomicU64,
}

impl DispatcherMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constructions(&self) -> u64 {
        self.constructions.load(Ordering::Relaxed)
    }

    pub fn inc_constructions(&self) {
        self.constructions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn inc_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn construction_failures(&self) -> u64 {
        self.construction_failures.load(Ordering::Relaxed)
    }

    pub fn inc_construction_failures(&self) {
        self.construction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn resolution_failures(&self) -> u64 {
        self.resolution_failures.load(Ordering::Relaxed)
    }

    pub fn inc_resolution_failures(&self) {
        self.resolution_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            constructions: self.constructions(),
            cache_hits: self.cache_hits(),
            construction_failures: self.construction_failures(),
            resolution_failures: self.resolution_failures(),
        }
    }
}

/// Snapshot of dispatcher metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub constructions: u64,
    pub cache_hits: u64,
    pub construction_failures: u64,
    pub resolution_failures: u64,
}
