//! Buffer pool statistics tracking

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of pool activity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolStats {
    /// Total buffer capacity across all live segments
    pub capacity: usize,
    /// Number of buffers currently leased
    pub currently_leased: usize,
    /// Peak number of buffers leased simultaneously
    pub peak_leased: usize,
    /// Total successful checkouts
    pub checkouts: u64,
    /// Total returns
    pub returns: u64,
    /// Checkouts that failed because a non-growing pool was exhausted
    pub checkout_failures: u64,
    /// Segments created, including the initial allocation
    pub segments_created: u64,
    /// Segments reclaimed by idle reaping
    pub segments_reclaimed: u64,
}

impl PoolStats {
    /// Fraction of capacity currently leased (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.currently_leased as f64 / self.capacity as f64
    }

    /// Fraction of checkout attempts that failed (0.0 to 1.0)
    pub fn failure_rate(&self) -> f64 {
        let attempts = self.checkouts + self.checkout_failures;
        if attempts == 0 {
            return 0.0;
        }
        self.checkout_failures as f64 / attempts as f64
    }

    /// One-line summary for diagnostics
    pub fn summary(&self) -> String {
        format!(
            "PoolStats {{ capacity: {}, leased: {}, peak: {}, checkouts: {}, \
             failures: {}, grown: {}, reclaimed: {}, utilization: {:.2}% }}",
            self.capacity,
            self.currently_leased,
            self.peak_leased,
            self.checkouts,
            self.checkout_failures,
            self.segments_created,
            self.segments_reclaimed,
            self.utilization() * 100.0
        )
    }
}

/// Thread-safe counters updated by the pool as it runs
#[derive(Debug, Default)]
pub struct AtomicPoolStats {
    capacity: AtomicUsize,
    currently_leased: AtomicUsize,
    peak_leased: AtomicUsize,
    checkouts: AtomicU64,
    returns: AtomicU64,
    checkout_failures: AtomicU64,
    segments_created: AtomicU64,
    segments_reclaimed: AtomicU64,
}

impl AtomicPoolStats {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn record_checkout(&self) {
        self.checkouts.fetch_add(1, Ordering::Relaxed);
        let leased = self.currently_leased.fetch_add(1, Ordering::Relaxed) + 1;

        let current_peak = self.peak_leased.load(Ordering::Relaxed);
        if leased > current_peak {
            let _ = self.peak_leased.compare_exchange_weak(
                current_peak,
                leased,
                Ordering::Relaxed,
                Ordering::Relaxed,
            );
        }
    }

    pub(crate) fn record_return(&self) {
        self.returns.fetch_add(1, Ordering::Relaxed);
        self.currently_leased.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn record_checkout_failure(&self) {
        self.checkout_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_growth(&self, new_buffers: usize) {
        self.segments_created.fetch_add(1, Ordering::Relaxed);
        self.capacity.fetch_add(new_buffers, Ordering::Relaxed);
    }

    pub(crate) fn record_reclaim(&self, segments: usize, buffers: usize) {
        self.segments_reclaimed
            .fetch_add(segments as u64, Ordering::Relaxed);
        self.capacity.fetch_sub(buffers, Ordering::Relaxed);
    }

    /// Get a consistent-enough snapshot of the counters
    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity.load(Ordering::Relaxed),
            currently_leased: self.currently_leased.load(Ordering::Relaxed),
            peak_leased: self.peak_leased.load(Ordering::Relaxed),
            checkouts: self.checkouts.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            checkout_failures: self.checkout_failures.load(Ordering::Relaxed),
            segments_created: self.segments_created.load(Ordering::Relaxed),
            segments_reclaimed: self.segments_reclaimed.load(Ordering::Relaxed),
        }
    }
}
