//! Observability metrics for the logging facade.
//!
//! Counts what happened to every log call so hosts can see how much output the
//! filters and throttles are holding back.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking facade statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads. Clones share
/// the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Lines handed to the sink
    lines_written: AtomicU64,
    /// Throttled calls denied by the registry
    throttled: AtomicU64,
    /// Calls dropped by the level filter
    filtered: AtomicU64,
    /// Calls dropped because the message was blank
    blank: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                lines_written: AtomicU64::new(0),
                throttled: AtomicU64::new(0),
                filtered: AtomicU64::new(0),
                blank: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_written(&self) {
        self.inner.lines_written.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_throttled(&self) {
        self.inner.throttled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_filtered(&self) {
        self.inner.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_blank(&self) {
        self.inner.blank.fetch_add(1, Ordering::Relaxed);
    }

    /// Total lines handed to the sink.
    pub fn lines_written(&self) -> u64 {
        self.inner.lines_written.load(Ordering::Relaxed)
    }

    /// Total throttled calls denied.
    pub fn throttled(&self) -> u64 {
        self.inner.throttled.load(Ordering::Relaxed)
    }

    /// Total calls dropped by level filtering.
    pub fn filtered(&self) -> u64 {
        self.inner.filtered.load(Ordering::Relaxed)
    }

    /// Total calls dropped for a blank message.
    pub fn blank(&self) -> u64 {
        self.inner.blank.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_written: self.lines_written(),
            throttled: self.throttled(),
            filtered: self.filtered(),
            blank: self.blank(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Lines handed to the sink
    pub lines_written: u64,
    /// Throttled calls denied
    pub throttled: u64,
    /// Calls dropped by level filtering
    pub filtered: u64,
    /// Calls dropped for a blank message
    pub blank: u64,
}

impl MetricsSnapshot {
    /// Total calls seen, whatever their outcome.
    pub fn total_calls(&self) -> u64 {
        self.lines_written
            .saturating_add(self.throttled)
            .saturating_add(self.filtered)
            .saturating_add(self.blank)
    }

    /// Share of throttled calls among calls that reached the throttle (0.0 to 1.0).
    ///
    /// Returns 0.0 if nothing was written or throttled.
    pub fn throttle_rate(&self) -> f64 {
        let reached = self.lines_written.saturating_add(self.throttled);
        if reached == 0 {
            0.0
        } else {
            self.throttled as f64 / reached as f64
        }
    }
}
