//! Handler metrics for observability
//!
//! The handler never logs about its own failures; it counts them here
//! instead. Handlers derived from one root share one `HandlerMetrics`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing handler health
///
/// # Example
///
/// ```
/// use rust_color_handler::HandlerMetrics;
///
/// let metrics = HandlerMetrics::new();
/// metrics.record_handled(120);
/// metrics.record_failed();
///
/// assert_eq!(metrics.records_handled(), 1);
/// assert_eq!(metrics.bytes_written(), 120);
/// assert_eq!(metrics.failure_rate(), 50.0);
/// ```
#[derive(Debug, Default)]
pub struct HandlerMetrics {
    /// Records written in full
    records_handled: AtomicU64,

    /// Records abandoned because a write failed
    records_failed: AtomicU64,

    /// Records rejected because the caller's context was cancelled
    records_cancelled: AtomicU64,

    /// Bytes accepted by the sink, including partial records
    bytes_written: AtomicU64,
}

impl HandlerMetrics {
    pub const fn new() -> Self {
        Self {
            records_handled: AtomicU64::new(0),
            records_failed: AtomicU64::new(0),
            records_cancelled: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_handled(&self) -> u64 {
        self.records_handled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_failed(&self) -> u64 {
        self.records_failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_cancelled(&self) -> u64 {
        self.records_cancelled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Record a fully written record of `bytes` bytes
    #[inline]
    pub fn record_handled(&self, bytes: u64) -> u64 {
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
        self.records_handled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.records_failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_cancelled(&self) -> u64 {
        self.records_cancelled.fetch_add(1, Ordering::Relaxed)
    }

    /// Bytes that reached the sink before a record failed
    #[inline]
    pub fn record_partial_bytes(&self, bytes: u64) {
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Failed records as a percentage (0.0 - 100.0) of attempted records
    ///
    /// Cancelled records were never attempted and are not counted.
    pub fn failure_rate(&self) -> f64 {
        let handled = self.records_handled();
        let failed = self.records_failed();
        let total = handled + failed;

        if total == 0 {
            0.0
        } else {
            (failed as f64 / total as f64) * 100.0
        }
    }

    pub fn reset(&self) {
        self.records_handled.store(0, Ordering::Relaxed);
        self.records_failed.store(0, Ordering::Relaxed);
        self.records_cancelled.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
    }
}
