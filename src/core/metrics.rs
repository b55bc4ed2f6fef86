//! Dispatch metrics for observability
//!
//! Counters for monitoring the health of a [`Dispatcher`](super::Dispatcher):
//! how many calls were dispatched, how many codec writes landed, and how many
//! codec failures were absorbed along the way.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatcher observability
///
/// # Example
///
/// ```
/// use ordered_logger::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_written();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.written(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Log calls that reached at least one codec
    dispatched: AtomicU64,

    /// Codec writes that completed successfully
    written: AtomicU64,

    /// Codec encodes that returned an error
    encode_failures: AtomicU64,

    /// Codec writes that returned an error
    write_failures: AtomicU64,

    /// Codec encodes or writes that panicked
    panics: AtomicU64,
}

impl DispatchMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            written: AtomicU64::new(0),
            encode_failures: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn encode_failures(&self) -> u64 {
        self.encode_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn panics(&self) -> u64 {
        self.panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_encode_failure(&self) -> u64 {
        self.encode_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_panic(&self) -> u64 {
        self.panics.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of codec operations that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written or has failed yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = (self.encode_failures() + self.write_failures() + self.panics()) as f64;
        let total = self.written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.encode_failures.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.panics.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched()),
            written: AtomicU64::new(self.written()),
            encode_failures: AtomicU64::new(self.encode_failures()),
            write_failures: AtomicU64::new(self.write_failures()),
            panics: AtomicU64::new(self.panics()),
        }
    }
}
