//! Observability metrics for the admission gate.
//!
//! All counters use atomic operations for thread-safe updates and reads,
//! and can be queried at any time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking admission outcomes.
#[derive(Debug, Clone)]
pub struct GateMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Loads accepted and committed to the ledger
    loads_accepted: AtomicU64,
    /// Loads rejected by a velocity rule
    loads_rejected: AtomicU64,
    /// Requests refused before reaching the ledger
    requests_malformed: AtomicU64,
}

impl GateMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                loads_accepted: AtomicU64::new(0),
                loads_rejected: AtomicU64::new(0),
                requests_malformed: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_accepted(&self) {
        self.inner.loads_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.inner.loads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_malformed(&self) {
        self.inner.requests_malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Total loads accepted.
    pub fn loads_accepted(&self) -> u64 {
        self.inner.loads_accepted.load(Ordering::Relaxed)
    }

    /// Total loads rejected by a rule.
    pub fn loads_rejected(&self) -> u64 {
        self.inner.loads_rejected.load(Ordering::Relaxed)
    }

    /// Total requests refused during normalization.
    pub fn requests_malformed(&self) -> u64 {
        self.inner.requests_malformed.load(Ordering::Relaxed)
    }

    /// Get a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            loads_accepted: self.loads_accepted(),
            loads_rejected: self.loads_rejected(),
            requests_malformed: self.requests_malformed(),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.inner.loads_accepted.store(0, Ordering::Relaxed);
        self.inner.loads_rejected.store(0, Ordering::Relaxed);
        self.inner.requests_malformed.store(0, Ordering::Relaxed);
    }
}

impl Default for GateMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of gate metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub loads_accepted: u64,
    pub loads_rejected: u64,
    pub requests_malformed: u64,
}

impl MetricsSnapshot {
    /// Total loads that reached a rule decision.
    pub fn total_decisions(&self) -> u64 {
        self.loads_accepted.saturating_add(self.loads_rejected)
    }

    /// Ratio of accepted loads to decided loads, 0.0 when nothing decided.
    pub fn acceptance_rate(&self) -> f64 {
        let total = self.total_decisions();
        if total == 0 {
            0.0
        } else {
            self.loads_accepted as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = GateMetrics::new();
        metrics.record_accepted();
        metrics.record_accepted();
        metrics.record_rejected();
        metrics.record_malformed();

        assert_eq!(metrics.loads_accepted(), 2);
        assert_eq!(metrics.loads_rejected(), 1);
        assert_eq!(metrics.requests_malformed(), 1);
    }

    #[test]
    fn test_snapshot_and_rate() {
        let metrics = GateMetrics::new();
        metrics.record_accepted();
        metrics.record_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_decisions(), 2);
        assert!((snapshot.acceptance_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_rate_is_zero() {
        assert_eq!(GateMetrics::new().snapshot().acceptance_rate(), 0.0);
    }

    #[test]
    fn test_reset() {
        let metrics = GateMetrics::new();
        metrics.record_accepted();
        metrics.reset();
        assert_eq!(metrics.loads_accepted(), 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = GateMetrics::new();
        let clone = metrics.clone();
        clone.record_accepted();
        assert_eq!(metrics.loads_accepted(), 1);
    }
}
