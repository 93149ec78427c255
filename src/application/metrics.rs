//! Observability metrics for crash dispatch.
//!
//! Counts how dispatch attempts ended so a management surface can show how
//! many callbacks were collapsed, muted or filtered.

use crate::domain::mode::DispatchOutcome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking dispatch statistics.
///
/// All counters are atomics; cloning shares the same counters.
#[derive(Debug, Clone)]
pub struct DispatchMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Crashes that reached a presentation mode
    crashes_presented: AtomicU64,
    /// Callbacks dropped as duplicates
    duplicates_dropped: AtomicU64,
    /// Crashes dropped because the package was muted
    muted_dropped: AtomicU64,
    /// Crashes dropped by front-only or main-only filters
    policy_dropped: AtomicU64,
    /// Dialog launches that fell back to a notification
    dialog_fallbacks: AtomicU64,
    /// Crashes of this crate's own package
    self_crashes: AtomicU64,
    /// Panics caught inside the dispatch path
    internal_failures: AtomicU64,
}

impl DispatchMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    /// Record the terminal state of one dispatch.
    pub(crate) fn record_outcome(&self, outcome: DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::AbortDuplicate => &self.inner.duplicates_dropped,
            DispatchOutcome::AbortMuted => &self.inner.muted_dropped,
            DispatchOutcome::AbortPolicy(_) => &self.inner.policy_dropped,
            DispatchOutcome::ModeSelected(_) => &self.inner.crashes_presented,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dialog launch that fell back to a notification.
    pub(crate) fn record_dialog_fallback(&self) {
        self.inner.dialog_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a crash of the dispatcher's own package.
    pub(crate) fn record_self_crash(&self) {
        self.inner.self_crashes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a panic caught in the dispatch path.
    pub(crate) fn record_internal_failure(&self) {
        self.inner.internal_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the number of crashes that reached a presentation mode.
    pub fn crashes_presented(&self) -> u64 {
        self.inner.crashes_presented.load(Ordering::Relaxed)
    }

    /// Get the number of duplicate callbacks dropped.
    pub fn duplicates_dropped(&self) -> u64 {
        self.inner.duplicates_dropped.load(Ordering::Relaxed)
    }

    /// Get the number of muted crashes dropped.
    pub fn muted_dropped(&self) -> u64 {
        self.inner.muted_dropped.load(Ordering::Relaxed)
    }

    /// Get the number of crashes dropped by visibility filters.
    pub fn policy_dropped(&self) -> u64 {
        self.inner.policy_dropped.load(Ordering::Relaxed)
    }

    /// Get the number of dialog fallbacks.
    pub fn dialog_fallbacks(&self) -> u64 {
        self.inner.dialog_fallbacks.load(Ordering::Relaxed)
    }

    /// Get the number of self crashes.
    pub fn self_crashes(&self) -> u64 {
        self.inner.self_crashes.load(Ordering::Relaxed)
    }

    /// Get the number of caught internal failures.
    pub fn internal_failures(&self) -> u64 {
        self.inner.internal_failures.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> DispatchMetricsSnapshot {
        DispatchMetricsSnapshot {
            crashes_presented: self.crashes_presented(),
            duplicates_dropped: self.duplicates_dropped(),
            muted_dropped: self.muted_dropped(),
            policy_dropped: self.policy_dropped(),
            dialog_fallbacks: self.dialog_fallbacks(),
            self_crashes: self.self_crashes(),
            internal_failures: self.internal_failures(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        for counter in [
            &self.inner.crashes_presented,
            &self.inner.duplicates_dropped,
            &self.inner.muted_dropped,
            &self.inner.policy_dropped,
            &self.inner.dialog_fallbacks,
            &self.inner.self_crashes,
            &self.inner.internal_failures,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of dispatch metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchMetricsSnapshot {
    /// Crashes that reached a presentation mode
    pub crashes_presented: u64,
    /// Duplicate callbacks dropped
    pub duplicates_dropped: u64,
    /// Muted crashes dropped
    pub muted_dropped: u64,
    /// Crashes dropped by visibility filters
    pub policy_dropped: u64,
    /// Dialog launches that fell back to a notification
    pub dialog_fallbacks: u64,
    /// Crashes of the dispatcher's own package
    pub self_crashes: u64,
    /// Panics caught in the dispatch path
    pub internal_failures: u64,
}

impl DispatchMetricsSnapshot {
    /// Total dispatch attempts that reached a terminal state.
    pub fn total_attempts(&self) -> u64 {
        self.crashes_presented
            .saturating_add(self.duplicates_dropped)
            .saturating_add(self.muted_dropped)
            .saturating_add(self.policy_dropped)
    }

    /// Ratio of duplicate callbacks to all attempts (0.0 to 1.0).
    pub fn duplicate_rate(&self) -> f64 {
        let total = self.total_attempts();
        if total == 0 {
            0.0
        } else {
            self.duplicates_dropped as f64 / total as f64
        }
    }
}
