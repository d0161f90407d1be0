//! Admission and conversion counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Relaxed atomics; readers tolerate slightly stale values

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::admission::AdmissionError;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    admission_requests: AtomicU64,
    admitted: AtomicU64,
    rejected_not_ready: AtomicU64,
    rejected_size_conflict: AtomicU64,
    rejected_unknown_topping: AtomicU64,
    invalid_objects: AtomicU64,
    conversions: AtomicU64,
    conversion_failures: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_admission_requests(&self) {
        self.admission_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a rejection under its reason
    pub fn record_rejection(&self, err: &AdmissionError) {
        let counter = match err {
            AdmissionError::NotReady { .. } => &self.rejected_not_ready,
            AdmissionError::SizeConflict { .. } => &self.rejected_size_conflict,
            AdmissionError::UnknownTopping { .. } => &self.rejected_unknown_topping,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_invalid_objects(&self) {
        self.invalid_objects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_conversions(&self) {
        self.conversions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_conversion_failures(&self) {
        self.conversion_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            admission_requests: self.admission_requests.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            rejected_not_ready: self.rejected_not_ready.load(Ordering::Relaxed),
            rejected_size_conflict: self.rejected_size_conflict.load(Ordering::Relaxed),
            rejected_unknown_topping: self.rejected_unknown_topping.load(Ordering::Relaxed),
            invalid_objects: self.invalid_objects.load(Ordering::Relaxed),
            conversions: self.conversions.load(Ordering::Relaxed),
            conversion_failures: self.conversion_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub admission_requests: u64,
    pub admitted: u64,
    pub rejected_not_ready: u64,
    pub rejected_size_conflict: u64,
    pub rejected_unknown_topping: u64,
    pub invalid_objects: u64,
    pub conversions: u64,
    pub conversion_failures: u64,
}

impl MetricsSnapshot {
    /// Total rejected writes across reasons
    pub fn rejected(&self) -> u64 {
        self.rejected_not_ready + self.rejected_size_conflict + self.rejected_unknown_topping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::ResourceKind;

    #[test]
    fn test_new_registry_is_zero() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_rejections_counted_by_reason() {
        let metrics = MetricsRegistry::new();
        metrics.record_rejection(&AdmissionError::NotReady {
            kind: ResourceKind::Pizza,
            name: "p".into(),
        });
        metrics.record_rejection(&AdmissionError::SizeConflict {
            kind: ResourceKind::Pizza,
            name: "p".into(),
            size: "S".into(),
            existing: "q".into(),
        });
        metrics.record_rejection(&AdmissionError::UnknownPlugin("Nope".into()));

        let snap = metrics.snapshot();
        assert_eq!(snap.rejected_not_ready, 1);
        assert_eq!(snap.rejected_size_conflict, 1);
        assert_eq!(snap.rejected(), 2);
    }
}
