//! Check failure accounting

use serde::Serialize;
use std::iter::Sum;
use std::ops::Add;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    failures: AtomicU64,
    total: AtomicU64,
}

/// Monotonic rate of failed checks.
///
/// Clones share the same counters, so one handle can be given to a virtual
/// user while the harness keeps another to observe it. Samples can only be
/// added, never removed.
#[derive(Debug, Clone, Default)]
pub struct FailureRate {
    counters: Arc<Counters>,
}

impl FailureRate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one check outcome; `failed` is true when the check did not pass.
    pub fn add(&self, failed: bool) {
        self.counters.total.fetch_add(1, Ordering::Relaxed);
        if failed {
            // Release pairs with the Acquire in snapshot(): a visible failure
            // implies its total increment is visible too
            self.counters.failures.fetch_add(1, Ordering::Release);
        }
    }

    pub fn snapshot(&self) -> RateSnapshot {
        let failures = self.counters.failures.load(Ordering::Acquire);
        let total = self.counters.total.load(Ordering::Relaxed);
        RateSnapshot {
            failures: failures.min(total),
            total,
        }
    }
}

/// Point-in-time view of one or more [`FailureRate`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RateSnapshot {
    pub failures: u64,
    pub total: u64,
}

impl RateSnapshot {
    /// Fraction of failed samples, 0.0 when nothing was recorded
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.failures as f64 / self.total as f64
        }
    }

    pub fn passes(&self) -> u64 {
        self.total - self.failures
    }
}

impl Add for RateSnapshot {
    type Output = RateSnapshot;

    fn add(self, rhs: RateSnapshot) -> RateSnapshot {
        RateSnapshot {
            failures: self.failures + rhs.failures,
            total: self.total + rhs.total,
        }
    }
}

impl Sum for RateSnapshot {
    fn sum<I: Iterator<Item = RateSnapshot>>(iter: I) -> Self {
        iter.fold(RateSnapshot::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_rate_counts() {
        let rate = FailureRate::new();
        rate.add(false);
        rate.add(true);
        rate.add(false);
        rate.add(false);

        let snapshot = rate.snapshot();
        assert_eq!(snapshot, RateSnapshot { failures: 1, total: 4 });
        assert_eq!(snapshot.passes(), 3);
        assert!((snapshot.rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_rate_is_zero() {
        assert_eq!(FailureRate::new().snapshot().rate(), 0.0);
    }

    #[test]
    fn test_clones_share_counters() {
        let rate = FailureRate::new();
        let observer = rate.clone();
        rate.add(true);
        assert_eq!(observer.snapshot().failures, 1);
    }

    #[test]
    fn test_snapshots_aggregate() {
        let a = RateSnapshot { failures: 1, total: 10 };
        let b = RateSnapshot { failures: 3, total: 30 };
        let total: RateSnapshot = vec![a, b].into_iter().sum();
        assert_eq!(total, RateSnapshot { failures: 4, total: 40 });
        assert!((total.rate() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let rate = FailureRate::new();
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let rate = rate.clone();
                std::thread::spawn(move || {
                    for i in 0..1000 {
                        rate.add((i + worker) % 4 == 0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = rate.snapshot();
        assert_eq!(snapshot.total, 8000);
        assert_eq!(snapshot.failures, 2000);
    }
}
