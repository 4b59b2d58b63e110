//! Lightweight evaluation instrumentation.
//!
//! `EvalCounters` is owned by whoever runs evaluations (normally the selection
//! service) and is updated through [`EvalCounters::instrument`], which wraps a
//! single evaluation call without the evaluation knowing about it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Elapsed time in seconds.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn elapsed_ns(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Outcome classification reported by an instrumented call.
pub trait CountedOutcome {
    /// `true` when the evaluation produced a usable result.
    fn is_success(&self) -> bool;
}

/// Accumulating counters for evaluation calls.
#[derive(Debug, Default)]
pub struct EvalCounters {
    calls: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    cache_hits: AtomicU64,
    total_ns: AtomicU64,
}

/// Point-in-time copy of [`EvalCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    pub calls: u64,
    pub successes: u64,
    pub failures: u64,
    pub cache_hits: u64,
    pub total_seconds: f64,
}

impl MetricsSnapshot {
    /// Average time per computed (non-cached) call, in seconds.
    pub fn average_seconds(&self) -> f64 {
        if self.calls > 0 {
            self.total_seconds / self.calls as f64
        } else {
            0.0
        }
    }
}

impl EvalCounters {
    pub const fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            total_ns: AtomicU64::new(0),
        }
    }

    /// Run `f`, recording its duration and whether it succeeded.
    pub fn instrument<T, F>(&self, f: F) -> T
    where
        T: CountedOutcome,
        F: FnOnce() -> T,
    {
        let timer = Timer::start("evaluation");
        let out = f();
        self.total_ns.fetch_add(timer.elapsed_ns(), Ordering::Relaxed);
        self.calls.fetch_add(1, Ordering::Relaxed);
        if out.is_success() {
            self.successes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        out
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            total_seconds: self.total_ns.load(Ordering::Relaxed) as f64 / 1e9,
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.successes.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.total_ns.store(0, Ordering::Relaxed);
    }
}
