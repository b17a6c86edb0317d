//! Process-wide activity counters
//!
//! Collected by the service and reported by the health endpoint. Counters
//! only cover the lifetime of the current process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

/// Lock-free counters shared by every request
#[derive(Debug)]
pub struct ActivityCounters {
    started_at: Instant,
    submissions: AtomicU64,
    mutations: AtomicU64,
    flushes: AtomicU64,
    flush_failures: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivitySnapshot {
    pub submissions_since_start: u64,
    pub mutations_since_start: u64,
    pub flushes: u64,
    pub flush_failures: u64,
    pub uptime_seconds: u64,
}

impl ActivityCounters {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            submissions: AtomicU64::new(0),
            mutations: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
        }
    }

    pub fn record_submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a committed mutation (submission, reset or purge)
    pub fn record_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_flush(&self, ok: bool) {
        if ok {
            self.flushes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.flush_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> ActivitySnapshot {
        ActivitySnapshot {
            submissions_since_start: self.submissions.load(Ordering::Relaxed),
            mutations_since_start: self.mutations.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }
}

impl Default for ActivityCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let counters = ActivityCounters::new();
        counters.record_submission();
        counters.record_mutation();
        counters.record_flush(true);
        counters.record_flush(false);
        counters.record_flush(true);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.submissions_since_start, 1);
        assert_eq!(snapshot.mutations_since_start, 1);
        assert_eq!(snapshot.flushes, 2);
        assert_eq!(snapshot.flush_failures, 1);
    }
}
