//! Shared scrape counters for the GET health probe.
//! Updated by `Scraper` after every fetch + extract cycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

#[derive(Default)]
pub struct HealthState {
    /// Cycles that produced a parsed page.
    cycles: AtomicU64,
    /// Cycles that failed at the fetch stage.
    failures: AtomicU64,
    records_kept: AtomicU64,
    /// Containers dropped for a missing code or title.
    records_skipped: AtomicU64,
    /// Unix seconds of the last completed cycle (0 = none).
    last_cycle_at: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthSnapshot {
    pub cycles: u64,
    pub failures: u64,
    pub records_kept: u64,
    pub records_skipped: u64,
    pub last_cycle_at: Option<u64>,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&self, kept: usize, skipped: usize) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        self.records_kept.fetch_add(kept as u64, Ordering::Relaxed);
        self.records_skipped.fetch_add(skipped as u64, Ordering::Relaxed);
        self.last_cycle_at.store(now_secs(), Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.last_cycle_at.store(now_secs(), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        let last = self.last_cycle_at.load(Ordering::Relaxed);
        HealthSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            records_kept: self.records_kept.load(Ordering::Relaxed),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
            last_cycle_at: (last != 0).then_some(last),
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
