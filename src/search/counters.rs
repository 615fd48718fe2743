//! Shared scalars read across tasks.
//!
//! Everything else the search owns (frontier, dedup set) belongs to the frontier manager alone;
//! these three values are the only state other tasks can observe directly.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub struct SearchCounters {
    processed: AtomicU64,
    duplicates: AtomicU64,
    bound: AtomicU32,
}

/// Point-in-time copy of [`SearchCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCounts {
    pub processed: u64,
    pub duplicates: u64,
    pub bound: u32,
}

impl SearchCounters {
    pub fn new(initial_bound: u32) -> Self {
        Self {
            processed: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            bound: AtomicU32::new(initial_bound),
        }
    }

    /// Best solved score so far (or the initial bound). May be stale for readers.
    #[inline]
    pub fn bound(&self) -> u32 {
        self.bound.load(Ordering::Acquire)
    }

    /// Lower the bound to `score` if it is strictly better. Returns whether it moved.
    ///
    /// Only the frontier manager writes the bound, so successive writes are strictly decreasing.
    #[inline]
    pub fn tighten_bound(&self, score: u32) -> bool {
        score < self.bound.fetch_min(score, Ordering::AcqRel)
    }

    #[inline]
    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    pub fn counts(&self) -> SearchCounts {
        SearchCounts {
            processed: self.processed(),
            duplicates: self.duplicates(),
            bound: self.bound(),
        }
    }
}
