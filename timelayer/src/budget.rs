//! Per-run download budget.
//!
//! A ceiling on the number of network fetches permitted in one run,
//! shared by all concurrent row tasks. The budget is advisory: it
//! limits fetch count, it does not pace or block I/O. Cache hits never
//! consume budget.

use std::sync::atomic::{AtomicU32, Ordering};

/// Monotonically decreasing fetch quota with a floor at zero.
#[derive(Debug)]
pub struct DownloadBudget {
    remaining: AtomicU32,
}

impl DownloadBudget {
    /// Creates a budget permitting `limit` fetches.
    pub fn new(limit: u32) -> Self {
        Self {
            remaining: AtomicU32::new(limit),
        }
    }

    /// Attempts to reserve one fetch.
    ///
    /// Compare-and-decrement, so concurrent tasks can never overcommit
    /// the quota: exactly `limit` acquisitions succeed over the life of
    /// the budget.
    pub fn try_acquire(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Fetches still permitted.
    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::SeqCst)
    }
}
