//! Run statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by concurrent row tasks.
#[derive(Debug, Default)]
pub(super) struct RunStats {
    tiles_written: AtomicU64,
    cache_hits: AtomicU64,
    downloads: AtomicU64,
    skipped: AtomicU64,
}

impl RunStats {
    pub(super) fn record_tile_written(&self) {
        self.tiles_written.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_download(&self) {
        self.downloads.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn snapshot(&self) -> RunSummary {
        RunSummary {
            tiles_written: self.tiles_written.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            downloads: self.downloads.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Outcome counts for one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Tiles decoded and written to the output tree this run.
    pub tiles_written: u64,

    /// Tiles resolved from the encoded-byte cache.
    pub cache_hits: u64,

    /// Network fetches issued.
    pub downloads: u64,

    /// Tiles skipped because the download budget ran out. A rerun with
    /// a fresh budget will pick these up.
    pub skipped: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles written ({} downloaded, {} from cache), {} skipped downloads outstanding",
            self.tiles_written, self.downloads, self.cache_hits, self.skipped
        )
    }
}
