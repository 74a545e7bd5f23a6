//! Disk cache for encoded tile payloads.
//!
//! Raw (still-encoded) tile bytes are persisted under the asset name so
//! an interrupted run can resume without refetching. Entries are
//! immutable once written: a hit is trusted indefinitely, with no
//! freshness checks, and existing entries are never overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to create the cache directory.
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O error reading or writing a cache entry.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk cache of encoded tile payloads, one file per asset.
#[derive(Debug, Clone)]
pub struct TileCache {
    root: PathBuf,
}

impl TileCache {
    /// Opens the cache, creating its directory if needed.
    ///
    /// Directory creation failure is fatal to the run, so it surfaces
    /// here rather than lazily at first write.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| CacheError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Returns the on-disk path for an asset.
    pub fn path_for(&self, asset_name: &str) -> PathBuf {
        self.root.join(asset_name)
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Checks whether an asset is already cached.
    pub async fn contains(&self, asset_name: &str) -> bool {
        tokio::fs::try_exists(self.path_for(asset_name))
            .await
            .unwrap_or(false)
    }

    /// Reads a cached asset's bytes.
    pub async fn read(&self, asset_name: &str) -> Result<Vec<u8>, CacheError> {
        let bytes = tokio::fs::read(self.path_for(asset_name)).await?;
        debug!(asset = asset_name, len = bytes.len(), "cache read");
        Ok(bytes)
    }

    /// Persists an asset's bytes.
    ///
    /// Callers check [`contains`](Self::contains) first; entries are
    /// created once and never rewritten.
    pub async fn write(&self, asset_name: &str, bytes: &[u8]) -> Result<(), CacheError> {
        tokio::fs::write(self.path_for(asset_name), bytes).await?;
        debug!(asset = asset_name, len = bytes.len(), "cache write");
        Ok(())
    }
}
