//! Tile reconstruction pipeline.
//!
//! Drives the whole run: enumerates the tile grid for each zoom level,
//! resolves each tile's encoded bytes (output check → cache → budgeted
//! fetch), decodes them, and writes the XYZ output tree.
//!
//! # Concurrency
//!
//! Columns are processed strictly sequentially. Within a column, one
//! task per row is spawned on a [`JoinSet`] and the column does not
//! advance until every row task has finished. The first failing task
//! aborts the run; dropping the `JoinSet` abandons any in-flight
//! siblings. The download budget is the only state shared across row
//! tasks and is decremented atomically, so it never blocks I/O.
//!
//! # Resumability
//!
//! There is no in-run recovery. A rerun after a crash or an exhausted
//! budget picks up where it left off purely through existence checks:
//! decoded tiles are skipped outright, cached assets are not refetched.

mod summary;

pub use summary::RunSummary;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::budget::DownloadBudget;
use crate::cache::{CacheError, TileCache};
use crate::cipher::{decode, KeyMaterial};
use crate::config::PipelineConfig;
use crate::coord::{BoundingBox, GridCell, GridSpan, TileCoord};
use crate::provider::{AsyncHttpClient, FlatfileProvider, ProviderError};
use crate::quadtree::address_for;
use summary::RunStats;

/// Errors that abort a pipeline run.
#[derive(Debug)]
pub enum PipelineError {
    /// Failed to create a directory in the output tree.
    OutputTree {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Cache read or write failed.
    Cache(CacheError),

    /// Network fetch failed; no retry exists.
    Fetch(ProviderError),

    /// Failed to write a decoded output tile.
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A row task panicked or was cancelled.
    TaskJoin(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::OutputTree { path, source } => {
                write!(
                    f,
                    "Failed to create output directory {}: {}",
                    path.display(),
                    source
                )
            }
            PipelineError::Cache(e) => write!(f, "Cache error: {}", e),
            PipelineError::Fetch(e) => write!(f, "Download failed: {}", e),
            PipelineError::OutputWrite { path, source } => {
                write!(f, "Failed to write tile {}: {}", path.display(), source)
            }
            PipelineError::TaskJoin(msg) => write!(f, "Tile task failed: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::OutputTree { source, .. } => Some(source),
            PipelineError::Cache(e) => Some(e),
            PipelineError::Fetch(e) => Some(e),
            PipelineError::OutputWrite { source, .. } => Some(source),
            PipelineError::TaskJoin(_) => None,
        }
    }
}

impl From<CacheError> for PipelineError {
    fn from(e: CacheError) -> Self {
        PipelineError::Cache(e)
    }
}

impl From<ProviderError> for PipelineError {
    fn from(e: ProviderError) -> Self {
        PipelineError::Fetch(e)
    }
}

/// The reconstruction pipeline for one run.
///
/// Generic over the HTTP client so tests can run against a mock
/// transport. Internally reference-counted; row tasks share one
/// instance of all components.
pub struct TilePipeline<C: AsyncHttpClient> {
    inner: Arc<Inner<C>>,
}

struct Inner<C: AsyncHttpClient> {
    provider: FlatfileProvider<C>,
    cache: TileCache,
    budget: DownloadBudget,
    key: KeyMaterial,
    bounds: BoundingBox,
    zoom_start: u8,
    zoom_end: u8,
    output_root: PathBuf,
    stats: RunStats,
}

impl<C: AsyncHttpClient + 'static> TilePipeline<C> {
    /// Creates a pipeline, opening the cache directory.
    ///
    /// Failure to create the output tree's cache directory aborts
    /// before any tile work, matching the configuration-fatal class of
    /// errors.
    pub fn new(
        config: PipelineConfig,
        key: KeyMaterial,
        http_client: C,
    ) -> Result<Self, PipelineError> {
        let cache = TileCache::open(config.cache_dir())?;
        let provider = FlatfileProvider::new(http_client, config.version, config.time_code)
            .with_url_base(config.url_base);

        Ok(Self {
            inner: Arc::new(Inner {
                provider,
                cache,
                budget: DownloadBudget::new(config.download_limit),
                key,
                bounds: config.bounds,
                zoom_start: config.zoom_start,
                zoom_end: config.zoom_end,
                output_root: config.output_root,
                stats: RunStats::default(),
            }),
        })
    }

    /// Runs the full reconstruction.
    ///
    /// Processes every zoom level in the configured range. Returns the
    /// run summary on success; the first fatal error aborts the run,
    /// leaving whatever was already persisted in place for the next
    /// invocation to resume from.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        for zoom in self.inner.zoom_start..=self.inner.zoom_end {
            let span = GridSpan::compute(&self.inner.bounds, zoom);
            info!(
                zoom,
                cols = span.col_count,
                rows = span.row_count,
                x_tile_start = span.x_tile_start,
                y_tile_start = span.y_tile_start,
                total = span.tile_count(),
                "processing zoom level"
            );

            for col in 0..span.col_count {
                let mut tasks = JoinSet::new();

                for row in 0..span.row_count {
                    let inner = Arc::clone(&self.inner);
                    tasks.spawn(async move {
                        inner.process_tile(&span, GridCell { col, row }).await
                    });
                }

                // Fan-in: the column completes only when every row task
                // has; the first error wins and the rest are abandoned
                while let Some(joined) = tasks.join_next().await {
                    match joined {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => return Err(e),
                        Err(e) => return Err(PipelineError::TaskJoin(e.to_string())),
                    }
                }
            }
        }

        let summary = self.inner.stats.snapshot();
        info!(
            tiles_written = summary.tiles_written,
            cache_hits = summary.cache_hits,
            downloads = summary.downloads,
            skipped = summary.skipped,
            "run complete"
        );
        Ok(summary)
    }
}

impl<C: AsyncHttpClient> Inner<C> {
    /// Output path for a decoded tile: `<root>/<zoom>/<x>/<y>.jpg`.
    fn output_path(&self, tile: TileCoord) -> PathBuf {
        self.output_root
            .join(tile.zoom.to_string())
            .join(tile.x.to_string())
            .join(format!("{}.jpg", tile.y))
    }

    async fn process_tile(&self, span: &GridSpan, cell: GridCell) -> Result<(), PipelineError> {
        let tile = span.tile_coord(cell);
        let out_path = self.output_path(tile);

        // A decoded tile is permanently complete; skip all other work
        if tokio::fs::try_exists(&out_path).await.unwrap_or(false) {
            debug!(tile = %tile, "tile already decoded, skipping");
            return Ok(());
        }

        let (lat, lon) = span.cell_origin(cell);
        let address = address_for(lat, lon, span.zoom);
        let asset = self.provider.asset_name(&address);

        let encoded = if self.cache.contains(&asset).await {
            debug!(tile = %tile, asset = %asset, "tile already downloaded");
            self.stats.record_cache_hit();
            self.cache.read(&asset).await?
        } else if self.budget.try_acquire() {
            info!(tile = %tile, url = %self.provider.tile_url(&asset), "downloading tile");
            let bytes = self.provider.fetch_encoded(&address).await?;
            self.cache.write(&asset, &bytes).await?;
            self.stats.record_download();
            bytes
        } else {
            debug!(tile = %tile, "download budget exhausted, skipping");
            self.stats.record_skipped();
            return Ok(());
        };

        let tile_dir = self
            .output_root
            .join(tile.zoom.to_string())
            .join(tile.x.to_string());
        tokio::fs::create_dir_all(&tile_dir)
            .await
            .map_err(|source| PipelineError::OutputTree {
                path: tile_dir,
                source,
            })?;

        let mut data = encoded;
        decode(&mut data, &self.key);

        tokio::fs::write(&out_path, &data)
            .await
            .map_err(|source| PipelineError::OutputWrite {
                path: out_path.clone(),
                source,
            })?;

        self.stats.record_tile_written();
        debug!(tile = %tile, path = %out_path.display(), "tile decoded and saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::MIN_KEY_LEN;
    use crate::provider::tests::MockAsyncHttpClient;
    use tempfile::TempDir;

    fn test_key() -> KeyMaterial {
        KeyMaterial::from_bytes(vec![0u8; MIN_KEY_LEN]).unwrap()
    }

    fn test_config(out: &TempDir) -> PipelineConfig {
        let bounds = BoundingBox::new(0.0, 40.0, 10.0, 0.0);
        PipelineConfig::new(bounds, 4, out.path().join("out"))
    }

    #[test]
    fn test_new_creates_cache_dir() {
        let out = TempDir::new().unwrap();
        let client = MockAsyncHttpClient {
            response: Ok(vec![]),
        };
        let _pipeline = TilePipeline::new(test_config(&out), test_key(), client).unwrap();

        assert!(out.path().join("out/cache").is_dir());
    }

    #[test]
    fn test_output_path_layout() {
        let out = TempDir::new().unwrap();
        let client = MockAsyncHttpClient {
            response: Ok(vec![]),
        };
        let pipeline = TilePipeline::new(test_config(&out), test_key(), client).unwrap();

        let path = pipeline.inner.output_path(TileCoord {
            x: 9,
            y: 8,
            zoom: 4,
        });
        assert_eq!(path, out.path().join("out").join("4").join("9").join("8.jpg"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal() {
        let out = TempDir::new().unwrap();
        let client = MockAsyncHttpClient {
            response: Err(ProviderError::HttpStatus {
                status: 404,
                url: "x".to_string(),
            }),
        };
        let pipeline = TilePipeline::new(test_config(&out), test_key(), client).unwrap();

        let result = pipeline.run().await;
        assert!(matches!(result, Err(PipelineError::Fetch(_))));
    }
}
