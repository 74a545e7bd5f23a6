//! Timelayer - historical satellite tile reconstruction
//!
//! Rebuilds a raster tile pyramid from an archived tile service: given
//! a bounding box and zoom range, it computes the covering tile grid,
//! fetches each tile's encoded bytes (with on-disk caching and a
//! per-run download budget), reverses the archive's keyed XOR
//! transform, and materializes image files in an XYZ directory layout.
//!
//! The interesting parts are [`quadtree`], the recursive quadrant
//! addressing scheme the archive names tiles by, and [`cipher`], the
//! byte-stream transform its payloads are wrapped in. Both reproduce
//! reverse-engineered protocol behavior exactly. Everything else is
//! orchestration around them; [`pipeline::TilePipeline`] drives a run
//! end to end.

pub mod budget;
pub mod cache;
pub mod cipher;
pub mod config;
pub mod coord;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod quadtree;

pub use budget::DownloadBudget;
pub use cipher::KeyMaterial;
pub use config::PipelineConfig;
pub use coord::BoundingBox;
pub use pipeline::{PipelineError, RunSummary, TilePipeline};
