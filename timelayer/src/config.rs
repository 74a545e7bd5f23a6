//! Pipeline configuration.
//!
//! All knobs for one reconstruction run: the bounding box, the zoom
//! range, the protocol identifiers captured from the archive, the
//! download ceiling, and the output root. Values are supplied by the
//! caller and trusted as-is; the core performs no validation beyond
//! what its own invariants require.

use std::path::PathBuf;

use crate::coord::BoundingBox;
use crate::provider::DEFAULT_URL_BASE;

/// Default protocol version string, as observed in archive HTTP calls.
pub const DEFAULT_VERSION: &str = "i.342";

/// Default time code, as observed at the end of archive HTTP calls.
pub const DEFAULT_TIME_CODE: &str = "fc361";

/// Default per-run download ceiling.
pub const DEFAULT_DOWNLOAD_LIMIT: u32 = 386;

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Geographic area to reconstruct.
    pub bounds: BoundingBox,

    /// First zoom level to materialize.
    pub zoom_start: u8,

    /// Last zoom level to materialize (inclusive).
    pub zoom_end: u8,

    /// Protocol version string used in asset names.
    pub version: String,

    /// Time code string used in asset names.
    pub time_code: String,

    /// Maximum network fetches for this run.
    pub download_limit: u32,

    /// Root of the output tree; the cache lives at `<root>/cache`.
    pub output_root: PathBuf,

    /// Archive endpoint base URL.
    pub url_base: String,
}

impl PipelineConfig {
    /// Creates a config for a single zoom level with default protocol
    /// identifiers and download ceiling.
    pub fn new(bounds: BoundingBox, zoom: u8, output_root: impl Into<PathBuf>) -> Self {
        Self {
            bounds,
            zoom_start: zoom,
            zoom_end: zoom,
            version: DEFAULT_VERSION.to_string(),
            time_code: DEFAULT_TIME_CODE.to_string(),
            download_limit: DEFAULT_DOWNLOAD_LIMIT,
            output_root: output_root.into(),
            url_base: DEFAULT_URL_BASE.to_string(),
        }
    }

    /// Sets an inclusive zoom range.
    pub fn with_zoom_range(mut self, start: u8, end: u8) -> Self {
        self.zoom_start = start;
        self.zoom_end = end;
        self
    }

    /// Sets the protocol version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the time code string.
    pub fn with_time_code(mut self, time_code: impl Into<String>) -> Self {
        self.time_code = time_code.into();
        self
    }

    /// Sets the per-run download ceiling.
    pub fn with_download_limit(mut self, limit: u32) -> Self {
        self.download_limit = limit;
        self
    }

    /// Sets the archive endpoint base URL.
    pub fn with_url_base(mut self, url_base: impl Into<String>) -> Self {
        self.url_base = url_base.into();
        self
    }

    /// Directory holding encoded tile cache entries.
    pub fn cache_dir(&self) -> PathBuf {
        self.output_root.join("cache")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> BoundingBox {
        BoundingBox::new(151.1943, 151.2123, -33.8667, -33.8786)
    }

    #[test]
    fn test_new_defaults() {
        let config = PipelineConfig::new(bounds(), 20, "out");

        assert_eq!(config.zoom_start, 20);
        assert_eq!(config.zoom_end, 20);
        assert_eq!(config.version, "i.342");
        assert_eq!(config.time_code, "fc361");
        assert_eq!(config.download_limit, 386);
        assert_eq!(config.cache_dir(), PathBuf::from("out/cache"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::new(bounds(), 20, "out")
            .with_zoom_range(4, 12)
            .with_version("i.100")
            .with_time_code("ab123")
            .with_download_limit(10)
            .with_url_base("http://localhost/flatfile?db=tm");

        assert_eq!(config.zoom_start, 4);
        assert_eq!(config.zoom_end, 12);
        assert_eq!(config.version, "i.100");
        assert_eq!(config.time_code, "ab123");
        assert_eq!(config.download_limit, 10);
        assert!(config.url_base.starts_with("http://localhost/"));
    }
}
