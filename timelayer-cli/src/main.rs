//! Timelayer CLI - Command-line interface
//!
//! Reconstructs a historical tile pyramid for a bounding box and zoom
//! range, writing decoded tiles to an XYZ output tree.

mod error;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use timelayer::cipher::KeyMaterial;
use timelayer::config::{DEFAULT_DOWNLOAD_LIMIT, DEFAULT_TIME_CODE, DEFAULT_VERSION};
use timelayer::logging::{default_log_dir, default_log_file, init_logging};
use timelayer::provider::AsyncReqwestClient;
use timelayer::{BoundingBox, PipelineConfig, TilePipeline};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "timelayer")]
#[command(about = "Reconstruct historical satellite tiles from an archived tile service", long_about = None)]
struct Args {
    /// Western edge of the bounding box, in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    left: f64,

    /// Eastern edge of the bounding box, in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    right: f64,

    /// Northern edge of the bounding box, in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    top: f64,

    /// Southern edge of the bounding box, in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    bottom: f64,

    /// First zoom level to reconstruct
    #[arg(long, default_value = "20")]
    zoom_start: u8,

    /// Last zoom level to reconstruct, inclusive (defaults to zoom-start)
    #[arg(long)]
    zoom_end: Option<u8>,

    /// Protocol version string captured from archive HTTP calls
    #[arg(long, default_value = DEFAULT_VERSION)]
    db_version: String,

    /// Time code captured from the end of archive HTTP calls
    #[arg(long, default_value = DEFAULT_TIME_CODE)]
    time_code: String,

    /// Maximum number of tile downloads for this run
    #[arg(long, default_value_t = DEFAULT_DOWNLOAD_LIMIT)]
    download_limit: u32,

    /// Output directory root (tiles land at <output>/<zoom>/<x>/<y>.jpg)
    #[arg(long, default_value = "out")]
    output: PathBuf,

    /// Path to the decoding key blob
    #[arg(long, default_value = "dbRoot.v5")]
    key_file: PathBuf,

    /// Override the archive endpoint base URL
    #[arg(long)]
    url_base: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let _guard = init_logging(default_log_dir(), default_log_file())
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    // Key material loads before any tile work; failure aborts the run
    let key = KeyMaterial::load(&args.key_file).map_err(CliError::KeyLoad)?;
    info!(key_file = %args.key_file.display(), key_len = key.len(), "key material loaded");

    let bounds = BoundingBox::new(args.left, args.right, args.top, args.bottom);
    let zoom_end = args.zoom_end.unwrap_or(args.zoom_start);

    let mut config = PipelineConfig::new(bounds, args.zoom_start, args.output)
        .with_zoom_range(args.zoom_start, zoom_end)
        .with_version(args.db_version)
        .with_time_code(args.time_code)
        .with_download_limit(args.download_limit);
    if let Some(url_base) = args.url_base {
        config = config.with_url_base(url_base);
    }

    let client = AsyncReqwestClient::new().map_err(CliError::HttpClient)?;
    let pipeline = TilePipeline::new(config, key, client)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::RuntimeCreation(e.to_string()))?;

    let summary = runtime.block_on(pipeline.run())?;
    println!("{}", summary);

    Ok(())
}
