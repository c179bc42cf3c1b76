//! # ABYSSAL
//!
//! Runs the volume pipeline once and exits.
//!
//! ```bash
//! # Default run, no config file
//! ./abyssal
//!
//! # Custom run
//! ./abyssal config/abyssal.toml
//!
//! # Per-sweep tracing
//! RUST_LOG=abyssal_volume=trace ./abyssal
//! ```

use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use abyssal::{NullSliceSink, Pipeline, PipelineConfig, PngSliceSink, SliceSink};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => PipelineConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            tracing::info!("No config given, using defaults");
            let config = PipelineConfig::default();
            config.validate().context("default config")?;
            config
        }
    };

    let mut sink: Box<dyn SliceSink> = if config.output.slices {
        Box::new(
            PngSliceSink::new(&config.output.directory, &config.output.prefix)
                .with_range(config.output.display_range),
        )
    } else {
        Box::new(NullSliceSink)
    };

    let pipeline = Pipeline::new(config).context("invalid config")?;
    let report = pipeline.run(sink.as_mut()).context("pipeline run failed")?;

    tracing::info!(
        "Wrote {} bytes to {} (noise max {:.3}, next frame {})",
        report.bytes_written,
        report.export_path.display(),
        report.noise_max,
        report.next_frame
    );

    Ok(())
}
