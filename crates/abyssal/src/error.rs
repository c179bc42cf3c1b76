//! # Pipeline Error Types
//!
//! Everything that can stop a pipeline run. All of them are fatal: the run
//! is single-shot and nothing is retried.

use thiserror::Error;

use abyssal_volume::VolumeError;

/// Errors that can occur while running the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A volume precondition failed.
    #[error(transparent)]
    Volume(#[from] VolumeError),

    /// Reading the config or writing output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The config parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Encoding or writing a slice preview failed.
    #[error("slice image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
