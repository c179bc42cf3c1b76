//! # ABYSSAL
//!
//! The pipeline driver: turns one TOML config into one voxel file.
//!
//! ## Stages
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         ABYSSAL PIPELINE                            │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐   │
//! │  │ config.rs    │───>│ pipeline.rs  │───>│ output.rs            │   │
//! │  │              │    │              │    │                      │   │
//! │  │ • TOML       │    │ • noise      │    │ • {prefix}_NNNN.raw  │   │
//! │  │ • defaults   │    │ • diffusion  │    └──────────────────────┘   │
//! │  │ • validation │    │ • floor/waves│    ┌──────────────────────┐   │
//! │  └──────────────┘    │              │───>│ slice.rs             │   │
//! │                      └──────────────┘    │ • grayscale PNGs     │   │
//! │                                          └──────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: run parameters and their validation
//! - `pipeline`: stage orchestration and the run report
//! - `slice`: preview sinks
//! - `output`: frame-indexed export files

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod slice;

pub use abyssal_volume as volume;

pub use config::{
    DiffusionConfig, DiffusionReference, FloorConfig, NoiseConfig, OutputConfig, PipelineConfig,
    SurfaceConfig, VolumeConfig,
};
pub use error::{PipelineError, PipelineResult};
pub use output::ExportWriter;
pub use pipeline::{Pipeline, RunReport};
pub use slice::{to_gray_levels, NullSliceSink, PngSliceSink, SliceSink};
