//! # Volume Error Types
//!
//! All precondition failures of the volume pipeline. Every one of them is
//! detected before the target grid is touched.

use thiserror::Error;

/// Errors that can occur while building or transforming a volume.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolumeError {
    /// A grid with no cells was requested.
    #[error("volume size must be at least 1")]
    EmptyVolume,

    /// The requested grid holds more cells than memory can address.
    #[error("grid of shape {shape:?} is too large to allocate")]
    GridTooLarge {
        /// Extent along each axis.
        shape: Vec<usize>,
    },

    /// The operation needs at least one interior layer of cells.
    #[error("volume size {size} is too small, need at least {minimum}")]
    VolumeTooSmall {
        /// The offending edge length.
        size: usize,
        /// The smallest edge length the operation accepts.
        minimum: usize,
    },

    /// The current and reference volumes of a diffusion call differ in size.
    #[error("volume size mismatch: expected {expected}, got {actual}")]
    VolumeMismatch {
        /// Edge length of the volume being solved.
        expected: usize,
        /// Edge length of the reference volume.
        actual: usize,
    },

    /// A wave direction had zero (or non-finite) length.
    #[error("wave direction ({x}, {y}) cannot be normalized")]
    ZeroWaveDirection {
        /// X component of the direction.
        x: f64,
        /// Y component of the direction.
        y: f64,
    },

    /// Height map dimensions do not match the volume's first and third axes.
    #[error("height map is {actual:?}, volume needs {expected:?}")]
    HeightMapMismatch {
        /// Dimensions required by the volume.
        expected: (usize, usize),
        /// Dimensions of the height map supplied.
        actual: (usize, usize),
    },

    /// The wave amplitude range does not fit inside the volume height.
    #[error("surface amplitude exceeds volume: lowest surface level would be {lowest_level}")]
    SurfaceExceedsVolume {
        /// The lowest computed surface level (negative).
        lowest_level: i64,
    },

    /// A numeric parameter is outside its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type for volume operations.
pub type VolumeResult<T> = Result<T, VolumeError>;
