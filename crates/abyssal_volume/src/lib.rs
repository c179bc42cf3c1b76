//! # ABYSSAL Volume Synthesis
//!
//! Deterministic density volumes for external renderers.
//!
//! ## Pipeline
//!
//! 1. **Noise**: a coherent 3D noise field gives the initial density
//! 2. **Diffusion**: implicit Gauss-Seidel relaxation smooths it
//! 3. **Compositing**: a floor plane and a wave-carved surface are stamped in
//! 4. **Export**: one byte per cell, first axis fastest
//!
//! Everything is single-threaded and synchronous. Grids are owned by the
//! caller and mutated in place.
//!
//! ## Core Components
//!
//! - `NoiseField`: samples a `CoherentNoise` provider onto a `Volume`
//! - `DiffusionSolver`: relaxation with reflective faces
//! - `HeightMap` / `WaveSpec`: rounded directional sinusoids
//! - `apply_waves` / `add_floor`: structural overlays
//! - `export`: the flat voxel byte buffer
//!
//! ## Example
//!
//! ```rust,ignore
//! use abyssal_volume::*;
//!
//! let field = NoiseField::new(PerlinNoise::new(NoiseSeed::new(1337)));
//! let (mut volume, _max) = field.generate(&NoiseFieldParams {
//!     size: 128,
//!     frequency: 15.0,
//!     base_value: 128.0,
//!     value_offset: 10.0,
//! })?;
//!
//! let solver = DiffusionSolver::new(5.0, 1.0);
//! for _ in 0..3 {
//!     let reference = volume.clone();
//!     solver.diffuse(&mut volume, &reference)?;
//! }
//!
//! add_floor(&mut volume, 255.0);
//! let mut waves = HeightMap::new(128, 128)?;
//! waves.accumulate(&WaveSpec::new(0.05, 1.5, [0.1, 1.0]))?;
//! apply_waves(&mut volume, &waves, 0.0)?;
//!
//! let bytes = export(&volume);
//! assert_eq!(bytes.len(), 128 * 128 * 128);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod compositor;
pub mod diffusion;
pub mod error;
pub mod export;
pub mod noise;
pub mod volume;
pub mod wave;

pub use compositor::{add_floor, add_floor_layers, apply_waves};
pub use diffusion::{resolve_edges, DiffusionSolver, MIN_DIFFUSION_SIZE};
pub use error::{VolumeError, VolumeResult};
pub use export::{export, narrow_to_u8, ExportBuffer};
pub use crate::noise::{CoherentNoise, NoiseField, NoiseFieldParams, NoiseSeed, PerlinNoise};
pub use volume::{Slice, Volume};
pub use wave::{accumulate_waves, evaluate_wave, HeightMap, WaveSpec};
