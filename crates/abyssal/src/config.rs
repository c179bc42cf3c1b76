//! # Pipeline Configuration
//!
//! All run parameters, loaded once from TOML. Every field has a default;
//! an empty file (or no file) gives the default run:
//!
//! ```toml
//! [volume]
//! size = 128
//!
//! [noise]
//! seed = 1337
//! frequency = 15.0
//! base_value = 128.0
//! value_offset = 10.0
//!
//! [diffusion]
//! rate = 5.0
//! time_step = 1.0
//! rounds = 3
//! iterations = 15
//! reference = "previous_round"
//!
//! [floor]
//! value = 255.0
//! thickness = 1
//!
//! [surface]
//! fill_value = 0.0
//! waves = [
//!     { frequency = 0.05, amplitude = 1.5, direction = [0.1, 1.0] },
//!     { frequency = 0.15, amplitude = 2.0, direction = [-0.1, 1.0] },
//!     { frequency = 0.08, amplitude = 1.2, direction = [1.0, 1.0] },
//! ]
//!
//! [output]
//! directory = "output"
//! prefix = "volume"
//! frame = 0
//! slices = true
//! # slice_index = 10
//! # display_range = [992.0, 1002.0]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use abyssal_volume::{NoiseFieldParams, WaveSpec, MIN_DIFFUSION_SIZE};

use crate::error::{PipelineError, PipelineResult};

/// Grid dimensions.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VolumeConfig {
    /// Edge length of the cubic volume.
    pub size: usize,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self { size: 128 }
    }
}

/// Initial density field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    /// Seed of the Perlin provider.
    pub seed: u32,
    /// Sampling divisor (larger is smoother).
    pub frequency: f64,
    /// Density every cell starts from.
    pub base_value: f64,
    /// Noise scale added on top of `base_value`.
    pub value_offset: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            frequency: 15.0,
            base_value: 128.0,
            value_offset: 10.0,
        }
    }
}

/// Which state each diffusion round relaxes toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffusionReference {
    /// Snapshot taken at the start of every round.
    #[default]
    PreviousRound,
    /// The noise field, held fixed for the whole run.
    Initial,
}

/// Smoothing parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffusionConfig {
    /// Diffusion rate.
    pub rate: f64,
    /// Time step per round.
    pub time_step: f64,
    /// Number of `diffuse` calls.
    pub rounds: u32,
    /// Relaxation sweeps per call.
    pub iterations: u32,
    /// Reference state for each round.
    pub reference: DiffusionReference,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            rate: 5.0,
            time_step: 1.0,
            rounds: 3,
            iterations: 15,
            reference: DiffusionReference::PreviousRound,
        }
    }
}

/// Floor plane.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloorConfig {
    /// Density written into the floor.
    pub value: f64,
    /// Number of layers from `y = 0`. Zero disables the floor.
    pub thickness: usize,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            value: 255.0,
            thickness: 1,
        }
    }
}

/// Wave-carved top surface.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    /// Density written above the surface.
    pub fill_value: f64,
    /// Wave components, accumulated in order.
    pub waves: Vec<WaveSpec>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            fill_value: 0.0,
            waves: vec![
                WaveSpec::new(0.05, 1.5, [0.1, 1.0]),
                WaveSpec::new(0.15, 2.0, [-0.1, 1.0]),
                WaveSpec::new(0.08, 1.2, [1.0, 1.0]),
            ],
        }
    }
}

/// Where and how results are written.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output folder, created on demand.
    pub directory: PathBuf,
    /// File name prefix for exports and slices.
    pub prefix: String,
    /// First frame index of this run.
    pub frame: u32,
    /// Whether to write slice previews.
    pub slices: bool,
    /// First-axis index of the previews; the middle when absent.
    pub slice_index: Option<usize>,
    /// Fixed `[min, max]` preview range; each slice's own range when absent.
    pub display_range: Option<[f64; 2]>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            prefix: String::from("volume"),
            frame: 0,
            slices: true,
            slice_index: None,
            display_range: None,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Grid dimensions.
    pub volume: VolumeConfig,
    /// Initial density field.
    pub noise: NoiseConfig,
    /// Smoothing.
    pub diffusion: DiffusionConfig,
    /// Floor plane.
    pub floor: FloorConfig,
    /// Wave-carved surface.
    pub surface: SurfaceConfig,
    /// Output settings.
    pub output: OutputConfig,
}

impl PipelineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigParse`] for malformed TOML and
    /// [`PipelineError::InvalidConfig`] for unusable values.
    pub fn from_toml_str(source: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the file cannot be read, otherwise
    /// as [`PipelineConfig::from_toml_str`].
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Noise field parameters derived from this config.
    #[must_use]
    pub fn noise_params(&self) -> NoiseFieldParams {
        NoiseFieldParams {
            size: self.volume.size,
            frequency: self.noise.frequency,
            base_value: self.noise.base_value,
            value_offset: self.noise.value_offset,
        }
    }

    /// First-axis index used for slice previews.
    #[must_use]
    pub fn slice_index(&self) -> usize {
        self.output.slice_index.unwrap_or(self.volume.size / 2)
    }

    /// Frame indices one run consumes: one per preview, at least one.
    ///
    /// `None` if the count itself overflows.
    #[must_use]
    pub fn frames_per_run(&self) -> Option<u32> {
        if self.output.slices {
            self.diffusion.rounds.checked_add(2)
        } else {
            Some(1)
        }
    }

    /// Checks every value before any grid is allocated.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> PipelineResult<()> {
        let size = self.volume.size;
        if size < MIN_DIFFUSION_SIZE {
            return invalid(format!(
                "volume.size must be at least {MIN_DIFFUSION_SIZE}, got {size}"
            ));
        }
        if !(self.noise.frequency.is_finite() && self.noise.frequency > 0.0) {
            return invalid(format!(
                "noise.frequency must be positive, got {}",
                self.noise.frequency
            ));
        }
        if !(self.diffusion.rate.is_finite() && self.diffusion.rate >= 0.0) {
            return invalid(format!(
                "diffusion.rate must be non-negative, got {}",
                self.diffusion.rate
            ));
        }
        if !(self.diffusion.time_step.is_finite() && self.diffusion.time_step >= 0.0) {
            return invalid(format!(
                "diffusion.time_step must be non-negative, got {}",
                self.diffusion.time_step
            ));
        }
        if self.diffusion.iterations == 0 {
            return invalid("diffusion.iterations must be at least 1".to_string());
        }
        if self.floor.thickness > size {
            return invalid(format!(
                "floor.thickness {} exceeds volume.size {size}",
                self.floor.thickness
            ));
        }
        for (index, wave) in self.surface.waves.iter().enumerate() {
            if wave.unit_direction().is_err() {
                return invalid(format!(
                    "surface.waves[{index}] has zero direction {:?}",
                    wave.direction
                ));
            }
            if !(wave.frequency.is_finite() && wave.amplitude.is_finite()) {
                return invalid(format!(
                    "surface.waves[{index}] needs finite frequency and amplitude, got {} and {}",
                    wave.frequency, wave.amplitude
                ));
            }
        }
        if let Some(slice_index) = self.output.slice_index {
            if slice_index >= size {
                return invalid(format!(
                    "output.slice_index {slice_index} is outside volume.size {size}"
                ));
            }
        }
        let frame = self.output.frame;
        if self
            .frames_per_run()
            .and_then(|frames| frame.checked_add(frames))
            .is_none()
        {
            return invalid(format!(
                "output.frame {frame} leaves no room for this run's frames"
            ));
        }
        if let Some([min, max]) = self.output.display_range {
            if min.is_nan() || max.is_nan() || min >= max {
                return invalid(format!(
                    "output.display_range [{min}, {max}] must have min < max"
                ));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> PipelineResult<()> {
    Err(PipelineError::InvalidConfig(message))
}
