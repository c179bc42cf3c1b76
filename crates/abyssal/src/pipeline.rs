//! # Pipeline Run
//!
//! ```text
//! ┌──────────┐   ┌───────────────────┐   ┌──────────────┐   ┌──────────┐
//! │  NOISE   │──>│ DIFFUSION x rounds│──>│ FLOOR + WAVES│──>│  EXPORT  │
//! └────┬─────┘   └─────────┬─────────┘   └──────┬───────┘   └──────────┘
//!      │ slice             │ slice per round     │ slice
//!      v                   v                     v
//!                      SliceSink
//! ```
//!
//! The height map is built from the configured waves independently of the
//! diffusion chain and only meets the volume at compositing time.
//!
//! ## Frames
//!
//! The run starts at `output.frame`. The export is written under that
//! frame; previews take consecutive frames from it, one per stage. The
//! report carries the next unused frame so chained runs never collide.

use std::path::PathBuf;
use std::time::Instant;

use abyssal_volume::{
    add_floor_layers, apply_waves, export, CoherentNoise, DiffusionSolver, HeightMap, NoiseField,
    NoiseSeed, PerlinNoise, Volume,
};

use crate::config::{DiffusionReference, PipelineConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::output::ExportWriter;
use crate::slice::SliceSink;

/// Outcome of one pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Largest density in the raw noise field.
    pub noise_max: f64,
    /// Where the voxel buffer was written.
    pub export_path: PathBuf,
    /// Size of the voxel buffer.
    pub bytes_written: usize,
    /// First frame index not used by this run.
    pub next_frame: u32,
}

/// A configured, validated pipeline.
#[derive(Clone, Debug)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validates `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] for unusable values.
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this pipeline runs with.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs with the seeded Perlin provider from the config.
    ///
    /// # Errors
    ///
    /// Any stage failure, see [`Pipeline::run_with_noise`].
    pub fn run(&self, sink: &mut dyn SliceSink) -> PipelineResult<RunReport> {
        let noise = PerlinNoise::new(NoiseSeed::new(self.config.noise.seed));
        self.run_with_noise(noise, sink)
    }

    /// Runs every stage with a caller-supplied noise provider.
    ///
    /// # Errors
    ///
    /// Returns the first volume precondition, I/O or preview failure. Nothing
    /// is exported after a failure.
    pub fn run_with_noise<N: CoherentNoise>(
        &self,
        noise: N,
        sink: &mut dyn SliceSink,
    ) -> PipelineResult<RunReport> {
        let config = &self.config;
        let run_frame = config.output.frame;
        let mut frame = run_frame;
        let started = Instant::now();

        tracing::info!(
            "Generating noise field: {}^3 cells, frequency {}",
            config.volume.size,
            config.noise.frequency
        );
        let (mut volume, noise_max) = NoiseField::new(noise).generate(&config.noise_params())?;
        tracing::info!("Noise field ready (max density {noise_max:.3})");
        self.preview(&volume, sink, &mut frame)?;

        self.diffuse(&mut volume, sink, &mut frame)?;

        let height_map = self.build_height_map()?;

        if config.floor.thickness > 0 {
            add_floor_layers(&mut volume, config.floor.thickness, config.floor.value);
        }
        apply_waves(&mut volume, &height_map, config.surface.fill_value)?;
        tracing::info!(
            "Composited floor ({} layers) and {} wave components",
            config.floor.thickness,
            config.surface.waves.len()
        );
        self.preview(&volume, sink, &mut frame)?;

        let buffer = export(&volume);
        let writer = ExportWriter::new(&config.output.directory, &config.output.prefix);
        let export_path = writer.write(&buffer, run_frame)?;

        tracing::info!("Pipeline finished in {:?}", started.elapsed());

        Ok(RunReport {
            noise_max,
            export_path,
            bytes_written: buffer.len(),
            next_frame: frame.max(next_frame(run_frame)?),
        })
    }

    fn diffuse(
        &self,
        volume: &mut Volume,
        sink: &mut dyn SliceSink,
        frame: &mut u32,
    ) -> PipelineResult<()> {
        let settings = &self.config.diffusion;
        let solver = DiffusionSolver::new(settings.rate, settings.time_step)
            .with_iterations(settings.iterations);
        let initial = match settings.reference {
            DiffusionReference::Initial => Some(volume.clone()),
            DiffusionReference::PreviousRound => None,
        };

        for round in 0..settings.rounds {
            let started = Instant::now();
            let snapshot;
            let reference = match &initial {
                Some(initial) => initial,
                None => {
                    snapshot = volume.clone();
                    &snapshot
                }
            };
            solver.diffuse(volume, reference)?;
            tracing::info!(
                "Diffusion round {}/{} done in {:?}",
                round + 1,
                settings.rounds,
                started.elapsed()
            );
            self.preview(volume, sink, frame)?;
        }

        Ok(())
    }

    fn build_height_map(&self) -> PipelineResult<HeightMap> {
        let size = self.config.volume.size;
        let mut height_map = HeightMap::new(size, size)?;
        for wave in &self.config.surface.waves {
            height_map.accumulate(wave)?;
        }
        tracing::debug!(
            "Height map range [{}, {}]",
            height_map.min(),
            height_map.max()
        );
        Ok(height_map)
    }

    fn preview(
        &self,
        volume: &Volume,
        sink: &mut dyn SliceSink,
        frame: &mut u32,
    ) -> PipelineResult<()> {
        if !self.config.output.slices {
            return Ok(());
        }
        let index = self.config.slice_index();
        let slice = volume.slice_first_axis(index).ok_or_else(|| {
            PipelineError::InvalidConfig(format!("slice index {index} outside volume"))
        })?;
        sink.save(&slice, *frame)?;
        *frame = next_frame(*frame)?;
        Ok(())
    }
}

fn next_frame(frame: u32) -> PipelineResult<u32> {
    frame.checked_add(1).ok_or_else(|| {
        PipelineError::InvalidConfig(format!("frame index {frame} has no successor"))
    })
}
