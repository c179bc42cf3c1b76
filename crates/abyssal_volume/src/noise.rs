//! # Noise Field
//!
//! Samples a coherent 3D noise function onto a dense grid.
//!
//! ## Provider contract
//!
//! The field only needs `noise3(x, y, z) -> f64`: continuous, deterministic,
//! roughly in `[-1, 1]`. Which algorithm sits behind it is a plug-in choice.
//! [`PerlinNoise`] is the default; any `Fn(f64, f64, f64) -> f64` closure
//! works too, which is how tests pin the field to a constant.
//!
//! ## Determinism Guarantee
//!
//! The field has no randomness of its own. Given the same provider (same
//! `NoiseSeed`) and the same parameters it produces bit-identical grids.

use noise::{NoiseFn, Perlin};

use crate::error::{VolumeError, VolumeResult};
use crate::volume::Volume;

/// Seed for the default noise provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoiseSeed(u32);

impl NoiseSeed {
    /// Creates a new noise seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl Default for NoiseSeed {
    fn default() -> Self {
        Self(1337)
    }
}

/// A coherent 3D noise function.
pub trait CoherentNoise {
    /// Samples the noise at a continuous coordinate.
    fn noise3(&self, x: f64, y: f64, z: f64) -> f64;
}

impl<F> CoherentNoise for F
where
    F: Fn(f64, f64, f64) -> f64,
{
    #[inline]
    fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        self(x, y, z)
    }
}

/// Seeded 3D Perlin noise.
///
/// Zero at every integer lattice point, smooth in between.
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    perlin: Perlin,
    seed: NoiseSeed,
}

impl PerlinNoise {
    /// Creates a Perlin provider from a seed.
    #[must_use]
    pub fn new(seed: NoiseSeed) -> Self {
        Self {
            perlin: Perlin::new(seed.value()),
            seed,
        }
    }

    /// The seed this provider was built from.
    #[must_use]
    pub const fn seed(&self) -> NoiseSeed {
        self.seed
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::new(NoiseSeed::default())
    }
}

impl CoherentNoise for PerlinNoise {
    #[inline]
    fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin.get([x, y, z])
    }
}

/// Parameters of one noise field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseFieldParams {
    /// Edge length of the generated volume.
    pub size: usize,
    /// Sampling divisor: cell `(x, y, z)` samples `(x, y, z) / frequency`.
    /// Larger values give smoother fields.
    pub frequency: f64,
    /// Value every cell starts from.
    pub base_value: f64,
    /// Scale applied to the noise sample before adding it to `base_value`.
    pub value_offset: f64,
}

/// Generates density volumes from a coherent noise provider.
///
/// # Example
///
/// ```rust,ignore
/// let field = NoiseField::new(PerlinNoise::new(NoiseSeed::new(42)));
/// let (volume, max) = field.generate(&NoiseFieldParams {
///     size: 64,
///     frequency: 15.0,
///     base_value: 128.0,
///     value_offset: 10.0,
/// })?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct NoiseField<N> {
    noise: N,
}

impl<N: CoherentNoise> NoiseField<N> {
    /// Wraps a noise provider.
    #[must_use]
    pub const fn new(noise: N) -> Self {
        Self { noise }
    }

    /// The wrapped provider.
    #[must_use]
    pub const fn noise(&self) -> &N {
        &self.noise
    }

    /// Fills a fresh volume with `base_value + noise * value_offset` and
    /// returns it with its largest cell value.
    ///
    /// # Errors
    ///
    /// - [`VolumeError::EmptyVolume`] if `size` is zero
    /// - [`VolumeError::InvalidParameter`] if `frequency` is not a positive
    ///   finite number
    pub fn generate(&self, params: &NoiseFieldParams) -> VolumeResult<(Volume, f64)> {
        if !(params.frequency.is_finite() && params.frequency > 0.0) {
            return Err(VolumeError::InvalidParameter {
                name: "frequency",
                reason: format!("must be positive and finite, got {}", params.frequency),
            });
        }

        let mut volume = Volume::new(params.size, params.base_value)?;
        let mut max = f64::NEG_INFINITY;

        for x in 0..params.size {
            let fx = x as f64 / params.frequency;
            for y in 0..params.size {
                let fy = y as f64 / params.frequency;
                for z in 0..params.size {
                    let fz = z as f64 / params.frequency;
                    let value =
                        params.base_value + self.noise.noise3(fx, fy, fz) * params.value_offset;
                    if value > max {
                        max = value;
                    }
                    volume.set(x, y, z, value);
                }
            }
        }

        tracing::debug!(
            "Noise field {}^3 generated (max {:.3})",
            params.size,
            max
        );

        Ok((volume, max))
    }
}
