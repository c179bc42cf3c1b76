//! # Wave Synthesis
//!
//! Directional sinusoids summed onto a 2D height map.
//!
//! Each component contributes `amplitude * sin(frequency * dot(d, (i, j)))`
//! with `d` the normalized direction. Contributions are rounded to the
//! nearest integer (ties to even) before they are added, so the order in
//! which components are accumulated is part of the result.

use serde::Deserialize;

use crate::error::{VolumeError, VolumeResult};
use crate::volume::cell_count;

/// One wave component.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct WaveSpec {
    /// Angular frequency along the direction of travel.
    pub frequency: f64,
    /// Peak height.
    pub amplitude: f64,
    /// Direction of travel. Need not be normalized, must not be zero.
    pub direction: [f64; 2],
}

impl WaveSpec {
    /// Creates a wave component.
    #[must_use]
    pub const fn new(frequency: f64, amplitude: f64, direction: [f64; 2]) -> Self {
        Self {
            frequency,
            amplitude,
            direction,
        }
    }

    /// Returns the unit-length direction.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::ZeroWaveDirection`] if the direction has zero
    /// or non-finite length.
    pub fn unit_direction(&self) -> VolumeResult<[f64; 2]> {
        normalize(self.direction)
    }
}

fn normalize(direction: [f64; 2]) -> VolumeResult<[f64; 2]> {
    let [x, y] = direction;
    let norm = x.hypot(y);
    if norm == 0.0 || !norm.is_finite() {
        return Err(VolumeError::ZeroWaveDirection { x, y });
    }
    Ok([x / norm, y / norm])
}

/// Evaluates one wave at `(x, y)`.
///
/// # Errors
///
/// Returns [`VolumeError::ZeroWaveDirection`] if `direction` cannot be
/// normalized.
pub fn evaluate_wave(
    x: f64,
    y: f64,
    frequency: f64,
    amplitude: f64,
    direction: [f64; 2],
) -> VolumeResult<f64> {
    let [dx, dy] = normalize(direction)?;
    Ok(amplitude * (frequency * (dx * x + dy * y)).sin())
}

/// A dense 2D grid of surface elevations.
///
/// Indexed `(i, j)` with `i` along the volume's first axis and `j` along its
/// third.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    rows: usize,
    columns: usize,
    /// Row-major: `values[i * columns + j]`.
    values: Vec<f64>,
}

impl HeightMap {
    /// Creates a flat (all zero) height map.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::GridTooLarge`] if `rows * columns` cells cannot
    /// be addressed.
    pub fn new(rows: usize, columns: usize) -> VolumeResult<Self> {
        let len = cell_count(&[rows, columns])?;
        Ok(Self {
            rows,
            columns,
            values: vec![0.0; len],
        })
    }

    /// Dimensions as `(rows, columns)`.
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Elevation at `(i, j)`, or `None` outside the map.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.rows && j < self.columns).then(|| self.values[i * self.columns + j])
    }

    /// Overwrites the elevation at `(i, j)`. Out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        if i < self.rows && j < self.columns {
            self.values[i * self.columns + j] = value;
        }
    }

    /// Highest elevation (negative infinity for an empty map).
    #[must_use]
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Lowest elevation (infinity for an empty map).
    #[must_use]
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Adds one rounded wave component to every cell.
    ///
    /// # Errors
    ///
    /// As [`accumulate_waves`]. The map is untouched on error.
    pub fn accumulate(&mut self, wave: &WaveSpec) -> VolumeResult<()> {
        accumulate_waves(self, wave.frequency, wave.amplitude, wave.direction)
    }
}

/// Adds `round(evaluate_wave(i, j, ..))` to every cell of `height_map`.
///
/// # Errors
///
/// - [`VolumeError::ZeroWaveDirection`] if `direction` cannot be normalized
/// - [`VolumeError::InvalidParameter`] if `frequency` or `amplitude` is not
///   finite
///
/// The map is untouched on error.
pub fn accumulate_waves(
    height_map: &mut HeightMap,
    frequency: f64,
    amplitude: f64,
    direction: [f64; 2],
) -> VolumeResult<()> {
    let [dx, dy] = normalize(direction)?;
    for (name, value) in [("frequency", frequency), ("amplitude", amplitude)] {
        if !value.is_finite() {
            return Err(VolumeError::InvalidParameter {
                name,
                reason: format!("must be finite, got {value}"),
            });
        }
    }
    let columns = height_map.columns;

    for i in 0..height_map.rows {
        for j in 0..columns {
            let phase = frequency * (dx * i as f64 + dy * j as f64);
            height_map.values[i * columns + j] += (amplitude * phase.sin()).round_ties_even();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_wave_ignores_y() {
        for x in 0..20 {
            let x = f64::from(x);
            let expected = 2.5 * (0.3 * x).sin();
            for y in [0.0, 3.0, -7.5, 100.0] {
                let value = evaluate_wave(x, y, 0.3, 2.5, [1.0, 0.0]).unwrap();
                assert!((value - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_direction_is_normalized() {
        let short = evaluate_wave(3.0, 4.0, 0.2, 1.0, [1.0, 1.0]).unwrap();
        let long = evaluate_wave(3.0, 4.0, 0.2, 1.0, [50.0, 50.0]).unwrap();
        assert!((short - long).abs() < 1e-12);
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert_eq!(
            evaluate_wave(1.0, 1.0, 1.0, 1.0, [0.0, 0.0]),
            Err(VolumeError::ZeroWaveDirection { x: 0.0, y: 0.0 })
        );

        let mut map = HeightMap::new(4, 4).unwrap();
        map.set(1, 1, 3.0);
        let result = map.accumulate(&WaveSpec::new(0.1, 2.0, [0.0, 0.0]));
        assert!(result.is_err());
        assert_eq!(map.get(1, 1), Some(3.0));
    }

    #[test]
    fn test_accumulate_rounds_each_component() {
        // 0.4 rounds to 0 every time; summing first would reach 1.2.
        let mut map = HeightMap::new(2, 1).unwrap();
        // i = 1: 0.4 * sin(pi / 2) = 0.4 -> 0
        let wave = WaveSpec::new(std::f64::consts::FRAC_PI_2, 0.4, [1.0, 0.0]);
        for _ in 0..3 {
            map.accumulate(&wave).unwrap();
        }
        assert_eq!(map.get(1, 0), Some(0.0));
    }

    #[test]
    fn test_accumulate_superimposes() {
        let mut map = HeightMap::new(3, 3).unwrap();
        // i = 1: 3 * sin(pi / 2) = 3
        let wave = WaveSpec::new(std::f64::consts::FRAC_PI_2, 3.0, [1.0, 0.0]);
        map.accumulate(&wave).unwrap();
        map.accumulate(&wave).unwrap();

        assert_eq!(map.get(1, 2), Some(6.0));
        assert_eq!(map.get(0, 2), Some(0.0));
        assert_eq!(map.max(), 6.0);
    }

    #[test]
    fn test_non_finite_wave_rejected() {
        let mut map = HeightMap::new(3, 3).unwrap();
        map.set(2, 2, 1.0);

        for wave in [
            WaveSpec::new(0.1, f64::NAN, [1.0, 0.0]),
            WaveSpec::new(f64::INFINITY, 1.0, [1.0, 0.0]),
        ] {
            assert!(matches!(
                map.accumulate(&wave),
                Err(VolumeError::InvalidParameter { .. })
            ));
        }
        assert_eq!(map.get(2, 2), Some(1.0));
        assert_eq!(map.max(), 1.0);
    }

    #[test]
    fn test_oversized_map_rejected() {
        assert!(matches!(
            HeightMap::new(usize::MAX, 2),
            Err(VolumeError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_half_rounds_to_even() {
        // 2.5 * sin(pi / 2) = 2.5 -> 2
        let mut map = HeightMap::new(2, 1).unwrap();
        let wave = WaveSpec::new(std::f64::consts::FRAC_PI_2, 2.5, [1.0, 0.0]);
        map.accumulate(&wave).unwrap();
        assert_eq!(map.get(1, 0), Some(2.0));
    }
}
