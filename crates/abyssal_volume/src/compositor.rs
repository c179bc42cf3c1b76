//! # Volume Compositing
//!
//! Structural overlays applied after diffusion: floor planes at the bottom
//! of the second axis, and a wave-shaped surface carved in from the top.

use crate::error::{VolumeError, VolumeResult};
use crate::volume::Volume;
use crate::wave::HeightMap;

/// Sets every cell of the plane `y = 0` to `value`.
pub fn add_floor(volume: &mut Volume, value: f64) {
    add_floor_layers(volume, 1, value);
}

/// Sets every cell of the planes `y = 0 .. thickness` to `value`.
///
/// A thickness beyond the volume height fills the whole volume.
pub fn add_floor_layers(volume: &mut Volume, thickness: usize, value: f64) {
    let size = volume.size();
    let layers = thickness.min(size);
    for z in 0..size {
        for y in 0..layers {
            for x in 0..size {
                volume.set(x, y, z, value);
            }
        }
    }
}

/// Fills every column from its wave-displaced surface level to the top.
///
/// The surface sits at `(size - 1) - max(height_map)`, so the highest crest
/// touches the top layer. Column `(i, j)` is filled from
/// `floor(surface + height_map[i, j])` up to `size - 1` inclusive.
///
/// # Errors
///
/// - [`VolumeError::HeightMapMismatch`] if the map is not `size x size`
/// - [`VolumeError::SurfaceExceedsVolume`] if a trough would reach below
///   `y = 0`
///
/// The volume is untouched on error.
pub fn apply_waves(volume: &mut Volume, height_map: &HeightMap, value: f64) -> VolumeResult<()> {
    let size = volume.size();
    if height_map.dimensions() != (size, size) {
        return Err(VolumeError::HeightMapMismatch {
            expected: (size, size),
            actual: height_map.dimensions(),
        });
    }

    let top = size - 1;
    let surface_height = top as f64 - height_map.max();
    let levels = surface_levels(height_map, surface_height);

    if let Some(&lowest_level) = levels.iter().min() {
        if lowest_level < 0 {
            return Err(VolumeError::SurfaceExceedsVolume { lowest_level });
        }
    }

    for i in 0..size {
        for j in 0..size {
            let level = levels[i * size + j] as usize;
            for y in level..=top {
                volume.set(i, y, j, value);
            }
        }
    }

    tracing::debug!(
        "Applied wave surface at height {:.2} ({}^2 columns)",
        surface_height,
        size
    );

    Ok(())
}

/// Per-column fill start, row-major over the height map.
fn surface_levels(height_map: &HeightMap, surface_height: f64) -> Vec<i64> {
    let (rows, columns) = height_map.dimensions();
    let mut levels = Vec::with_capacity(rows * columns);
    for i in 0..rows {
        for j in 0..columns {
            let elevation = height_map.get(i, j).unwrap_or(0.0);
            levels.push((surface_height + elevation).floor() as i64);
        }
    }
    levels
}
