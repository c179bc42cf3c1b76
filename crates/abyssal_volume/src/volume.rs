//! # Volume Grid
//!
//! A dense cubic grid of density values.
//!
//! ## Layout
//!
//! Cells live in one flat buffer. The cell `(x, y, z)` is stored at
//! `x + size * (y + size * z)`: the first axis varies fastest, the third
//! slowest. This is the same order the voxel export uses, so exporting is a
//! single linear pass.
//!
//! The second axis (`y`) is "up": floors sit at `y = 0` and wave surfaces
//! are carved downward from `y = size - 1`.

use crate::error::{VolumeError, VolumeResult};

/// A cubic 3D grid of density values.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    /// Edge length along every axis.
    size: usize,
    /// Cell values, first axis fastest.
    cells: Vec<f64>,
}

impl Volume {
    /// Creates a volume with every cell set to `fill`.
    ///
    /// # Errors
    ///
    /// - [`VolumeError::EmptyVolume`] if `size` is zero
    /// - [`VolumeError::GridTooLarge`] if `size^3` cells cannot be addressed
    pub fn new(size: usize, fill: f64) -> VolumeResult<Self> {
        if size == 0 {
            return Err(VolumeError::EmptyVolume);
        }
        let len = cell_count(&[size, size, size])?;
        Ok(Self {
            size,
            cells: vec![fill; len],
        })
    }

    /// Creates a volume by evaluating `f(x, y, z)` for every cell.
    ///
    /// # Errors
    ///
    /// As [`Volume::new`].
    pub fn from_fn<F>(size: usize, mut f: F) -> VolumeResult<Self>
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        let mut volume = Self::new(size, 0.0)?;
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let idx = volume.index(x, y, z);
                    volume.cells[idx] = f(x, y, z);
                }
            }
        }
        Ok(volume)
    }

    /// Edge length along every axis.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a volume has at least one cell.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Linear index of `(x, y, z)`. Coordinates must be in range.
    #[inline]
    #[must_use]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.size * (y + self.size * z)
    }

    /// Returns the value at `(x, y, z)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<f64> {
        self.contains(x, y, z).then(|| self.cells[self.index(x, y, z)])
    }

    /// Writes the value at `(x, y, z)`. Out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f64) {
        if self.contains(x, y, z) {
            let idx = self.index(x, y, z);
            self.cells[idx] = value;
        }
    }

    #[inline]
    fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.size && y < self.size && z < self.size
    }

    /// Raw cell values in export order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    /// Mutable raw cell values in export order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    /// Largest cell value.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.cells.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest cell value.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.cells.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Arithmetic mean of all cells.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.cells.iter().sum::<f64>() / self.cells.len() as f64
    }

    /// Population variance of all cells.
    #[must_use]
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.cells
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.cells.len() as f64
    }

    /// Extracts the plane `x = index` as a 2D slice: rows along `y`,
    /// columns along `z`.
    ///
    /// Returns `None` if `index` is outside the grid.
    #[must_use]
    pub fn slice_first_axis(&self, index: usize) -> Option<Slice> {
        if index >= self.size {
            return None;
        }
        let mut values = Vec::with_capacity(self.size * self.size);
        for y in 0..self.size {
            for z in 0..self.size {
                values.push(self.cells[self.index(index, y, z)]);
            }
        }
        Some(Slice {
            width: self.size,
            height: self.size,
            values,
        })
    }
}

/// Number of `f64` cells in a grid of the given shape.
///
/// # Errors
///
/// Returns [`VolumeError::GridTooLarge`] if the count, or its size in bytes,
/// does not fit the address space.
pub(crate) fn cell_count(shape: &[usize]) -> VolumeResult<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
        .filter(|&cells| {
            cells
                .checked_mul(std::mem::size_of::<f64>())
                .is_some_and(|bytes| isize::try_from(bytes).is_ok())
        })
        .ok_or_else(|| VolumeError::GridTooLarge {
            shape: shape.to_vec(),
        })
}

/// A 2D cut through a volume, for previews.
///
/// Stored row-major: `values[row * width + column]`. Row 0 is the bottom of
/// the volume.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Row-major values.
    pub values: Vec<f64>,
}

impl Slice {
    /// Value at `(column, row)`, or `None` outside the slice.
    #[inline]
    #[must_use]
    pub fn get(&self, column: usize, row: usize) -> Option<f64> {
        (column < self.width && row < self.height).then(|| self.values[row * self.width + column])
    }

    /// Smallest and largest value, or `None` for an empty slice.
    #[must_use]
    pub fn range(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(Volume::new(0, 1.0), Err(VolumeError::EmptyVolume));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let size = 1usize << 22;
        assert_eq!(
            Volume::new(size, 0.0),
            Err(VolumeError::GridTooLarge {
                shape: vec![size; 3]
            })
        );
        // Fits in usize, but not once multiplied by the cell width.
        let size = 1usize << 21;
        assert!(matches!(
            Volume::from_fn(size, |_, _, _| 0.0),
            Err(VolumeError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_first_axis_is_fastest() {
        let volume = Volume::new(4, 0.0).unwrap();
        assert_eq!(volume.index(1, 0, 0), 1);
        assert_eq!(volume.index(0, 1, 0), 4);
        assert_eq!(volume.index(0, 0, 1), 16);
        assert_eq!(volume.index(3, 3, 3), 63);
    }

    #[test]
    fn test_from_fn_places_values() {
        let volume = Volume::from_fn(3, |x, y, z| (x * 100 + y * 10 + z) as f64).unwrap();
        assert_eq!(volume.get(2, 1, 0), Some(210.0));
        assert_eq!(volume.get(0, 2, 1), Some(21.0));
        assert_eq!(volume.get(3, 0, 0), None);
    }

    #[test]
    fn test_out_of_range_set_is_ignored() {
        let mut volume = Volume::new(2, 5.0).unwrap();
        volume.set(2, 0, 0, 9.0);
        assert!(volume.as_slice().iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_statistics() {
        let volume = Volume::from_fn(2, |x, _, _| if x == 0 { 1.0 } else { 3.0 }).unwrap();
        assert_eq!(volume.min(), 1.0);
        assert_eq!(volume.max(), 3.0);
        assert_eq!(volume.mean(), 2.0);
        assert_eq!(volume.variance(), 1.0);
    }

    #[test]
    fn test_slice_first_axis() {
        let volume = Volume::from_fn(3, |x, y, z| (x * 100 + y * 10 + z) as f64).unwrap();
        let slice = volume.slice_first_axis(2).unwrap();

        assert_eq!((slice.width, slice.height), (3, 3));
        // column = z, row = y
        assert_eq!(slice.get(1, 2), Some(221.0));
        assert_eq!(slice.range(), Some((200.0, 222.0)));
        assert!(volume.slice_first_axis(3).is_none());
    }
}
