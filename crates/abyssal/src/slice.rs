//! # Slice Previews
//!
//! Grayscale snapshots of one plane of the volume, written between
//! pipeline stages for eyeballing the noise and the smoothing.
//!
//! Values map linearly from a display range onto `0..=255`, are rounded,
//! then clamped. The range is either fixed (raw density reads well with
//! `[992, 1002]`) or taken from each slice's own min/max.

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};

use abyssal_volume::Slice;

use crate::error::{PipelineError, PipelineResult};

/// Receives slice previews.
pub trait SliceSink {
    /// Stores one preview under the given frame index.
    ///
    /// # Errors
    ///
    /// Returns any error from encoding or writing the preview.
    fn save(&mut self, slice: &Slice, frame: u32) -> PipelineResult<()>;
}

/// Discards every preview.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSliceSink;

impl SliceSink for NullSliceSink {
    fn save(&mut self, _slice: &Slice, _frame: u32) -> PipelineResult<()> {
        Ok(())
    }
}

/// Maps a slice onto gray levels, row-major and bottom row first.
///
/// With no `range` the slice's own min/max is used. A degenerate range maps
/// everything to black.
#[must_use]
pub fn to_gray_levels(slice: &Slice, range: Option<(f64, f64)>) -> Vec<u8> {
    let Some((lo, hi)) = range.or_else(|| slice.range()) else {
        return Vec::new();
    };
    if hi <= lo {
        return vec![0; slice.values.len()];
    }
    let scale = 255.0 / (hi - lo);
    slice
        .values
        .iter()
        .map(|&v| ((v - lo) * scale).round().clamp(0.0, 255.0) as u8)
        .collect()
}

/// Writes previews as 8-bit grayscale PNG files.
///
/// Files are named `{prefix}_slice_{frame:04}.png`. Row 0 of the slice ends
/// up at the bottom of the image.
#[derive(Clone, Debug)]
pub struct PngSliceSink {
    directory: PathBuf,
    prefix: String,
    range: Option<(f64, f64)>,
}

impl PngSliceSink {
    /// Creates a sink writing into `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            range: None,
        }
    }

    /// Uses a fixed display range instead of each slice's own.
    #[must_use]
    pub fn with_range(mut self, range: Option<[f64; 2]>) -> Self {
        self.range = range.map(|[lo, hi]| (lo, hi));
        self
    }

    /// Path of the preview for `frame`.
    #[must_use]
    pub fn path_for(&self, frame: u32) -> PathBuf {
        self.directory
            .join(format!("{}_slice_{frame:04}.png", self.prefix))
    }

    /// Output folder.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl SliceSink for PngSliceSink {
    fn save(&mut self, slice: &Slice, frame: u32) -> PipelineResult<()> {
        let width = image_dimension(slice.width)?;
        let height = image_dimension(slice.height)?;
        let levels = to_gray_levels(slice, self.range);

        let image = GrayImage::from_fn(width, height, |px, py| {
            let row = (height - 1 - py) as usize;
            Luma([levels[row * slice.width + px as usize]])
        });

        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(frame);
        image.save(&path)?;
        tracing::debug!("Saved slice preview {}", path.display());
        Ok(())
    }
}

fn image_dimension(extent: usize) -> PipelineResult<u32> {
    u32::try_from(extent)
        .ok()
        .filter(|&d| d > 0)
        .ok_or_else(|| PipelineError::InvalidConfig(format!("cannot preview a slice of extent {extent}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(values: Vec<f64>) -> Slice {
        Slice {
            width: values.len(),
            height: 1,
            values,
        }
    }

    #[test]
    fn test_fixed_range_maps_and_clamps() {
        let levels = to_gray_levels(&slice(vec![990.0, 992.0, 997.0, 1002.0, 1010.0]), Some((992.0, 1002.0)));
        assert_eq!(levels, vec![0, 0, 128, 255, 255]);
    }

    #[test]
    fn test_auto_range() {
        let levels = to_gray_levels(&slice(vec![10.0, 20.0, 15.0]), None);
        assert_eq!(levels, vec![0, 255, 128]);
    }

    #[test]
    fn test_flat_slice_is_black() {
        let levels = to_gray_levels(&slice(vec![4.0; 3]), None);
        assert_eq!(levels, vec![0, 0, 0]);
    }

    #[test]
    fn test_png_written_upright() {
        let directory = std::env::temp_dir().join("abyssal_slice_test");
        let mut sink = PngSliceSink::new(&directory, "preview");
        let preview = Slice {
            width: 2,
            height: 2,
            // bottom row dark, top row bright
            values: vec![0.0, 0.0, 1.0, 1.0],
        };

        sink.save(&preview, 3).unwrap();

        let path = sink.path_for(3);
        assert_eq!(sink.directory(), directory.as_path());
        assert!(path.ends_with("preview_slice_0003.png"));
        let image = image::open(&path).unwrap().to_luma8();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0).0, [255]);
        assert_eq!(image.get_pixel(1, 1).0, [0]);

        std::fs::remove_dir_all(&directory).ok();
    }
}
