//! # Voxel Export
//!
//! Serializes a volume to one unsigned byte per cell.
//!
//! ## Format
//!
//! No header. Length is exactly `size^3`. Cell `(i, j, k)` lands at byte
//! `i + size * (j + size * k)`: first axis fastest, third axis slowest.
//! Downstream renderers depend on this order; do not change it.
//!
//! ## Narrowing
//!
//! Each value is truncated toward zero to an integer, then reinterpreted as
//! its low 8 bits. Values outside `0..=255` wrap (`-1 -> 255`, `256 -> 0`);
//! nothing is clamped. NaN becomes 0. This loss is silent by contract.

use std::io::{self, Write};

use crate::volume::Volume;

/// Narrows one density value to a voxel byte: truncate, then wrap.
#[inline]
#[must_use]
pub fn narrow_to_u8(value: f64) -> u8 {
    // f64 -> i64 truncates (saturating, NaN -> 0); i64 -> u8 keeps the low byte.
    value as i64 as u8
}

/// The exported voxel bytes, in export index order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportBuffer {
    bytes: Vec<u8>,
}

impl ExportBuffer {
    /// The raw bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes (one per cell).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a buffer with no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consumes the buffer, returning the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Writes the bytes verbatim.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.bytes)?;
        writer.flush()
    }
}

/// Serializes `volume` to its voxel bytes.
#[must_use]
pub fn export(volume: &Volume) -> ExportBuffer {
    // Volume storage already follows the export order.
    let bytes = volume.as_slice().iter().copied().map(narrow_to_u8).collect();
    ExportBuffer { bytes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_instead_of_rounding() {
        assert_eq!(narrow_to_u8(7.9), 7);
        assert_eq!(narrow_to_u8(0.999), 0);
        assert_eq!(narrow_to_u8(-0.7), 0);
    }

    #[test]
    fn test_out_of_range_wraps() {
        assert_eq!(narrow_to_u8(255.0), 255);
        assert_eq!(narrow_to_u8(256.0), 0);
        assert_eq!(narrow_to_u8(300.7), 44);
        assert_eq!(narrow_to_u8(-1.0), 255);
        assert_eq!(narrow_to_u8(-1.5), 255);
        assert_eq!(narrow_to_u8(f64::NAN), 0);
    }

    #[test]
    fn test_export_length_and_order() {
        let volume = Volume::from_fn(3, |x, y, z| (x + 3 * y + 9 * z) as f64).unwrap();
        let buffer = export(&volume);

        assert_eq!(buffer.len(), 27);
        let expected: Vec<u8> = (0..27).collect();
        assert_eq!(buffer.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_into_bytes() {
        let volume = Volume::new(2, 300.0).unwrap();
        let buffer = export(&volume);
        assert!(!buffer.is_empty());
        assert_eq!(buffer.into_bytes(), vec![44u8; 8]);
    }

    #[test]
    fn test_write_to() {
        let volume = Volume::new(2, 9.0).unwrap();
        let mut sink = Vec::new();
        export(&volume).write_to(&mut sink).unwrap();
        assert_eq!(sink, vec![9u8; 8]);
    }
}
