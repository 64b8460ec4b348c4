//! Height field decoding.

use crate::error::DecodeResult;
use crate::grid::RasterGrid;
use crate::texture::{ColorSpace, TextureAsset};

/// Options for height field decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightFieldOptions {
    /// Invert heights (useful when the dataset is reversed).
    pub invert: bool,
}

/// Decode band 0 into a linear grayscale height field.
///
/// Values are normalized to the full 0..=255 output range using the band's
/// *observed* minimum and maximum, never a fixed physical elevation range, so
/// a dataset covering only lowlands still uses the whole displacement range.
///
/// # Errors
///
/// Returns an error if band 0 cannot be read.
pub fn decode_height_field(
    grid: &RasterGrid,
    options: HeightFieldOptions,
) -> DecodeResult<TextureAsset> {
    let band = grid.band(0)?;
    let (min, max) = grid.band_min_max(0)?;
    // Flat rasters normalize to zero rather than dividing by zero.
    let range = if max > min { max - min } else { 1.0 };

    let mut data = vec![0u8; band.len() * 4];
    for (dst, &v) in data.chunks_exact_mut(4).zip(band.iter()) {
        let mut norm = (v - min) / range;
        if options.invert {
            norm = 1.0 - norm;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = (norm * 255.0).round().clamp(0.0, 255.0) as u8;
        dst[0] = value;
        dst[1] = value;
        dst[2] = value;
        dst[3] = 255;
    }

    Ok(TextureAsset::new(
        data,
        grid.width(),
        grid.height(),
        ColorSpace::Linear,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_to_observed_range() {
        // Real elevations in meters; output must span the full byte range.
        let grid = RasterGrid::new(3, 1, 1, vec![100.0, 550.0, 1000.0]).unwrap();
        let tex = decode_height_field(&grid, HeightFieldOptions::default()).unwrap();

        assert_eq!(tex.color_space, ColorSpace::Linear);
        assert_eq!(tex.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(tex.pixel(1, 0), Some([128, 128, 128, 255]));
        assert_eq!(tex.pixel(2, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_invert() {
        let grid = RasterGrid::new(2, 1, 1, vec![0.0, 10.0]).unwrap();
        let tex = decode_height_field(&grid, HeightFieldOptions { invert: true }).unwrap();

        assert_eq!(tex.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(tex.pixel(1, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_flat_raster_does_not_divide_by_zero() {
        let grid = RasterGrid::new(2, 1, 1, vec![42.0, 42.0]).unwrap();
        let tex = decode_height_field(&grid, HeightFieldOptions::default()).unwrap();

        assert_eq!(tex.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(tex.pixel(1, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_uses_band_zero_of_multiband() {
        let grid = RasterGrid::new(2, 1, 3, vec![0.0, 9.0, 9.0, 10.0, 9.0, 9.0]).unwrap();
        let tex = decode_height_field(&grid, HeightFieldOptions::default()).unwrap();

        assert_eq!(tex.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(tex.pixel(1, 0), Some([255, 255, 255, 255]));
    }
}
