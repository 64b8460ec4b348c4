//! Raw band extraction for point-value queries.

use crate::error::DecodeResult;
use crate::grid::RasterGrid;

/// Band 0 of a raster as a dense float array, with no visual encoding.
///
/// Immutable once decoded. Used to answer "what value is under this point"
/// queries against the globe surface.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSample {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major values, top row first.
    pub values: Vec<f32>,
    /// Observed minimum.
    pub min: f32,
    /// Observed maximum.
    pub max: f32,
}

impl BandSample {
    /// The value at pixel coordinates, or `None` when out of bounds.
    #[must_use]
    pub fn value_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.values[y as usize * self.width as usize + x as usize])
    }

    /// Sample by texture coordinates.
    ///
    /// `u`/`v` are clamped into [0, 1] and mapped to the nearest pixel; `v`
    /// is inverted because rows run top to bottom while texture space runs
    /// bottom to top.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample_at(&self, u: f32, v: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let x = (u * max_x).round().clamp(0.0, max_x) as u32;
        let y = ((1.0 - v) * max_y).round().clamp(0.0, max_y) as u32;
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// The pixel a texture coordinate maps to, for diagnostics.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_for(&self, u: f32, v: f32) -> (u32, u32) {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let x = (u * max_x).round().clamp(0.0, max_x) as u32;
        let y = ((1.0 - v) * max_y).round().clamp(0.0, max_y) as u32;
        (x, y)
    }
}

/// Extract band 0 with its observed min/max.
///
/// # Errors
///
/// Returns an error if band 0 cannot be read.
pub fn decode_band_sample(grid: &RasterGrid) -> DecodeResult<BandSample> {
    let values = grid.band(0)?;
    let (min, max) = grid.band_min_max(0)?;
    Ok(BandSample {
        width: grid.width(),
        height: grid.height(),
        values,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_2x2() -> BandSample {
        // Rows top to bottom: [1, 2] / [3, 4].
        let grid = RasterGrid::new(2, 2, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        decode_band_sample(&grid).unwrap()
    }

    #[test]
    fn test_min_max_recorded() {
        let sample = sample_2x2();
        assert_eq!(sample.min, 1.0);
        assert_eq!(sample.max, 4.0);
    }

    #[test]
    fn test_value_at_bounds() {
        let sample = sample_2x2();
        assert_eq!(sample.value_at(1, 1), Some(4.0));
        assert_eq!(sample.value_at(2, 0), None);
    }

    #[test]
    fn test_sample_inverts_v() {
        let sample = sample_2x2();
        // v = 1 is the top row, v = 0 the bottom.
        assert_eq!(sample.sample_at(0.0, 1.0), 1.0);
        assert_eq!(sample.sample_at(1.0, 1.0), 2.0);
        assert_eq!(sample.sample_at(0.0, 0.0), 3.0);
        assert_eq!(sample.sample_at(1.0, 0.0), 4.0);
    }

    #[test]
    fn test_sample_clamps_out_of_range_uv() {
        let sample = sample_2x2();
        assert_eq!(sample.sample_at(-3.0, 2.0), 1.0);
        assert_eq!(sample.sample_at(7.0, -1.0), 4.0);
    }

    #[test]
    fn test_pixel_for_matches_sample() {
        let sample = sample_2x2();
        assert_eq!(sample.pixel_for(1.0, 0.0), (1, 1));
        assert_eq!(sample.pixel_for(0.0, 1.0), (0, 0));
    }
}
