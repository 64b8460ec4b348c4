//! Mask texture decoding.

use crate::error::DecodeResult;
use crate::grid::RasterGrid;
use crate::texture::{ColorSpace, TextureAsset};

/// Options for mask texture decoding.
#[derive(Debug, Clone, Copy)]
pub struct MaskOptions {
    /// Samples strictly greater than this are painted; everything else is
    /// fully transparent.
    pub threshold: f32,
    /// RGB paint color for above-threshold samples.
    pub color: [u8; 3],
    /// Peak alpha in 0..=1.
    pub max_alpha: f32,
    /// Scale alpha by `value / observed_max` instead of using a constant.
    ///
    /// Note the divisor is the maximum observed in *this* decode call, so
    /// visual intensity depends on which data subset was loaded.
    pub scale_alpha_by_value: bool,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            color: [255, 255, 255],
            max_alpha: 0.85,
            scale_alpha_by_value: true,
        }
    }
}

/// Decode band 0 into a mask texture.
///
/// Pixels whose band-0 value exceeds the threshold get the caller's color;
/// alpha is either the constant `max_alpha` or `(value / observed_max) *
/// max_alpha` when scaling is requested. A value exactly at the threshold is
/// fully transparent.
///
/// # Errors
///
/// Returns an error if band 0 cannot be read.
pub fn decode_mask_texture(grid: &RasterGrid, options: MaskOptions) -> DecodeResult<TextureAsset> {
    let band = grid.band(0)?;
    let (_, max) = grid.band_min_max(0)?;
    let alpha_divisor = if max > 0.0 { max } else { 1.0 };

    let mut data = vec![0u8; band.len() * 4];
    for (dst, &v) in data.chunks_exact_mut(4).zip(band.iter()) {
        if v <= options.threshold {
            continue; // stays (0, 0, 0, 0)
        }
        let alpha = if options.scale_alpha_by_value {
            (v / alpha_divisor).clamp(0.0, 1.0) * options.max_alpha
        } else {
            options.max_alpha
        };
        dst[0] = options.color[0];
        dst[1] = options.color[1];
        dst[2] = options.color[2];
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            dst[3] = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }

    Ok(TextureAsset::new(
        data,
        grid.width(),
        grid.height(),
        ColorSpace::Srgb,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn opts(color: [u8; 3], max_alpha: f32, scale: bool) -> MaskOptions {
        MaskOptions {
            threshold: 0.0,
            color,
            max_alpha,
            scale_alpha_by_value: scale,
        }
    }

    #[test]
    fn test_at_threshold_is_transparent() {
        let grid = RasterGrid::new(2, 1, 1, vec![0.0, 1.0]).unwrap();
        let tex = decode_mask_texture(&grid, opts([10, 20, 30], 1.0, false)).unwrap();

        assert_eq!(tex.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(tex.pixel(1, 0), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_constant_alpha() {
        let grid = RasterGrid::new(2, 1, 1, vec![5.0, 100.0]).unwrap();
        let tex = decode_mask_texture(&grid, opts([255, 0, 0], 0.85, false)).unwrap();

        // Both painted pixels share the same constant alpha.
        assert_eq!(tex.pixel(0, 0), Some([255, 0, 0, 217]));
        assert_eq!(tex.pixel(1, 0), Some([255, 0, 0, 217]));
    }

    #[test]
    fn test_alpha_scaled_by_observed_max() {
        let grid = RasterGrid::new(3, 1, 1, vec![0.0, 50.0, 100.0]).unwrap();
        let tex = decode_mask_texture(&grid, opts([0, 255, 0], 1.0, true)).unwrap();

        assert_eq!(tex.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(tex.pixel(1, 0), Some([0, 255, 0, 128]));
        assert_eq!(tex.pixel(2, 0), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_nonzero_threshold() {
        let grid = RasterGrid::new(3, 1, 1, vec![2.0, 3.0, 4.0]).unwrap();
        let options = MaskOptions {
            threshold: 3.0,
            color: [1, 2, 3],
            max_alpha: 1.0,
            scale_alpha_by_value: false,
        };
        let tex = decode_mask_texture(&grid, options).unwrap();

        assert_eq!(tex.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(tex.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(tex.pixel(2, 0), Some([1, 2, 3, 255]));
    }

    proptest! {
        /// A pixel is painted iff its band-0 value exceeds the threshold.
        #[test]
        fn prop_painted_iff_above_threshold(
            values in prop::collection::vec(-100.0f32..1000.0, 1..64),
            threshold in -50.0f32..500.0,
        ) {
            let width = u32::try_from(values.len()).unwrap();
            let grid = RasterGrid::new(width, 1, 1, values.clone()).unwrap();
            let options = MaskOptions {
                threshold,
                color: [9, 9, 9],
                max_alpha: 1.0,
                scale_alpha_by_value: false,
            };
            let tex = decode_mask_texture(&grid, options).unwrap();

            for (x, &v) in values.iter().enumerate() {
                let alpha = tex.pixel(u32::try_from(x).unwrap(), 0).unwrap()[3];
                prop_assert_eq!(alpha > 0, v > threshold);
            }
        }
    }
}
