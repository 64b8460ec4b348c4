//! Color texture decoding.

use crate::grid::RasterGrid;
use crate::texture::{ColorSpace, TextureAsset};

/// Diagnostic fill for rasters with a sample layout the color path does not
/// map (magenta). Rendering this instead of failing keeps the rest of the
/// scene alive and makes the bad layer obvious on screen.
const FALLBACK_PIXEL: [u8; 4] = [255, 0, 255, 255];

/// Decode a grid into a display-referred RGBA color texture.
///
/// - 3 samples per pixel: direct RGB with opaque alpha
/// - 4 samples per pixel: pass-through RGBA
/// - 1 sample per pixel: grayscale broadcast to RGB with opaque alpha
/// - any other count: every pixel becomes the fixed diagnostic fallback color
///
/// The fallback is a defined policy, not an error; this function cannot fail
/// once a grid has been parsed.
#[must_use]
pub fn decode_color_texture(grid: &RasterGrid) -> TextureAsset {
    let pixels = grid.pixel_count();
    let samples = grid.samples();
    let mut data = vec![0u8; pixels * 4];

    match grid.samples_per_pixel() {
        3 => {
            for (dst, src) in data.chunks_exact_mut(4).zip(samples.chunks_exact(3)) {
                dst[0] = clamp_u8(src[0]);
                dst[1] = clamp_u8(src[1]);
                dst[2] = clamp_u8(src[2]);
                dst[3] = 255;
            }
        }
        4 => {
            for (dst, src) in data.chunks_exact_mut(4).zip(samples.chunks_exact(4)) {
                dst[0] = clamp_u8(src[0]);
                dst[1] = clamp_u8(src[1]);
                dst[2] = clamp_u8(src[2]);
                dst[3] = clamp_u8(src[3]);
            }
        }
        1 => {
            for (dst, &v) in data.chunks_exact_mut(4).zip(samples.iter()) {
                let v = clamp_u8(v);
                dst[0] = v;
                dst[1] = v;
                dst[2] = v;
                dst[3] = 255;
            }
        }
        _ => {
            for dst in data.chunks_exact_mut(4) {
                dst.copy_from_slice(&FALLBACK_PIXEL);
            }
        }
    }

    TextureAsset::new(data, grid.width(), grid.height(), ColorSpace::Srgb)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
