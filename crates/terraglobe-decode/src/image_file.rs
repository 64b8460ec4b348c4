//! Ordinary image decoding (PNG, JPEG, WebP).

use crate::error::{DecodeError, DecodeResult};
use crate::texture::{ColorSpace, TextureAsset};

/// Decode an ordinary image file into a display-referred RGBA texture.
///
/// Covers the overlay formats that are not grid containers: `.png`, `.jpg`,
/// `.jpeg` and `.webp`.
///
/// # Errors
///
/// Returns an error if the bytes are not a decodable image.
pub fn decode_image_texture(bytes: &[u8]) -> DecodeResult<TextureAsset> {
    let image = image::load_from_memory(bytes).map_err(|e| DecodeError::Parse {
        context: "image file",
        detail: e.to_string(),
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyRaster);
    }

    Ok(TextureAsset::new(
        rgba.into_raw(),
        width,
        height,
        ColorSpace::Srgb,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32, fill: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba(fill));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_png_roundtrip() {
        let bytes = encode_png(2, 3, [10, 20, 30, 255]);
        let tex = decode_image_texture(&bytes).unwrap();

        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(tex.color_space, ColorSpace::Srgb);
        assert!(tex.is_valid());
        assert_eq!(tex.pixel(1, 2), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = decode_image_texture(&[1, 2, 3, 4, 5]);
        assert!(matches!(result, Err(DecodeError::Parse { .. })));
    }
}
