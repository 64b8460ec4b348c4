//! Decoded texture container.

/// How a texture's pixel values should be interpreted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Display-referred imagery (color maps, masks).
    Srgb,
    /// Linear data (height fields); must not be gamma-converted.
    Linear,
}

/// A decoded RGBA8 pixel buffer tagged with its color-space interpretation.
///
/// Owned by whoever requested the decode; the decoder never retains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAsset {
    /// RGBA pixel data, 4 bytes per pixel, row-major from the top row.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color-space tag.
    pub color_space: ColorSpace,
}

impl TextureAsset {
    /// Create a new texture asset.
    #[must_use]
    pub fn new(data: Vec<u8>, width: u32, height: u32, color_space: ColorSpace) -> Self {
        Self {
            data,
            width,
            height,
            color_space,
        }
    }

    /// Check that the buffer length matches the declared dimensions.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize) * 4
    }

    /// The RGBA bytes of one pixel, or `None` when out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}
