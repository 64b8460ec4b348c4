//! Geospatial grid container parsing.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};

use crate::error::{DecodeError, DecodeResult};

/// A parsed raster grid: interleaved row-major samples as `f32`.
///
/// All band-level readers in this crate consume this representation, so a
/// resource is parsed exactly once regardless of how many output shapes are
/// derived from it. Sample values keep their stored numeric range (8-bit
/// imagery stays 0..=255, float elevation stays in meters).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    width: u32,
    height: u32,
    samples_per_pixel: usize,
    samples: Vec<f32>,
}

impl RasterGrid {
    /// Build a grid from already-interleaved samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample count does not match
    /// `width * height * samples_per_pixel` or the grid is empty.
    pub fn new(
        width: u32,
        height: u32,
        samples_per_pixel: usize,
        samples: Vec<f32>,
    ) -> DecodeResult<Self> {
        let expected = width as usize * height as usize * samples_per_pixel;
        if expected == 0 {
            return Err(DecodeError::EmptyRaster);
        }
        if samples.len() != expected {
            return Err(DecodeError::Parse {
                context: "raster grid",
                detail: format!(
                    "expected {expected} samples for {width}x{height}x{samples_per_pixel}, got {}",
                    samples.len()
                ),
            });
        }
        Ok(Self {
            width,
            height,
            samples_per_pixel,
            samples,
        })
    }

    /// Parse a TIFF grid container from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is malformed, uses a sample layout
    /// this crate does not read, or has zero pixels.
    pub fn from_tiff_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        let mut decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| DecodeError::Parse {
            context: "tiff header",
            detail: e.to_string(),
        })?;

        let (width, height) = decoder.dimensions().map_err(|e| DecodeError::Parse {
            context: "tiff dimensions",
            detail: e.to_string(),
        })?;

        let color_type = decoder.colortype().map_err(|e| DecodeError::Parse {
            context: "tiff color type",
            detail: e.to_string(),
        })?;
        let samples_per_pixel = match color_type {
            ColorType::Gray(_) => 1,
            ColorType::GrayA(_) => 2,
            ColorType::RGB(_) => 3,
            ColorType::RGBA(_) => 4,
            other => {
                return Err(DecodeError::UnsupportedFormat {
                    detail: format!("color type {other:?}"),
                });
            }
        };

        let image = decoder.read_image().map_err(|e| DecodeError::Parse {
            context: "tiff image data",
            detail: e.to_string(),
        })?;
        let samples = decoding_result_to_f32(image);

        Self::new(width, height, samples_per_pixel, samples)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Declared sample count per pixel.
    #[must_use]
    pub fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    /// Number of pixels.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Interleaved samples, row-major.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// De-interleave one band.
    ///
    /// # Errors
    ///
    /// Returns an error if `band` is not below `samples_per_pixel`.
    pub fn band(&self, band: usize) -> DecodeResult<Vec<f32>> {
        if band >= self.samples_per_pixel {
            return Err(DecodeError::UnsupportedFormat {
                detail: format!(
                    "band {band} requested from a {}-sample raster",
                    self.samples_per_pixel
                ),
            });
        }
        Ok(self
            .samples
            .iter()
            .skip(band)
            .step_by(self.samples_per_pixel)
            .copied()
            .collect())
    }

    /// Observed minimum and maximum over one band.
    ///
    /// # Errors
    ///
    /// Returns an error if `band` is not below `samples_per_pixel`.
    pub fn band_min_max(&self, band: usize) -> DecodeResult<(f32, f32)> {
        let values = self.band(band)?;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &values {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        Ok((min, max))
    }
}

#[allow(clippy::cast_precision_loss)]
fn decoding_result_to_f32(result: DecodingResult) -> Vec<f32> {
    match result {
        DecodingResult::U8(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => v.into_iter().map(|x| x as f32).collect(),
    }
}
