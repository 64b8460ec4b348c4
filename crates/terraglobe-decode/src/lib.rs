//! Decode geospatial raster grids into globe-ready pixel data.
//!
//! This crate turns a raster resource (a TIFF grid container or an ordinary
//! image file) into one of four output shapes:
//!
//! - [`decode_color_texture`]: RGBA color imagery for the globe surface
//! - [`decode_height_field`]: a linear height field normalized to the band's
//!   observed value range
//! - [`decode_mask_texture`]: above-threshold samples painted a caller color,
//!   everything else fully transparent
//! - [`decode_band_sample`]: the raw first band as a dense float array for
//!   point-value queries
//!
//! All decoding is synchronous and deterministic: identical input bytes with
//! identical options produce byte-identical output. Failures are
//! all-or-nothing; no function ever returns a partially populated texture.

mod color;
mod error;
mod grid;
mod height;
mod image_file;
mod mask;
mod sample;
mod texture;

pub use color::decode_color_texture;
pub use error::{DecodeError, DecodeResult};
pub use grid::RasterGrid;
pub use height::{HeightFieldOptions, decode_height_field};
pub use image_file::decode_image_texture;
pub use mask::{MaskOptions, decode_mask_texture};
pub use sample::{BandSample, decode_band_sample};
pub use texture::{ColorSpace, TextureAsset};
