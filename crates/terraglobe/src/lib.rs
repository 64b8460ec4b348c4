//! Core state and math for an interactive Earth globe.
//!
//! This crate owns everything about a globe except the rendering: the
//! coordinate math relating geographic positions to globe directions, the
//! focus animation that frames a point toward the camera, and the registry
//! of raster overlay layers fetched and decoded in the background.
//!
//! # Design principles
//!
//! - **Renderer-agnostic**: Outputs are orientations, distances, textures
//!   and draw parameters; the host draws them however it likes
//! - **Runtime-agnostic**: Async work goes through the [`Spawn`] seam and
//!   returns plain futures; any executor works
//! - **Sync decoding**: Raster decoding is synchronous in
//!   [`terraglobe_decode`]; this crate parallelizes around it
//!
//! # Example
//!
//! ```ignore
//! use terraglobe::{Client, FocusController, FocusTarget, OverlayRegistry, Source};
//!
//! let client = std::sync::Arc::new(Client::new(Source::Remote {
//!     base_url: "https://example.com".to_string(),
//! }));
//! let mut overlays = OverlayRegistry::new(client.clone());
//! overlays.initialize(&client.fetch_listing("storms").await?);
//!
//! let mut focus = FocusController::new(Default::default(), Default::default(), 4.0);
//! focus.start(FocusTarget::from_orientation(
//!     terraglobe::rotation_for_lat_lon(37.5, 127.0),
//! ));
//! // Per frame:
//! focus.tick(dt);
//! overlays.update(&spawner);
//! ```

pub mod cache;
pub mod catalog;
mod client;
mod error;
pub mod focus;
pub mod geo;
pub mod orbit;
pub mod overlay;
pub mod runtime;
pub mod scene;

pub use cache::{Cache, MemoryCache, NoCache};
pub use catalog::{Listing, ListingEntry, SUPPORTED_EXTENSIONS};
pub use client::{Client, Source};
pub use error::{Error, Result};
pub use focus::{FocusConfig, FocusController, FocusMode, FocusState, FocusTarget};
pub use geo::{
    exact_focus_orientation, from_direction, normalize_longitude, rotation_for_lat_lon,
    shortest_angle_delta, to_direction, FocusRotation, GeoPoint, Orientation,
};
pub use orbit::OrientationTracker;
pub use overlay::{LayerStatus, OverlayLayer, OverlayRegistry, DEFAULT_OPACITY, PALETTE};
pub use runtime::{BoxFuture, Spawn};
pub use scene::{overlay_materials, BackfaceDimming, OverlayMaterial, OVERLAY_RENDER_ORDER_BASE};

// Re-export decode types for convenience.
pub use terraglobe_decode::{BandSample, ColorSpace, RasterGrid, TextureAsset};
