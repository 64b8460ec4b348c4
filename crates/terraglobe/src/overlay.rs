//! Overlay layer registry.
//!
//! Tracks the overlay layers of one globe: which rasters exist, which are
//! visible, what each has decoded to, and in what order they draw. Fetching
//! and decoding run in the background; results are applied on the next
//! [`OverlayRegistry::update`] call, so the registry itself is never
//! blocked on I/O.

use std::sync::Arc;

use terraglobe_decode::{
    decode_image_texture, decode_mask_texture, MaskOptions, RasterGrid, TextureAsset,
};

use crate::cache::{Cache, NoCache};
use crate::catalog::Listing;
use crate::client::Client;
use crate::error::Result;
use crate::runtime::Spawn;

/// Default layer opacity.
pub const DEFAULT_OPACITY: f64 = 0.9;

/// Tint colors assigned to mask layers round-robin, RGB.
pub const PALETTE: [[u8; 3]; 15] = [
    [0x37, 0xff, 0x00],
    [0x00, 0x88, 0xff],
    [0xff, 0x88, 0x00],
    [0xff, 0x00, 0x88],
    [0x00, 0xff, 0x88],
    [0xff, 0xff, 0xff],
    [0x88, 0xff, 0x00],
    [0xff, 0x00, 0x88],
    [0x00, 0x88, 0xff],
    [0xff, 0x88, 0x00],
    [0x88, 0x00, 0xff],
    [0x00, 0xff, 0xff],
    [0xff, 0xff, 0x00],
    [0xff, 0x44, 0x00],
    [0x44, 0xff, 0x00],
];

/// Lifecycle of one layer's texture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LayerStatus {
    /// Not yet requested.
    #[default]
    Idle,
    /// A fetch-and-decode task is in flight.
    Loading,
    /// Decoded; the texture is available.
    Ready,
    /// Fetch or decode failed. Stays failed until the source changes.
    Failed(String),
}

/// One overlay layer.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    /// Display name (the file stem).
    pub name: String,
    /// Served path of the raster, also the layer's identity.
    pub source_path: String,
    /// Lowercase extension with the leading dot.
    pub extension: String,
    /// Tint used when the raster decodes as a value mask.
    pub color: [u8; 3],
    /// Blend opacity in [0, 1].
    pub opacity: f64,
    /// Whether the layer should draw (and hence be decoded).
    pub visible: bool,
    /// Draw order; lower draws first.
    pub order: u32,
    /// Registration sequence number, the tie-break for equal orders.
    pub seq: u64,
    /// Texture lifecycle.
    pub status: LayerStatus,
    /// Decoded texture once [`LayerStatus::Ready`].
    pub texture: Option<TextureAsset>,
}

impl OverlayLayer {
    /// Whether a raster with this extension decodes as a value mask rather
    /// than an ordinary image.
    #[must_use]
    pub fn is_mask(&self) -> bool {
        self.extension == ".tif" || self.extension == ".tiff"
    }
}

struct DecodeOutcome {
    source_path: String,
    result: Result<TextureAsset>,
}

/// The overlay layer registry.
///
/// Single-owner, mutated from the host's frame loop. Background tasks only
/// ever talk back through a channel, never touch the registry directly.
pub struct OverlayRegistry<C: Cache = NoCache> {
    client: Arc<Client<C>>,
    layers: Vec<OverlayLayer>,
    outcome_tx: async_channel::Sender<DecodeOutcome>,
    outcome_rx: async_channel::Receiver<DecodeOutcome>,
    next_seq: u64,
}

impl<C: Cache + 'static> OverlayRegistry<C> {
    /// Registry with no layers.
    #[must_use]
    pub fn new(client: Arc<Client<C>>) -> Self {
        let (outcome_tx, outcome_rx) = async_channel::unbounded();
        Self {
            client,
            layers: Vec::new(),
            outcome_tx,
            outcome_rx,
            next_seq: 0,
        }
    }

    /// The tracked layers, in registration order.
    #[must_use]
    pub fn layers(&self) -> &[OverlayLayer] {
        &self.layers
    }

    /// Look up a layer by its source path.
    #[must_use]
    pub fn layer(&self, source_path: &str) -> Option<&OverlayLayer> {
        self.layers.iter().find(|l| l.source_path == source_path)
    }

    /// Replace the layer set from a folder listing.
    ///
    /// Layers whose source path is unchanged keep their texture, visibility,
    /// opacity and order. Layers with a matching name but a different source
    /// are reset to [`LayerStatus::Idle`]. Layers absent from the listing
    /// are dropped. New layers take palette colors round-robin and draw in
    /// listing order.
    pub fn initialize(&mut self, listing: &Listing) {
        let previous = std::mem::take(&mut self.layers);

        for (idx, entry) in listing.files.iter().enumerate() {
            if let Some(kept) = previous.iter().find(|l| l.source_path == entry.path) {
                self.layers.push(kept.clone());
                continue;
            }

            let order = u32::try_from(idx).unwrap_or(u32::MAX);

            let recolored = previous.iter().find(|l| l.name == entry.name);
            let color = recolored
                .map_or(PALETTE[idx % PALETTE.len()], |l| l.color);

            self.layers.push(OverlayLayer {
                name: entry.name.clone(),
                source_path: entry.path.clone(),
                extension: entry.extension.clone(),
                color,
                opacity: recolored.map_or(DEFAULT_OPACITY, |l| l.opacity),
                visible: recolored.is_some_and(|l| l.visible),
                order,
                seq: self.next_seq,
                status: LayerStatus::Idle,
                texture: None,
            });
            self.next_seq += 1;
        }

        tracing::info!(
            folder = listing.folder,
            layers = self.layers.len(),
            "registry initialized"
        );
    }

    /// Set a layer's visibility. Unknown paths are ignored.
    pub fn set_visible(&mut self, source_path: &str, visible: bool) {
        if let Some(layer) = self.layer_mut(source_path) {
            layer.visible = visible;
        }
    }

    /// Flip a layer's visibility. Unknown paths are ignored.
    pub fn toggle_visible(&mut self, source_path: &str) {
        if let Some(layer) = self.layer_mut(source_path) {
            layer.visible = !layer.visible;
        }
    }

    /// Set a layer's opacity, clamped into [0, 1]. Unknown paths are
    /// ignored.
    pub fn set_opacity(&mut self, source_path: &str, opacity: f64) {
        if let Some(layer) = self.layer_mut(source_path) {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Set a layer's draw order. Unknown paths are ignored.
    pub fn set_order(&mut self, source_path: &str, order: u32) {
        if let Some(layer) = self.layer_mut(source_path) {
            layer.order = order;
        }
    }

    /// Hide every layer. Decoded textures are kept.
    pub fn hide_all(&mut self) {
        for layer in &mut self.layers {
            layer.visible = false;
        }
    }

    /// Show every layer.
    pub fn show_all(&mut self) {
        for layer in &mut self.layers {
            layer.visible = true;
        }
    }

    /// Apply finished decodes and start new ones.
    ///
    /// Called once per frame. Visible idle layers get a background
    /// fetch-and-decode task; an outcome is applied only if its layer is
    /// still tracked with the same source and still loading.
    pub fn update(&mut self, spawner: &impl Spawn) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }

        for layer in &mut self.layers {
            if !(layer.visible && layer.status == LayerStatus::Idle) {
                continue;
            }
            layer.status = LayerStatus::Loading;

            let client = Arc::clone(&self.client);
            let tx = self.outcome_tx.clone();
            let source_path = layer.source_path.clone();
            let mask = layer.is_mask().then(|| MaskOptions {
                color: layer.color,
                ..MaskOptions::default()
            });

            spawner.spawn(Box::pin(async move {
                let result = fetch_and_decode(&client, &source_path, mask).await;
                if let Err(ref e) = result {
                    tracing::error!(source_path, error = %e, "overlay decode failed");
                }
                // Receiver gone means the registry was dropped.
                let _ = tx.send(DecodeOutcome { source_path, result }).await;
            }));
        }
    }

    /// Visible, decoded layers in draw order.
    #[must_use]
    pub fn draw_list(&self) -> Vec<&OverlayLayer> {
        let mut list = self
            .layers
            .iter()
            .filter(|l| l.visible && l.status == LayerStatus::Ready)
            .collect::<Vec<_>>();
        list.sort_by_key(|l| (l.order, l.seq));
        list
    }

    fn layer_mut(&mut self, source_path: &str) -> Option<&mut OverlayLayer> {
        self.layers
            .iter_mut()
            .find(|l| l.source_path == source_path)
    }

    fn apply_outcome(&mut self, outcome: DecodeOutcome) {
        let Some(layer) = self.layer_mut(&outcome.source_path) else {
            // Layer was dropped while its task ran.
            return;
        };
        if layer.status != LayerStatus::Loading {
            return;
        }
        match outcome.result {
            Ok(texture) => {
                layer.texture = Some(texture);
                layer.status = LayerStatus::Ready;
            }
            Err(e) => {
                layer.texture = None;
                layer.status = LayerStatus::Failed(e.to_string());
            }
        }
    }
}

async fn fetch_and_decode<C: Cache>(
    client: &Client<C>,
    source_path: &str,
    mask: Option<MaskOptions>,
) -> Result<TextureAsset> {
    let bytes = client.fetch_bytes(source_path).await?;
    let texture = if let Some(options) = mask {
        let grid = RasterGrid::from_tiff_bytes(&bytes)?;
        decode_mask_texture(&grid, options)?
    } else {
        decode_image_texture(&bytes)?
    };
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Source;
    use crate::runtime::BoxFuture;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn spawner() -> impl Spawn {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        |future: BoxFuture| {
            drop(tokio::spawn(future));
        }
    }

    fn listing(files: &[(&str, &str)]) -> Listing {
        let entries = files
            .iter()
            .enumerate()
            .map(|(idx, (name, ext))| crate::catalog::ListingEntry {
                id: u32::try_from(idx).unwrap() + 1,
                name: (*name).to_string(),
                file: format!("{name}{ext}"),
                path: format!("/storms/{name}{ext}"),
                size: 1,
                extension: (*ext).to_string(),
            })
            .collect::<Vec<_>>();
        Listing {
            success: true,
            folder: "storms".to_string(),
            count: entries.len(),
            files: entries,
        }
    }

    fn registry_over(root: PathBuf) -> OverlayRegistry {
        OverlayRegistry::new(Arc::new(Client::new(Source::Local { root })))
    }

    fn write_png(path: &std::path::Path, fill: [u8; 4]) {
        let image = RgbaImage::from_pixel(2, 2, image::Rgba(fill));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        std::fs::write(path, buf.into_inner()).unwrap();
    }

    fn temp_root(name: &str) -> PathBuf {
        let root =
            std::env::temp_dir().join(format!("terraglobe-overlay-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("storms")).unwrap();
        root
    }

    async fn settle(registry: &mut OverlayRegistry, source_path: &str) {
        let spawner = spawner();
        for _ in 0..200 {
            registry.update(&spawner);
            if registry.layer(source_path).unwrap().status != LayerStatus::Loading {
                return;
            }
            // yield_now never parks the OS thread, which starves the worker
            // thread on single-core machines; a real sleep lets it run.
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
        panic!("layer never settled");
    }

    #[test]
    fn test_initialize_assigns_palette_and_order() {
        let mut registry = registry_over(PathBuf::from("/nonexistent"));
        registry.initialize(&listing(&[("a", ".png"), ("b", ".tif"), ("c", ".webp")]));

        let layers = registry.layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].color, PALETTE[0]);
        assert_eq!(layers[1].color, PALETTE[1]);
        assert_eq!(layers[0].order, 0);
        assert_eq!(layers[2].order, 2);
        assert_eq!(layers[0].opacity, DEFAULT_OPACITY);
        assert!(!layers[0].visible);
        assert_eq!(layers[0].status, LayerStatus::Idle);
        assert!(layers[1].is_mask());
        assert!(!layers[2].is_mask());
    }

    #[test]
    fn test_reinitialize_keeps_unchanged_layers() {
        let mut registry = registry_over(PathBuf::from("/nonexistent"));
        registry.initialize(&listing(&[("a", ".png")]));
        registry.set_visible("/storms/a.png", true);
        registry.set_opacity("/storms/a.png", 0.4);

        registry.initialize(&listing(&[("a", ".png"), ("b", ".png")]));

        let a = registry.layer("/storms/a.png").unwrap();
        assert!(a.visible);
        assert_eq!(a.opacity, 0.4);
        assert_eq!(registry.layers().len(), 2);
    }

    #[test]
    fn test_toggle_visible() {
        let mut registry = registry_over(PathBuf::from("/nonexistent"));
        registry.initialize(&listing(&[("a", ".png")]));

        registry.toggle_visible("/storms/a.png");
        assert!(registry.layer("/storms/a.png").unwrap().visible);
        registry.toggle_visible("/storms/a.png");
        assert!(!registry.layer("/storms/a.png").unwrap().visible);
    }

    #[test]
    fn test_reinitialize_resets_changed_source() {
        let mut registry = registry_over(PathBuf::from("/nonexistent"));
        registry.initialize(&listing(&[("a", ".png")]));
        registry.set_visible("/storms/a.png", true);

        // Same name, new extension: the texture must be re-decoded.
        registry.initialize(&listing(&[("a", ".tif")]));

        let a = registry.layer("/storms/a.tif").unwrap();
        assert_eq!(a.status, LayerStatus::Idle);
        assert!(a.visible);
        assert!(registry.layer("/storms/a.png").is_none());
    }

    #[test]
    fn test_draw_list_sorts_by_order_then_seq() {
        let mut registry = registry_over(PathBuf::from("/nonexistent"));
        registry.initialize(&listing(&[("a", ".png"), ("b", ".png"), ("c", ".png")]));
        for layer in &mut registry.layers {
            layer.visible = true;
            layer.status = LayerStatus::Ready;
            layer.texture = Some(TextureAsset::new(
                vec![0; 4],
                1,
                1,
                terraglobe_decode::ColorSpace::Srgb,
            ));
        }
        registry.set_order("/storms/a.png", 5);
        registry.set_order("/storms/c.png", 0);

        let names = registry
            .draw_list()
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["b", "c", "a"]);
    }

    #[test]
    fn test_hidden_or_undecoded_layers_do_not_draw() {
        let mut registry = registry_over(PathBuf::from("/nonexistent"));
        registry.initialize(&listing(&[("a", ".png"), ("b", ".png")]));
        registry.set_visible("/storms/a.png", true);
        // a is visible but still idle, b is hidden.
        assert!(registry.draw_list().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_visible_layer_loads_and_becomes_ready() {
        let root = temp_root("ready");
        write_png(&root.join("storms/a.png"), [10, 20, 30, 255]);

        let mut registry = registry_over(root.clone());
        registry.initialize(&listing(&[("a", ".png")]));
        registry.set_visible("/storms/a.png", true);

        settle(&mut registry, "/storms/a.png").await;

        let layer = registry.layer("/storms/a.png").unwrap();
        assert_eq!(layer.status, LayerStatus::Ready);
        let texture = layer.texture.as_ref().unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(registry.draw_list().len(), 1);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_hidden_layer_is_never_fetched() {
        let root = temp_root("hidden");
        let mut registry = registry_over(root.clone());
        registry.initialize(&listing(&[("a", ".png")]));

        let spawner = spawner();
        registry.update(&spawner);
        tokio::task::yield_now().await;

        assert_eq!(
            registry.layer("/storms/a.png").unwrap().status,
            LayerStatus::Idle
        );
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_fetch_is_recorded() {
        let root = temp_root("failed");
        let mut registry = registry_over(root.clone());
        registry.initialize(&listing(&[("a", ".png")]));
        registry.set_visible("/storms/a.png", true);

        settle(&mut registry, "/storms/a.png").await;

        let layer = registry.layer("/storms/a.png").unwrap();
        assert!(matches!(layer.status, LayerStatus::Failed(_)));
        assert!(layer.texture.is_none());
        assert!(registry.draw_list().is_empty());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stale_outcome_for_dropped_layer_is_ignored() {
        let root = temp_root("stale");
        write_png(&root.join("storms/a.png"), [1, 2, 3, 255]);

        let mut registry = registry_over(root.clone());
        registry.initialize(&listing(&[("a", ".png")]));
        registry.set_visible("/storms/a.png", true);

        let spawner = spawner();
        registry.update(&spawner);
        // Drop the layer before the task's outcome is applied.
        registry.initialize(&listing(&[("b", ".png")]));

        for _ in 0..50 {
            registry.update(&spawner);
            tokio::task::yield_now().await;
        }

        assert!(registry.layer("/storms/a.png").is_none());
        assert_eq!(
            registry.layer("/storms/b.png").unwrap().status,
            LayerStatus::Idle
        );
        let _ = std::fs::remove_dir_all(&root);
    }
}
