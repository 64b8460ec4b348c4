//! Scene composition helpers.
//!
//! Pure functions mapping registry state onto renderer-facing parameters:
//! draw order, blend opacity and the back-hemisphere dimming factor. No
//! renderer is linked; the host feeds these into whatever it draws with.

use crate::overlay::OverlayLayer;

/// Render order of the first overlay; each further overlay draws one later.
/// The globe surface itself draws below this.
pub const OVERLAY_RENDER_ORDER_BASE: u32 = 250;

/// Dimming applied to overlay fragments on the hemisphere facing away from
/// the camera, so overlays on the far side read as "behind" the globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackfaceDimming {
    /// Brightness multiplier for back-facing fragments, in [0, 1].
    pub back_brightness: f64,
}

impl Default for BackfaceDimming {
    fn default() -> Self {
        Self {
            back_brightness: 0.5,
        }
    }
}

impl BackfaceDimming {
    /// The RGB multiplier for a fragment.
    #[must_use]
    pub fn rgb_factor(&self, front_facing: bool) -> f64 {
        if front_facing {
            1.0
        } else {
            self.back_brightness
        }
    }
}

/// Renderer-facing parameters for one overlay draw.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMaterial {
    /// Source path of the layer this material draws.
    pub source_path: String,
    /// Blend opacity in [0, 1].
    pub opacity: f64,
    /// Back-hemisphere dimming for this draw.
    pub dimming: BackfaceDimming,
    /// Absolute render order.
    pub render_order: u32,
}

/// Build the material list for a draw list, assigning render orders from
/// [`OVERLAY_RENDER_ORDER_BASE`] upward in list position.
#[must_use]
pub fn overlay_materials(
    draw_list: &[&OverlayLayer],
    dimming: BackfaceDimming,
) -> Vec<OverlayMaterial> {
    draw_list
        .iter()
        .enumerate()
        .map(|(idx, layer)| {
            let offset = u32::try_from(idx).unwrap_or(u32::MAX);
            OverlayMaterial {
                source_path: layer.source_path.clone(),
                opacity: layer.opacity,
                dimming,
                render_order: OVERLAY_RENDER_ORDER_BASE + offset,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{LayerStatus, DEFAULT_OPACITY};

    fn layer(name: &str, order: u32, seq: u64) -> OverlayLayer {
        OverlayLayer {
            name: name.to_string(),
            source_path: format!("/storms/{name}.png"),
            extension: ".png".to_string(),
            color: [255, 255, 255],
            opacity: DEFAULT_OPACITY,
            visible: true,
            order,
            seq,
            status: LayerStatus::Ready,
            texture: None,
        }
    }

    #[test]
    fn test_backface_dimming() {
        let dimming = BackfaceDimming::default();
        assert_eq!(dimming.rgb_factor(true), 1.0);
        assert_eq!(dimming.rgb_factor(false), 0.5);
    }

    #[test]
    fn test_materials_take_consecutive_render_orders() {
        let a = layer("a", 0, 0);
        let b = layer("b", 1, 1);
        let materials = overlay_materials(&[&a, &b], BackfaceDimming::default());

        assert_eq!(materials[0].render_order, OVERLAY_RENDER_ORDER_BASE);
        assert_eq!(materials[1].render_order, OVERLAY_RENDER_ORDER_BASE + 1);
        assert_eq!(materials[0].opacity, DEFAULT_OPACITY);
        assert_eq!(materials[0].source_path, "/storms/a.png");
        assert_eq!(materials[0].dimming.back_brightness, 0.5);
    }
}
