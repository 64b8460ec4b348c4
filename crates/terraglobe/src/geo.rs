//! Geographic coordinate and orientation math.
//!
//! Converts between geographic coordinates, unit directions on the globe
//! surface, and globe orientations. The base textures carry a fixed
//! longitude offset, so every conversion applies [`LONGITUDE_SHIFT_DEG`]
//! before the spherical projection and its inverse on the way back.

use glam::{DQuat, DVec3, EulerRot};

/// Longitude texture shift in degrees (observed map offset).
pub const LONGITUDE_SHIFT_DEG: f64 = 90.0;

/// A point on the globe in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in [-90, 90].
    pub latitude: f64,
    /// Longitude in (-180, 180].
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, normalizing the longitude into (-180, 180].
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude: normalize_longitude(longitude),
        }
    }
}

/// A globe orientation as yaw (about Y) and pitch (about X), in radians.
///
/// Roll is never used: it is visually irrelevant for framing a point and is
/// dropped when decomposing a full rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Rotation about the vertical axis.
    pub yaw: f64,
    /// Rotation about the horizontal axis.
    pub pitch: f64,
}

/// An exact focus rotation: the Euler decomposition plus the full
/// quaternion it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusRotation {
    /// Yaw/pitch decomposition (YXZ order, roll discarded).
    pub orientation: Orientation,
    /// The full shortest-arc rotation.
    pub rotation: DQuat,
}

/// Normalize a longitude into (-180, 180].
#[must_use]
pub fn normalize_longitude(longitude: f64) -> f64 {
    let mut lon = longitude;
    while lon > 180.0 {
        lon -= 360.0;
    }
    while lon <= -180.0 {
        lon += 360.0;
    }
    lon
}

/// Convert geographic coordinates to a unit direction on the globe surface.
#[must_use]
pub fn to_direction(point: GeoPoint) -> DVec3 {
    let raw_lon = (point.longitude + LONGITUDE_SHIFT_DEG).to_radians();
    let lat = point.latitude.to_radians();
    let cos_lat = lat.cos();
    DVec3::new(cos_lat * raw_lon.sin(), lat.sin(), cos_lat * raw_lon.cos())
}

/// Convert a direction back to geographic coordinates.
///
/// Inverse of [`to_direction`]: round-trips within 1e-4 degrees for all
/// valid points away from the poles (longitude is undefined at the poles).
#[must_use]
pub fn from_direction(direction: DVec3) -> GeoPoint {
    let p = direction.normalize();
    let latitude = p.y.clamp(-1.0, 1.0).asin().to_degrees();
    let raw_longitude = p.x.atan2(p.z).to_degrees();
    GeoPoint {
        latitude,
        longitude: normalize_longitude(raw_longitude - LONGITUDE_SHIFT_DEG),
    }
}

/// Globe orientation that frames the given coordinates toward the canonical
/// forward axis.
///
/// Two-axis approximation with no roll. Adequate for "point this location
/// up" framing; use [`exact_focus_orientation`] when the viewer direction
/// has been moved off the forward axis.
#[must_use]
pub fn rotation_for_lat_lon(latitude: f64, longitude: f64) -> Orientation {
    let raw_lon = longitude + LONGITUDE_SHIFT_DEG;
    Orientation {
        yaw: -raw_lon.to_radians(),
        pitch: latitude.to_radians(),
    }
}

/// The minimal globe rotation mapping `local` onto `viewer`.
///
/// `local` is a surface direction *before* any globe rotation is applied;
/// `viewer` points from the globe center toward the camera. The result
/// satisfies `rotation * local ≈ viewer` within 1e-4.
///
/// The antipodal case (`dot ≈ -1`) has no unique shortest arc; it is
/// resolved by rotating 180° about an axis orthogonal to `local`.
#[must_use]
pub fn exact_focus_orientation(local: DVec3, viewer: DVec3) -> FocusRotation {
    let from = local.normalize();
    let to = viewer.normalize();

    let rotation = if from.dot(to) < -0.999_999 {
        // Pick whichever basis axis is further from `from` to build a
        // stable orthogonal rotation axis.
        let basis = if DVec3::X.cross(from).length() > 0.1 {
            DVec3::X
        } else {
            DVec3::Y
        };
        DQuat::from_axis_angle(basis.cross(from).normalize(), std::f64::consts::PI)
    } else {
        DQuat::from_rotation_arc(from, to)
    };

    let (yaw, pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
    FocusRotation {
        orientation: Orientation { yaw, pitch },
        rotation,
    }
}

/// The representative of `to - from` within (-π, π].
///
/// Animating toward `from + shortest_angle_delta(from, to)` always takes the
/// shorter rotational path.
#[must_use]
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    let mut delta = (to - from) % std::f64::consts::TAU;
    if delta > std::f64::consts::PI {
        delta -= std::f64::consts::TAU;
    }
    if delta <= -std::f64::consts::PI {
        delta += std::f64::consts::TAU;
    }
    delta
}
