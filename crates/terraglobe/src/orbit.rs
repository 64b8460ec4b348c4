//! Orientation tracking for external orbit input.
//!
//! The focus animation owns the globe rotation, but the user can still drag
//! the camera around it. This tracker records the camera's spherical angles
//! against a baseline so that drag offsets accumulated *during* a focus can
//! be folded back into the focus target.

use crate::geo::Orientation;

/// Tracks camera azimuth/polar angles relative to a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationTracker {
    baseline_azimuth: f64,
    baseline_polar: f64,
    azimuth: f64,
    polar: f64,
}

impl OrientationTracker {
    /// Tracker with both the baseline and the live angles at the given
    /// position.
    #[must_use]
    pub fn new(azimuth: f64, polar: f64) -> Self {
        Self {
            baseline_azimuth: azimuth,
            baseline_polar: polar,
            azimuth,
            polar,
        }
    }

    /// Record the camera's current spherical angles, in radians.
    pub fn set_angles(&mut self, azimuth: f64, polar: f64) {
        self.azimuth = azimuth;
        self.polar = polar;
    }

    /// Accumulated azimuthal drag since the last rebaseline.
    ///
    /// Positive azimuthal camera motion reads the globe the other way, so
    /// the offset maps onto yaw with the same sign as the azimuth delta.
    #[must_use]
    pub fn yaw_offset(&self) -> f64 {
        self.azimuth - self.baseline_azimuth
    }

    /// Accumulated polar drag since the last rebaseline.
    ///
    /// Polar angle grows downward while pitch grows upward, hence the sign
    /// flip.
    #[must_use]
    pub fn pitch_offset(&self) -> f64 {
        -(self.polar - self.baseline_polar)
    }

    /// Make the current angles the new baseline, zeroing both offsets.
    pub fn rebaseline(&mut self) {
        self.baseline_azimuth = self.azimuth;
        self.baseline_polar = self.polar;
    }

    /// Fold the accumulated offsets into a focus target orientation.
    #[must_use]
    pub fn adjust_target(&self, target: Orientation) -> Orientation {
        Orientation {
            yaw: target.yaw + self.yaw_offset(),
            pitch: target.pitch + self.pitch_offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_start_at_zero() {
        let tracker = OrientationTracker::new(0.4, 1.2);
        assert_eq!(tracker.yaw_offset(), 0.0);
        assert_eq!(tracker.pitch_offset(), 0.0);
    }

    #[test]
    fn test_offsets_track_drag() {
        let mut tracker = OrientationTracker::new(0.0, 1.5);
        tracker.set_angles(0.3, 1.4);

        assert!((tracker.yaw_offset() - 0.3).abs() < 1e-12);
        assert!((tracker.pitch_offset() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rebaseline_zeroes_offsets() {
        let mut tracker = OrientationTracker::new(0.0, 1.5);
        tracker.set_angles(0.3, 1.4);
        tracker.rebaseline();

        assert_eq!(tracker.yaw_offset(), 0.0);
        assert_eq!(tracker.pitch_offset(), 0.0);
    }

    #[test]
    fn test_adjust_target_applies_offsets() {
        let mut tracker = OrientationTracker::new(0.0, 1.5);
        tracker.set_angles(0.2, 1.6);

        let adjusted = tracker.adjust_target(Orientation {
            yaw: 1.0,
            pitch: 0.5,
        });

        assert!((adjusted.yaw - 1.2).abs() < 1e-12);
        assert!((adjusted.pitch - 0.4).abs() < 1e-12);
    }
}
