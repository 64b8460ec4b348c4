//! Focus animation state machine.
//!
//! Drives the globe orientation and camera distance toward a target point:
//! `Idle -> Focusing -> Focused -> Unfocusing -> Idle`. Every phase captures
//! the *live* orientation and distance as its start, so motion stays
//! continuous across transitions even when a phase is interrupted.

use glam::{DQuat, DVec3, EulerRot};

use crate::geo::{FocusRotation, Orientation, shortest_angle_delta};

/// Tunables for the focus animation.
#[derive(Debug, Clone, Copy)]
pub struct FocusConfig {
    /// Animation duration in seconds.
    pub duration: f64,
    /// Camera distance from the globe center while focused.
    pub target_distance: f64,
    /// Angular distance below which a re-focus on the same point is absorbed
    /// as a no-op, in radians.
    pub refocus_epsilon: f64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            duration: 1.1,
            target_distance: 2.0,
            refocus_epsilon: 0.002,
        }
    }
}

/// Animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusMode {
    /// No animation running, globe under external control.
    #[default]
    Idle,
    /// Animating toward the focus target.
    Focusing,
    /// Holding the focus target.
    Focused,
    /// Animating back to the pre-focus baseline.
    Unfocusing,
}

/// A requested focus target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusTarget {
    /// Euler target orientation.
    pub orientation: Orientation,
    /// Full target rotation, when the caller computed an exact one.
    pub rotation: Option<DQuat>,
    /// Target camera distance; the configured default when `None`.
    pub distance: Option<f64>,
}

impl FocusTarget {
    /// Target from a plain Euler orientation (approximate framing).
    #[must_use]
    pub fn from_orientation(orientation: Orientation) -> Self {
        Self {
            orientation,
            rotation: None,
            distance: None,
        }
    }

    /// Target from an exact focus rotation.
    #[must_use]
    pub fn from_rotation(focus: FocusRotation) -> Self {
        Self {
            orientation: focus.orientation,
            rotation: Some(focus.rotation),
            distance: None,
        }
    }

    /// Override the target camera distance.
    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}

/// The animation bookkeeping for one globe.
///
/// Mutated only by [`FocusController`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FocusState {
    /// Current phase.
    pub mode: FocusMode,
    /// Raw animation progress in [0, 1]; non-decreasing while `mode` is not
    /// [`FocusMode::Idle`].
    pub progress: f64,
    /// Orientation captured when the current phase started.
    pub start_orientation: Orientation,
    /// Orientation this phase is animating toward (angles already adjusted
    /// onto the shorter rotational path).
    pub target_orientation: Orientation,
    /// Full start rotation, when known.
    pub start_rotation: Option<DQuat>,
    /// Full target rotation, when known.
    pub target_rotation: Option<DQuat>,
    /// Camera distance captured when the current phase started.
    pub start_distance: f64,
    /// Camera distance this phase is animating toward.
    pub target_distance: f64,
}

/// The focus/camera animation controller.
///
/// Owns the live globe orientation and camera distance and is the only
/// mutator of its [`FocusState`]. Never errors: redundant or invalid targets
/// are absorbed as no-ops.
#[derive(Debug, Clone)]
pub struct FocusController {
    config: FocusConfig,
    state: FocusState,
    orientation: Orientation,
    rotation: Option<DQuat>,
    distance: f64,
    baseline_orientation: Orientation,
    baseline_rotation: Option<DQuat>,
    baseline_distance: f64,
}

impl FocusController {
    /// Create a controller at the given starting orientation and distance.
    #[must_use]
    pub fn new(config: FocusConfig, orientation: Orientation, distance: f64) -> Self {
        Self {
            config,
            state: FocusState::default(),
            orientation,
            rotation: None,
            distance,
            baseline_orientation: orientation,
            baseline_rotation: None,
            baseline_distance: distance,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn mode(&self) -> FocusMode {
        self.state.mode
    }

    /// The animation state, for observation only.
    #[must_use]
    pub fn state(&self) -> &FocusState {
        &self.state
    }

    /// Live globe orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Live full rotation, when the current motion came from an exact target.
    #[must_use]
    pub fn rotation(&self) -> Option<DQuat> {
        self.rotation
    }

    /// Live camera distance from the globe center.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Camera position preserving the camera's current direction from the
    /// globe center; only the radial distance is controlled.
    #[must_use]
    pub fn camera_position(&self, camera_direction: DVec3) -> DVec3 {
        camera_direction.normalize() * self.distance
    }

    /// External perturbation hook (e.g. orbit-controls zoom).
    pub fn set_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    /// External orientation override while idle.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.rotation = None;
    }

    /// Start animating toward a target.
    ///
    /// No-op while already focusing. No-op while focused when the requested
    /// Euler target is within the re-focus epsilon of the current
    /// orientation and no exact rotation was supplied.
    pub fn start(&mut self, target: FocusTarget) {
        match self.state.mode {
            FocusMode::Focusing => {
                tracing::debug!("focus already in progress, ignoring new target");
                return;
            }
            FocusMode::Focused if target.rotation.is_none() => {
                let dy = shortest_angle_delta(self.orientation.yaw, target.orientation.yaw);
                let dp = shortest_angle_delta(self.orientation.pitch, target.orientation.pitch);
                if dy.hypot(dp) < self.config.refocus_epsilon {
                    tracing::debug!("target within refocus epsilon, ignoring");
                    return;
                }
            }
            _ => {}
        }

        // The pre-focus baseline is what unfocus returns to; capture it only
        // when leaving Idle so chained re-focuses keep the original one.
        if self.state.mode == FocusMode::Idle {
            self.baseline_orientation = self.orientation;
            self.baseline_rotation = self.rotation;
            self.baseline_distance = self.distance;
        }

        self.state.start_orientation = self.orientation;
        self.state.start_rotation = self.rotation;
        self.state.start_distance = self.distance;

        // Adjust each target angle onto the representative within (-pi, pi]
        // of its delta so the shorter rotational path is taken.
        self.state.target_orientation = Orientation {
            yaw: self.orientation.yaw
                + shortest_angle_delta(self.orientation.yaw, target.orientation.yaw),
            pitch: self.orientation.pitch
                + shortest_angle_delta(self.orientation.pitch, target.orientation.pitch),
        };
        self.state.target_rotation = target.rotation;
        self.state.target_distance = target.distance.unwrap_or(self.config.target_distance);

        self.state.mode = FocusMode::Focusing;
        self.state.progress = 0.0;
    }

    /// Cancel the focus and animate back to the pre-focus baseline.
    ///
    /// No-op unless focusing or focused.
    pub fn unfocus(&mut self) {
        if !matches!(self.state.mode, FocusMode::Focusing | FocusMode::Focused) {
            return;
        }

        self.state.start_orientation = self.orientation;
        self.state.start_rotation = self.rotation;
        self.state.start_distance = self.distance;

        self.state.target_orientation = Orientation {
            yaw: self.orientation.yaw
                + shortest_angle_delta(self.orientation.yaw, self.baseline_orientation.yaw),
            pitch: self.orientation.pitch
                + shortest_angle_delta(self.orientation.pitch, self.baseline_orientation.pitch),
        };
        self.state.target_rotation = self.baseline_rotation;
        self.state.target_distance = self.baseline_distance;

        self.state.mode = FocusMode::Unfocusing;
        self.state.progress = 0.0;
    }

    /// Advance the animation by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        match self.state.mode {
            FocusMode::Idle => {}
            FocusMode::Focused => {
                // Defensive: external input may have perturbed the distance.
                self.distance = self.state.target_distance;
            }
            FocusMode::Focusing | FocusMode::Unfocusing => {
                self.state.progress = (self.state.progress + dt / self.config.duration).min(1.0);
                let raw = self.state.progress;
                let k = raw * raw * (3.0 - 2.0 * raw); // smoothstep

                self.apply_interpolation(k);

                if raw >= 1.0 {
                    let finished_focusing = self.state.mode == FocusMode::Focusing;
                    self.state.mode = if finished_focusing {
                        FocusMode::Focused
                    } else {
                        FocusMode::Idle
                    };
                    self.state.progress = 0.0;
                }
            }
        }
    }

    fn apply_interpolation(&mut self, k: f64) {
        // Slerp is primary; independent Euler interpolation is the
        // compatibility fallback when no full rotations are known.
        if let (Some(start), Some(target)) = (self.state.start_rotation, self.state.target_rotation)
        {
            let q = start.slerp(target, k);
            let (yaw, pitch, _roll) = q.to_euler(EulerRot::YXZ);
            self.orientation = Orientation { yaw, pitch };
            self.rotation = Some(q);
        } else {
            let s = self.state.start_orientation;
            let t = self.state.target_orientation;
            self.orientation = Orientation {
                yaw: s.yaw + (t.yaw - s.yaw) * k,
                pitch: s.pitch + (t.pitch - s.pitch) * k,
            };
            // The full target rotation only holds once the interpolation has
            // actually arrived there.
            self.rotation = if k >= 1.0 {
                self.state.target_rotation
            } else {
                None
            };
        }

        self.distance = self.state.start_distance
            + (self.state.target_distance - self.state.start_distance) * k;
    }
}
