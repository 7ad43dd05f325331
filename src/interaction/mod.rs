use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::CameraState;
use crate::error::{GrapherError, GrapherResult};

pub const PAN_SENSITIVITY: f32 = 0.01;
pub const ZOOM_SENSITIVITY: f32 = 0.01;
pub const SMOOTHING_FACTOR: f32 = 0.1;
pub const MIN_ZOOM: f32 = 0.0001;

/// Target the camera eases toward right after the engine comes up.
pub const INITIAL_TARGET: CameraState = CameraState {
    rotation_x: PI / -8.0,
    rotation_y: PI / 5.0,
    zoom: 1.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Dragging,
}

/// Input-to-camera tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTuning {
    /// Radians of rotation per pixel of pointer movement.
    pub pan_sensitivity: f32,
    /// Zoom units per wheel delta unit.
    pub zoom_sensitivity: f32,
    /// Fraction of the remaining distance covered each frame, in `(0, 1]`.
    pub smoothing_factor: f32,
    /// Lower bound of target zoom. Must be positive.
    pub min_zoom: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            pan_sensitivity: PAN_SENSITIVITY,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            smoothing_factor: SMOOTHING_FACTOR,
            min_zoom: MIN_ZOOM,
        }
    }
}

impl CameraTuning {
    pub fn validate(self) -> GrapherResult<()> {
        if !self.pan_sensitivity.is_finite() || !self.zoom_sensitivity.is_finite() {
            return Err(GrapherError::InvalidData(
                "camera sensitivities must be finite".to_owned(),
            ));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(GrapherError::InvalidData(format!(
                "smoothing factor must be in (0, 1], got {}",
                self.smoothing_factor
            )));
        }
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(GrapherError::InvalidData(format!(
                "min zoom must be finite and > 0, got {}",
                self.min_zoom
            )));
        }
        Ok(())
    }
}

/// Turns pointer and wheel input into a camera target.
///
/// The controller never smooths; the frame loop eases the engine's live
/// camera toward [`CameraController::current_target`] once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    mode: InteractionMode,
    tuning: CameraTuning,
    target: CameraState,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraTuning::default(), INITIAL_TARGET)
    }
}

impl CameraController {
    #[must_use]
    pub fn new(tuning: CameraTuning, initial_target: CameraState) -> Self {
        let mut target = initial_target;
        target.zoom = target.zoom.max(tuning.min_zoom);
        Self {
            mode: InteractionMode::Idle,
            tuning,
            target,
        }
    }

    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn is_pointer_down(self) -> bool {
        self.mode == InteractionMode::Dragging
    }

    #[must_use]
    pub fn tuning(self) -> CameraTuning {
        self.tuning
    }

    #[must_use]
    pub fn current_target(self) -> CameraState {
        self.target
    }

    pub fn on_pointer_down(&mut self) {
        self.mode = InteractionMode::Dragging;
    }

    pub fn on_pointer_up(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    /// Re-anchors the target rotation on `live` and offsets it by the move.
    ///
    /// Ignored unless the pointer is down, and for non-finite deltas.
    /// Returns whether the target changed.
    pub fn on_pointer_move(&mut self, live: CameraState, delta_x: f32, delta_y: f32) -> bool {
        if !self.is_pointer_down() {
            return false;
        }
        if !delta_x.is_finite() || !delta_y.is_finite() {
            trace!(delta_x, delta_y, "non-finite pointer move dropped");
            return false;
        }
        self.target.rotation_x = live.rotation_x - delta_y * self.tuning.pan_sensitivity;
        self.target.rotation_y = live.rotation_y - delta_x * self.tuning.pan_sensitivity;
        trace!(
            rotation_x = self.target.rotation_x,
            rotation_y = self.target.rotation_y,
            "camera target rotated"
        );
        true
    }

    /// Sets target zoom from `live` and the wheel delta. Not gated.
    ///
    /// The absolute value means a scroll that would cross zero bounces back
    /// to a positive zoom instead of stopping at the floor. A non-finite
    /// delta is dropped. Returns whether the target changed.
    pub fn on_wheel(&mut self, live: CameraState, delta_z: f32) -> bool {
        if !delta_z.is_finite() {
            trace!(delta_z, "non-finite wheel delta dropped");
            return false;
        }
        let zoom = (live.zoom + delta_z * self.tuning.zoom_sensitivity).abs();
        self.target.zoom = zoom.max(self.tuning.min_zoom);
        trace!(zoom = self.target.zoom, "camera target zoomed");
        true
    }
}
