use serde::{Deserialize, Serialize};

/// Camera orientation and distance as seen by the engine.
///
/// The same shape is used for the live value held by the engine and for the
/// target maintained by input handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub zoom: f32,
}

impl CameraState {
    #[must_use]
    pub fn new(rotation_x: f32, rotation_y: f32, zoom: f32) -> Self {
        Self {
            rotation_x,
            rotation_y,
            zoom,
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.rotation_x.is_finite() && self.rotation_y.is_finite() && self.zoom.is_finite()
    }

    /// Moves each axis a `factor` fraction of the way toward `target`.
    #[must_use]
    pub fn smoothed_toward(self, target: Self, factor: f32) -> Self {
        Self {
            rotation_x: lerp(self.rotation_x, target.rotation_x, factor),
            rotation_y: lerp(self.rotation_y, target.rotation_y, factor),
            zoom: lerp(self.zoom, target.zoom, factor),
        }
    }

    /// Largest per-axis absolute difference.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        (self.rotation_x - other.rotation_x)
            .abs()
            .max((self.rotation_y - other.rotation_y).abs())
            .max((self.zoom - other.zoom).abs())
    }
}

#[must_use]
pub fn lerp(from: f32, to: f32, factor: f32) -> f32 {
    from + (to - from) * factor
}
