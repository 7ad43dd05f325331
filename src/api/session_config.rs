use serde::{Deserialize, Serialize};

use crate::core::{CameraState, Viewport};
use crate::error::{GrapherError, GrapherResult};
use crate::interaction::{CameraTuning, INITIAL_TARGET};

/// Public session bootstrap configuration.
///
/// Serializable so hosts can ship tuning as JSON next to the engine module.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrapherConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub camera_tuning: CameraTuning,
    #[serde(default = "default_initial_target")]
    pub initial_target: CameraState,
    #[serde(default = "default_target_frame_rate")]
    pub target_frame_rate: u32,
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

impl GrapherConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            camera_tuning: CameraTuning::default(),
            initial_target: default_initial_target(),
            target_frame_rate: default_target_frame_rate(),
            notification_capacity: default_notification_capacity(),
        }
    }

    #[must_use]
    pub fn with_camera_tuning(mut self, tuning: CameraTuning) -> Self {
        self.camera_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_smoothing_factor(mut self, smoothing_factor: f32) -> Self {
        self.camera_tuning.smoothing_factor = smoothing_factor;
        self
    }

    #[must_use]
    pub fn with_initial_target(mut self, target: CameraState) -> Self {
        self.initial_target = target;
        self
    }

    #[must_use]
    pub fn with_target_frame_rate(mut self, frames_per_second: u32) -> Self {
        self.target_frame_rate = frames_per_second;
        self
    }

    #[must_use]
    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity;
        self
    }

    pub fn validate(&self) -> GrapherResult<()> {
        if !self.viewport.is_valid() {
            return Err(GrapherError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.camera_tuning.validate()?;
        if !self.initial_target.is_finite() {
            return Err(GrapherError::InvalidData(
                "initial camera target must be finite".to_owned(),
            ));
        }
        if self.target_frame_rate == 0 {
            return Err(GrapherError::InvalidData(
                "target frame rate must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> GrapherResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GrapherError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> GrapherResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| GrapherError::InvalidData(format!("failed to parse config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_initial_target() -> CameraState {
    INITIAL_TARGET
}

fn default_target_frame_rate() -> u32 {
    60
}

fn default_notification_capacity() -> usize {
    32
}
