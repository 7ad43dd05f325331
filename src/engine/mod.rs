//! Contract between the orchestration layer and the rendering engine.
//!
//! The engine parses equations, owns the GPU context and draws frames. This
//! crate only drives it through [`Engine`] and creates it through
//! [`EngineFactory`].

mod null_engine;
mod surface;

pub use null_engine::{EngineCall, EngineJournal, NullEngine, NullEngineFactory};
pub use surface::{RenderCapability, SurfaceDescriptor, SurfaceId};

use crate::core::{CameraState, Viewport};
use crate::error::EngineResult;

/// One equation as the engine consumes it: position is the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineEquation<'a> {
    pub disabled: bool,
    pub expression: &'a str,
}

/// A live engine instance bound to one surface.
pub trait Engine {
    /// One-time setup after construction.
    fn start(&mut self) -> EngineResult<()>;

    /// Draws one frame from the current internal state.
    fn render_frame(&mut self) -> EngineResult<()>;

    fn camera_rotation_x(&self) -> f32;
    fn camera_rotation_y(&self) -> f32;
    fn camera_zoom(&self) -> f32;
    fn set_camera_rotation(&mut self, x: f32, y: f32);
    fn set_camera_zoom(&mut self, zoom: f32);

    /// Recomputes projection parameters for the surface's pixel size.
    fn set_viewport(&mut self, viewport: Viewport);

    fn set_animation_enabled(&mut self, enabled: bool) -> EngineResult<()>;

    /// Replaces the engine's equations. Fails on the first malformed one.
    fn set_equations(&mut self, equations: &[EngineEquation<'_>]) -> EngineResult<()>;

    /// Frees every native resource. Consuming `self` makes a second call
    /// impossible.
    fn release(self)
    where
        Self: Sized;

    fn camera(&self) -> CameraState {
        CameraState::new(
            self.camera_rotation_x(),
            self.camera_rotation_y(),
            self.camera_zoom(),
        )
    }

    fn set_camera(&mut self, camera: CameraState) {
        self.set_camera_rotation(camera.rotation_x, camera.rotation_y);
        self.set_camera_zoom(camera.zoom);
    }
}

/// Creates engines on surfaces. Implemented by the host's engine loader.
pub trait EngineFactory {
    type Engine: Engine;

    /// Capability a surface must advertise before `initialize` is attempted.
    fn required_capability(&self) -> RenderCapability {
        RenderCapability::WebGl2
    }

    fn initialize(&mut self, surface: &SurfaceDescriptor) -> EngineResult<Self::Engine>;
}
