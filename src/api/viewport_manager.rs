use tracing::debug;

use crate::core::Viewport;
use crate::engine::Engine;
use crate::error::{GrapherError, GrapherResult};

use super::EngineHandle;

/// Owns the surface's pixel size and forwards every change to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportManager {
    viewport: Viewport,
}

impl ViewportManager {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        self.viewport
    }

    /// Records the new size and notifies the engine.
    ///
    /// Identical sizes are forwarded again. A zero-sized viewport is
    /// rejected and the previous size is kept. The size is recorded even
    /// when the handle turns out to be stale.
    pub fn on_resize<E: Engine>(
        &mut self,
        handle: &EngineHandle<E>,
        width: u32,
        height: u32,
    ) -> GrapherResult<()> {
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            return Err(GrapherError::InvalidViewport { width, height });
        }
        self.viewport = viewport;
        handle.with_engine(|engine| engine.set_viewport(viewport))?;
        debug!(width, height, "viewport resized");
        Ok(())
    }
}
