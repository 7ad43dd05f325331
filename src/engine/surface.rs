use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderCapability {
    WebGl2,
}

impl fmt::Display for RenderCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebGl2 => f.write_str("WebGL"),
        }
    }
}

/// Stable identifier of a drawing surface, e.g. a canvas selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(String);

impl SurfaceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the host knows about a surface before an engine is bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub id: SurfaceId,
    pub viewport: Viewport,
    capabilities: SmallVec<[RenderCapability; 2]>,
}

impl SurfaceDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            id: SurfaceId::new(id),
            viewport,
            capabilities: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_capability(mut self, capability: RenderCapability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    #[must_use]
    pub fn supports(&self, capability: RenderCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    #[must_use]
    pub fn capabilities(&self) -> &[RenderCapability] {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderCapability, SurfaceDescriptor};
    use crate::core::Viewport;

    #[test]
    fn capabilities_are_deduplicated() {
        let surface = SurfaceDescriptor::new("#graph-canvas", Viewport::new(800, 600))
            .with_capability(RenderCapability::WebGl2)
            .with_capability(RenderCapability::WebGl2);

        assert_eq!(surface.capabilities(), &[RenderCapability::WebGl2]);
        assert!(surface.supports(RenderCapability::WebGl2));

        let bare = SurfaceDescriptor::new("#graph-canvas", Viewport::new(800, 600));
        assert!(!bare.supports(RenderCapability::WebGl2));
    }
}
