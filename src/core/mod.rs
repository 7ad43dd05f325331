pub mod camera;
pub mod graph;
pub mod types;

pub use camera::{CameraState, lerp};
pub use graph::{EquationEntry, GraphModel, RESTRICTED_CHARACTERS};
pub use types::Viewport;
