//! grapher-rs: render orchestration for a real-time 3D equation grapher.
//!
//! The crate owns the rendering engine's lifecycle, turns pointer and wheel
//! input into a smoothed camera, drives the per-frame render loop and pushes
//! user-edited equations into the engine on reload. The engine itself is an
//! external capability behind [`engine::Engine`].

pub mod api;
pub mod core;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod telemetry;

pub use api::{GrapherConfig, GrapherSession};
pub use error::{EngineError, GrapherError, GrapherResult, InitError};
