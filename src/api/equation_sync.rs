use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::GraphModel;
use crate::engine::{Engine, EngineEquation};
use crate::error::{GrapherError, GrapherResult};

use super::EngineHandle;

/// Positional equation payload. Most graphs hold a handful of equations.
pub type EquationPayload<'a> = SmallVec<[EngineEquation<'a>; 8]>;

/// Pushes a [`GraphModel`] into the engine on explicit reload.
pub struct EquationSyncBridge;

impl EquationSyncBridge {
    /// Builds `(disabled, expression)` pairs in index order.
    #[must_use]
    pub fn build_payload(graph: &GraphModel) -> EquationPayload<'_> {
        graph
            .equations()
            .iter()
            .map(|entry| EngineEquation {
                disabled: entry.disabled,
                expression: entry.expression.as_str(),
            })
            .collect()
    }

    /// Sends the animation flag, then the equations.
    ///
    /// Engine rejections come back as [`GrapherError::Sync`] with the
    /// engine's message untouched. Nothing is retried or rolled back.
    pub fn sync<E: Engine>(handle: &EngineHandle<E>, graph: &GraphModel) -> GrapherResult<()> {
        graph.validate_indices()?;
        let payload = Self::build_payload(graph);

        handle
            .with_engine(|engine| {
                engine.set_animation_enabled(graph.animate)?;
                engine.set_equations(&payload)
            })?
            .map_err(|err| {
                warn!(graph = %graph.name, error = %err, "engine rejected graph");
                GrapherError::Sync(err)
            })?;

        debug!(
            graph = %graph.name,
            equations = payload.len(),
            animate = graph.animate,
            "graph synced to engine"
        );
        Ok(())
    }
}
