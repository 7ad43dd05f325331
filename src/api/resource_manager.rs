use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::engine::{Engine, EngineFactory, SurfaceDescriptor, SurfaceId};
use crate::error::{GrapherError, GrapherResult, InitError};

/// Shared reference to one live engine.
///
/// Clones observe the same slot. Releasing through any clone moves the
/// engine out and consumes it, so every later access on every clone sees a
/// stale handle instead of a freed resource.
pub struct EngineHandle<E: Engine> {
    surface: SurfaceId,
    slot: Rc<RefCell<Option<E>>>,
}

impl<E: Engine> Clone for EngineHandle<E> {
    fn clone(&self) -> Self {
        Self {
            surface: self.surface.clone(),
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<E: Engine> std::fmt::Debug for EngineHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("surface", &self.surface)
            .field("live", &self.is_live())
            .finish()
    }
}

impl<E: Engine> EngineHandle<E> {
    fn new(surface: SurfaceId, engine: E) -> Self {
        Self {
            surface,
            slot: Rc::new(RefCell::new(Some(engine))),
        }
    }

    #[must_use]
    pub fn surface(&self) -> &SurfaceId {
        &self.surface
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Runs `f` against the engine, or reports a stale handle.
    pub fn with_engine<T>(&self, f: impl FnOnce(&mut E) -> T) -> GrapherResult<T> {
        let mut slot = self.slot.borrow_mut();
        let engine = slot.as_mut().ok_or_else(|| GrapherError::StaleHandle {
            surface: self.surface.to_string(),
        })?;
        Ok(f(engine))
    }

    /// Releases the engine. Returns `false` if it was already released.
    pub fn release(&self) -> bool {
        let engine = self.slot.borrow_mut().take();
        match engine {
            Some(engine) => {
                engine.release();
                debug!(surface = %self.surface, "engine released");
                true
            }
            None => false,
        }
    }
}

/// Scope guard returned by [`EngineResourceManager::acquire`].
///
/// Dropping the lease releases the engine, whichever path the owning scope
/// leaves through.
pub struct EngineLease<E: Engine> {
    handle: EngineHandle<E>,
}

impl<E: Engine> EngineLease<E> {
    #[must_use]
    pub fn handle(&self) -> EngineHandle<E> {
        self.handle.clone()
    }

    /// Releases early. Dropping afterwards is a no-op.
    pub fn release(&self) -> bool {
        self.handle.release()
    }
}

impl<E: Engine> Deref for EngineLease<E> {
    type Target = EngineHandle<E>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl<E: Engine> Drop for EngineLease<E> {
    fn drop(&mut self) {
        self.handle.release();
    }
}

/// Creates engines and guarantees at most one live engine per surface.
pub struct EngineResourceManager<F: EngineFactory> {
    factory: F,
    handles: IndexMap<SurfaceId, EngineHandle<F::Engine>>,
}

impl<F: EngineFactory> EngineResourceManager<F> {
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            handles: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Creates and starts an engine on `surface`.
    ///
    /// A live engine already bound to the same surface is released first.
    /// Surfaces lacking the factory's required capability are refused
    /// without calling the factory.
    pub fn acquire(
        &mut self,
        surface: &SurfaceDescriptor,
    ) -> Result<EngineLease<F::Engine>, InitError> {
        if let Some(previous) = self.handles.shift_remove(&surface.id) {
            if previous.release() {
                debug!(surface = %surface.id, "released previous engine before re-acquire");
            }
        }

        let capability = self.factory.required_capability();
        if !surface.supports(capability) {
            warn!(surface = %surface.id, %capability, "surface lacks required capability");
            return Err(InitError::Unsupported {
                surface: surface.id.to_string(),
                capability: capability.to_string(),
            });
        }

        let mut engine = self
            .factory
            .initialize(surface)
            .map_err(|err| InitError::Rejected {
                surface: surface.id.to_string(),
                reason: err.message,
            })?;

        if let Err(err) = engine.start() {
            engine.release();
            warn!(surface = %surface.id, error = %err, "engine start failed");
            return Err(InitError::Rejected {
                surface: surface.id.to_string(),
                reason: err.message,
            });
        }

        let handle = EngineHandle::new(surface.id.clone(), engine);
        self.handles.insert(surface.id.clone(), handle.clone());
        info!(
            surface = %surface.id,
            width = surface.viewport.width,
            height = surface.viewport.height,
            "engine acquired"
        );
        Ok(EngineLease { handle })
    }

    /// Releases the engine bound to `surface`, if any.
    pub fn release(&mut self, surface: &SurfaceId) -> bool {
        self.handles
            .shift_remove(surface)
            .is_some_and(|handle| handle.release())
    }

    pub fn release_all(&mut self) -> usize {
        self.handles
            .drain(..)
            .filter(|(_, handle)| handle.release())
            .count()
    }

    #[must_use]
    pub fn is_live(&self, surface: &SurfaceId) -> bool {
        self.handles
            .get(surface)
            .is_some_and(EngineHandle::is_live)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.handles
            .values()
            .filter(|handle| handle.is_live())
            .count()
    }
}

impl<F: EngineFactory> Drop for EngineResourceManager<F> {
    fn drop(&mut self) {
        let released = self.release_all();
        if released > 0 {
            debug!(released, "released engines on manager drop");
        }
    }
}
