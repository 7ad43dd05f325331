use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{CameraState, GraphModel, Viewport};
use crate::engine::{Engine, EngineFactory, SurfaceDescriptor};
use crate::error::{GrapherError, GrapherResult, InitError};
use crate::interaction::{CameraController, InteractionMode};

use super::{
    EngineHandle, EngineLease, EngineResourceManager, EquationSyncBridge, FrameLoopScheduler,
    FrameSource, GrapherConfig, LoopState, Notification, NotificationLevel, NotificationQueue,
    PacedFrameSource, SessionSnapshot, TickOutcome, ViewportManager,
};

static RELEASED: EngineStatus = EngineStatus::Released;

/// Readiness signal consumed by the UI to pick between a loading
/// indicator, the graph, and a fallback message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineStatus {
    Loading,
    Ready,
    Unsupported { message: String },
    Failed { message: String },
    Released,
}

/// Raw host input routed through [`GrapherSession::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    PointerDown,
    PointerUp,
    PointerMove { delta_x: f32, delta_y: f32 },
    Wheel { delta_z: f32 },
    Resize { width: u32, height: u32 },
    Frame,
}

/// Render orchestration for one surface.
///
/// Owns the engine lease, the frame loop, camera input and viewport state.
/// Every engine failure is turned into a [`Notification`]; events that
/// arrive after teardown are dropped without touching the engine.
pub struct GrapherSession<F: EngineFactory> {
    config: GrapherConfig,
    surface: SurfaceDescriptor,
    resources: EngineResourceManager<F>,
    lease: Option<EngineLease<F::Engine>>,
    frame_loop: FrameLoopScheduler<F::Engine>,
    camera: CameraController,
    viewport: ViewportManager,
    notifications: NotificationQueue,
    status: EngineStatus,
}

impl<F: EngineFactory> GrapherSession<F> {
    /// Creates a session in the `Loading` state. No engine exists yet.
    pub fn new(factory: F, surface: SurfaceDescriptor, config: GrapherConfig) -> GrapherResult<Self> {
        config.validate()?;
        Ok(Self {
            surface,
            resources: EngineResourceManager::new(factory),
            lease: None,
            frame_loop: FrameLoopScheduler::new(config.camera_tuning.smoothing_factor),
            camera: CameraController::new(config.camera_tuning, config.initial_target),
            viewport: ViewportManager::new(config.viewport),
            notifications: NotificationQueue::new(config.notification_capacity),
            status: EngineStatus::Loading,
            config,
        })
    }

    /// Brings the engine up and starts the frame loop.
    ///
    /// Calling it again replaces the engine: the old one is released before
    /// the new one is created, and camera input state starts over.
    pub fn acquire(&mut self) -> GrapherResult<()> {
        if self.frame_loop.state() == LoopState::Running {
            self.frame_loop.stop();
        }
        self.lease = None;

        let lease = match self.resources.acquire(&self.surface) {
            Ok(lease) => lease,
            Err(err) => {
                let message = err.user_message();
                self.status = match err {
                    InitError::Unsupported { .. } => EngineStatus::Unsupported {
                        message: message.clone(),
                    },
                    InitError::Rejected { .. } => EngineStatus::Failed {
                        message: message.clone(),
                    },
                };
                self.notifications.push(NotificationLevel::Error, message);
                return Err(err.into());
            }
        };

        self.frame_loop = FrameLoopScheduler::new(self.config.camera_tuning.smoothing_factor);
        self.frame_loop.start(lease.handle())?;
        self.camera = CameraController::new(self.config.camera_tuning, self.config.initial_target);
        self.lease = Some(lease);
        self.status = EngineStatus::Ready;
        info!(surface = %self.surface.id, "grapher session ready");
        Ok(())
    }

    /// Stops the loop and releases the engine. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.frame_loop.stop();
        self.camera.on_pointer_up();
        let released = self
            .lease
            .take()
            .is_some_and(|lease| lease.release());
        self.resources.release(&self.surface.id);
        if released || self.status == EngineStatus::Ready {
            debug!(surface = %self.surface.id, "grapher session torn down");
        }
        if matches!(self.status, EngineStatus::Ready | EngineStatus::Loading) {
            self.status = EngineStatus::Released;
        }
    }

    /// Current readiness. An engine released through a cloned handle reads
    /// as `Released` even before the session notices it.
    #[must_use]
    pub fn status(&self) -> &EngineStatus {
        if self.status == EngineStatus::Ready && !self.engine_is_live() {
            return &RELEASED;
        }
        &self.status
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == EngineStatus::Ready && self.engine_is_live()
    }

    fn engine_is_live(&self) -> bool {
        self.lease.as_ref().is_some_and(|lease| lease.is_live())
    }

    /// Drops a lease whose engine was released elsewhere.
    fn forget_released_engine(&mut self) {
        self.frame_loop.stop();
        if self.lease.take().is_some() {
            warn!(surface = %self.surface.id, "engine released outside the session");
        }
        if self.status == EngineStatus::Ready {
            self.status = EngineStatus::Released;
        }
    }

    #[must_use]
    pub fn config(&self) -> &GrapherConfig {
        &self.config
    }

    #[must_use]
    pub fn surface(&self) -> &SurfaceDescriptor {
        &self.surface
    }

    #[must_use]
    pub fn loop_state(&self) -> LoopState {
        self.frame_loop.state()
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.camera.mode()
    }

    #[must_use]
    pub fn camera_target(&self) -> CameraState {
        self.camera.current_target()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    /// Handle to the live engine, for hosts that need direct access.
    #[must_use]
    pub fn engine_handle(&self) -> Option<EngineHandle<F::Engine>> {
        self.lease.as_ref().map(EngineLease::handle)
    }

    /// Live camera as currently held by the engine.
    #[must_use]
    pub fn live_camera(&self) -> Option<CameraState> {
        let lease = self.lease.as_ref()?;
        lease.with_engine(|engine| engine.camera()).ok()
    }

    /// Live camera for an input event. A stale handle retires the lease.
    fn live_camera_for_input(&mut self) -> Option<CameraState> {
        self.lease.as_ref()?;
        let live = self.live_camera();
        if live.is_none() {
            self.forget_released_engine();
        }
        live
    }

    /// Frame source paced at the configured `target_frame_rate`, for hosts
    /// without a refresh callback of their own.
    #[must_use]
    pub fn paced_frames(&self) -> PacedFrameSource {
        PacedFrameSource::new(self.config.target_frame_rate)
    }

    #[must_use]
    pub fn pending_notifications(&self) -> usize {
        self.notifications.len()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn pointer_down(&mut self) {
        self.camera.on_pointer_down();
    }

    pub fn pointer_up(&mut self) {
        self.camera.on_pointer_up();
    }

    pub fn pointer_move(&mut self, delta_x: f32, delta_y: f32) {
        if !self.camera.is_pointer_down() {
            return;
        }
        if let Some(live) = self.live_camera_for_input() {
            self.camera.on_pointer_move(live, delta_x, delta_y);
        }
    }

    pub fn wheel(&mut self, delta_z: f32) {
        if let Some(live) = self.live_camera_for_input() {
            self.camera.on_wheel(live, delta_z);
        }
    }

    /// Applies a surface resize.
    ///
    /// Without a live engine the new size is still recorded and is handed
    /// to the next engine through the surface descriptor.
    pub fn resize(&mut self, width: u32, height: u32) -> GrapherResult<()> {
        let result = match self.lease.as_ref() {
            Some(lease) => self.viewport.on_resize(lease, width, height),
            None => {
                let viewport = Viewport::new(width, height);
                if !viewport.is_valid() {
                    return Err(GrapherError::InvalidViewport { width, height });
                }
                self.viewport = ViewportManager::new(viewport);
                Ok(())
            }
        };
        match result {
            Err(err) if err.is_stale_handle() => self.forget_released_engine(),
            Err(err) => return Err(err),
            Ok(()) => {}
        }
        self.surface.viewport = self.viewport.viewport();
        Ok(())
    }

    /// Pushes `graph` into the engine. Returns `false` when there is no
    /// live engine to push to.
    ///
    /// A rejected graph is reported as a notification and returned as
    /// [`GrapherError::Sync`]; `graph` itself is never modified.
    pub fn reload(&mut self, graph: &GraphModel) -> GrapherResult<bool> {
        let Some(lease) = self.lease.as_ref() else {
            debug!("reload requested without a live engine");
            return Ok(false);
        };
        match EquationSyncBridge::sync(lease, graph) {
            Ok(()) => Ok(true),
            Err(err) if err.is_stale_handle() => {
                self.forget_released_engine();
                Ok(false)
            }
            Err(GrapherError::Sync(err)) => {
                self.notifications
                    .push(NotificationLevel::Error, err.message.clone());
                Err(GrapherError::Sync(err))
            }
            Err(err) => Err(err),
        }
    }

    /// Runs one render tick.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.frame_loop.tick(self.camera.current_target());
        match &outcome {
            TickOutcome::Faulted(err) => {
                self.notifications
                    .push(NotificationLevel::Warning, err.message.clone());
            }
            TickOutcome::Terminated => self.forget_released_engine(),
            TickOutcome::Rendered | TickOutcome::Skipped => {}
        }
        outcome
    }

    /// Ticks once per frame from `frames` until the source ends or the
    /// loop stops. Returns the number of rendered frames.
    pub fn run_frames<S: FrameSource>(&mut self, frames: &mut S) -> u64 {
        let mut rendered = 0;
        while self.frame_loop.state() == LoopState::Running && frames.next_frame() {
            match self.tick() {
                TickOutcome::Rendered => rendered += 1,
                TickOutcome::Terminated => break,
                TickOutcome::Faulted(_) | TickOutcome::Skipped => {}
            }
        }
        rendered
    }

    /// Routes one host event to its sink.
    pub fn dispatch(&mut self, event: HostEvent) -> GrapherResult<()> {
        match event {
            HostEvent::PointerDown => self.pointer_down(),
            HostEvent::PointerUp => self.pointer_up(),
            HostEvent::PointerMove { delta_x, delta_y } => self.pointer_move(delta_x, delta_y),
            HostEvent::Wheel { delta_z } => self.wheel(delta_z),
            HostEvent::Resize { width, height } => self.resize(width, height)?,
            HostEvent::Frame => {
                self.tick();
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            surface: self.surface.id.to_string(),
            status: self.status().clone(),
            loop_state: self.frame_loop.state(),
            viewport: self.viewport.viewport(),
            target_camera: self.camera.current_target(),
            live_camera: self.live_camera(),
            interaction_mode: self.camera.mode(),
            ticks_rendered: self.frame_loop.ticks_rendered(),
            tick_faults: self.frame_loop.tick_faults(),
            pending_notifications: self.notifications.len(),
        }
    }
}

impl<F: EngineFactory> Drop for GrapherSession<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}
