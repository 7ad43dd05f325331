use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::CameraState;
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult, GrapherError, GrapherResult};

use super::EngineHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Frame drawn and camera eased toward the target.
    Rendered,
    /// An engine call failed. The loop keeps running.
    Faulted(EngineError),
    /// The loop is not running; nothing was called.
    Skipped,
    /// The handle was found released; the loop stopped.
    Terminated,
}

/// Host refresh signal. One `next_frame` call per display refresh.
pub trait FrameSource {
    /// Waits for the next refresh. Returns `false` once the host stops
    /// producing frames.
    fn next_frame(&mut self) -> bool;
}

/// Yields a fixed number of frames without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBudget {
    remaining: u64,
}

impl FrameBudget {
    #[must_use]
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }
}

impl FrameSource for FrameBudget {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Sleeps until the next refresh slot at a fixed rate.
#[derive(Debug, Clone)]
pub struct PacedFrameSource {
    interval: Duration,
    next_deadline: Option<Instant>,
    remaining: Option<u64>,
}

impl PacedFrameSource {
    /// Paces frames at `frames_per_second`. Zero is treated as one.
    #[must_use]
    pub fn new(frames_per_second: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / frames_per_second.max(1),
            next_deadline: None,
            remaining: None,
        }
    }

    #[must_use]
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameSource for PacedFrameSource {
    fn next_frame(&mut self) -> bool {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
        }

        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);
        if deadline > now {
            thread::sleep(deadline - now);
        }
        // Late frames re-anchor instead of bursting to catch up.
        self.next_deadline = Some(deadline.max(now) + self.interval);
        true
    }
}

/// Drives render ticks for one engine handle.
///
/// `Idle -> Running -> Stopped`. Each tick renders, then eases the engine's
/// live camera toward the target. The loop stops on its own as soon as it
/// finds the handle released.
#[derive(Debug)]
pub struct FrameLoopScheduler<E: Engine> {
    state: LoopState,
    handle: Option<EngineHandle<E>>,
    smoothing_factor: f32,
    ticks_rendered: u64,
    tick_faults: u64,
}

impl<E: Engine> FrameLoopScheduler<E> {
    #[must_use]
    pub fn new(smoothing_factor: f32) -> Self {
        Self {
            state: LoopState::Idle,
            handle: None,
            smoothing_factor,
            ticks_rendered: 0,
            tick_faults: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn ticks_rendered(&self) -> u64 {
        self.ticks_rendered
    }

    #[must_use]
    pub fn tick_faults(&self) -> u64 {
        self.tick_faults
    }

    /// Binds the loop to `handle` and moves it to `Running`.
    pub fn start(&mut self, handle: EngineHandle<E>) -> GrapherResult<()> {
        if self.state != LoopState::Idle {
            return Err(GrapherError::InvalidData(format!(
                "frame loop can only start from idle, current state: {:?}",
                self.state
            )));
        }
        if !handle.is_live() {
            self.state = LoopState::Stopped;
            return Err(GrapherError::StaleHandle {
                surface: handle.surface().to_string(),
            });
        }
        debug!(surface = %handle.surface(), "frame loop started");
        self.handle = Some(handle);
        self.state = LoopState::Running;
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.handle = None;
        self.state = LoopState::Stopped;
        debug!(ticks = self.ticks_rendered, "frame loop stopped");
    }

    /// Runs one tick toward `target`. Never propagates an error.
    pub fn tick(&mut self, target: CameraState) -> TickOutcome {
        if self.state != LoopState::Running {
            return TickOutcome::Skipped;
        }
        let Some(handle) = self.handle.as_ref() else {
            self.stop();
            return TickOutcome::Terminated;
        };

        let factor = self.smoothing_factor;
        match handle.with_engine(|engine| step(engine, target, factor)) {
            Err(_) => {
                debug!("engine handle released, terminating frame loop");
                self.stop();
                TickOutcome::Terminated
            }
            Ok(Err(err)) => {
                self.tick_faults += 1;
                warn!(error = %err, faults = self.tick_faults, "render tick failed");
                TickOutcome::Faulted(err)
            }
            Ok(Ok(())) => {
                self.ticks_rendered += 1;
                trace!(tick = self.ticks_rendered, "render tick");
                TickOutcome::Rendered
            }
        }
    }

    /// Ticks once per frame from `frames` until the source ends or the loop
    /// stops. `target` is read fresh before every tick.
    pub fn run<S, T>(&mut self, frames: &mut S, mut target: T) -> u64
    where
        S: FrameSource,
        T: FnMut() -> CameraState,
    {
        let mut rendered = 0;
        while self.state == LoopState::Running && frames.next_frame() {
            match self.tick(target()) {
                TickOutcome::Rendered => rendered += 1,
                TickOutcome::Terminated => break,
                TickOutcome::Faulted(_) | TickOutcome::Skipped => {}
            }
        }
        rendered
    }
}

fn step<E: Engine>(engine: &mut E, target: CameraState, factor: f32) -> EngineResult<()> {
    engine.render_frame()?;
    let live = engine.camera();
    engine.set_camera(live.smoothed_toward(target, factor));
    Ok(())
}
