use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::core::{CameraState, Viewport};
use crate::error::{EngineError, EngineResult};

use super::{Engine, EngineEquation, EngineFactory, SurfaceDescriptor};

const INITIAL_CAMERA: CameraState = CameraState {
    rotation_x: 0.0,
    rotation_y: 0.0,
    zoom: 8.0,
};

/// Mutating call observed by a [`NullEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Start,
    RenderFrame,
    SetCameraRotation { x: f32, y: f32 },
    SetCameraZoom(f32),
    SetViewport(Viewport),
    SetAnimationEnabled(bool),
    SetEquations(Vec<(bool, String)>),
    Release,
}

/// Shared, append-only record of engine calls.
///
/// Clones observe the same log, so tests keep one while the engine itself
/// moves into a handle.
#[derive(Debug, Clone, Default)]
pub struct EngineJournal(Rc<RefCell<Vec<EngineCall>>>);

impl EngineJournal {
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.0.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    #[must_use]
    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.0.borrow().iter().filter(|call| predicate(call)).count()
    }

    #[must_use]
    pub fn last(&self) -> Option<EngineCall> {
        self.0.borrow().last().cloned()
    }

    fn record(&self, call: EngineCall) {
        self.0.borrow_mut().push(call);
    }
}

/// Headless engine used by tests and by hosts without a GPU.
///
/// It keeps camera state like a real engine and still validates equations,
/// so sync errors surface before a real backend is wired in.
#[derive(Debug)]
pub struct NullEngine {
    camera: CameraState,
    viewport: Viewport,
    animate: bool,
    equations: Vec<String>,
    frames_rendered: u64,
    pending_render_fault: Option<String>,
    journal: EngineJournal,
}

impl NullEngine {
    #[must_use]
    pub fn new(viewport: Viewport, journal: EngineJournal) -> Self {
        Self {
            camera: INITIAL_CAMERA,
            viewport,
            animate: true,
            equations: Vec::new(),
            frames_rendered: 0,
            pending_render_fault: None,
            journal,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn animate(&self) -> bool {
        self.animate
    }

    /// Expressions of the enabled equations from the last successful push.
    #[must_use]
    pub fn equations(&self) -> &[String] {
        &self.equations
    }

    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Makes the next `render_frame` fail with `message`.
    pub fn fail_next_render(&mut self, message: impl Into<String>) {
        self.pending_render_fault = Some(message.into());
    }
}

impl Engine for NullEngine {
    fn start(&mut self) -> EngineResult<()> {
        self.journal.record(EngineCall::Start);
        Ok(())
    }

    fn render_frame(&mut self) -> EngineResult<()> {
        self.journal.record(EngineCall::RenderFrame);
        if let Some(message) = self.pending_render_fault.take() {
            return Err(EngineError::new(message));
        }
        self.frames_rendered += 1;
        Ok(())
    }

    fn camera_rotation_x(&self) -> f32 {
        self.camera.rotation_x
    }

    fn camera_rotation_y(&self) -> f32 {
        self.camera.rotation_y
    }

    fn camera_zoom(&self) -> f32 {
        self.camera.zoom
    }

    fn set_camera_rotation(&mut self, x: f32, y: f32) {
        self.journal.record(EngineCall::SetCameraRotation { x, y });
        self.camera.rotation_x = x;
        self.camera.rotation_y = y;
    }

    fn set_camera_zoom(&mut self, zoom: f32) {
        self.journal.record(EngineCall::SetCameraZoom(zoom));
        self.camera.zoom = zoom;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.journal.record(EngineCall::SetViewport(viewport));
        self.viewport = viewport;
    }

    fn set_animation_enabled(&mut self, enabled: bool) -> EngineResult<()> {
        self.journal.record(EngineCall::SetAnimationEnabled(enabled));
        self.animate = enabled;
        Ok(())
    }

    fn set_equations(&mut self, equations: &[EngineEquation<'_>]) -> EngineResult<()> {
        self.journal.record(EngineCall::SetEquations(
            equations
                .iter()
                .map(|eq| (eq.disabled, eq.expression.to_owned()))
                .collect(),
        ));

        let mut accepted = Vec::with_capacity(equations.len());
        for (position, equation) in equations.iter().enumerate() {
            if equation.disabled {
                continue;
            }
            if let Err(reason) = check_expression(equation.expression) {
                return Err(EngineError::new(format!(
                    "Error on equation {}\n{reason}",
                    position + 1
                )));
            }
            accepted.push(equation.expression.to_owned());
        }

        trace!(count = accepted.len(), "null engine accepted equations");
        self.equations = accepted;
        Ok(())
    }

    fn release(self) {
        self.journal.record(EngineCall::Release);
    }
}

fn check_expression(expression: &str) -> Result<(), &'static str> {
    if expression.trim().is_empty() {
        return Err("empty expression");
    }
    let mut depth = 0_i32;
    for ch in expression.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unexpected `)`");
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unclosed `(`");
    }
    Ok(())
}

/// Factory for [`NullEngine`]s sharing one journal.
#[derive(Debug, Clone, Default)]
pub struct NullEngineFactory {
    journal: EngineJournal,
    reject_with: Option<String>,
    created: usize,
}

impl NullEngineFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `initialize` call fail with `reason`.
    #[must_use]
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject_with: Some(reason.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn journal(&self) -> EngineJournal {
        self.journal.clone()
    }

    /// Number of engines successfully created so far.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }
}

impl EngineFactory for NullEngineFactory {
    type Engine = NullEngine;

    fn initialize(&mut self, surface: &SurfaceDescriptor) -> EngineResult<NullEngine> {
        if let Some(reason) = &self.reject_with {
            return Err(EngineError::new(reason.clone()));
        }
        self.created += 1;
        Ok(NullEngine::new(surface.viewport, self.journal.clone()))
    }
}
