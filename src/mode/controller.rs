//! GameModeController - FPS / Painting / Paused state machine
//!
//! Entering a painting switches mode at once and starts the camera zoom as
//! a fire-and-forget tween. Exiting starts the zoom-out and only returns to
//! FPS when that tween reports completion through
//! [`GameModeController::on_transition_complete`].
//!
//! Known gap: nothing stops a second `exit_painting` while the first
//! zoom-out is still running. The second call supersedes the first tween,
//! so exactly one completion arrives, but the caller should not rely on it.

use std::sync::Arc;

use super::transitions::{Channel, Transitions};
use super::GameMode;
use crate::core::config::{CameraConfig, PaintingFraming};
use crate::core::types::{PaintingId, TransitionId};
use crate::painting::area::BoundedArea;

#[derive(Debug, Clone)]
pub enum ModeEvent {
    StateChanged(GameMode),
    EnteredPainting {
        painting: PaintingId,
        area: Arc<BoundedArea>,
    },
    ExitedPainting(PaintingId),
}

pub type ModeObserver = Box<dyn FnMut(&ModeEvent)>;

/// Default holder height outside of paintings
const GALLERY_HOLDER_HEIGHT: f32 = 1.0;

pub struct GameModeController {
    mode: GameMode,
    /// Base mode to return to when unpausing
    resume_to: Option<GameMode>,
    painting: Option<(PaintingId, PaintingFraming)>,
    pending_exit: Option<TransitionId>,
    camera: CameraConfig,
    observers: Vec<ModeObserver>,
}

impl GameModeController {
    pub fn new(camera: CameraConfig) -> Self {
        Self {
            mode: GameMode::Fps,
            resume_to: None,
            painting: None,
            pending_exit: None,
            camera,
            observers: Vec::new(),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// FPS or Painting, looking through a pause
    pub fn base_mode(&self) -> GameMode {
        match self.mode {
            GameMode::Paused => self.resume_to.unwrap_or(GameMode::Fps),
            mode => mode,
        }
    }

    pub fn current_painting(&self) -> Option<PaintingId> {
        self.painting.as_ref().map(|(id, _)| *id)
    }

    /// True between `exit_painting` and its completion
    pub fn is_exiting(&self) -> bool {
        self.pending_exit.is_some()
    }

    /// Game time multiplier: frozen while paused
    pub fn time_scale(&self) -> f32 {
        if self.mode == GameMode::Paused {
            0.0
        } else {
            1.0
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ModeEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Switch to Painting. Only valid from FPS; otherwise a no-op that
    /// returns false.
    pub fn enter_painting(
        &mut self,
        painting: PaintingId,
        area: Arc<BoundedArea>,
        framing: &PaintingFraming,
        transitions: &mut Transitions,
    ) -> bool {
        if self.mode != GameMode::Fps {
            return false;
        }

        self.painting = Some((painting, framing.clone()));
        self.set_mode(GameMode::Painting);
        self.emit(ModeEvent::EnteredPainting { painting, area });
        tracing::info!(?painting, "Entered painting");

        transitions.play(
            Channel::CameraFov,
            self.camera.default_fov,
            framing.zoom_fov,
            self.camera.zoom_in_duration,
            self.camera.zoom_in_ease,
        );
        transitions.play(
            Channel::HolderHeight,
            GALLERY_HOLDER_HEIGHT,
            framing.holder_height,
            self.camera.zoom_in_duration,
            self.camera.zoom_in_ease,
        );
        true
    }

    /// Start leaving the painting. Only valid from Painting. The mode stays
    /// Painting until the zoom-out completes.
    pub fn exit_painting(&mut self, transitions: &mut Transitions) -> bool {
        if self.mode != GameMode::Painting {
            return false;
        }
        let zoom_fov = self
            .painting
            .as_ref()
            .map_or(self.camera.default_fov, |(_, framing)| framing.zoom_fov);

        let id = transitions.play(
            Channel::CameraFov,
            zoom_fov,
            self.camera.default_fov,
            self.camera.zoom_out_duration,
            self.camera.zoom_out_ease,
        );
        let holder_from = transitions.value(Channel::HolderHeight).unwrap_or(GALLERY_HOLDER_HEIGHT);
        transitions.play(
            Channel::HolderHeight,
            holder_from,
            GALLERY_HOLDER_HEIGHT,
            self.camera.zoom_out_duration,
            self.camera.zoom_out_ease,
        );

        if self.pending_exit.replace(id).is_some() {
            tracing::warn!("Exit requested while a previous exit was still in flight");
        }
        true
    }

    /// Completion callback from the transition driver. Returns the painting
    /// that was left when `id` is the pending exit.
    pub fn on_transition_complete(&mut self, id: TransitionId) -> Option<PaintingId> {
        if self.pending_exit != Some(id) {
            return None;
        }
        self.pending_exit = None;
        let (painting, _) = self.painting.take()?;

        if self.mode == GameMode::Paused {
            // Finished behind the pause menu: resume into FPS
            self.resume_to = Some(GameMode::Fps);
        } else {
            self.set_mode(GameMode::Fps);
        }
        self.emit(ModeEvent::ExitedPainting(painting));
        tracing::info!(?painting, "Exited painting");
        Some(painting)
    }

    /// Pause from any base mode, or resume the remembered one
    pub fn toggle_pause(&mut self) {
        if self.mode == GameMode::Paused {
            self.resume();
        } else {
            self.resume_to = Some(self.mode);
            self.set_mode(GameMode::Paused);
        }
    }

    /// Leave pause if paused; otherwise nothing
    pub fn force_unpause(&mut self) {
        if self.mode == GameMode::Paused {
            self.resume();
        }
    }

    fn resume(&mut self) {
        let mode = self.resume_to.take().unwrap_or(GameMode::Fps);
        self.set_mode(mode);
    }

    fn set_mode(&mut self, mode: GameMode) {
        if self.mode == mode {
            return;
        }
        tracing::debug!(from = ?self.mode, to = ?mode, "Game mode change");
        self.mode = mode;
        self.emit(ModeEvent::StateChanged(mode));
    }

    fn emit(&mut self, event: ModeEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

impl std::fmt::Debug for GameModeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameModeController")
            .field("mode", &self.mode)
            .field("resume_to", &self.resume_to)
            .field("painting", &self.current_painting())
            .field("pending_exit", &self.pending_exit)
            .field("observers", &self.observers.len())
            .finish()
    }
}
