//! Game modes and the transitions between them

pub mod controller;
pub mod scene;
pub mod transitions;

pub use controller::{GameModeController, ModeEvent, ModeObserver};
pub use scene::{SceneEvent, ScenePhase, SceneTransition};
pub use transitions::{Channel, Ease, Transitions};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Fps,
    Painting,
    Paused,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Fps => write!(f, "FPS"),
            GameMode::Painting => write!(f, "Painting"),
            GameMode::Paused => write!(f, "Paused"),
        }
    }
}
