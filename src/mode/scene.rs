//! Iris-wipe scene transition
//!
//! Idle -> ClosingOut -> Loading -> OpeningIn -> Idle. Ticked with
//! unscaled time so it still runs while the game is paused. Loading ends
//! when the scene loader calls [`SceneTransition::finish_loading`].

use crate::core::config::SceneConfig;
use crate::core::types::Seconds;

pub const MAIN_MENU_SCENE: &str = "MainMenu";
pub const GAME_SCENE: &str = "Game";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    Idle,
    ClosingOut,
    Loading,
    OpeningIn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// Iris fully closed: start loading this scene
    LoadRequested(String),
    /// Iris fully open again on the new scene
    Completed(String),
}

#[derive(Debug, Clone)]
pub struct SceneTransition {
    config: SceneConfig,
    phase: ScenePhase,
    target: Option<String>,
    elapsed: Seconds,
    iris_scale: f32,
}

impl SceneTransition {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            iris_scale: config.open_scale,
            config,
            phase: ScenePhase::Idle,
            target: None,
            elapsed: 0.0,
        }
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != ScenePhase::Idle
    }

    /// 0 is fully closed, `open_scale` fully open
    pub fn iris_scale(&self) -> f32 {
        self.iris_scale
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Begin a transition to `scene`. Rejected while one is running.
    pub fn request(&mut self, scene: impl Into<String>) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let scene = scene.into();
        tracing::debug!(%scene, "Scene transition requested");
        self.target = Some(scene);
        self.phase = ScenePhase::ClosingOut;
        self.elapsed = 0.0;
        self.iris_scale = self.config.open_scale;
        true
    }

    /// The loader is done; start opening the iris
    pub fn finish_loading(&mut self) -> bool {
        if self.phase != ScenePhase::Loading {
            return false;
        }
        self.phase = ScenePhase::OpeningIn;
        self.elapsed = 0.0;
        true
    }

    pub fn tick(&mut self, unscaled_dt: Seconds) -> Option<SceneEvent> {
        match self.phase {
            ScenePhase::Idle | ScenePhase::Loading => None,
            ScenePhase::ClosingOut => {
                let t = self.advance(unscaled_dt);
                self.iris_scale = self.config.open_scale * (1.0 - self.config.close_ease.apply(t));
                if t < 1.0 {
                    return None;
                }
                self.phase = ScenePhase::Loading;
                self.target.clone().map(SceneEvent::LoadRequested)
            }
            ScenePhase::OpeningIn => {
                let t = self.advance(unscaled_dt);
                self.iris_scale = self.config.open_scale * self.config.open_ease.apply(t);
                if t < 1.0 {
                    return None;
                }
                self.phase = ScenePhase::Idle;
                let scene = self.target.take()?;
                tracing::info!(%scene, "Scene transition complete");
                Some(SceneEvent::Completed(scene))
            }
        }
    }

    fn advance(&mut self, dt: Seconds) -> f32 {
        self.elapsed += dt;
        if self.config.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.config.duration).min(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_event(scene: &mut SceneTransition) -> Option<SceneEvent> {
        (0..100).find_map(|_| scene.tick(0.05))
    }

    #[test]
    fn test_full_cycle() {
        let mut scene = SceneTransition::new(SceneConfig::default());
        assert!(scene.request(MAIN_MENU_SCENE));
        assert_eq!(scene.phase(), ScenePhase::ClosingOut);

        assert_eq!(
            run_until_event(&mut scene),
            Some(SceneEvent::LoadRequested(MAIN_MENU_SCENE.to_string()))
        );
        assert_eq!(scene.phase(), ScenePhase::Loading);
        assert_eq!(scene.iris_scale(), 0.0);
        assert_eq!(scene.tick(1.0), None, "Waits for the loader");

        assert!(scene.finish_loading());
        assert_eq!(
            run_until_event(&mut scene),
            Some(SceneEvent::Completed(MAIN_MENU_SCENE.to_string()))
        );
        assert!(!scene.is_transitioning());
        assert!((scene.iris_scale() - 1.5).abs() < 1e-6);
        assert_eq!(run_until_event(&mut scene), None, "Completion reported once");
    }

    #[test]
    fn test_rejects_while_transitioning() {
        let mut scene = SceneTransition::new(SceneConfig::default());
        assert!(scene.request(GAME_SCENE));
        assert!(!scene.request(MAIN_MENU_SCENE));
        assert_eq!(scene.target(), Some(GAME_SCENE));
        assert!(!scene.finish_loading(), "Not loading yet");
    }

    #[test]
    fn test_close_eases_in() {
        let mut scene = SceneTransition::new(SceneConfig::default());
        scene.request(GAME_SCENE);
        scene.tick(0.2);
        // InQuad at t = 0.5 has covered a quarter of the way
        assert!((scene.iris_scale() - 1.5 * 0.75).abs() < 1e-5);
    }
}
