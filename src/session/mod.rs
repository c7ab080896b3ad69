//! GameSession - owns every core component for one play session
//!
//! Nothing in the crate is global: the session holds the mode controller,
//! the color ledger, every painting world and the interaction zones, and
//! routes player input and frame ticks between them.

pub mod summary;

pub use summary::{PaintableSummary, PaintingSummary, SessionSummary};

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::color::{ColorEffectRegistry, ColorInventory, ColorType};
use crate::core::config::{GameConfig, InventoryPolicy};
use crate::core::error::{GalleryError, Result};
use crate::core::types::{PaintableId, PaintingId, Seconds};
use crate::interaction::{InteractionRequest, InteractionZones, PlayerInteraction};
use crate::mode::scene::{SceneEvent, SceneTransition, MAIN_MENU_SCENE};
use crate::mode::{GameMode, GameModeController, ModeEvent, Transitions};
use crate::painting::{PaintingWorld, PlayerAvatar, TopmostHitTest, WorldEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    World { painting: PaintingId, event: WorldEvent },
    Scene(SceneEvent),
    SpriteAction { painting: PaintingId, key: u32 },
}

#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    registry: Arc<ColorEffectRegistry>,
    inventory: ColorInventory,
    mode: GameModeController,
    transitions: Transitions,
    scene: SceneTransition,
    worlds: Vec<PaintingWorld>,
    zones: InteractionZones,
    player: PlayerInteraction,
    avatar: PlayerAvatar,
    gallery_position: Vec2,
    avatar_input: Vec2,
    rng: ChaCha8Rng,
    events: Vec<SessionEvent>,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(ColorEffectRegistry::new(config.colors.iter().cloned()));
        let worlds = config
            .paintings
            .iter()
            .map(|def| PaintingWorld::from_def(def, &registry, &config.npc))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            paintings = worlds.len(),
            colors = registry.len(),
            seed = config.session.seed,
            "Session started"
        );

        Ok(Self {
            inventory: ColorInventory::with_entries(config.session.starting_colors.iter().copied()),
            mode: GameModeController::new(config.camera.clone()),
            transitions: Transitions::new(),
            scene: SceneTransition::new(config.scene.clone()),
            zones: InteractionZones::from_paintings(&config.paintings),
            player: PlayerInteraction::new(),
            avatar: PlayerAvatar::new(config.player.clone()),
            gallery_position: Vec2::ZERO,
            avatar_input: Vec2::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.session.seed),
            events: Vec::new(),
            worlds,
            registry,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn registry(&self) -> &ColorEffectRegistry {
        &self.registry
    }

    pub fn mode(&self) -> GameMode {
        self.mode.mode()
    }

    pub fn mode_controller(&self) -> &GameModeController {
        &self.mode
    }

    pub fn time_scale(&self) -> f32 {
        self.mode.time_scale()
    }

    pub fn inventory(&self) -> &ColorInventory {
        &self.inventory
    }

    /// Pick up paint found in the gallery
    pub fn collect_color(&mut self, color: ColorType, quantity: u32) {
        self.inventory.collect(color, quantity);
    }

    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    pub fn scene(&self) -> &SceneTransition {
        &self.scene
    }

    pub fn avatar(&self) -> &PlayerAvatar {
        &self.avatar
    }

    pub fn interaction(&self) -> &PlayerInteraction {
        &self.player
    }

    pub fn zones(&self) -> &InteractionZones {
        &self.zones
    }

    pub fn gallery_position(&self) -> Vec2 {
        self.gallery_position
    }

    pub fn worlds(&self) -> &[PaintingWorld] {
        &self.worlds
    }

    pub fn world(&self, id: PaintingId) -> Option<&PaintingWorld> {
        self.worlds.iter().find(|w| w.id() == id)
    }

    pub fn current_world(&self) -> Option<&PaintingWorld> {
        self.world(self.mode.current_painting()?)
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ModeEvent) + 'static) {
        self.mode.subscribe(observer);
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Player walked to `position` on the gallery floor
    pub fn walk_gallery(&mut self, position: Vec2) {
        self.gallery_position = position;
        self.zones
            .update_gallery(position, self.mode.mode(), &mut self.player);
    }

    /// Interact button: use whatever zone is offered. `None` when nothing
    /// is offered or the offered action did not happen.
    pub fn interact(&mut self) -> Option<InteractionRequest> {
        let request = self.player.interact(&self.zones, self.mode.mode())?;
        match request {
            InteractionRequest::EnterPainting(painting) => {
                if !self.enter_painting(painting).ok()? {
                    return None;
                }
            }
            InteractionRequest::SpriteAction { painting, key } => {
                tracing::info!(?painting, key, "Sprite interaction");
                self.events.push(SessionEvent::SpriteAction { painting, key });
            }
        }
        Some(request)
    }

    /// Step into a painting. `Ok(false)` when the mode does not allow it.
    pub fn enter_painting(&mut self, painting: PaintingId) -> Result<bool> {
        let world = find_world_mut(&mut self.worlds, painting).ok_or(GalleryError::UnknownPainting(painting))?;
        let area = Arc::clone(world.area());
        let framing = world.framing().clone();

        if !self
            .mode
            .enter_painting(painting, Arc::clone(&area), &framing, &mut self.transitions)
        {
            return Ok(false);
        }

        if self.config.session.inventory_policy == InventoryPolicy::ResetPerPainting {
            self.inventory = ColorInventory::with_entries(self.config.session.starting_colors.iter().copied());
        }

        world.activate();
        self.avatar.enter_painting(area);
        self.avatar_input = Vec2::ZERO;

        // Player is walked up to the viewing spot in front of the frame
        let [x, _, z] = framing.look_position;
        self.walk_gallery(Vec2::new(x, z));
        Ok(true)
    }

    pub fn exit_painting(&mut self) -> bool {
        self.mode.exit_painting(&mut self.transitions)
    }

    pub fn select_color(&mut self, color: ColorType) {
        if let Some(world) = self.current_world_mut() {
            world.select_color(color);
        }
    }

    pub fn paint(&mut self, pointer: Vec2) -> Option<PaintableId> {
        let painting = self.painting_in_play()?;
        let world = find_world_mut(&mut self.worlds, painting)?;
        world.paint(pointer, &TopmostHitTest, &mut self.inventory)
    }

    pub fn remove(&mut self, pointer: Vec2) -> Vec<ColorType> {
        let Some(painting) = self.painting_in_play() else {
            return Vec::new();
        };
        match find_world_mut(&mut self.worlds, painting) {
            Some(world) => world.remove(pointer, &TopmostHitTest, &mut self.inventory),
            None => Vec::new(),
        }
    }

    /// Lock-in pressed: start the chaos phase of the current painting
    pub fn lock_in(&mut self) -> bool {
        let Some(painting) = self.painting_in_play() else {
            return false;
        };
        match find_world_mut(&mut self.worlds, painting) {
            Some(world) => world.lock_in(&mut self.rng),
            None => false,
        }
    }

    /// Stick input for the avatar, applied on each tick
    pub fn set_move_input(&mut self, input: Vec2) {
        self.avatar_input = input.clamp_length_max(1.0);
    }

    pub fn toggle_pause(&mut self) {
        self.mode.toggle_pause();
    }

    pub fn force_unpause(&mut self) {
        self.mode.force_unpause();
    }

    /// Leave to the main menu: drop any pause, then wipe to the menu scene
    pub fn quit_to_menu(&mut self) -> bool {
        self.mode.force_unpause();
        self.scene.request(MAIN_MENU_SCENE)
    }

    /// Advance one frame of `dt` real seconds. Scene wipes use real time;
    /// everything else uses game time, which stops while paused.
    pub fn tick(&mut self, dt: Seconds) {
        let scaled = dt * self.mode.time_scale();

        if let Some(event) = self.scene.tick(dt) {
            if matches!(event, SceneEvent::LoadRequested(_)) {
                // Loading itself happens outside the core
                self.scene.finish_loading();
            }
            self.events.push(SessionEvent::Scene(event));
        }

        for id in self.transitions.tick(scaled) {
            if let Some(painting) = self.mode.on_transition_complete(id) {
                self.on_exited_painting(painting);
            }
        }

        if scaled <= 0.0 || self.mode.mode() != GameMode::Painting {
            return;
        }
        let Some(painting) = self.mode.current_painting() else {
            return;
        };

        if self.avatar_input != Vec2::ZERO {
            self.avatar.move_2d(self.avatar_input, scaled);
        }

        let Some(world) = find_world_mut(&mut self.worlds, painting) else {
            return;
        };
        world.tick(scaled, &mut self.rng, Some(&mut self.avatar));
        self.events.extend(
            world
                .drain_events()
                .into_iter()
                .map(|event| SessionEvent::World { painting, event }),
        );

        let foot = self.avatar.foot_position();
        self.zones
            .update_painting(painting, Some(foot), self.mode.mode(), &mut self.player);
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::capture(self)
    }

    fn on_exited_painting(&mut self, painting: PaintingId) {
        if let Some(world) = find_world_mut(&mut self.worlds, painting) {
            world.deactivate(&mut self.avatar);
            self.events.extend(
                world
                    .drain_events()
                    .into_iter()
                    .map(|event| SessionEvent::World { painting, event }),
            );
        }
        self.avatar.exit_painting();
        self.avatar_input = Vec2::ZERO;
        self.zones
            .update_painting(painting, None, self.mode.mode(), &mut self.player);
        self.zones.on_exited_painting(painting, &mut self.player);
    }

    /// The painting being played, while not zooming back out
    fn painting_in_play(&self) -> Option<PaintingId> {
        if self.mode.mode() != GameMode::Painting || self.mode.is_exiting() {
            return None;
        }
        self.mode.current_painting()
    }

    fn current_world_mut(&mut self) -> Option<&mut PaintingWorld> {
        let painting = self.painting_in_play()?;
        find_world_mut(&mut self.worlds, painting)
    }
}

fn find_world_mut(worlds: &mut [PaintingWorld], id: PaintingId) -> Option<&mut PaintingWorld> {
    worlds.iter_mut().find(|w| w.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorAffectable;
    use crate::painting::PaintPhase;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default()).unwrap()
    }

    fn run(session: &mut GameSession, seconds: f32) {
        let steps = (seconds / 0.05).ceil() as usize;
        for _ in 0..steps {
            session.tick(0.05);
        }
    }

    fn portal(session: &GameSession) -> Vec2 {
        session.config().paintings[0].portal.center()
    }

    #[test]
    fn test_interact_enters_painting() {
        let mut s = session();
        assert!(s.interact().is_none(), "Nothing offered yet");

        s.walk_gallery(portal(&s));
        assert!(s.interaction().prompt_visible());
        assert_eq!(s.interact(), Some(InteractionRequest::EnterPainting(PaintingId(1))));
        assert_eq!(s.mode(), GameMode::Painting);
        assert!(s.avatar().is_visible());
        assert!(s.current_world().unwrap().assignment().is_enabled());
        assert!(s.interact().is_none(), "Portal is FPS-only");
    }

    #[test]
    fn test_interact_reports_nothing_when_entry_fails() {
        let mut s = session();
        s.worlds.retain(|w| w.id() != PaintingId(1));
        s.walk_gallery(portal(&s));
        assert!(s.interaction().prompt_visible());

        assert_eq!(s.interact(), None);
        assert_eq!(s.mode(), GameMode::Fps);
        assert!(s.painting_in_play().is_none());
    }

    #[test]
    fn test_unknown_painting_is_an_error() {
        let mut s = session();
        assert!(matches!(
            s.enter_painting(PaintingId(99)),
            Err(GalleryError::UnknownPainting(PaintingId(99)))
        ));
    }

    #[test]
    fn test_exit_returns_to_fps_and_reoffers_portal() {
        let mut s = session();
        s.walk_gallery(portal(&s));
        s.interact();
        assert!(s.exit_painting());
        assert_eq!(s.mode(), GameMode::Painting);

        run(&mut s, 1.0);
        assert_eq!(s.mode(), GameMode::Fps);
        assert!(!s.avatar().is_visible());
        assert!(s.interaction().prompt_visible(), "Still standing at the portal");
    }

    #[test]
    fn test_no_painting_during_zoom_out() {
        let mut s = session();
        s.enter_painting(PaintingId(1)).unwrap();
        s.select_color(ColorType::Red);
        s.exit_painting();
        assert!(s.paint(Vec2::new(-2.0, 0.0)).is_none());
        assert_eq!(s.inventory().count(ColorType::Red), 1);
    }

    #[test]
    fn test_pause_freezes_npcs() {
        let mut s = session();
        s.enter_painting(PaintingId(1)).unwrap();
        assert!(s.lock_in());
        run(&mut s, 3.0);

        let before: Vec<_> = s.current_world().unwrap().npcs().iter().map(|n| n.position()).collect();
        s.toggle_pause();
        run(&mut s, 3.0);
        let after: Vec<_> = s.current_world().unwrap().npcs().iter().map(|n| n.position()).collect();
        assert_eq!(before, after);
        s.toggle_pause();
        assert_eq!(s.mode(), GameMode::Painting);
    }

    #[test]
    fn test_inventory_persists_by_default() {
        let mut s = session();
        s.enter_painting(PaintingId(1)).unwrap();
        s.select_color(ColorType::Red);
        assert_eq!(s.paint(Vec2::new(-2.0, 0.0)), Some(PaintableId(1)));
        s.exit_painting();
        run(&mut s, 1.0);

        s.enter_painting(PaintingId(1)).unwrap();
        assert_eq!(s.inventory().count(ColorType::Red), 0, "Spent paint stays spent");
    }

    #[test]
    fn test_reset_policy_restocks_on_entry() {
        let mut config = GameConfig::default();
        config.session.inventory_policy = InventoryPolicy::ResetPerPainting;
        let mut s = GameSession::new(config).unwrap();
        s.enter_painting(PaintingId(1)).unwrap();
        s.select_color(ColorType::Red);
        s.paint(Vec2::new(-2.0, 0.0));
        s.exit_painting();
        run(&mut s, 1.0);

        s.enter_painting(PaintingId(1)).unwrap();
        assert_eq!(s.inventory().count(ColorType::Red), 1);
    }

    #[test]
    fn test_lock_in_only_while_playing() {
        let mut s = session();
        assert!(!s.lock_in(), "Not in a painting");
        s.enter_painting(PaintingId(1)).unwrap();
        assert!(s.lock_in());
        assert_eq!(s.current_world().unwrap().phase(), PaintPhase::Chaos);
        assert!(!s.lock_in());
    }

    #[test]
    fn test_quit_to_menu_unpauses_and_wipes() {
        let mut s = session();
        s.toggle_pause();
        assert!(s.quit_to_menu());
        assert_eq!(s.mode(), GameMode::Fps);
        assert!(!s.quit_to_menu(), "Wipe already running");

        run(&mut s, 1.0);
        let events = s.drain_events();
        assert!(events.contains(&SessionEvent::Scene(SceneEvent::LoadRequested(MAIN_MENU_SCENE.into()))));
        assert!(events.contains(&SessionEvent::Scene(SceneEvent::Completed(MAIN_MENU_SCENE.into()))));
    }
}
