//! Interaction zones
//!
//! Portals in the gallery let the player step into a painting; sprite
//! zones inside a painting offer painting-side actions. The player keeps
//! track of the one zone currently offered and shows a prompt for it.

use glam::Vec2;

use crate::core::config::PaintingDef;
use crate::core::types::{Bounds, PaintingId};
use crate::mode::GameMode;

/// What interacting asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionRequest {
    EnterPainting(PaintingId),
    SpriteAction { painting: PaintingId, key: u32 },
}

/// Identifies one zone across the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKey {
    Portal(PaintingId),
    Sprite { painting: PaintingId, key: u32 },
}

pub trait Interactable {
    fn key(&self) -> ZoneKey;

    fn can_interact(&self, mode: GameMode) -> bool;

    fn interact(&self) -> InteractionRequest;
}

/// Gallery-side trigger in front of a painting. Usable only in FPS.
#[derive(Debug, Clone)]
pub struct PaintingPortal {
    painting: PaintingId,
    zone: Bounds,
    in_range: bool,
}

impl PaintingPortal {
    pub fn new(painting: PaintingId, zone: Bounds) -> Self {
        Self {
            painting,
            zone,
            in_range: false,
        }
    }

    pub fn painting(&self) -> PaintingId {
        self.painting
    }

    pub fn is_in_range(&self) -> bool {
        self.in_range
    }
}

impl Interactable for PaintingPortal {
    fn key(&self) -> ZoneKey {
        ZoneKey::Portal(self.painting)
    }

    fn can_interact(&self, mode: GameMode) -> bool {
        self.in_range && mode == GameMode::Fps
    }

    fn interact(&self) -> InteractionRequest {
        InteractionRequest::EnterPainting(self.painting)
    }
}

/// Painting-side trigger. Usable only in Painting mode.
#[derive(Debug, Clone)]
pub struct SpriteInteractable {
    painting: PaintingId,
    key: u32,
    zone: Bounds,
    in_range: bool,
}

impl SpriteInteractable {
    pub fn new(painting: PaintingId, key: u32, zone: Bounds) -> Self {
        Self {
            painting,
            key,
            zone,
            in_range: false,
        }
    }

    pub fn is_in_range(&self) -> bool {
        self.in_range
    }
}

impl Interactable for SpriteInteractable {
    fn key(&self) -> ZoneKey {
        ZoneKey::Sprite {
            painting: self.painting,
            key: self.key,
        }
    }

    fn can_interact(&self, mode: GameMode) -> bool {
        self.in_range && mode == GameMode::Painting
    }

    fn interact(&self) -> InteractionRequest {
        InteractionRequest::SpriteAction {
            painting: self.painting,
            key: self.key,
        }
    }
}

/// The zone the player may currently use, plus prompt visibility
#[derive(Debug, Clone, Default)]
pub struct PlayerInteraction {
    offered: Option<ZoneKey>,
}

impl PlayerInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_zone_enter(&mut self, key: ZoneKey) {
        self.offered = Some(key);
    }

    /// Leaving a zone withdraws its offer. Leaving some other zone leaves
    /// the current offer in place.
    pub fn on_zone_exit(&mut self, key: ZoneKey) {
        if self.offered == Some(key) {
            self.offered = None;
        }
    }

    pub fn offered(&self) -> Option<ZoneKey> {
        self.offered
    }

    pub fn prompt_visible(&self) -> bool {
        self.offered.is_some()
    }

    /// Use the offered zone if it allows it in `mode`
    pub fn interact(&self, zones: &InteractionZones, mode: GameMode) -> Option<InteractionRequest> {
        let zone = zones.get(self.offered?)?;
        zone.can_interact(mode).then(|| zone.interact())
    }
}

/// Every interaction zone in the gallery
#[derive(Debug, Clone, Default)]
pub struct InteractionZones {
    portals: Vec<PaintingPortal>,
    sprites: Vec<SpriteInteractable>,
}

impl InteractionZones {
    pub fn from_paintings(paintings: &[PaintingDef]) -> Self {
        Self {
            portals: paintings.iter().map(|p| PaintingPortal::new(p.id, p.portal)).collect(),
            sprites: paintings
                .iter()
                .flat_map(|p| p.interactables.iter().map(move |z| SpriteInteractable::new(p.id, z.key, z.zone)))
                .collect(),
        }
    }

    pub fn portals(&self) -> &[PaintingPortal] {
        &self.portals
    }

    pub fn sprites(&self) -> &[SpriteInteractable] {
        &self.sprites
    }

    pub fn get(&self, key: ZoneKey) -> Option<&dyn Interactable> {
        match key {
            ZoneKey::Portal(_) => self
                .portals
                .iter()
                .find(|p| p.key() == key)
                .map(|p| p as &dyn Interactable),
            ZoneKey::Sprite { .. } => self
                .sprites
                .iter()
                .find(|s| s.key() == key)
                .map(|s| s as &dyn Interactable),
        }
    }

    /// Player moved on the gallery floor
    pub fn update_gallery(&mut self, position: Vec2, mode: GameMode, player: &mut PlayerInteraction) {
        for portal in &mut self.portals {
            let inside = portal.zone.contains(position);
            track(portal.key(), &mut portal.in_range, inside, mode == GameMode::Fps, player);
        }
    }

    /// Avatar moved inside `painting`; `None` when no avatar is out
    pub fn update_painting(
        &mut self,
        painting: PaintingId,
        position: Option<Vec2>,
        mode: GameMode,
        player: &mut PlayerInteraction,
    ) {
        for sprite in self.sprites.iter_mut().filter(|s| s.painting == painting) {
            let inside = position.is_some_and(|p| sprite.zone.contains(p));
            track(sprite.key(), &mut sprite.in_range, inside, mode == GameMode::Painting, player);
        }
    }

    /// Back in the gallery: a portal the player is still standing in is
    /// offered again, since no new enter will arrive for it.
    pub fn on_exited_painting(&self, painting: PaintingId, player: &mut PlayerInteraction) {
        if let Some(portal) = self.portals.iter().find(|p| p.painting == painting && p.in_range) {
            player.on_zone_enter(portal.key());
        }
    }
}

/// Enter/exit edge detection for one zone. Entering only offers the zone
/// when the current mode allows using it.
fn track(key: ZoneKey, in_range: &mut bool, inside: bool, usable: bool, player: &mut PlayerInteraction) {
    match (*in_range, inside) {
        (false, true) => {
            *in_range = true;
            if usable {
                player.on_zone_enter(key);
            }
        }
        (true, false) => {
            *in_range = false;
            player.on_zone_exit(key);
        }
        _ => {}
    }
}
