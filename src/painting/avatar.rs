//! PlayerAvatar - the player's sprite while inside a painting

use std::sync::Arc;

use glam::Vec2;

use super::area::BoundedArea;
use crate::color::ColorAffectable;
use crate::core::config::PlayerTuning;
use crate::npc::movement::knockback_position;
use crate::npc::{Health, HealthChange, Movement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarEvent {
    Damaged { remaining: u32 },
    Died,
}

/// Walks inside the current painting's area. Color effects only reach it
/// when `affected_by_color_effects` is set; otherwise they are ignored.
#[derive(Debug, Clone)]
pub struct PlayerAvatar {
    tuning: PlayerTuning,
    position: Vec2,
    health: Health,
    movement: Movement,
    area: Option<Arc<BoundedArea>>,
    events: Vec<AvatarEvent>,
}

impl PlayerAvatar {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            health: Health::new(tuning.max_health),
            movement: Movement::new(tuning.move_speed_2d),
            position: Vec2::ZERO,
            area: None,
            events: Vec::new(),
            tuning,
        }
    }

    /// Appear in `area` with the feet on its spawn point, fully restored
    pub fn enter_painting(&mut self, area: Arc<BoundedArea>) {
        self.health.reset();
        self.movement.reset();
        self.position = area.spawn_point() - Vec2::new(0.0, self.tuning.foot_offset);
        self.area = Some(area);
        self.events.clear();
    }

    pub fn exit_painting(&mut self) {
        self.area = None;
    }

    /// Visible only while inside a painting
    pub fn is_visible(&self) -> bool {
        self.area.is_some()
    }

    pub fn foot_position(&self) -> Vec2 {
        self.position + Vec2::new(0.0, self.tuning.foot_offset)
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.movement.speed_multiplier()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn drain_events(&mut self) -> Vec<AvatarEvent> {
        std::mem::take(&mut self.events)
    }

    /// Walk by `input` (unit-ish stick vector) for `dt` seconds, staying
    /// inside the area. Returns false when there is no area to walk in.
    pub fn move_2d(&mut self, input: Vec2, dt: f32) -> bool {
        let Some(area) = &self.area else {
            tracing::warn!("2D movement requested outside of a painting");
            return false;
        };
        let speed = self.tuning.move_speed_2d * self.speed_multiplier();
        let next = self.position + input * speed * dt;
        self.position = area.clamp(next, self.tuning.foot_offset).unwrap_or(self.position);
        true
    }

    fn affected(&self) -> bool {
        self.tuning.affected_by_color_effects
    }
}

impl ColorAffectable for PlayerAvatar {
    fn take_damage(&mut self, amount: u32) {
        if !self.affected() {
            return;
        }
        match self.health.take_damage(amount) {
            HealthChange::Ignored => {}
            HealthChange::Damaged { remaining } => self.events.push(AvatarEvent::Damaged { remaining }),
            HealthChange::Died => {
                self.events.push(AvatarEvent::Damaged { remaining: 0 });
                self.events.push(AvatarEvent::Died);
            }
        }
    }

    fn instant_kill(&mut self) {
        if self.affected() && self.health.kill() == HealthChange::Died {
            self.events.push(AvatarEvent::Died);
        }
    }

    fn apply_slow(&mut self, factor: f32) {
        if self.affected() {
            self.movement.apply_slow(factor);
        }
    }

    fn remove_slow(&mut self) {
        if self.affected() {
            self.movement.remove_slow();
        }
    }

    fn apply_knockback(&mut self, source: Vec2, force: f32) {
        if !self.affected() {
            return;
        }
        self.position = knockback_position(
            self.position,
            source,
            force,
            self.area.as_deref(),
            self.tuning.foot_offset,
        );
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}
