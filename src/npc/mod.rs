//! Painted-world NPCs
//!
//! An NPC is spawned at the start of the chaos phase, wanders inside its
//! painting's walkable area, and can be hurt, slowed, knocked back or
//! killed by color effects. Everything is advanced by [`Npc::tick`].

pub mod health;
pub mod movement;
pub mod state;

pub use health::{Health, HealthChange};
pub use movement::Movement;
pub use state::{NpcState, NpcStateKind};

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use crate::color::ColorAffectable;
use crate::core::config::NpcTuning;
use crate::core::types::{Bounds, EntityId};
use crate::painting::area::BoundedArea;

/// Things that happened to an NPC, drained by its owner each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NpcEvent {
    StateChanged {
        from: Option<NpcStateKind>,
        to: NpcStateKind,
    },
    Damaged {
        remaining: u32,
    },
    Died,
    /// Death animation should start playing
    PlayDeathAnimation,
    /// The despawn delay has elapsed; the owner should remove the NPC
    DespawnDue,
}

#[derive(Debug, Clone)]
pub struct Npc {
    id: EntityId,
    position: Vec2,
    spawn_position: Vec2,
    state: NpcState,
    health: Health,
    movement: Movement,
    collider_enabled: bool,
    area: Arc<BoundedArea>,
    tuning: NpcTuning,
    events: Vec<NpcEvent>,
}

impl Npc {
    /// Spawn at `position` inside `area` and enter Idle immediately
    pub fn spawn<R: Rng + ?Sized>(
        position: Vec2,
        area: Arc<BoundedArea>,
        tuning: &NpcTuning,
        rng: &mut R,
    ) -> Self {
        let initial = NpcState::enter_idle(tuning, rng);
        let npc = Self {
            id: EntityId::new(),
            position,
            spawn_position: position,
            state: initial,
            health: Health::new(tuning.max_health),
            movement: Movement::new(tuning.move_speed),
            collider_enabled: true,
            area,
            tuning: tuning.clone(),
            events: vec![NpcEvent::StateChanged {
                from: None,
                to: NpcStateKind::Idle,
            }],
        };
        tracing::debug!(npc = ?npc.id, ?position, "NPC spawned");
        npc
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.spawn_position
    }

    pub fn state(&self) -> &NpcState {
        &self.state
    }

    pub fn state_kind(&self) -> NpcStateKind {
        self.state.kind()
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    pub fn is_dead(&self) -> bool {
        self.state_kind() == NpcStateKind::Dead
    }

    /// Whether the NPC still takes part in triggers and collisions
    pub fn collider_enabled(&self) -> bool {
        self.collider_enabled
    }

    pub fn area(&self) -> &BoundedArea {
        &self.area
    }

    /// True once dead and the despawn delay has run out
    pub fn is_despawn_due(&self) -> bool {
        matches!(self.state, NpcState::Dead { despawn_in, .. } if despawn_in <= 0.0)
    }

    pub fn drain_events(&mut self) -> Vec<NpcEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the current state by `dt` seconds.
    ///
    /// `solids` are blocking colliders; a roam step whose path touches one is
    /// abandoned and the NPC goes back to Idle.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R, solids: &[Bounds]) {
        match self.state {
            NpcState::Idle {
                wait_duration,
                elapsed,
            } => {
                let elapsed = elapsed + dt;
                if elapsed >= wait_duration {
                    self.enter_roam(rng);
                } else {
                    self.state = NpcState::Idle {
                        wait_duration,
                        elapsed,
                    };
                }
            }
            NpcState::Roam { target: None } => self.enter_idle(rng),
            NpcState::Roam {
                target: Some(target),
            } => {
                let step = self.movement.current_speed() * dt;
                let next = movement::move_towards(self.position, target, step);

                let blocked = solids.iter().any(|solid| solid.blocks_step(self.position, next));
                if blocked {
                    self.enter_idle(rng);
                    return;
                }

                self.position = next;
                if self.position.distance(target) <= self.tuning.arrival_threshold {
                    self.enter_idle(rng);
                }
            }
            NpcState::Dead {
                despawn_in,
                despawn_reported,
            } => {
                let despawn_in = despawn_in - dt;
                let due = despawn_in <= 0.0;
                if due && !despawn_reported {
                    self.events.push(NpcEvent::DespawnDue);
                }
                self.state = NpcState::Dead {
                    despawn_in,
                    despawn_reported: despawn_reported || due,
                };
            }
        }
    }

    /// Death notification: force the Dead state from anywhere. A second
    /// notification while already dead does nothing.
    pub fn notify_death(&mut self) {
        if self.is_dead() {
            return;
        }
        self.movement.stop();
        self.collider_enabled = false;
        self.set_state(NpcState::enter_dead(&self.tuning));
        self.events.push(NpcEvent::PlayDeathAnimation);
        tracing::info!(npc = ?self.id, "NPC died");
    }

    fn enter_idle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.set_state(NpcState::enter_idle(&self.tuning, rng));
    }

    fn enter_roam<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let roam = NpcState::enter_roam(self.spawn_position, &self.tuning, &self.area, rng);
        self.set_state(roam);
    }

    fn set_state(&mut self, next: NpcState) {
        let from = self.state.kind();
        let to = next.kind();
        self.state = next;
        tracing::debug!(npc = ?self.id, ?from, ?to, "NPC state change");
        self.events.push(NpcEvent::StateChanged {
            from: Some(from),
            to,
        });
    }

    fn on_health_change(&mut self, change: HealthChange) {
        match change {
            HealthChange::Ignored => {}
            HealthChange::Damaged { remaining } => {
                self.events.push(NpcEvent::Damaged { remaining });
            }
            HealthChange::Died => {
                self.events.push(NpcEvent::Damaged { remaining: 0 });
                self.events.push(NpcEvent::Died);
                self.notify_death();
            }
        }
    }
}

impl ColorAffectable for Npc {
    fn take_damage(&mut self, amount: u32) {
        let change = self.health.take_damage(amount);
        self.on_health_change(change);
    }

    fn instant_kill(&mut self) {
        if self.health.kill() == HealthChange::Died {
            self.events.push(NpcEvent::Died);
            self.notify_death();
        }
    }

    fn apply_slow(&mut self, factor: f32) {
        self.movement.apply_slow(factor);
    }

    fn remove_slow(&mut self) {
        self.movement.remove_slow();
    }

    fn apply_knockback(&mut self, source: Vec2, force: f32) {
        if self.is_dead() {
            return;
        }
        self.position = movement::knockback_position(self.position, source, force, Some(&self.area), 0.0);
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}
