//! One painting's 2D world
//!
//! A painting starts in the paint phase, where the player spends colors on
//! its sprites. Locking in freezes every sprite, starts the moving ones and
//! spawns the NPCs: the chaos phase. From then on each tick moves sprites
//! and NPCs, then fires trigger enter/exit effects for every overlap that
//! began or ended.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::area::BoundedArea;
use super::assignment::ColorAssignment;
use super::avatar::{AvatarEvent, PlayerAvatar};
use super::motion::SpriteMotion;
use super::paintable::{HitTest, PaintableEntity, PaintableSet};
use crate::color::{ColorAffectable, ColorEffect, ColorEffectRegistry, ColorInventory, ColorType};
use crate::core::config::{NpcTuning, PaintingDef, PaintingFraming};
use crate::core::error::Result;
use crate::core::types::{EntityId, PaintableId, PaintingId};
use crate::npc::{Npc, NpcEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintPhase {
    Paint,
    Chaos,
}

/// Something standing in a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Npc(EntityId),
    Avatar,
}

/// An occupant inside one paintable's trigger. Keeps the effects that
/// fired on entry so the exit undoes exactly those, even if the sprite's
/// colors changed in between.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    pub paintable: PaintableId,
    pub occupant: Occupant,
    applied: Vec<ColorEffect>,
}

impl Overlap {
    pub fn applied(&self) -> &[ColorEffect] {
        &self.applied
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    PhaseChanged(PaintPhase),
    NpcSpawned(EntityId),
    Npc { id: EntityId, event: NpcEvent },
    NpcDespawned(EntityId),
    Avatar(AvatarEvent),
    TriggerEntered { paintable: PaintableId, occupant: Occupant },
    TriggerExited { paintable: PaintableId, occupant: Occupant },
}

#[derive(Debug, Clone)]
pub struct PaintingWorld {
    id: PaintingId,
    name: String,
    framing: PaintingFraming,
    area: Arc<BoundedArea>,
    paintables: PaintableSet,
    motions: Vec<(PaintableId, SpriteMotion)>,
    assignment: ColorAssignment,
    npc_spawns: Vec<Vec2>,
    npcs: Vec<Npc>,
    npc_tuning: NpcTuning,
    phase: PaintPhase,
    /// Overlaps seen on the previous tick
    overlaps: Vec<Overlap>,
    events: Vec<WorldEvent>,
}

impl PaintingWorld {
    pub fn from_def(def: &PaintingDef, registry: &Arc<ColorEffectRegistry>, npc_tuning: &NpcTuning) -> Result<Self> {
        let area = BoundedArea::new(&def.area, Vec2::from(def.spawn_point))?;
        let paintables = PaintableSet::from_defs(&def.paintables, registry);
        let motions = def
            .paintables
            .iter()
            .filter_map(|p| p.motion.as_ref().map(|m| (p.id, SpriteMotion::from_def(m))))
            .collect();

        let mut assignment = ColorAssignment::new();
        assignment.initialize(paintables.ids());

        Ok(Self {
            id: def.id,
            name: def.name.clone(),
            framing: def.framing.clone(),
            area: Arc::new(area),
            paintables,
            motions,
            assignment,
            npc_spawns: def.npcs.iter().map(|n| Vec2::from(n.position)).collect(),
            npcs: Vec::new(),
            npc_tuning: npc_tuning.clone(),
            phase: PaintPhase::Paint,
            overlaps: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn id(&self) -> PaintingId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn framing(&self) -> &PaintingFraming {
        &self.framing
    }

    pub fn area(&self) -> &Arc<BoundedArea> {
        &self.area
    }

    pub fn phase(&self) -> PaintPhase {
        self.phase
    }

    pub fn paintables(&self) -> &PaintableSet {
        &self.paintables
    }

    pub fn paintable(&self, id: PaintableId) -> Option<&PaintableEntity> {
        self.paintables.get(id)
    }

    pub fn assignment(&self) -> &ColorAssignment {
        &self.assignment
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn npc(&self, id: EntityId) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id() == id)
    }

    pub fn npc_mut(&mut self, id: EntityId) -> Option<&mut Npc> {
        self.npcs.iter_mut().find(|n| n.id() == id)
    }

    pub fn overlaps(&self) -> &[Overlap] {
        &self.overlaps
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Player walked in: painting is possible again while still in the
    /// paint phase
    pub fn activate(&mut self) {
        if self.phase == PaintPhase::Paint {
            self.assignment.enable();
        }
    }

    /// Player left: painting stops and the avatar leaves every trigger
    pub fn deactivate(&mut self, avatar: &mut PlayerAvatar) {
        self.assignment.disable();
        let (left, staying): (Vec<_>, Vec<_>) = std::mem::take(&mut self.overlaps)
            .into_iter()
            .partition(|o| o.occupant == Occupant::Avatar);
        self.overlaps = staying;
        for overlap in &left {
            self.fire_exit(overlap, Some(&mut *avatar));
        }
    }

    pub fn select_color(&mut self, color: ColorType) {
        self.assignment.select(color);
    }

    pub fn paint(&mut self, pointer: Vec2, hit_test: &dyn HitTest, inventory: &mut ColorInventory) -> Option<PaintableId> {
        self.assignment.paint(pointer, hit_test, &mut self.paintables, inventory)
    }

    pub fn remove(&mut self, pointer: Vec2, hit_test: &dyn HitTest, inventory: &mut ColorInventory) -> Vec<ColorType> {
        self.assignment.remove(pointer, hit_test, &mut self.paintables, inventory)
    }

    /// End the paint phase. Returns false if chaos already started.
    pub fn lock_in<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase != PaintPhase::Paint {
            return false;
        }

        self.assignment.disable();
        self.paintables.lock_all();
        for (_, motion) in &mut self.motions {
            motion.start();
        }

        for position in &self.npc_spawns {
            let npc = Npc::spawn(*position, Arc::clone(&self.area), &self.npc_tuning, rng);
            self.events.push(WorldEvent::NpcSpawned(npc.id()));
            self.npcs.push(npc);
        }

        self.phase = PaintPhase::Chaos;
        self.events.push(WorldEvent::PhaseChanged(PaintPhase::Chaos));
        tracing::info!(painting = ?self.id, npcs = self.npcs.len(), "Chaos phase started");
        true
    }

    /// Advance sprites and NPCs by `dt`, then fire triggers for overlaps
    /// that began or ended this tick.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R, mut avatar: Option<&mut PlayerAvatar>) {
        self.move_sprites(dt);

        let solids = self.paintables.solids();
        for npc in &mut self.npcs {
            npc.tick(dt, rng, &solids);
        }

        self.update_overlaps(avatar.as_deref_mut());
        self.collect_npc_events();

        let before = self.npcs.len();
        let mut despawned = Vec::new();
        self.npcs.retain(|npc| {
            let due = npc.is_despawn_due();
            if due {
                despawned.push(npc.id());
            }
            !due
        });
        for id in despawned {
            self.overlaps.retain(|o| o.occupant != Occupant::Npc(id));
            self.events.push(WorldEvent::NpcDespawned(id));
        }
        if self.npcs.len() != before {
            tracing::debug!(painting = ?self.id, remaining = self.npcs.len(), "Despawned NPCs");
        }

        if let Some(avatar) = avatar {
            self.events.extend(avatar.drain_events().into_iter().map(WorldEvent::Avatar));
        }
    }

    fn move_sprites(&mut self, dt: f32) {
        if self.phase != PaintPhase::Chaos {
            return;
        }
        for (id, motion) in self.motions.iter_mut() {
            let Some(position) = self.paintables.get(*id).map(|p| p.position()) else {
                continue;
            };
            let solids: Vec<_> = self
                .paintables
                .iter()
                .filter(|p| p.id() != *id)
                .filter_map(|p| p.solid_bounds())
                .collect();
            let next = motion.step(position, dt, &self.area, &solids);
            if let Some(p) = self.paintables.get_mut(*id) {
                p.set_position(next);
            }
        }
    }

    fn update_overlaps(&mut self, mut avatar: Option<&mut PlayerAvatar>) {
        let mut current = Vec::new();
        for paintable in self.paintables.iter() {
            for npc in self.npcs.iter().filter(|n| n.collider_enabled()) {
                if paintable.overlaps(npc.position()) {
                    current.push((paintable.id(), Occupant::Npc(npc.id())));
                }
            }
            if let Some(avatar) = avatar.as_deref() {
                if avatar.is_visible() && paintable.overlaps(avatar.foot_position()) {
                    current.push((paintable.id(), Occupant::Avatar));
                }
            }
        }

        let (mut staying, left): (Vec<_>, Vec<_>) = std::mem::take(&mut self.overlaps)
            .into_iter()
            .partition(|o| current.contains(&(o.paintable, o.occupant)));
        for overlap in &left {
            self.fire_exit(overlap, avatar.as_deref_mut());
        }
        for (paintable, occupant) in current {
            if staying.iter().any(|o| o.paintable == paintable && o.occupant == occupant) {
                continue;
            }
            if let Some(applied) = self.fire_enter(paintable, occupant, avatar.as_deref_mut()) {
                staying.push(Overlap {
                    paintable,
                    occupant,
                    applied,
                });
            }
        }
        self.overlaps = staying;
    }

    /// Fire a paintable's enter effects; returns what was applied
    fn fire_enter(
        &mut self,
        paintable: PaintableId,
        occupant: Occupant,
        avatar: Option<&mut PlayerAvatar>,
    ) -> Option<Vec<ColorEffect>> {
        let source = self.paintables.get(paintable)?;
        let target = resolve_target(&mut self.npcs, occupant, avatar)?;
        let applied = source.on_trigger_enter(target);
        self.events.push(WorldEvent::TriggerEntered { paintable, occupant });
        Some(applied)
    }

    /// Undo the effects recorded on entry
    fn fire_exit(&mut self, overlap: &Overlap, avatar: Option<&mut PlayerAvatar>) {
        let Some(target) = resolve_target(&mut self.npcs, overlap.occupant, avatar) else {
            return;
        };
        for effect in &overlap.applied {
            effect.on_exit(&mut *target);
        }
        self.events.push(WorldEvent::TriggerExited {
            paintable: overlap.paintable,
            occupant: overlap.occupant,
        });
    }

    fn collect_npc_events(&mut self) {
        for npc in &mut self.npcs {
            let id = npc.id();
            self.events
                .extend(npc.drain_events().into_iter().map(|event| WorldEvent::Npc { id, event }));
        }
    }
}

fn resolve_target<'a>(
    npcs: &'a mut [Npc],
    occupant: Occupant,
    avatar: Option<&'a mut PlayerAvatar>,
) -> Option<&'a mut dyn ColorAffectable> {
    match occupant {
        // A dead NPC's collider is off: nothing fires on it
        Occupant::Npc(id) => npcs
            .iter_mut()
            .find(|n| n.id() == id && n.collider_enabled())
            .map(|npc| npc as &mut dyn ColorAffectable),
        Occupant::Avatar => avatar.map(|avatar| avatar as &mut dyn ColorAffectable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{
        default_color_descriptors, GameConfig, MotionDef, NpcSpawnDef, PaintableDef, PlayerTuning,
    };
    use crate::core::types::Bounds;
    use crate::npc::NpcStateKind;
    use crate::painting::paintable::TopmostHitTest;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn registry() -> Arc<ColorEffectRegistry> {
        Arc::new(ColorEffectRegistry::new(default_color_descriptors()))
    }

    fn def() -> PaintingDef {
        PaintingDef {
            id: PaintingId(7),
            name: "Test".into(),
            area: vec![[-5.0, -5.0], [5.0, -5.0], [5.0, 5.0], [-5.0, 5.0]],
            spawn_point: [0.0, 0.0],
            framing: PaintingFraming::default(),
            paintables: vec![
                PaintableDef {
                    id: PaintableId(1),
                    position: [0.0, 0.0],
                    half_extents: [1.0, 1.0],
                    motion: None,
                },
                PaintableDef {
                    id: PaintableId(2),
                    position: [3.0, 3.0],
                    half_extents: [0.5, 0.5],
                    motion: Some(MotionDef {
                        direction: [1.0, 0.0],
                        speed: 1.0,
                    }),
                },
            ],
            npcs: vec![NpcSpawnDef { position: [0.0, 0.0] }],
            portal: Bounds::new(Vec2::ZERO, Vec2::ONE),
            interactables: Vec::new(),
        }
    }

    fn world() -> PaintingWorld {
        PaintingWorld::from_def(&def(), &registry(), &NpcTuning::default()).unwrap()
    }

    #[test]
    fn test_starts_in_paint_phase() {
        let mut w = world();
        assert_eq!(w.phase(), PaintPhase::Paint);
        assert!(w.npcs().is_empty());
        assert!(!w.assignment().is_enabled());
        w.activate();
        assert!(w.assignment().is_enabled());
        assert_eq!(w.assignment().eligible(), &[PaintableId(1), PaintableId(2)]);
    }

    #[test]
    fn test_degenerate_area_rejected() {
        let mut bad = def();
        bad.area.truncate(2);
        assert!(PaintingWorld::from_def(&bad, &registry(), &NpcTuning::default()).is_err());
    }

    #[test]
    fn test_lock_in_spawns_and_freezes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut w = world();
        let mut inv = ColorInventory::new();
        inv.collect(ColorType::Green, 1);
        w.activate();
        w.select_color(ColorType::Green);
        assert_eq!(w.paint(Vec2::ZERO, &TopmostHitTest, &mut inv), Some(PaintableId(1)));

        assert!(w.lock_in(&mut rng));
        assert_eq!(w.phase(), PaintPhase::Chaos);
        assert_eq!(w.npcs().len(), 1);
        assert!(!w.assignment().is_enabled());
        assert!(w.paintable(PaintableId(1)).unwrap().is_blocking());
        assert!(!w.lock_in(&mut rng), "Lock-in only once");

        let events = w.drain_events();
        assert!(events.contains(&WorldEvent::PhaseChanged(PaintPhase::Chaos)));
        assert!(matches!(events[0], WorldEvent::NpcSpawned(_)));
    }

    #[test]
    fn test_moving_sprite_only_moves_in_chaos() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut w = world();
        w.tick(1.0, &mut rng, None);
        assert_eq!(w.paintable(PaintableId(2)).unwrap().position(), Vec2::new(3.0, 3.0));

        w.lock_in(&mut rng);
        w.tick(1.0, &mut rng, None);
        assert_eq!(w.paintable(PaintableId(2)).unwrap().position(), Vec2::new(4.0, 3.0));
    }

    #[test]
    fn test_red_sprite_damages_npc_once_per_entry() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut w = world();
        let mut inv = ColorInventory::new();
        inv.collect(ColorType::Red, 1);
        w.activate();
        w.select_color(ColorType::Red);
        w.paint(Vec2::ZERO, &TopmostHitTest, &mut inv);
        w.lock_in(&mut rng);

        let id = w.npcs()[0].id();
        w.tick(0.01, &mut rng, None);
        assert_eq!(w.npc(id).unwrap().health().current(), 2);
        w.tick(0.01, &mut rng, None);
        assert_eq!(w.npc(id).unwrap().health().current(), 2, "Staying inside does not re-trigger");

        let events = w.drain_events();
        assert!(events.contains(&WorldEvent::TriggerEntered {
            paintable: PaintableId(1),
            occupant: Occupant::Npc(id),
        }));
    }

    #[test]
    fn test_black_sprite_kills_and_npc_despawns() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut w = world();
        let mut inv = ColorInventory::new();
        inv.collect(ColorType::Black, 1);
        w.activate();
        w.select_color(ColorType::Black);
        w.paint(Vec2::ZERO, &TopmostHitTest, &mut inv);
        w.lock_in(&mut rng);
        let id = w.npcs()[0].id();

        w.tick(0.01, &mut rng, None);
        assert_eq!(w.npc(id).unwrap().state_kind(), NpcStateKind::Dead);
        assert!(!w.npc(id).unwrap().collider_enabled());

        for _ in 0..30 {
            w.tick(0.1, &mut rng, None);
        }
        assert!(w.npc(id).is_none());
        let events = w.drain_events();
        assert!(events.contains(&WorldEvent::NpcDespawned(id)));
        assert!(events.contains(&WorldEvent::Npc { id, event: NpcEvent::Died }));
    }

    #[test]
    fn test_blue_slow_removed_on_exit() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut w = world();
        let mut inv = ColorInventory::new();
        inv.collect(ColorType::Blue, 1);
        w.activate();
        w.select_color(ColorType::Blue);
        w.paint(Vec2::ZERO, &TopmostHitTest, &mut inv);
        w.lock_in(&mut rng);
        let id = w.npcs()[0].id();

        w.tick(0.01, &mut rng, None);
        assert!(w.npc(id).unwrap().movement().is_slowed());

        // Carry the NPC out of the trigger
        w.npc_mut(id).unwrap().apply_knockback(Vec2::ZERO, 3.0);
        w.tick(0.0, &mut rng, None);
        assert!(!w.npc(id).unwrap().movement().is_slowed());
    }

    #[test]
    fn test_avatar_exits_triggers_on_deactivate() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut w = world();
        let mut inv = ColorInventory::new();
        inv.collect(ColorType::Blue, 1);
        w.activate();
        w.select_color(ColorType::Blue);
        w.paint(Vec2::ZERO, &TopmostHitTest, &mut inv);

        let mut avatar = PlayerAvatar::new(PlayerTuning {
            affected_by_color_effects: true,
            ..PlayerTuning::default()
        });
        avatar.enter_painting(Arc::clone(w.area()));
        w.tick(0.01, &mut rng, Some(&mut avatar));
        assert!(avatar.speed_multiplier() < 1.0);

        w.deactivate(&mut avatar);
        assert_eq!(avatar.speed_multiplier(), 1.0);
        assert!(w.overlaps().is_empty());
    }

    #[test]
    fn test_slow_lifted_after_color_removed_underfoot() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut w = world();
        let mut inv = ColorInventory::new();
        inv.collect(ColorType::Blue, 1);
        w.activate();
        w.select_color(ColorType::Blue);
        w.paint(Vec2::ZERO, &TopmostHitTest, &mut inv);

        let mut avatar = PlayerAvatar::new(PlayerTuning {
            affected_by_color_effects: true,
            ..PlayerTuning::default()
        });
        avatar.enter_painting(Arc::clone(w.area()));
        w.tick(0.01, &mut rng, Some(&mut avatar));
        assert_eq!(avatar.speed_multiplier(), 0.5);
        assert_eq!(w.overlaps()[0].applied(), &[ColorEffect::Blue { slow_factor: 0.5 }]);

        assert_eq!(w.remove(Vec2::ZERO, &TopmostHitTest, &mut inv), vec![ColorType::Blue]);
        w.tick(0.01, &mut rng, Some(&mut avatar));
        assert_eq!(avatar.speed_multiplier(), 0.5, "Still standing in the trigger");

        avatar.set_position(Vec2::new(4.0, 4.0));
        w.tick(0.01, &mut rng, Some(&mut avatar));
        assert!(w.overlaps().is_empty());
        assert_eq!(avatar.speed_multiplier(), 1.0, "Exit undoes the slow applied on entry");
    }

    #[test]
    fn test_color_added_underfoot_waits_for_next_entry() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut w = world();
        let mut inv = ColorInventory::new();
        inv.collect(ColorType::Blue, 1);
        w.activate();

        let mut avatar = PlayerAvatar::new(PlayerTuning {
            affected_by_color_effects: true,
            ..PlayerTuning::default()
        });
        avatar.enter_painting(Arc::clone(w.area()));
        w.tick(0.01, &mut rng, Some(&mut avatar));

        w.select_color(ColorType::Blue);
        w.paint(Vec2::ZERO, &TopmostHitTest, &mut inv);
        w.tick(0.01, &mut rng, Some(&mut avatar));
        assert_eq!(avatar.speed_multiplier(), 1.0);

        avatar.set_position(Vec2::new(4.0, 4.0));
        w.tick(0.01, &mut rng, Some(&mut avatar));
        assert_eq!(avatar.speed_multiplier(), 1.0, "No slow to undo");
    }

    #[test]
    fn test_default_painting_builds() {
        let config = GameConfig::default();
        let reg = registry();
        for def in &config.paintings {
            let w = PaintingWorld::from_def(def, &reg, &config.npc).unwrap();
            assert_eq!(w.paintables().len(), def.paintables.len());
        }
    }
}
