//! Paintable sprites and the set of them inside one painting

use std::sync::Arc;

use glam::Vec2;

use crate::color::{ColorAffectable, ColorEffect, ColorEffectRegistry, ColorType};
use crate::core::config::PaintableDef;
use crate::core::types::{Bounds, PaintableId, Rgba};

/// A sprite the player can paint.
///
/// Its active effects are always rebuilt from the assigned colors, one per
/// color in assignment order. Once locked the assignment is frozen, and a
/// locked sprite carrying Green becomes a solid obstacle.
#[derive(Debug, Clone)]
pub struct PaintableEntity {
    id: PaintableId,
    position: Vec2,
    half_extents: Vec2,
    assigned: Vec<ColorType>,
    effects: Vec<ColorEffect>,
    tint: Option<Rgba>,
    locked: bool,
    /// Solid collider size, installed at most once on lock
    solid: Option<Vec2>,
    registry: Arc<ColorEffectRegistry>,
}

impl PaintableEntity {
    pub fn new(id: PaintableId, position: Vec2, half_extents: Vec2, registry: Arc<ColorEffectRegistry>) -> Self {
        Self {
            id,
            position,
            half_extents: half_extents.abs(),
            assigned: Vec::new(),
            effects: Vec::new(),
            tint: None,
            locked: false,
            solid: None,
            registry,
        }
    }

    pub fn from_def(def: &PaintableDef, registry: Arc<ColorEffectRegistry>) -> Self {
        Self::new(def.id, Vec2::from(def.position), Vec2::from(def.half_extents), registry)
    }

    pub fn id(&self) -> PaintableId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the sprite; trigger, solid collider and knockback origin follow
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        for effect in &mut self.effects {
            if let ColorEffect::Yellow { origin, .. } = effect {
                *origin = position;
            }
        }
    }

    pub fn trigger_bounds(&self) -> Bounds {
        Bounds::new(self.position, self.half_extents)
    }

    /// Solid collider, present only when locked with Green assigned
    pub fn solid_bounds(&self) -> Option<Bounds> {
        self.solid.map(|size| Bounds::new(self.position, size))
    }

    pub fn is_blocking(&self) -> bool {
        self.solid.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Current tint; `None` is the neutral, unpainted look
    pub fn tint(&self) -> Option<Rgba> {
        self.tint
    }

    pub fn active_effects(&self) -> &[ColorEffect] {
        &self.effects
    }

    /// Copy of the assigned colors in assignment order
    pub fn assigned_colors(&self) -> Vec<ColorType> {
        self.assigned.clone()
    }

    pub fn has_color(&self, color: ColorType) -> bool {
        self.assigned.contains(&color)
    }

    /// Add a color. No-op when locked, for `None`, or if already present.
    pub fn assign_color(&mut self, color: ColorType) {
        if self.locked || color.is_none() || self.has_color(color) {
            return;
        }
        self.assigned.push(color);
        self.rebuild();
    }

    /// Remove one color. No-op when locked or not assigned.
    pub fn remove_color(&mut self, color: ColorType) {
        if self.locked {
            return;
        }
        let Some(index) = self.assigned.iter().position(|c| *c == color) else {
            return;
        };
        self.assigned.remove(index);
        self.rebuild();
    }

    pub fn clear_colors(&mut self) {
        if self.locked {
            return;
        }
        self.assigned.clear();
        self.rebuild();
    }

    /// Freeze the assignment. With Green assigned this also installs a
    /// solid collider matching the trigger bounds (once).
    pub fn lock(&mut self) {
        self.locked = true;
        if self.has_color(ColorType::Green) && self.solid.is_none() {
            self.solid = Some(self.half_extents);
            tracing::debug!(paintable = ?self.id, "Installed blocking collider");
        }
    }

    pub fn overlaps(&self, point: Vec2) -> bool {
        self.trigger_bounds().contains(point)
    }

    /// Fire every active effect's enter action, in assignment order
    /// Apply every current effect to `target`. Returns the effects applied
    /// so the caller can undo exactly those on exit.
    pub fn on_trigger_enter(&self, target: &mut dyn ColorAffectable) -> Vec<ColorEffect> {
        for effect in &self.effects {
            effect.on_enter(target);
        }
        self.effects.clone()
    }

    fn rebuild(&mut self) {
        self.effects = self
            .assigned
            .iter()
            .filter_map(|color| self.registry.create(*color, self.position))
            .collect();

        self.tint = Rgba::mean_opaque(
            self.assigned
                .iter()
                .filter_map(|color| self.registry.display_color(*color)),
            self.assigned.len(),
        );
    }
}

/// Resolves which paintable sits under a pointer
pub trait HitTest {
    /// The topmost paintable at `pointer`, if it is in `eligible`
    fn hit_test(&self, pointer: Vec2, paintables: &PaintableSet, eligible: &[PaintableId]) -> Option<PaintableId>;
}

/// Hit test against trigger bounds; later sprites are drawn on top.
///
/// A hit on a non-eligible sprite shadows anything beneath it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopmostHitTest;

impl HitTest for TopmostHitTest {
    fn hit_test(&self, pointer: Vec2, paintables: &PaintableSet, eligible: &[PaintableId]) -> Option<PaintableId> {
        let topmost = paintables.iter().rev().find(|p| p.overlaps(pointer))?;
        eligible.contains(&topmost.id()).then_some(topmost.id())
    }
}

/// All paintable sprites of one painting, in draw order
#[derive(Debug, Clone, Default)]
pub struct PaintableSet {
    entities: Vec<PaintableEntity>,
}

impl PaintableSet {
    pub fn new(entities: Vec<PaintableEntity>) -> Self {
        Self { entities }
    }

    pub fn from_defs(defs: &[PaintableDef], registry: &Arc<ColorEffectRegistry>) -> Self {
        Self::new(
            defs.iter()
                .map(|def| PaintableEntity::from_def(def, Arc::clone(registry)))
                .collect(),
        )
    }

    pub fn get(&self, id: PaintableId) -> Option<&PaintableEntity> {
        self.entities.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PaintableId) -> Option<&mut PaintableEntity> {
        self.entities.iter_mut().find(|p| p.id == id)
    }

    pub fn ids(&self) -> Vec<PaintableId> {
        self.entities.iter().map(|p| p.id).collect()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PaintableEntity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PaintableEntity> {
        self.entities.iter_mut()
    }

    pub fn lock_all(&mut self) {
        for paintable in &mut self.entities {
            paintable.lock();
        }
    }

    /// Solid colliders of every blocking sprite
    pub fn solids(&self) -> Vec<Bounds> {
        self.entities.iter().filter_map(|p| p.solid_bounds()).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
