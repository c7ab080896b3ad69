//! Click-to-paint flow: palette selection, spending and refunding colors

use glam::Vec2;

use super::paintable::{HitTest, PaintableSet};
use crate::color::{ColorInventory, ColorType};
use crate::core::types::PaintableId;

#[derive(Debug, Clone, Default)]
pub struct ColorAssignment {
    eligible: Vec<PaintableId>,
    selected: ColorType,
    enabled: bool,
}

impl ColorAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sprites that may be painted this session and clear the
    /// selection
    pub fn initialize(&mut self, eligible: Vec<PaintableId>) {
        self.eligible = eligible;
        self.selected = ColorType::None;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable interaction and drop the selection
    pub fn disable(&mut self) {
        self.enabled = false;
        self.selected = ColorType::None;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn selected(&self) -> ColorType {
        self.selected
    }

    pub fn eligible(&self) -> &[PaintableId] {
        &self.eligible
    }

    /// Palette selection. Picking the selected color again (or `None`)
    /// cancels the selection.
    pub fn select(&mut self, color: ColorType) {
        self.selected = if color == self.selected {
            ColorType::None
        } else {
            color
        };
    }

    /// Paint the sprite under `pointer` with the selected color.
    ///
    /// Returns the painted sprite. Nothing happens when disabled, when no
    /// color is selected, when nothing eligible is hit, or when the
    /// inventory has none of the selected color left.
    pub fn paint(
        &mut self,
        pointer: Vec2,
        hit_test: &dyn HitTest,
        paintables: &mut PaintableSet,
        inventory: &mut ColorInventory,
    ) -> Option<PaintableId> {
        if !self.enabled || self.selected.is_none() {
            return None;
        }
        let id = self.resolve(pointer, hit_test, paintables)?;
        let target = paintables.get_mut(id)?;

        // Locked or already carrying the color: assigning would be a no-op,
        // so don't charge for it
        if target.is_locked() || target.has_color(self.selected) {
            return None;
        }
        if !inventory.spend(self.selected) {
            return None;
        }
        target.assign_color(self.selected);
        tracing::debug!(paintable = ?id, color = %self.selected, "Painted sprite");
        Some(id)
    }

    /// Strip every color from the sprite under `pointer`, refunding one
    /// unit per color to the inventory. Returns the refunded colors.
    pub fn remove(
        &mut self,
        pointer: Vec2,
        hit_test: &dyn HitTest,
        paintables: &mut PaintableSet,
        inventory: &mut ColorInventory,
    ) -> Vec<ColorType> {
        if !self.enabled {
            return Vec::new();
        }
        let Some(id) = self.resolve(pointer, hit_test, paintables) else {
            return Vec::new();
        };
        let Some(target) = paintables.get_mut(id) else {
            return Vec::new();
        };
        if target.is_locked() {
            return Vec::new();
        }

        let refunded = target.assigned_colors();
        for color in &refunded {
            inventory.refund(*color);
        }
        target.clear_colors();
        tracing::debug!(paintable = ?id, count = refunded.len(), "Cleared sprite colors");
        refunded
    }

    fn resolve(&self, pointer: Vec2, hit_test: &dyn HitTest, paintables: &PaintableSet) -> Option<PaintableId> {
        hit_test
            .hit_test(pointer, paintables, &self.eligible)
            .filter(|id| self.eligible.contains(id))
    }
}
