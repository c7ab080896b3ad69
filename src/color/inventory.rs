//! ColorInventory - the player's ledger of collected paint

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::ColorType;

/// One palette entry: a color and how many units are held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub color: ColorType,
    pub count: u32,
}

/// Collected colors and their counts.
///
/// Never holds an entry for `ColorType::None`. Counts are unsigned, so a
/// spend against an empty entry is rejected rather than going negative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorInventory {
    counts: AHashMap<ColorType, u32>,
}

impl ColorInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from a list of starting entries (summed per color)
    pub fn with_entries(entries: impl IntoIterator<Item = ColorEntry>) -> Self {
        let mut inventory = Self::new();
        for entry in entries {
            inventory.collect(entry.color, entry.count);
        }
        inventory
    }

    /// Add `quantity` units of a color, saturating at `u32::MAX`. No-op
    /// for `None` or zero quantity.
    pub fn collect(&mut self, color: ColorType, quantity: u32) {
        if color.is_none() || quantity == 0 {
            return;
        }
        let count = self.counts.entry(color).or_insert(0);
        *count = count.saturating_add(quantity);
    }

    /// Spend exactly one unit. Returns false (and changes nothing) when
    /// the color is absent or exhausted.
    pub fn spend(&mut self, color: ColorType) -> bool {
        match self.counts.get_mut(&color) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Give one unit back, creating the entry if needed. No-op for `None`.
    pub fn refund(&mut self, color: ColorType) {
        if color.is_none() {
            return;
        }
        let count = self.counts.entry(color).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn has_any(&self, color: ColorType) -> bool {
        self.count(color) > 0
    }

    pub fn count(&self, color: ColorType) -> u32 {
        self.counts.get(&color).copied().unwrap_or(0)
    }

    /// Independent copy of every entry (including exhausted ones) in
    /// palette order, for the palette UI to render.
    pub fn snapshot(&self) -> Vec<ColorEntry> {
        ColorType::ALL
            .iter()
            .filter_map(|color| {
                self.counts.get(color).map(|count| ColorEntry {
                    color: *color,
                    count: *count,
                })
            })
            .collect()
    }

    /// Total units held across all colors, saturating
    pub fn total(&self) -> u32 {
        self.counts.values().fold(0, |total, count| total.saturating_add(*count))
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
