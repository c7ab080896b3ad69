//! ColorEffectRegistry - builds effects from per-color descriptors
//!
//! Adding a color takes both a descriptor (data) and a branch in
//! [`ColorEffectRegistry::create`]. Missing either one degrades to "no
//! effect" with a warning rather than a failure.

use ahash::AHashMap;
use glam::Vec2;

use super::{ColorEffect, ColorEffectDescriptor, ColorType};
use crate::core::types::Rgba;

#[derive(Debug, Clone, Default)]
pub struct ColorEffectRegistry {
    descriptors: AHashMap<ColorType, ColorEffectDescriptor>,
}

impl ColorEffectRegistry {
    /// Index descriptors by color. A later descriptor for the same color
    /// replaces an earlier one.
    pub fn new(descriptors: impl IntoIterator<Item = ColorEffectDescriptor>) -> Self {
        let mut map = AHashMap::new();
        for descriptor in descriptors {
            if descriptor.color.is_none() {
                tracing::warn!("Ignoring color effect descriptor registered for the None color");
                continue;
            }
            map.insert(descriptor.color, descriptor);
        }
        Self { descriptors: map }
    }

    pub fn descriptor(&self, color: ColorType) -> Option<&ColorEffectDescriptor> {
        self.descriptors.get(&color)
    }

    pub fn display_color(&self, color: ColorType) -> Option<Rgba> {
        self.descriptor(color).map(|d| d.display_color)
    }

    /// Build a fresh effect for `color`. `origin` is the world position of
    /// the sprite the effect is installed on (used by knockback).
    pub fn create(&self, color: ColorType, origin: Vec2) -> Option<ColorEffect> {
        let Some(data) = self.descriptors.get(&color) else {
            tracing::warn!("No color effect data found for color: {}", color);
            return None;
        };

        match color {
            ColorType::Red => Some(ColorEffect::Red { damage: data.damage }),
            ColorType::Green => Some(ColorEffect::Green),
            ColorType::Blue => Some(ColorEffect::Blue {
                slow_factor: data.slow_factor,
            }),
            ColorType::Black => Some(ColorEffect::Black {
                instant_kill: data.instant_kill,
            }),
            ColorType::Yellow => Some(ColorEffect::Yellow {
                origin,
                force: data.knockback_force,
            }),
            ColorType::None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ColorEffectRegistry {
        ColorEffectRegistry::new(
            ColorType::ALL
                .iter()
                .map(|c| ColorEffectDescriptor::new(*c, Rgba::WHITE)),
        )
    }

    #[test]
    fn test_creates_every_known_color() {
        let reg = registry();
        for color in ColorType::ALL {
            let effect = reg.create(color, Vec2::ZERO);
            assert_eq!(effect.map(|e| e.color()), Some(color));
        }
    }

    #[test]
    fn test_none_and_unregistered_yield_no_effect() {
        let reg = ColorEffectRegistry::new([ColorEffectDescriptor::new(ColorType::Red, Rgba::WHITE)]);
        assert!(reg.create(ColorType::None, Vec2::ZERO).is_none());
        assert!(reg.create(ColorType::Blue, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_last_descriptor_wins() {
        let mut first = ColorEffectDescriptor::new(ColorType::Red, Rgba::WHITE);
        first.damage = 1;
        let mut second = first.clone();
        second.damage = 5;

        let reg = ColorEffectRegistry::new([first, second]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.create(ColorType::Red, Vec2::ZERO), Some(ColorEffect::Red { damage: 5 }));
    }

    #[test]
    fn test_none_descriptor_is_dropped() {
        let reg = ColorEffectRegistry::new([ColorEffectDescriptor::new(ColorType::None, Rgba::BLACK)]);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_yellow_captures_origin() {
        let reg = registry();
        let effect = reg.create(ColorType::Yellow, Vec2::new(4.0, -1.0)).unwrap();
        assert_eq!(effect, ColorEffect::Yellow { origin: Vec2::new(4.0, -1.0), force: 1.0 });
    }
}
