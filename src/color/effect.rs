//! Color effects and the static data they are built from

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{ColorAffectable, ColorType};
use crate::core::types::Rgba;

/// Per-color tuning data, loaded once from config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorEffectDescriptor {
    pub color: ColorType,
    pub display_color: Rgba,
    /// Red: damage dealt on enter
    pub damage: u32,
    /// Blue: speed multiplier while inside (0..=1)
    pub slow_factor: f32,
    /// Yellow: knockback distance on enter
    pub knockback_force: f32,
    /// Black: whether entering kills outright
    pub instant_kill: bool,
}

impl Default for ColorEffectDescriptor {
    fn default() -> Self {
        Self {
            color: ColorType::None,
            display_color: Rgba::WHITE,
            damage: 1,
            slow_factor: 0.5,
            knockback_force: 1.0,
            instant_kill: true,
        }
    }
}

impl ColorEffectDescriptor {
    pub fn new(color: ColorType, display_color: Rgba) -> Self {
        Self {
            color,
            display_color,
            ..Self::default()
        }
    }
}

/// An active effect installed on a paintable sprite.
///
/// Effects carry only their captured configuration; which target they act
/// on is decided per trigger event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorEffect {
    /// Deals fixed damage on enter
    Red { damage: u32 },
    /// Solid obstacle once locked; no trigger behavior
    Green,
    /// Slows while inside; stack-counted on the target
    Blue { slow_factor: f32 },
    /// Kills on enter (when enabled in the descriptor)
    Black { instant_kill: bool },
    /// One-shot knockback away from `origin` on enter
    Yellow { origin: Vec2, force: f32 },
}

impl ColorEffect {
    pub fn color(&self) -> ColorType {
        match self {
            ColorEffect::Red { .. } => ColorType::Red,
            ColorEffect::Green => ColorType::Green,
            ColorEffect::Blue { .. } => ColorType::Blue,
            ColorEffect::Black { .. } => ColorType::Black,
            ColorEffect::Yellow { .. } => ColorType::Yellow,
        }
    }

    pub fn on_enter(&self, target: &mut dyn ColorAffectable) {
        match *self {
            ColorEffect::Red { damage } => target.take_damage(damage),
            ColorEffect::Green => {}
            ColorEffect::Blue { slow_factor } => target.apply_slow(slow_factor),
            ColorEffect::Black { instant_kill } => {
                if instant_kill {
                    target.instant_kill();
                }
            }
            ColorEffect::Yellow { origin, force } => target.apply_knockback(origin, force),
        }
    }

    pub fn on_exit(&self, target: &mut dyn ColorAffectable) {
        if let ColorEffect::Blue { .. } = self {
            target.remove_slow();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Affectable that records every call it receives
    #[derive(Debug, Default)]
    pub(crate) struct RecordingTarget {
        pub position: Vec2,
        pub calls: Vec<String>,
    }

    impl ColorAffectable for RecordingTarget {
        fn take_damage(&mut self, amount: u32) {
            self.calls.push(format!("damage:{}", amount));
        }
        fn instant_kill(&mut self) {
            self.calls.push("kill".into());
        }
        fn apply_slow(&mut self, factor: f32) {
            self.calls.push(format!("slow:{}", factor));
        }
        fn remove_slow(&mut self) {
            self.calls.push("unslow".into());
        }
        fn apply_knockback(&mut self, source: Vec2, force: f32) {
            self.calls.push(format!("knockback:{},{}:{}", source.x, source.y, force));
        }
        fn position(&self) -> Vec2 {
            self.position
        }
    }

    #[test]
    fn test_red_damages_on_enter_only() {
        let mut target = RecordingTarget::default();
        let effect = ColorEffect::Red { damage: 2 };
        effect.on_enter(&mut target);
        effect.on_exit(&mut target);
        assert_eq!(target.calls, vec!["damage:2"]);
    }

    #[test]
    fn test_blue_slows_and_restores() {
        let mut target = RecordingTarget::default();
        let effect = ColorEffect::Blue { slow_factor: 0.5 };
        effect.on_enter(&mut target);
        effect.on_exit(&mut target);
        assert_eq!(target.calls, vec!["slow:0.5", "unslow"]);
    }

    #[test]
    fn test_black_kills_unless_disabled() {
        let mut target = RecordingTarget::default();
        ColorEffect::Black { instant_kill: true }.on_enter(&mut target);
        ColorEffect::Black { instant_kill: false }.on_enter(&mut target);
        assert_eq!(target.calls, vec!["kill"]);
    }

    #[test]
    fn test_green_does_nothing_on_trigger() {
        let mut target = RecordingTarget::default();
        ColorEffect::Green.on_enter(&mut target);
        ColorEffect::Green.on_exit(&mut target);
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_yellow_knocks_back_from_origin() {
        let mut target = RecordingTarget::default();
        let effect = ColorEffect::Yellow { origin: Vec2::new(1.0, 2.0), force: 3.0 };
        effect.on_enter(&mut target);
        effect.on_exit(&mut target);
        assert_eq!(target.calls, vec!["knockback:1,2:3"]);
        assert_eq!(effect.color(), ColorType::Yellow);
    }
}
