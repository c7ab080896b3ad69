//! Speed with stack-counted slows, plus knockback displacement

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::painting::area::BoundedArea;

/// Knockback direction used when source and target coincide
pub const DEFAULT_KNOCKBACK_DIRECTION: Vec2 = Vec2::Y;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    base_speed: f32,
    current_speed: f32,
    slow_stacks: u32,
    stopped: bool,
}

impl Movement {
    pub fn new(base_speed: f32) -> Self {
        Self {
            base_speed,
            current_speed: base_speed,
            slow_stacks: 0,
            stopped: false,
        }
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Effective speed after slows; zero once stopped
    pub fn current_speed(&self) -> f32 {
        if self.stopped {
            0.0
        } else {
            self.current_speed
        }
    }

    /// Ratio of effective to base speed
    pub fn speed_multiplier(&self) -> f32 {
        if self.base_speed == 0.0 {
            return 1.0;
        }
        self.current_speed() / self.base_speed
    }

    pub fn slow_stacks(&self) -> u32 {
        self.slow_stacks
    }

    pub fn is_slowed(&self) -> bool {
        self.slow_stacks > 0
    }

    /// Push a slow. The latest factor wins while any stack is active.
    pub fn apply_slow(&mut self, factor: f32) {
        self.slow_stacks += 1;
        self.current_speed = self.base_speed * factor.clamp(0.0, 1.0);
    }

    /// Pop a slow; base speed returns with the last stack
    pub fn remove_slow(&mut self) {
        self.slow_stacks = self.slow_stacks.saturating_sub(1);
        if self.slow_stacks == 0 {
            self.current_speed = self.base_speed;
        }
    }

    /// Halt permanently (death)
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.base_speed);
    }
}

/// Where a knockback of `force` from `source` lands a sprite at `position`.
///
/// The result is clamped into `area` (using the sprite's foot offset) when
/// one is given.
pub fn knockback_position(
    position: Vec2,
    source: Vec2,
    force: f32,
    area: Option<&BoundedArea>,
    foot_offset: f32,
) -> Vec2 {
    let direction = (position - source).try_normalize().unwrap_or(DEFAULT_KNOCKBACK_DIRECTION);
    let pushed = position + direction * force;

    match area {
        Some(area) => area.clamp(pushed, foot_offset).unwrap_or(position),
        None => pushed,
    }
}

/// Step from `from` toward `to` by at most `max_step`
pub fn move_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        to
    } else {
        from + delta / distance * max_step
    }
}
