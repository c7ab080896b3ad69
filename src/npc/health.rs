//! Health pool with idempotent death

use serde::{Deserialize, Serialize};

/// Outcome of a damage or kill request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    /// Already dead; nothing happened
    Ignored,
    /// Took damage and survived
    Damaged { remaining: u32 },
    /// This call brought health to zero
    Died,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Subtract `amount`, clamping at zero. A living target always reports
    /// the hit, even for zero damage.
    pub fn take_damage(&mut self, amount: u32) -> HealthChange {
        if self.is_dead() {
            return HealthChange::Ignored;
        }
        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            HealthChange::Died
        } else {
            HealthChange::Damaged {
                remaining: self.current,
            }
        }
    }

    pub fn kill(&mut self) -> HealthChange {
        if self.is_dead() {
            return HealthChange::Ignored;
        }
        self.current = 0;
        HealthChange::Died
    }

    /// Back to full health
    pub fn reset(&mut self) {
        self.current = self.max;
    }
}
