//! NPC behavior states
//!
//! Idle waits a random duration, Roam walks to a random point near the
//! spawn position, Dead is terminal. Each variant carries the data its
//! enter action produced.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::NpcTuning;
use crate::painting::area::BoundedArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcStateKind {
    Idle,
    Roam,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NpcState {
    Idle {
        wait_duration: f32,
        elapsed: f32,
    },
    Roam {
        /// `None` when no target inside the area could be found
        target: Option<Vec2>,
    },
    Dead {
        /// Seconds left before the NPC should be removed
        despawn_in: f32,
        despawn_reported: bool,
    },
}

impl NpcState {
    pub fn kind(&self) -> NpcStateKind {
        match self {
            NpcState::Idle { .. } => NpcStateKind::Idle,
            NpcState::Roam { .. } => NpcStateKind::Roam,
            NpcState::Dead { .. } => NpcStateKind::Dead,
        }
    }

    /// Idle enter action: draw a wait duration from the tuning range
    pub fn enter_idle<R: Rng + ?Sized>(tuning: &NpcTuning, rng: &mut R) -> Self {
        let wait_duration = if tuning.max_wait > tuning.min_wait {
            rng.gen_range(tuning.min_wait..=tuning.max_wait)
        } else {
            tuning.min_wait
        };
        NpcState::Idle {
            wait_duration,
            elapsed: 0.0,
        }
    }

    /// Roam enter action: pick a point within `roam_radius` of the spawn
    /// position, clamped into the walkable area
    pub fn enter_roam<R: Rng + ?Sized>(
        spawn_position: Vec2,
        tuning: &NpcTuning,
        area: &BoundedArea,
        rng: &mut R,
    ) -> Self {
        let offset = random_in_unit_circle(rng) * tuning.roam_radius;
        NpcState::Roam {
            target: area.clamp(spawn_position + offset, 0.0),
        }
    }

    pub fn enter_dead(tuning: &NpcTuning) -> Self {
        NpcState::Dead {
            despawn_in: tuning.despawn_delay,
            despawn_reported: false,
        }
    }
}

/// Uniform sample inside the unit disc
pub fn random_in_unit_circle<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let radius = rng.gen::<f32>().sqrt();
    Vec2::from_angle(angle) * radius
}
