//! Core type definitions used throughout the codebase

use geo::{Coord, Intersects, Line, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for runtime entities (spawned NPCs, avatars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of a painting hanging in the gallery (stable, from config)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaintingId(pub u32);

/// Identifier of a paintable sprite inside a painting (stable, from config)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaintableId(pub u32);

/// Identifier of an in-flight visual transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub u64);

/// Straight (non-premultiplied) RGBA color, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Component-wise average of the given colors, forced opaque.
    ///
    /// `divisor` may exceed the number of colors yielded when some inputs
    /// have no display value; missing inputs then count as black.
    pub fn mean_opaque(colors: impl IntoIterator<Item = Rgba>, divisor: usize) -> Option<Rgba> {
        if divisor == 0 {
            return None;
        }
        let (mut r, mut g, mut b) = (0.0, 0.0, 0.0);
        for c in colors {
            r += c.r;
            g += c.g;
            b += c.b;
        }
        let n = divisor as f32;
        Some(Rgba::opaque(r / n, g / n, b / n))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Rgba {
    fn from(c: [f32; 4]) -> Self {
        Rgba::new(c[0], c[1], c[2], c[3])
    }
}

/// Simulation time in seconds (frame delta, durations)
pub type Seconds = f32;

/// Axis-aligned box used for trigger and solid colliders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub center: [f32; 2],
    pub half_extents: [f32; 2],
}

impl Bounds {
    pub fn new(center: glam::Vec2, half_extents: glam::Vec2) -> Self {
        Self {
            center: center.to_array(),
            half_extents: half_extents.abs().to_array(),
        }
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::from(self.center)
    }

    pub fn half_extents(&self) -> glam::Vec2 {
        glam::Vec2::from(self.half_extents)
    }

    /// Same box moved to a new center
    pub fn recentered(&self, center: glam::Vec2) -> Self {
        Self::new(center, self.half_extents())
    }

    /// Inclusive point test
    pub fn contains(&self, point: glam::Vec2) -> bool {
        let d = (point - self.center()).abs();
        let h = self.half_extents();
        d.x <= h.x && d.y <= h.y
    }

    /// Whether moving in a straight line from `from` to `to` enters the
    /// box. A mover already inside is never blocked, so it can step out.
    pub fn blocks_step(&self, from: glam::Vec2, to: glam::Vec2) -> bool {
        if self.contains(from) {
            return false;
        }
        let min = self.center() - self.half_extents();
        let max = self.center() + self.half_extents();
        let rect = Rect::new(coord(min), coord(max));
        Line::new(coord(from), coord(to)).intersects(&rect)
    }
}

fn coord(v: glam::Vec2) -> Coord<f64> {
    Coord {
        x: f64::from(v.x),
        y: f64::from(v.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_are_unique() {
        assert_ne!(EntityId::new(), EntityId::new());
    }

    #[test]
    fn test_mean_of_red_and_blue() {
        let mean = Rgba::mean_opaque(
            [Rgba::new(1.0, 0.0, 0.0, 0.5), Rgba::new(0.0, 0.0, 1.0, 0.5)],
            2,
        )
        .unwrap();
        assert_eq!(mean, Rgba::opaque(0.5, 0.0, 0.5));
        assert_eq!(mean.a, 1.0, "Blended tint is always opaque");
    }

    #[test]
    fn test_mean_counts_missing_inputs_as_black() {
        let mean = Rgba::mean_opaque([Rgba::WHITE], 2).unwrap();
        assert_eq!(mean, Rgba::opaque(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_bounds_contains_edges() {
        let b = Bounds::new(glam::Vec2::new(1.0, 1.0), glam::Vec2::new(0.5, 0.5));
        assert!(b.contains(glam::Vec2::new(1.5, 0.5)));
        assert!(!b.contains(glam::Vec2::new(1.6, 1.0)));
        assert!(b.recentered(glam::Vec2::ZERO).contains(glam::Vec2::ZERO));
    }

    #[test]
    fn test_step_across_box_is_blocked() {
        let wall = Bounds::new(glam::Vec2::new(0.5, 0.0), glam::Vec2::new(0.1, 2.0));
        assert!(wall.blocks_step(glam::Vec2::ZERO, glam::Vec2::new(1.0, 0.0)), "Tunnelling step");
        assert!(wall.blocks_step(glam::Vec2::ZERO, glam::Vec2::new(0.45, 0.0)));
        assert!(!wall.blocks_step(glam::Vec2::ZERO, glam::Vec2::new(0.3, 0.0)));
        assert!(!wall.blocks_step(glam::Vec2::new(0.0, 3.0), glam::Vec2::new(1.0, 3.0)));
        assert!(
            !wall.blocks_step(glam::Vec2::new(0.5, 0.0), glam::Vec2::new(1.0, 0.0)),
            "Stepping out from inside"
        );
    }

    #[test]
    fn test_mean_of_nothing() {
        assert!(Rgba::mean_opaque(std::iter::empty(), 0).is_none());
    }
}
