//! Moving sprites: after lock-in some paintables travel in a straight
//! line and bounce off the walkable boundary and solid sprites.

use glam::Vec2;

use super::area::BoundedArea;
use crate::core::config::MotionDef;
use crate::core::types::Bounds;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteMotion {
    direction: Vec2,
    speed: f32,
    active: bool,
}

impl SpriteMotion {
    pub fn new(direction: Vec2, speed: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            speed,
            active: false,
        }
    }

    pub fn from_def(def: &MotionDef) -> Self {
        Self::new(Vec2::from(def.direction), def.speed)
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Next position from `position` after `dt`, reflecting the travel
    /// direction on contact. Returns `position` unchanged while inactive.
    pub fn step(&mut self, position: Vec2, dt: f32, area: &BoundedArea, solids: &[Bounds]) -> Vec2 {
        if !self.active || self.direction == Vec2::ZERO {
            return position;
        }

        let mut next = position + self.direction * self.speed * dt;

        if !area.contains(next) {
            if let Some(normal) = area.boundary_normal(next) {
                self.direction = reflect(self.direction, normal);
            }
            next = area.clamp(next, 0.0).unwrap_or(position);
        }

        if let Some(solid) = solids.iter().find(|s| s.blocks_step(position, next)) {
            self.direction = reflect(self.direction, contact_normal(solid, position));
            next = position;
        }

        next
    }
}

/// Reflect `direction` about a surface with unit `normal`
pub fn reflect(direction: Vec2, normal: Vec2) -> Vec2 {
    (direction - 2.0 * direction.dot(normal) * normal).normalize_or_zero()
}

/// Face of `solid` that a point outside it is closest to facing
fn contact_normal(solid: &Bounds, from: Vec2) -> Vec2 {
    let offset = from - solid.center();
    let h = solid.half_extents();
    // Compare how far outside each slab the point sits
    if offset.x.abs() - h.x >= offset.y.abs() - h.y {
        Vec2::new(offset.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, offset.y.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> BoundedArea {
        BoundedArea::rectangle(Vec2::ZERO, Vec2::new(10.0, 4.0), Vec2::ONE).unwrap()
    }

    #[test]
    fn test_inactive_does_not_move() {
        let mut motion = SpriteMotion::new(Vec2::X, 2.0);
        assert_eq!(motion.step(Vec2::ONE, 1.0, &area(), &[]), Vec2::ONE);
    }

    #[test]
    fn test_moves_along_direction() {
        let mut motion = SpriteMotion::new(Vec2::new(2.0, 0.0), 2.0);
        motion.start();
        let next = motion.step(Vec2::ONE, 0.5, &area(), &[]);
        assert_eq!(next, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_bounces_off_boundary() {
        let area = area();
        let mut motion = SpriteMotion::new(Vec2::X, 4.0);
        motion.start();
        let next = motion.step(Vec2::new(9.5, 2.0), 0.5, &area, &[]);
        assert!(area.contains(next));
        assert!(motion.direction().x < 0.0, "Direction reflected back into the area");
    }

    #[test]
    fn test_bounces_off_solid() {
        let mut motion = SpriteMotion::new(Vec2::X, 2.0);
        motion.start();
        let wall = Bounds::new(Vec2::new(3.0, 2.0), Vec2::new(0.5, 2.0));
        let next = motion.step(Vec2::new(2.0, 2.0), 0.5, &area(), &[wall]);
        assert_eq!(next, Vec2::new(2.0, 2.0));
        assert_eq!(motion.direction(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_fast_sprite_bounces_off_thin_solid() {
        let mut motion = SpriteMotion::new(Vec2::X, 8.0);
        motion.start();
        let wall = Bounds::new(Vec2::new(4.0, 2.0), Vec2::new(0.1, 2.0));
        let next = motion.step(Vec2::new(2.0, 2.0), 0.5, &area(), &[wall]);
        assert_eq!(next, Vec2::new(2.0, 2.0), "Would have landed at x = 6");
        assert_eq!(motion.direction(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_reflect() {
        let reflected = reflect(Vec2::new(1.0, -1.0).normalize(), Vec2::Y);
        assert!((reflected - Vec2::new(1.0, 1.0).normalize()).length() < 1e-6);
    }
}
