//! BoundedArea - the walkable polygon of a painted world
//!
//! Sprites are positioned by a pivot that sits above their feet, so the
//! clamp works on the foot point (`pivot + (0, foot_offset)`) and converts
//! the result back to a pivot position.

use geo::{Area, Closest, ClosestPoint, Coord, EuclideanDistance, LineString, Point, Polygon};
use glam::Vec2;

use crate::core::error::{GalleryError, Result};

/// Points this close to the boundary count as inside
pub const BOUNDARY_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct BoundedArea {
    polygon: Polygon<f64>,
    spawn_point: Vec2,
}

impl BoundedArea {
    /// Build an area from its outline. The ring is closed automatically.
    pub fn new(vertices: &[[f32; 2]], spawn_point: Vec2) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GalleryError::DegeneratePolygon {
                vertices: vertices.len(),
            });
        }

        let coords: Vec<Coord<f64>> = vertices
            .iter()
            .map(|[x, y]| Coord {
                x: *x as f64,
                y: *y as f64,
            })
            .collect();
        let polygon = Polygon::new(LineString::from(coords), vec![]);

        if polygon.unsigned_area() <= f64::EPSILON {
            return Err(GalleryError::DegeneratePolygon {
                vertices: vertices.len(),
            });
        }

        Ok(Self {
            polygon,
            spawn_point,
        })
    }

    /// Axis-aligned rectangle, handy for tests and simple paintings
    pub fn rectangle(min: Vec2, max: Vec2, spawn_point: Vec2) -> Result<Self> {
        Self::new(
            &[[min.x, min.y], [max.x, min.y], [max.x, max.y], [min.x, max.y]],
            spawn_point,
        )
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    /// True if `position` lies inside the polygon or on its boundary
    pub fn contains(&self, position: Vec2) -> bool {
        to_point(position).euclidean_distance(&self.polygon) <= BOUNDARY_EPSILON
    }

    /// Pull a pivot position back into the walkable region.
    ///
    /// Returns the input unchanged when its foot point is already inside;
    /// otherwise the foot is moved to the nearest boundary point. `None`
    /// only when no nearest point exists (non-finite input).
    pub fn clamp(&self, position: Vec2, foot_offset: f32) -> Option<Vec2> {
        let foot = Vec2::new(position.x, position.y + foot_offset);
        if !foot.is_finite() {
            return None;
        }
        if self.contains(foot) {
            return Some(position);
        }

        let closest = match self.polygon.closest_point(&to_point(foot)) {
            Closest::Intersection(p) | Closest::SinglePoint(p) => p,
            Closest::Indeterminate => return None,
        };

        Some(Vec2::new(
            closest.x() as f32,
            closest.y() as f32 - foot_offset,
        ))
    }

    /// Unit normal of the boundary edge nearest to `position`
    pub fn boundary_normal(&self, position: Vec2) -> Option<Vec2> {
        let point = to_point(position);
        let nearest = self.polygon.exterior().lines().min_by(|a, b| {
            point
                .euclidean_distance(a)
                .total_cmp(&point.euclidean_distance(b))
        })?;

        let edge = Vec2::new(
            (nearest.end.x - nearest.start.x) as f32,
            (nearest.end.y - nearest.start.y) as f32,
        );
        let normal = edge.perp().normalize_or_zero();
        (normal != Vec2::ZERO).then_some(normal)
    }

    pub fn vertices(&self) -> Vec<Vec2> {
        self.polygon
            .exterior()
            .points()
            .map(|p| Vec2::new(p.x() as f32, p.y() as f32))
            .collect()
    }
}

fn to_point(v: Vec2) -> Point<f64> {
    Point::new(v.x as f64, v.y as f64)
}
