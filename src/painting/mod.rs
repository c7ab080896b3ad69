//! The 2D side of a painting: walkable area, paintable sprites, the
//! paint flow and the world that runs the chaos phase.

pub mod area;
pub mod assignment;
pub mod avatar;
pub mod motion;
pub mod paintable;
pub mod world;

pub use area::BoundedArea;
pub use assignment::ColorAssignment;
pub use avatar::{AvatarEvent, PlayerAvatar};
pub use motion::SpriteMotion;
pub use paintable::{HitTest, PaintableEntity, PaintableSet, TopmostHitTest};
pub use world::{Occupant, Overlap, PaintPhase, PaintingWorld, WorldEvent};
