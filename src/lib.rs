//! Painted Gallery - gallery exploration with paintable 2D worlds
//!
//! The player walks a gallery, steps into paintings, spends scarce colors on
//! the sprites inside, then locks in and watches NPCs run into the effects.

pub mod color;
pub mod core;
pub mod interaction;
pub mod mode;
pub mod npc;
pub mod painting;
pub mod session;
