//! Spatial side of combat: geometry, combatants and the arena scheduler.

pub mod arena;
pub mod combatant;
pub mod geometry;

pub use arena::{Arena, ArenaTick};
pub use combatant::Combatant;
pub use geometry::{EntityId, Facing, Rect, Vec2};
