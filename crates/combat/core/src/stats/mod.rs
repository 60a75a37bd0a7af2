//! Combatant stats: base values and the [`Statable`] facade.

pub mod core;
pub mod statable;

pub use self::core::{BaseChances, CoreStats, DamageRange, ResourceMeter};
pub use statable::{Statable, StatableFlags, StatableUpdate};
