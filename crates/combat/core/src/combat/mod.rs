//! Combat resolution: attack table, damage pipeline, results.

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{BaseDamage, DamageMethod, DamageTags, apply_damage_modifiers};
pub use hit::AttackTable;
pub use result::{AttackDamageResult, AttackReceiveType};
