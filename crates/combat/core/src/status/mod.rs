//! Status effects, auras and the per-entity aura list.

pub mod aura;
pub mod aura_list;
pub mod category;
pub mod effect;
pub mod template;

pub use aura::{Aura, AuraDuration, AuraState, PeriodicTick, StackPolicy};
pub use aura_list::{AuraAddOutcome, AuraList, AuraUpdate, EffectTotals, PeriodicEvent};
pub use category::{
    Category, DamageSchool, DamageSource, ElementalSchool, PowerType, RaceType, Scope, StatKind,
};
pub use effect::{EffectId, EffectKind, ManipulationType, StatusEffect};
pub use template::{AuraTemplate, EffectTemplate};
