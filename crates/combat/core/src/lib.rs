//! Combat resolution and aura engine.
//!
//! `combat-core` owns the rules of a real-time, frame-stepped fight: status
//! effects grouped into auras, cached modifier containers derived from them,
//! the damage pipeline, limiter-gated attacks, and the [`world::Arena`] that
//! drives all of it one update at a time. Randomness and presentation are
//! injected through [`env`], so every fight replays exactly from a seed.
pub mod affix;
pub mod attack;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod events;
pub mod modifiers;
#[cfg(feature = "serde")]
pub mod persist;
pub mod stats;
pub mod status;
pub mod talent;
pub mod world;

pub use affix::{Affix, AffixKind, AffixRegistry, Item, ItemSlots};
pub use attack::{
    Attack, AttackBuilder, AttackContext, AttackError, AttackLimiter, AttackReport, AttackSlot,
    Cooldown, HitEffect, MeleeAttack, Projectile, ProjectileSpec, RangedAttack, WhirlwindAttack,
};
pub use combat::{
    AttackDamageResult, AttackReceiveType, AttackTable, BaseDamage, DamageMethod, DamageTags,
    apply_damage_modifiers,
};
pub use config::{CombatConfig, ConfigError};
pub use env::{
    AnimationState, FrameAnimator, NullPresentation, PcgRng, PresentationSink,
    RecordingPresentation, RngOracle, ScriptedRng,
};
pub use error::{CombatError, ErrorSeverity};
pub use events::{
    AuraApplied, AuraExpired, CombatEvents, EntityDied, EventChannel, SubscriptionToken,
    TalentChanged,
};
pub use modifiers::ModifierContainers;
#[cfg(feature = "serde")]
pub use persist::{Envelope, Persist, PersistError, require_version};
pub use stats::{BaseChances, CoreStats, DamageRange, ResourceMeter, Statable, StatableFlags};
pub use status::{
    Aura, AuraAddOutcome, AuraList, AuraTemplate, DamageSchool, DamageSource, EffectKind,
    EffectTemplate, ElementalSchool, ManipulationType, PeriodicTick, PowerType, RaceType, Scope,
    StackPolicy, StatKind, StatusEffect,
};
pub use talent::{TalentDefinition, TalentError, TalentId, TalentLevels, TalentTree};
pub use world::{Arena, ArenaTick, Combatant, EntityId, Facing, Rect, Vec2};
