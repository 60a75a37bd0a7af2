//! Status effects: single typed numeric modifiers.
//!
//! A [`StatusEffect`] never touches an entity directly. Enabling or disabling
//! it asks the owner's [`ModifierContainers`] to refresh the one category the
//! effect targets, recomputing the cached aggregate from the [`AuraList`].

use core::fmt;

use super::aura_list::AuraList;
use super::category::{DamageSchool, DamageSource, ElementalSchool, RaceType, Scope, StatKind};
use crate::modifiers::ModifierContainers;

/// How an effect value combines with others of the same identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManipulationType {
    /// Summed and added to the base value.
    Fixed,
    /// Summed as percentages, applied as `base * (1 + sum / 100)`.
    Percental,
}

/// Key grouping effects that aggregate together, e.g. `Dmg_Source_Melee`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(String);

impl EffectId {
    pub fn new(prefix: &str, member: &str) -> Self {
        let mut id = String::with_capacity(prefix.len() + member.len() + 1);
        id.push_str(prefix);
        id.push('_');
        id.push_str(member);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an effect modifies, including the category member it targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    DamageDoneWithSchool(Scope<DamageSchool>),
    DamageDoneWithSource(Scope<DamageSource>),
    DamageDoneWithElement(Scope<ElementalSchool>),
    DamageDoneAgainstRace(Scope<RaceType>),
    CriticalDamageBonus(Scope<DamageSource>),
    Stat(Scope<StatKind>),
}

impl EffectKind {
    pub const SCHOOL_PREFIX: &'static str = "Dmg_School";
    pub const SOURCE_PREFIX: &'static str = "Dmg_Source";
    pub const ELEMENT_PREFIX: &'static str = "Dmg_Elem";
    pub const RACE_PREFIX: &'static str = "Dmg_Race";
    pub const CRITICAL_PREFIX: &'static str = "Crit";
    pub const STAT_PREFIX: &'static str = "Stat";

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::DamageDoneWithSchool(_) => Self::SCHOOL_PREFIX,
            Self::DamageDoneWithSource(_) => Self::SOURCE_PREFIX,
            Self::DamageDoneWithElement(_) => Self::ELEMENT_PREFIX,
            Self::DamageDoneAgainstRace(_) => Self::RACE_PREFIX,
            Self::CriticalDamageBonus(_) => Self::CRITICAL_PREFIX,
            Self::Stat(_) => Self::STAT_PREFIX,
        }
    }

    fn member_name(&self) -> &'static str {
        match self {
            Self::DamageDoneWithSchool(s) => s.name(),
            Self::DamageDoneWithSource(s) => s.name(),
            Self::DamageDoneWithElement(s) => s.name(),
            Self::DamageDoneAgainstRace(s) => s.name(),
            Self::CriticalDamageBonus(s) => s.name(),
            Self::Stat(s) => s.name(),
        }
    }

    /// Identifier shared by every effect of this kind and member.
    pub fn identifier(&self) -> EffectId {
        EffectId::new(self.prefix(), self.member_name())
    }

    /// True if this kind targets the `All` selector of its axis.
    pub fn is_all(&self) -> bool {
        self.member_name() == "All"
    }

    fn phrase(&self) -> String {
        match self {
            Self::DamageDoneWithSchool(s) => format!("damage done with {s} attacks"),
            Self::DamageDoneWithSource(s) => format!("damage done with {s} attacks"),
            Self::DamageDoneWithElement(s) => format!("{s} damage done"),
            Self::DamageDoneAgainstRace(s) => format!("damage done against {s}"),
            Self::CriticalDamageBonus(s) => format!("critical damage with {s} attacks"),
            Self::Stat(s) => s.name().to_string(),
        }
    }
}

/// A single typed, composable modifier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    kind: EffectKind,
    value: f32,
    manipulation: ManipulationType,
    identifier: EffectId,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, value: f32, manipulation: ManipulationType) -> Self {
        Self {
            identifier: kind.identifier(),
            kind,
            value,
            manipulation,
        }
    }

    pub fn fixed(kind: EffectKind, value: f32) -> Self {
        Self::new(kind, value, ManipulationType::Fixed)
    }

    pub fn percental(kind: EffectKind, value: f32) -> Self {
        Self::new(kind, value, ManipulationType::Percental)
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Replace the value (talent level changes recompute it in place).
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    pub fn manipulation(&self) -> ManipulationType {
        self.manipulation
    }

    pub fn identifier(&self) -> &EffectId {
        &self.identifier
    }

    /// Called once when the owning aura becomes active on an entity.
    pub fn on_enable(&self, auras: &AuraList, containers: &mut ModifierContainers) {
        containers.refresh(self.kind, auras);
    }

    /// Called once when the owning aura stops being active on an entity.
    pub fn on_disable(&self, auras: &AuraList, containers: &mut ModifierContainers) {
        containers.refresh(self.kind, auras);
    }

    /// Presentation text, e.g. `+10% damage done with Melee attacks`.
    pub fn description(&self) -> String {
        let sign = if self.value >= 0.0 { "+" } else { "" };
        match self.manipulation {
            ManipulationType::Fixed => format!("{sign}{} {}", self.value, self.kind.phrase()),
            ManipulationType::Percental => {
                format!("{sign}{}% {}", self.value, self.kind.phrase())
            }
        }
    }
}
