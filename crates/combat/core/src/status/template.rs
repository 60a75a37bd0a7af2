//! Data descriptions of effects and auras, instantiated into live values.
//!
//! Content (talents, items, hit effects, catalogs) stores templates; each
//! application builds fresh [`StatusEffect`]/[`Aura`] instances from them.

use super::aura::{Aura, PeriodicTick};
use super::effect::{EffectKind, ManipulationType, StatusEffect};
use crate::world::EntityId;

/// Recipe for one status effect; `value` is per level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub kind: EffectKind,
    pub manipulation: ManipulationType,
    pub value: f32,
}

impl EffectTemplate {
    pub const fn fixed(kind: EffectKind, value: f32) -> Self {
        Self {
            kind,
            manipulation: ManipulationType::Fixed,
            value,
        }
    }

    pub const fn percental(kind: EffectKind, value: f32) -> Self {
        Self {
            kind,
            manipulation: ManipulationType::Percental,
            value,
        }
    }

    /// Build the effect for `level` (value scales linearly).
    pub fn instantiate(&self, level: u8) -> StatusEffect {
        StatusEffect::new(self.kind, self.value * level as f32, self.manipulation)
    }
}

/// Recipe for an aura applied by skills, hit effects and catalogs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraTemplate {
    pub name: String,
    /// Seconds; `None` makes the aura permanent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<EffectTemplate>,
    /// `Some(n)` makes the aura stack up to `n` times.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_stacks: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub periodic: Option<PeriodicTick>,
}

impl AuraTemplate {
    pub fn timed(name: impl Into<String>, seconds: f32) -> Self {
        Self {
            name: name.into(),
            duration: Some(seconds),
            effects: Vec::new(),
            max_stacks: None,
            periodic: None,
        }
    }

    pub fn permanent(name: impl Into<String>) -> Self {
        Self {
            duration: None,
            ..Self::timed(name, 0.0)
        }
    }

    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_max_stacks(mut self, max_stacks: u8) -> Self {
        self.max_stacks = Some(max_stacks);
        self
    }

    pub fn with_periodic(mut self, periodic: PeriodicTick) -> Self {
        self.periodic = Some(periodic);
        self
    }

    /// Build a fresh, inactive aura cast by `source`.
    pub fn instantiate(&self, source: Option<EntityId>) -> Aura {
        let mut aura = match self.duration {
            Some(seconds) => Aura::timed(self.name.clone(), seconds),
            None => Aura::permanent(self.name.clone()),
        }
        .with_effects(self.effects.iter().map(|e| e.instantiate(1)));

        if let Some(max_stacks) = self.max_stacks {
            aura = aura.stacking(max_stacks);
        }
        if let Some(periodic) = self.periodic {
            aura = aura.with_periodic(periodic);
        }
        if let Some(source) = source {
            aura = aura.with_source(source);
        }
        aura
    }
}
