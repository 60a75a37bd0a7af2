//! Per-entity collection of active auras.
//!
//! The list is the single source of truth for effect values. Modifier
//! containers only cache what [`AuraList::percental_and_rating_values`]
//! reports, and every add/remove refreshes them synchronously.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use super::aura::{Aura, AuraState, StackPolicy};
use super::category::PowerType;
use super::effect::{EffectId, ManipulationType};
use crate::config::CombatConfig;
use crate::modifiers::ModifierContainers;
use crate::world::EntityId;

/// Summed effect values for one or more identifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectTotals {
    /// Sum of `Fixed` effect values.
    pub rating: f32,
    /// Sum of `Percental` effect values, in percent.
    pub percent: f32,
}

/// How [`AuraList::add`] treated an aura.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuraAddOutcome {
    /// No aura with that name was active.
    Added,
    /// An aura with that name was replaced.
    Refreshed,
    /// A stacking aura was replaced and now carries this many stacks.
    Stacked(u8),
    /// The list is full; nothing changed.
    Rejected,
}

impl AuraAddOutcome {
    pub fn is_applied(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Life or mana change produced by a periodic aura during one update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodicEvent {
    pub aura: String,
    pub source: Option<EntityId>,
    pub power: PowerType,
    pub amount: i32,
}

/// Everything that happened during one [`AuraList::update`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuraUpdate {
    pub expired: Vec<Aura>,
    pub periodic: Vec<PeriodicEvent>,
}

/// Active auras of one entity.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraList {
    auras: ArrayVec<Aura, { CombatConfig::MAX_AURAS }>,
}

impl AuraList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `aura`, replacing any active aura with the same name first.
    pub fn add(&mut self, mut aura: Aura, containers: &mut ModifierContainers) -> AuraAddOutcome {
        let mut outcome = AuraAddOutcome::Added;

        if let Some(previous) = self.remove(aura.name(), containers) {
            outcome = match aura.stack_policy() {
                StackPolicy::Refresh => AuraAddOutcome::Refreshed,
                StackPolicy::Stack { .. } => {
                    AuraAddOutcome::Stacked(aura.absorb_stacks(previous.stacks()))
                }
            };
        }

        if self.auras.is_full() {
            warn!(aura = aura.name(), "aura list full, rejecting aura");
            return AuraAddOutcome::Rejected;
        }

        debug!(aura = aura.name(), ?outcome, "aura applied");
        aura.activate();
        self.auras.push(aura);

        let this: &AuraList = self;
        if let Some(added) = this.auras.last() {
            for effect in added.effects() {
                effect.on_enable(this, containers);
            }
        }
        outcome
    }

    /// Deactivate and detach the aura called `name`. No-op if absent.
    pub fn remove(&mut self, name: &str, containers: &mut ModifierContainers) -> Option<Aura> {
        let index = self.auras.iter().position(|a| a.name() == name)?;
        let mut aura = self.auras.remove(index);
        aura.deactivate();
        for effect in aura.effects() {
            effect.on_disable(self, containers);
        }
        Some(aura)
    }

    /// Remove every aura matching `predicate`, returning them in list order.
    pub fn remove_where(
        &mut self,
        predicate: impl Fn(&Aura) -> bool,
        containers: &mut ModifierContainers,
    ) -> Vec<Aura> {
        let names: Vec<String> = self
            .auras
            .iter()
            .filter(|a| predicate(a))
            .map(|a| a.name().to_string())
            .collect();
        names
            .iter()
            .filter_map(|name| self.remove(name, containers))
            .collect()
    }

    /// Tick every aura by `dt`, then remove the ones that expired.
    pub fn update(&mut self, dt: f32, containers: &mut ModifierContainers) -> AuraUpdate {
        let mut update = AuraUpdate::default();

        for aura in self.auras.iter_mut() {
            let tick = aura.tick(dt);
            if tick.periodic_ticks > 0
                && let Some(periodic) = aura.periodic()
            {
                update.periodic.push(PeriodicEvent {
                    aura: aura.name().to_string(),
                    source: aura.source(),
                    power: periodic.power,
                    amount: periodic.amount * tick.periodic_ticks as i32 * aura.stacks() as i32,
                });
            }
        }

        let expired: Vec<String> = self
            .auras
            .iter()
            .filter(|a| a.state() == AuraState::Expiring)
            .map(|a| a.name().to_string())
            .collect();
        for name in expired {
            if let Some(aura) = self.remove(&name, containers) {
                debug!(aura = aura.name(), "aura expired");
                update.expired.push(aura);
            }
        }

        update
    }

    /// Totals of every active effect whose identifier equals `identifier`.
    pub fn effect_values(&self, identifier: &EffectId) -> EffectTotals {
        self.sum_matching(|id| id == identifier)
    }

    /// Totals of the effects matching either the specific or the `All` identifier.
    pub fn percental_and_rating_values(&self, specific: &EffectId, all: &EffectId) -> EffectTotals {
        self.sum_matching(|id| id == specific || id == all)
    }

    fn sum_matching(&self, matches: impl Fn(&EffectId) -> bool) -> EffectTotals {
        let mut totals = EffectTotals::default();
        for aura in self.auras.iter().filter(|a| a.is_active()) {
            let stacks = aura.stacks() as f32;
            for effect in aura.effects().iter().filter(|e| matches(e.identifier())) {
                match effect.manipulation() {
                    ManipulationType::Fixed => totals.rating += effect.value() * stacks,
                    ManipulationType::Percental => totals.percent += effect.value() * stacks,
                }
            }
        }
        totals
    }

    pub fn get(&self, name: &str) -> Option<&Aura> {
        self.auras.iter().find(|a| a.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aura> {
        self.auras.iter()
    }

    pub fn len(&self) -> usize {
        self.auras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auras.is_empty()
    }
}
