//! Auras: named, time-scoped bundles of status effects.

use super::category::PowerType;
use super::effect::StatusEffect;
use crate::config::CombatConfig;
use crate::world::EntityId;

/// Lifetime of an aura.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuraDuration {
    /// Never expires; removed only explicitly (unlearn, unequip, cancel).
    Permanent,
    /// Counts down every update; removed once `remaining <= 0`.
    Timed { total: f32, remaining: f32 },
}

/// Lifecycle state of an aura.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuraState {
    /// Not attached to any aura list; effects disabled.
    Inactive,
    /// Attached and contributing its effects.
    Active,
    /// Duration ran out; will be removed at the end of the current update.
    Expiring,
}

/// What happens when an aura with the same name is applied again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackPolicy {
    /// Replace the existing instance; duration and values come from the new one.
    #[default]
    Refresh,
    /// Replace the existing instance but carry its stack count forward (+1, capped).
    Stack { max_stacks: u8 },
}

/// Periodic life/mana change carried by damage- or heal-over-time auras.
///
/// `amount` is per interval and per stack: negative drains, positive restores.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodicTick {
    pub interval: f32,
    pub power: PowerType,
    pub amount: i32,
}

/// Result of advancing one aura by one update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct AuraTick {
    pub periodic_ticks: u32,
    pub expired: bool,
}

/// A named bundle of status effects attached to one entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aura {
    name: String,
    effects: Vec<StatusEffect>,
    duration: AuraDuration,
    source: Option<EntityId>,
    state: AuraState,
    stack_policy: StackPolicy,
    stacks: u8,
    periodic: Option<PeriodicTick>,
    periodic_elapsed: f32,
}

impl Aura {
    fn with_duration(name: impl Into<String>, duration: AuraDuration) -> Self {
        Self {
            name: name.into(),
            effects: Vec::new(),
            duration,
            source: None,
            state: AuraState::Inactive,
            stack_policy: StackPolicy::Refresh,
            stacks: 1,
            periodic: None,
            periodic_elapsed: 0.0,
        }
    }

    /// An aura that stays until removed explicitly.
    pub fn permanent(name: impl Into<String>) -> Self {
        Self::with_duration(name, AuraDuration::Permanent)
    }

    /// An aura lasting `seconds`.
    pub fn timed(name: impl Into<String>, seconds: f32) -> Self {
        Self::with_duration(
            name,
            AuraDuration::Timed {
                total: seconds,
                remaining: seconds,
            },
        )
    }

    pub fn with_effect(mut self, effect: StatusEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = StatusEffect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Record the entity that cast this aura (lookup-only back-reference).
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn stacking(mut self, max_stacks: u8) -> Self {
        self.stack_policy = StackPolicy::Stack {
            max_stacks: max_stacks.clamp(1, CombatConfig::MAX_AURA_STACKS),
        };
        self
    }

    pub fn with_periodic(mut self, periodic: PeriodicTick) -> Self {
        self.periodic = Some(periodic);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn duration(&self) -> AuraDuration {
        self.duration
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self.duration, AuraDuration::Permanent)
    }

    /// Seconds left, `None` for permanent auras.
    pub fn remaining(&self) -> Option<f32> {
        match self.duration {
            AuraDuration::Permanent => None,
            AuraDuration::Timed { remaining, .. } => Some(remaining),
        }
    }

    pub fn source(&self) -> Option<EntityId> {
        self.source
    }

    pub fn state(&self) -> AuraState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == AuraState::Active
    }

    pub fn stack_policy(&self) -> StackPolicy {
        self.stack_policy
    }

    pub fn stacks(&self) -> u8 {
        self.stacks
    }

    pub fn periodic(&self) -> Option<PeriodicTick> {
        self.periodic
    }

    /// Carry forward `previous` stacks plus this application, capped by the policy.
    pub(crate) fn absorb_stacks(&mut self, previous: u8) -> u8 {
        if let StackPolicy::Stack { max_stacks } = self.stack_policy {
            self.stacks = previous.saturating_add(self.stacks).min(max_stacks);
        }
        self.stacks
    }

    pub(crate) fn activate(&mut self) {
        self.state = AuraState::Active;
    }

    pub(crate) fn deactivate(&mut self) {
        self.state = AuraState::Inactive;
    }

    /// Advance by `dt`. Only active auras tick; the expiry flag is raised exactly once.
    pub(crate) fn tick(&mut self, dt: f32) -> AuraTick {
        let mut outcome = AuraTick::default();
        if self.state != AuraState::Active || dt <= 0.0 {
            return outcome;
        }

        let effective_dt = match self.duration {
            AuraDuration::Permanent => dt,
            AuraDuration::Timed { remaining, .. } => dt.min(remaining.max(0.0)),
        };

        if let Some(periodic) = self.periodic
            && periodic.interval > 0.0
        {
            self.periodic_elapsed += effective_dt;
            while self.periodic_elapsed >= periodic.interval {
                self.periodic_elapsed -= periodic.interval;
                outcome.periodic_ticks += 1;
            }
        }

        if let AuraDuration::Timed { total, remaining } = self.duration {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.duration = AuraDuration::Timed {
                    total,
                    remaining: 0.0,
                };
                self.state = AuraState::Expiring;
                outcome.expired = true;
            } else {
                self.duration = AuraDuration::Timed { total, remaining };
            }
        }

        outcome
    }
}
