//! Base (unmodified) stats of a combatant.
//!
//! Everything here is the value before auras are folded in. Effective values
//! are read through [`Statable`](super::Statable), which runs these bases
//! through the stat modifier container.

use crate::env::RngOracle;
use crate::status::{RaceType, StatKind};

/// Current/maximum pair for a resource pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: i32,
    pub maximum: i32,
}

impl ResourceMeter {
    pub fn new(current: i32, maximum: i32) -> Self {
        Self {
            current: current.clamp(0, maximum.max(0)),
            maximum: maximum.max(0),
        }
    }

    pub fn full(maximum: i32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0
    }

    /// Remove up to `amount`, returning how much was actually taken.
    pub fn drain(&mut self, amount: i32) -> i32 {
        let taken = amount.clamp(0, self.current.max(0));
        self.current -= taken;
        taken
    }

    /// Add up to `amount` without exceeding `cap`, returning how much was added.
    pub fn restore(&mut self, amount: i32, cap: i32) -> i32 {
        let room = (cap - self.current).max(0);
        let added = amount.clamp(0, room);
        self.current += added;
        added
    }
}

/// Inclusive weapon damage range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: i32,
    pub max: i32,
}

impl DamageRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn fixed(value: i32) -> Self {
        Self::new(value, value)
    }

    pub fn roll(&self, rng: &mut dyn RngOracle) -> i32 {
        rng.random_range_i32(self.min, self.max)
    }
}

/// Base chances in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseChances {
    pub hit: f32,
    pub crit: f32,
    pub dodge: f32,
    pub parry: f32,
    pub resist: f32,
}

impl Default for BaseChances {
    fn default() -> Self {
        Self {
            hit: 95.0,
            crit: 5.0,
            dodge: 5.0,
            parry: 5.0,
            resist: 5.0,
        }
    }
}

impl BaseChances {
    /// Always hits, never crits, never avoids. Handy for deterministic setups.
    pub fn certain() -> Self {
        Self {
            hit: 100.0,
            crit: 0.0,
            dodge: 0.0,
            parry: 0.0,
            resist: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreStats {
    pub level: u8,
    pub race: RaceType,
    pub life: ResourceMeter,
    pub mana: ResourceMeter,
    pub weapon: DamageRange,
    pub chances: BaseChances,
    /// World units per second.
    pub movement_speed: f32,
    /// Attack speed rating; 100 is the neutral value.
    pub attack_speed: f32,
}

impl Default for CoreStats {
    fn default() -> Self {
        Self {
            level: 1,
            race: RaceType::Human,
            life: ResourceMeter::full(100),
            mana: ResourceMeter::full(50),
            weapon: DamageRange::new(5, 10),
            chances: BaseChances::default(),
            movement_speed: 4.0,
            attack_speed: 100.0,
        }
    }
}

impl CoreStats {
    pub fn new(level: u8, race: RaceType) -> Self {
        Self {
            level,
            race,
            ..Self::default()
        }
    }

    pub fn with_life(mut self, maximum: i32) -> Self {
        self.life = ResourceMeter::full(maximum);
        self
    }

    pub fn with_mana(mut self, maximum: i32) -> Self {
        self.mana = ResourceMeter::full(maximum);
        self
    }

    pub fn with_weapon(mut self, weapon: DamageRange) -> Self {
        self.weapon = weapon;
        self
    }

    pub fn with_chances(mut self, chances: BaseChances) -> Self {
        self.chances = chances;
        self
    }

    pub fn with_attack_speed(mut self, attack_speed: f32) -> Self {
        self.attack_speed = attack_speed;
        self
    }

    /// Unmodified value of `kind`.
    pub fn base(&self, kind: StatKind) -> f32 {
        match kind {
            StatKind::MovementSpeed => self.movement_speed,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::ChanceToHit => self.chances.hit,
            StatKind::ChanceToCrit => self.chances.crit,
            StatKind::ChanceToDodge => self.chances.dodge,
            StatKind::ChanceToParry => self.chances.parry,
            StatKind::ChanceToResist => self.chances.resist,
            StatKind::MaximumLife => self.life.maximum as f32,
            StatKind::MaximumMana => self.mana.maximum as f32,
        }
    }
}
