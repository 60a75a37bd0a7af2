//! Damage pipeline and damage methods.
//!
//! ```text
//! base → fixed(school, source, element) → ×(school, source, element)
//!      → race(fixed, ×) → crit(×, by source) → clamp ≥ 0
//! ```
//!
//! Every pass truncates toward zero, matching [`ModifierTable::apply`].
//!
//! [`ModifierTable::apply`]: crate::modifiers::ModifierTable::apply

use tracing::trace;

use super::result::{AttackDamageResult, AttackReceiveType};
use crate::config::CombatConfig;
use crate::env::RngOracle;
use crate::modifiers::ModifierContainers;
use crate::stats::Statable;
use crate::status::{DamageSchool, DamageSource, ElementalSchool, PowerType, RaceType};

/// Classification of one attack's damage along every modifier axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTags {
    pub school: DamageSchool,
    pub source: DamageSource,
    pub element: ElementalSchool,
    pub power: PowerType,
}

impl DamageTags {
    pub fn new(school: DamageSchool, source: DamageSource, element: ElementalSchool) -> Self {
        Self {
            school,
            source,
            element,
            power: PowerType::Life,
        }
    }

    /// Physical melee swing against life.
    pub fn melee() -> Self {
        Self::new(DamageSchool::Physical, DamageSource::Melee, ElementalSchool::None)
    }

    /// Physical ranged shot against life.
    pub fn ranged() -> Self {
        Self::new(DamageSchool::Physical, DamageSource::Ranged, ElementalSchool::None)
    }

    /// Magical spell against life.
    pub fn spell() -> Self {
        Self::new(DamageSchool::Magical, DamageSource::Spell, ElementalSchool::None)
    }

    pub fn with_element(mut self, element: ElementalSchool) -> Self {
        self.element = element;
        self
    }

    pub fn with_power(mut self, power: PowerType) -> Self {
        self.power = power;
        self
    }
}

/// Run `base` through the attacker's modifier containers.
///
/// # Arguments
///
/// * `attacker` - Containers of the entity dealing damage
/// * `defender_race` - Race looked up in the race container
/// * `tags` - Axes the damage is classified under
/// * `base` - Damage before any modifier
/// * `critical` - Apply the critical multiplier for `tags.source` last
pub fn apply_damage_modifiers(
    attacker: &ModifierContainers,
    defender_race: RaceType,
    tags: &DamageTags,
    base: i32,
    critical: bool,
) -> i32 {
    let mut damage = base;

    // Fixed passes for all three axes before any multiplier.
    damage = attacker.school().apply_fixed(damage, tags.school);
    damage = attacker.source().apply_fixed(damage, tags.source);
    damage = attacker.element().apply_fixed(damage, tags.element);

    damage = attacker.school().apply(damage, tags.school);
    damage = attacker.source().apply(damage, tags.source);
    damage = attacker.element().apply(damage, tags.element);

    damage = attacker.race().apply_fixed(damage, defender_race);
    damage = attacker.race().apply(damage, defender_race);

    if critical {
        damage = attacker.critical().apply(damage, tags.source);
    }

    trace!(base, damage, critical, ?tags, "damage modifiers applied");
    damage.max(0)
}

/// How a damage method computes its pre-modifier damage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseDamage {
    /// Percentage of a weapon damage roll.
    Weapon { percent: f32 },
    /// Uniform roll in `[min, max]`.
    Fixed { min: i32, max: i32 },
    /// `base + per_level × attacker level`.
    LevelScaled { base: i32, per_level: i32 },
}

impl BaseDamage {
    fn roll(&self, attacker: &Statable, rng: &mut dyn RngOracle) -> i32 {
        match *self {
            BaseDamage::Weapon { percent } => {
                let weapon = attacker.core().weapon.roll(rng);
                (weapon as f32 * percent / 100.0) as i32
            }
            BaseDamage::Fixed { min, max } => rng.random_range_i32(min, max),
            BaseDamage::LevelScaled { base, per_level } => {
                base + per_level * attacker.level() as i32
            }
        }
    }
}

/// Damage calculation strategy owned by an attack.
///
/// A pure function of both entities' state plus draws from the injected
/// random source: one attack table roll, then (for ranged bases) one damage roll.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageMethod {
    pub base: BaseDamage,
    pub tags: DamageTags,
}

impl DamageMethod {
    pub fn new(base: BaseDamage, tags: DamageTags) -> Self {
        Self { base, tags }
    }

    /// Full weapon damage as a physical melee swing.
    pub fn melee_weapon() -> Self {
        Self::new(BaseDamage::Weapon { percent: 100.0 }, DamageTags::melee())
    }

    pub fn with_tags(mut self, tags: DamageTags) -> Self {
        self.tags = tags;
        self
    }

    /// Resolve one attack of `attacker` against `defender`.
    ///
    /// Callers skip invincible and dead defenders before calling this.
    pub fn get_damage_done(
        &self,
        attacker: &Statable,
        defender: &Statable,
        rng: &mut dyn RngOracle,
        config: &CombatConfig,
    ) -> AttackDamageResult {
        let table = attacker.attack_table_against(defender);
        let roll = rng.roll_percent();
        let receive = table.resolve(roll, self.tags.source, self.tags.school);

        if !receive.lands() {
            trace!(roll, ?receive, "attack avoided");
            return AttackDamageResult::empty(receive, self.tags);
        }

        let base = self.base.roll(attacker, rng);
        let mut damage = apply_damage_modifiers(
            attacker.modifiers(),
            defender.race(),
            &self.tags,
            base,
            receive.is_critical(),
        );
        if receive == AttackReceiveType::Resisted {
            damage = (damage as f32 * config.resisted_damage_percent / 100.0) as i32;
        }

        AttackDamageResult::landed(receive, damage, self.tags)
    }
}
