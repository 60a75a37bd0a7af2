//! Modifier containers: cached, refreshable snapshots of effect totals.
//!
//! One container per category axis. Each is refreshed synchronously from the
//! owning entity's [`AuraList`] whenever an effect of its axis is enabled or
//! disabled, so reads never observe a stale value.

pub mod table;

pub use table::ModifierTable;

use crate::config::CombatConfig;
use crate::status::{
    AuraList, DamageSchool, DamageSource, EffectKind, ElementalSchool, RaceType, Scope, StatKind,
};

pub type DamageSchoolContainer = ModifierTable<DamageSchool>;
pub type DamageSourceContainer = ModifierTable<DamageSource>;
pub type ElementalSchoolContainer = ModifierTable<ElementalSchool>;
pub type DamageDoneAgainstRaceContainer = ModifierTable<RaceType>;
pub type CriticalDamageBonusContainer = ModifierTable<DamageSource>;
pub type StatContainer = ModifierTable<StatKind>;

/// All modifier containers of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct ModifierContainers {
    school: DamageSchoolContainer,
    source: DamageSourceContainer,
    element: ElementalSchoolContainer,
    race: DamageDoneAgainstRaceContainer,
    critical: CriticalDamageBonusContainer,
    stats: StatContainer,
}

impl ModifierContainers {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            school: ModifierTable::new(EffectKind::SCHOOL_PREFIX, 1.0),
            source: ModifierTable::new(EffectKind::SOURCE_PREFIX, 1.0),
            element: ModifierTable::new(EffectKind::ELEMENT_PREFIX, 1.0),
            race: ModifierTable::new(EffectKind::RACE_PREFIX, 1.0),
            critical: ModifierTable::new(
                EffectKind::CRITICAL_PREFIX,
                config.base_critical_multiplier,
            ),
            stats: ModifierTable::new(EffectKind::STAT_PREFIX, 1.0),
        }
    }

    /// Refresh the container and member an effect of `kind` contributes to.
    pub fn refresh(&mut self, kind: EffectKind, auras: &AuraList) {
        match kind {
            EffectKind::DamageDoneWithSchool(scope) => self.school.refresh(scope, auras),
            EffectKind::DamageDoneWithSource(scope) => self.source.refresh(scope, auras),
            EffectKind::DamageDoneWithElement(scope) => self.element.refresh(scope, auras),
            EffectKind::DamageDoneAgainstRace(scope) => self.race.refresh(scope, auras),
            EffectKind::CriticalDamageBonus(scope) => self.critical.refresh(scope, auras),
            EffectKind::Stat(scope) => self.stats.refresh(scope, auras),
        }
    }

    /// Recompute every container from scratch (after loading persisted auras).
    pub fn refresh_all(&mut self, auras: &AuraList) {
        self.school.refresh(Scope::All, auras);
        self.source.refresh(Scope::All, auras);
        self.element.refresh(Scope::All, auras);
        self.race.refresh(Scope::All, auras);
        self.critical.refresh(Scope::All, auras);
        self.stats.refresh(Scope::All, auras);
    }

    pub fn school(&self) -> &DamageSchoolContainer {
        &self.school
    }

    pub fn source(&self) -> &DamageSourceContainer {
        &self.source
    }

    pub fn element(&self) -> &ElementalSchoolContainer {
        &self.element
    }

    pub fn race(&self) -> &DamageDoneAgainstRaceContainer {
        &self.race
    }

    pub fn critical(&self) -> &CriticalDamageBonusContainer {
        &self.critical
    }

    pub fn stats(&self) -> &StatContainer {
        &self.stats
    }
}
