//! Entity-side facade over stats, auras and modifier containers.

use bitflags::bitflags;
use tracing::debug;

use super::core::CoreStats;
use crate::combat::{AttackDamageResult, AttackTable};
use crate::config::CombatConfig;
use crate::modifiers::ModifierContainers;
use crate::status::{
    Aura, AuraAddOutcome, AuraList, AuraUpdate, PowerType, RaceType, StatKind,
};

bitflags! {
    /// Behaviour switches of a statable entity.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatableFlags: u8 {
        const INVINCIBLE           = 1 << 0;
        const CAN_MOVE             = 1 << 1;
        const SWIMMING             = 1 << 2;
        const IN_SPECIAL_ANIMATION = 1 << 3;
    }
}

impl Default for StatableFlags {
    fn default() -> Self {
        Self::CAN_MOVE
    }
}

/// What one [`Statable::update`] changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatableUpdate {
    pub auras: AuraUpdate,
    /// Life lost to periodic effects this update.
    pub periodic_damage: i32,
    /// Life and mana restored by periodic effects this update.
    pub periodic_healing: i32,
    /// True if periodic damage killed the entity during this update.
    pub died: bool,
}

/// Stats, auras and cached modifiers of one combat-capable entity.
///
/// The aura list and the containers live side by side so every aura change
/// refreshes the containers before control returns to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Statable {
    core: CoreStats,
    auras: AuraList,
    modifiers: ModifierContainers,
    flags: StatableFlags,
}

impl Statable {
    pub fn new(core: CoreStats, config: &CombatConfig) -> Self {
        Self {
            core,
            auras: AuraList::new(),
            modifiers: ModifierContainers::new(config),
            flags: StatableFlags::default(),
        }
    }

    pub fn core(&self) -> &CoreStats {
        &self.core
    }

    pub fn auras(&self) -> &AuraList {
        &self.auras
    }

    pub fn modifiers(&self) -> &ModifierContainers {
        &self.modifiers
    }

    pub fn flags(&self) -> StatableFlags {
        self.flags
    }

    pub fn set_flag(&mut self, flag: StatableFlags, enabled: bool) {
        self.flags.set(flag, enabled);
    }

    pub fn has_flag(&self, flag: StatableFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn level(&self) -> u8 {
        self.core.level
    }

    pub fn race(&self) -> RaceType {
        self.core.race
    }

    pub fn life(&self) -> i32 {
        self.core.life.current
    }

    pub fn mana(&self) -> i32 {
        self.core.mana.current
    }

    pub fn is_dead(&self) -> bool {
        self.core.life.is_empty()
    }

    pub fn is_invincible(&self) -> bool {
        self.has_flag(StatableFlags::INVINCIBLE)
    }

    pub fn can_move(&self) -> bool {
        self.has_flag(StatableFlags::CAN_MOVE)
    }

    // ===== effective stats =====

    /// Effective value of `kind` with every active aura folded in.
    pub fn stat(&self, kind: StatKind) -> f32 {
        self.modifiers
            .stats()
            .apply_value(self.core.base(kind), kind)
            .max(0.0)
    }

    pub fn chance_to_hit(&self) -> f32 {
        self.stat(StatKind::ChanceToHit)
    }

    pub fn chance_to_crit(&self) -> f32 {
        self.stat(StatKind::ChanceToCrit)
    }

    pub fn chance_to_dodge(&self) -> f32 {
        self.stat(StatKind::ChanceToDodge)
    }

    pub fn chance_to_parry(&self) -> f32 {
        self.stat(StatKind::ChanceToParry)
    }

    pub fn chance_to_resist(&self) -> f32 {
        self.stat(StatKind::ChanceToResist)
    }

    pub fn movement_speed(&self) -> f32 {
        self.stat(StatKind::MovementSpeed)
    }

    pub fn attack_speed(&self) -> f32 {
        self.stat(StatKind::AttackSpeed)
    }

    pub fn maximum_life(&self) -> i32 {
        self.stat(StatKind::MaximumLife) as i32
    }

    pub fn maximum_mana(&self) -> i32 {
        self.stat(StatKind::MaximumMana) as i32
    }

    /// Attack table of `self` swinging at `defender`.
    pub fn attack_table_against(&self, defender: &Statable) -> AttackTable {
        AttackTable {
            hit: self.chance_to_hit(),
            crit: self.chance_to_crit(),
            dodge: defender.chance_to_dodge(),
            parry: defender.chance_to_parry(),
            resist: defender.chance_to_resist(),
        }
    }

    // ===== auras =====

    pub fn add_aura(&mut self, aura: Aura) -> AuraAddOutcome {
        let was_dead = self.is_dead();
        let outcome = self.auras.add(aura, &mut self.modifiers);
        self.settle_resources(was_dead);
        outcome
    }

    /// Removes the aura called `name`. No-op if absent.
    pub fn remove_aura(&mut self, name: &str) -> Option<Aura> {
        let was_dead = self.is_dead();
        let removed = self.auras.remove(name, &mut self.modifiers);
        self.settle_resources(was_dead);
        removed
    }

    pub fn remove_auras_where(&mut self, predicate: impl Fn(&Aura) -> bool) -> Vec<Aura> {
        let was_dead = self.is_dead();
        let removed = self.auras.remove_where(predicate, &mut self.modifiers);
        self.settle_resources(was_dead);
        removed
    }

    /// Replace the aura list wholesale (e.g. after loading a save) and
    /// rebuild every container from it.
    pub fn restore_auras(&mut self, auras: AuraList) {
        let was_dead = self.is_dead();
        self.auras = auras;
        self.modifiers.refresh_all(&self.auras);
        self.settle_resources(was_dead);
    }

    /// Tick auras, then apply the periodic life/mana changes they produced.
    pub fn update(&mut self, dt: f32) -> StatableUpdate {
        let was_dead = self.is_dead();
        let auras = self.auras.update(dt, &mut self.modifiers);
        let mut update = StatableUpdate::default();

        for event in &auras.periodic {
            if event.amount < 0 {
                if self.is_invincible() || self.is_dead() {
                    continue;
                }
                let taken = match event.power {
                    PowerType::Life => self.core.life.drain(-event.amount),
                    PowerType::Mana => self.core.mana.drain(-event.amount),
                };
                if event.power == PowerType::Life {
                    update.periodic_damage += taken;
                }
            } else if !self.is_dead() {
                update.periodic_healing += match event.power {
                    PowerType::Life => self.restore_life(event.amount),
                    PowerType::Mana => self.restore_mana(event.amount),
                };
            }
        }

        update.auras = auras;
        update.died = self.settle_resources(was_dead);
        update
    }

    // ===== resources =====

    /// Subtract the damage in `result`. Returns true if this killed the entity.
    pub fn take_damage(&mut self, result: &AttackDamageResult) -> bool {
        if self.is_invincible() || self.is_dead() {
            return false;
        }
        self.core.life.drain(result.life_damage);
        self.core.mana.drain(result.mana_damage);
        if self.is_dead() {
            self.on_death();
            return true;
        }
        false
    }

    pub fn restore_life(&mut self, amount: i32) -> i32 {
        let cap = self.maximum_life();
        self.core.life.restore(amount, cap)
    }

    pub fn restore_mana(&mut self, amount: i32) -> i32 {
        let cap = self.maximum_mana();
        self.core.mana.restore(amount, cap)
    }

    pub fn drain_mana(&mut self, amount: i32) -> i32 {
        self.core.mana.drain(amount)
    }

    /// Bring the entity back with full pools.
    pub fn revive(&mut self) {
        self.core.life.current = self.maximum_life();
        self.core.mana.current = self.maximum_mana();
    }

    /// Clamp pools to the effective maxima and run the death handling if
    /// the entity went from alive (`was_dead == false`) to dead. Returns true
    /// on that transition.
    fn settle_resources(&mut self, was_dead: bool) -> bool {
        let life_cap = self.maximum_life();
        let mana_cap = self.maximum_mana();
        self.core.life.current = self.core.life.current.min(life_cap);
        self.core.mana.current = self.core.mana.current.min(mana_cap);
        if !was_dead && self.is_dead() {
            self.on_death();
            return true;
        }
        false
    }

    fn on_death(&mut self) {
        let cleared = self.auras.remove_where(|a| !a.is_permanent(), &mut self.modifiers);
        debug!(cleared = cleared.len(), "entity died, timed auras cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{AttackReceiveType, DamageTags};
    use crate::status::{EffectKind, PeriodicTick, Scope, StatusEffect};

    fn statable() -> Statable {
        Statable::new(CoreStats::default().with_life(100), &CombatConfig::default())
    }

    fn hit(amount: i32) -> AttackDamageResult {
        AttackDamageResult::landed(AttackReceiveType::Hit, amount, DamageTags::melee())
    }

    #[test]
    fn stat_reads_fold_in_auras() {
        let mut s = statable();
        assert_eq!(s.chance_to_crit(), 5.0);

        s.add_aura(Aura::permanent("Focus").with_effect(StatusEffect::fixed(
            EffectKind::Stat(Scope::Only(StatKind::ChanceToCrit)),
            10.0,
        )));
        assert_eq!(s.chance_to_crit(), 15.0);

        s.remove_aura("Focus");
        assert_eq!(s.chance_to_crit(), 5.0);
    }

    #[test]
    fn take_damage_reports_death_once() {
        let mut s = statable();
        assert!(!s.take_damage(&hit(60)));
        assert_eq!(s.life(), 40);
        assert!(s.take_damage(&hit(60)));
        assert!(s.is_dead());
        assert!(!s.take_damage(&hit(60)));
    }

    #[test]
    fn invincible_ignores_damage() {
        let mut s = statable();
        s.set_flag(StatableFlags::INVINCIBLE, true);
        assert!(!s.take_damage(&hit(500)));
        assert_eq!(s.life(), 100);
    }

    #[test]
    fn death_clears_timed_auras_only() {
        let mut s = statable();
        s.add_aura(Aura::timed("Haste", 10.0));
        s.add_aura(Aura::permanent("Talent"));
        s.take_damage(&hit(100));

        assert!(!s.auras().contains("Haste"));
        assert!(s.auras().contains("Talent"));
    }

    #[test]
    fn periodic_damage_drains_and_can_kill() {
        let mut s = statable();
        s.add_aura(Aura::timed("Poison", 10.0).with_periodic(PeriodicTick {
            interval: 1.0,
            power: PowerType::Life,
            amount: -30,
        }));

        let first = s.update(1.0);
        assert_eq!(first.periodic_damage, 30);
        assert_eq!(s.life(), 70);

        s.update(2.0);
        let last = s.update(1.0);
        assert!(last.died);
        assert!(s.is_dead());
        assert!(!s.auras().contains("Poison"));
    }

    #[test]
    fn periodic_healing_caps_at_effective_maximum() {
        let mut s = statable();
        s.take_damage(&hit(50));
        s.add_aura(Aura::timed("Renew", 5.0).with_periodic(PeriodicTick {
            interval: 1.0,
            power: PowerType::Life,
            amount: 40,
        }));

        assert_eq!(s.update(1.0).periodic_healing, 40);
        assert_eq!(s.update(1.0).periodic_healing, 10);
        assert_eq!(s.life(), 100);
    }

    #[test]
    fn losing_maximum_life_clamps_current() {
        let mut s = statable();
        s.add_aura(Aura::timed("Frailty", 5.0).with_effect(StatusEffect::percental(
            EffectKind::Stat(Scope::Only(StatKind::MaximumLife)),
            -50.0,
        )));
        assert_eq!(s.maximum_life(), 50);
        assert_eq!(s.life(), 50);
    }

    #[test]
    fn aura_emptying_maximum_life_kills() {
        let mut s = statable();
        s.add_aura(Aura::timed("Haste", 10.0));
        s.add_aura(Aura::permanent("Talent"));
        s.add_aura(Aura::timed("Wither", 5.0).with_effect(StatusEffect::percental(
            EffectKind::Stat(Scope::Only(StatKind::MaximumLife)),
            -100.0,
        )));

        assert!(s.is_dead());
        assert!(!s.auras().contains("Haste"));
        assert!(!s.auras().contains("Wither"));
        assert!(s.auras().contains("Talent"));
        // Already dead: a later update does not report the death again
        assert!(!s.update(1.0).died);
    }

    #[test]
    fn restore_auras_rebuilds_containers() {
        let mut source = statable();
        source.add_aura(Aura::permanent("Swift").with_effect(StatusEffect::percental(
            EffectKind::Stat(Scope::Only(StatKind::MovementSpeed)),
            25.0,
        )));

        let mut target = statable();
        target.restore_auras(source.auras().clone());
        assert_eq!(target.movement_speed(), source.movement_speed());
        assert_eq!(target.movement_speed(), 5.0);
    }
}
