//! Frame-stepped scheduler driving every combatant, attack and projectile.
//!
//! One [`Arena::update`] runs, per combatant in insertion order:
//!
//! 1. aura tick (expiry, periodic effects, container refresh)
//! 2. every attack's `update`
//! 3. the first attack that `should_fire`, fired at the combatant's target
//!
//! then moves and collides projectiles, and finally reports new deaths once.
//! Step 1 completes before step 3 of the same combatant, so attacks always
//! read containers that already reflect this frame's expiries.

use std::collections::{HashMap, HashSet};
use std::mem;

use tracing::{debug, info};

use super::{Combatant, EntityId};
use crate::attack::{Attack, AttackContext, AttackReport, Projectile};
use crate::config::CombatConfig;
use crate::env::{PresentationSink, RngOracle};
use crate::events::{AuraApplied, AuraExpired, CombatEvents, EntityDied};
use crate::status::{Aura, AuraAddOutcome};

/// Everything that happened during one [`Arena::update`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArenaTick {
    pub reports: Vec<AttackReport>,
    pub expired: Vec<AuraExpired>,
    pub deaths: Vec<EntityDied>,
    /// Life lost to periodic auras across all combatants.
    pub periodic_damage: i32,
}

#[derive(Debug)]
pub struct Arena {
    config: CombatConfig,
    combatants: Vec<Combatant>,
    projectiles: Vec<Projectile>,
    events: CombatEvents,
    reported_dead: HashSet<EntityId>,
    elapsed: f32,
}

impl Arena {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            combatants: Vec::new(),
            projectiles: Vec::new(),
            events: CombatEvents::new(),
            reported_dead: HashSet::new(),
            elapsed: 0.0,
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn spawn(&mut self, combatant: Combatant) -> EntityId {
        let id = combatant.id;
        debug!(entity = %id, name = %combatant.name, "combatant spawned");
        self.combatants.push(combatant);
        id
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn events(&self) -> &CombatEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut CombatEvents {
        &mut self.events
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Ids of combatants with stats that are still alive.
    pub fn survivors(&self) -> Vec<EntityId> {
        self.combatants
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| c.id)
            .collect()
    }

    /// Add `aura` to the entity's own aura list and publish it.
    ///
    /// Returns `None` if the entity does not exist or has no stats.
    pub fn apply_aura(&mut self, entity: EntityId, aura: Aura) -> Option<AuraAddOutcome> {
        let statable = self.combatant_mut(entity)?.statable.as_mut()?;
        let name = aura.name().to_string();
        let source = aura.source();
        let outcome = statable.add_aura(aura);
        if outcome.is_applied() {
            self.events.aura_applied.publish(&AuraApplied {
                entity,
                aura: name,
                source,
            });
        }
        Some(outcome)
    }

    /// Advance the whole arena by `dt` seconds.
    pub fn update(
        &mut self,
        dt: f32,
        rng: &mut dyn RngOracle,
        presentation: &mut dyn PresentationSink,
    ) -> ArenaTick {
        let mut tick = ArenaTick::default();

        for index in 0..self.combatants.len() {
            self.update_statable(index, dt, &mut tick);
            self.face_target(index);

            let mut attacks = mem::take(&mut self.combatants[index].attacks);
            {
                let mut ctx = AttackContext {
                    combatants: &mut self.combatants,
                    attacker: index,
                    rng: &mut *rng,
                    config: &self.config,
                    presentation: &mut *presentation,
                    projectiles: &mut self.projectiles,
                    reports: &mut tick.reports,
                };
                for attack in attacks.iter_mut() {
                    attack.update(dt, &mut ctx);
                }
                if let Some(attack) = attacks.iter_mut().find(|a| a.should_fire(&ctx)) {
                    // A freshly started animation shows its first frame this tick
                    if attack.fire(&mut ctx) {
                        attack.update(0.0, &mut ctx);
                    }
                }
            }
            self.combatants[index].attacks = attacks;
        }

        for projectile in self.projectiles.iter_mut() {
            projectile.advance(dt);
            let reports = projectile.collide(&mut self.combatants, &mut *rng, &self.config);
            tick.reports.extend(reports);
        }
        self.projectiles.retain(|p| !p.is_spent());

        self.publish(&mut tick);
        self.elapsed += dt;
        tick
    }

    fn update_statable(&mut self, index: usize, dt: f32, tick: &mut ArenaTick) {
        let combatant = &mut self.combatants[index];
        let Some(statable) = combatant.statable.as_mut() else {
            return;
        };
        let update = statable.update(dt);
        tick.periodic_damage += update.periodic_damage;
        for aura in update.auras.expired {
            tick.expired.push(AuraExpired {
                entity: combatant.id,
                aura: aura.name().to_string(),
            });
        }
    }

    fn face_target(&mut self, index: usize) {
        let Some(target) = self.combatants[index].target else {
            return;
        };
        if let Some(point) = self.combatant(target).map(Combatant::center) {
            self.combatants[index].face_towards(point);
        }
    }

    fn publish(&mut self, tick: &mut ArenaTick) {
        let mut killers = HashMap::new();
        for report in &tick.reports {
            self.events.attack_resolved.publish(report);
            for aura in &report.applied_auras {
                self.events.aura_applied.publish(&AuraApplied {
                    entity: report.defender,
                    aura: aura.clone(),
                    source: Some(report.attacker),
                });
            }
            if report.killed {
                killers.insert(report.defender, report.attacker);
            }
        }
        for expired in &tick.expired {
            self.events.aura_expired.publish(expired);
        }

        for combatant in &self.combatants {
            let Some(statable) = combatant.statable.as_ref() else {
                continue;
            };
            if statable.is_dead() {
                if self.reported_dead.insert(combatant.id) {
                    let death = EntityDied {
                        entity: combatant.id,
                        killer: killers.get(&combatant.id).copied(),
                    };
                    info!(entity = %combatant.id, name = %combatant.name, killer = ?death.killer, "combatant died");
                    self.events.entity_died.publish(&death);
                    tick.deaths.push(death);
                }
            } else {
                self.reported_dead.remove(&combatant.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{AttackBuilder, AttackLimiter};
    use crate::combat::DamageMethod;
    use crate::env::{FrameAnimator, NullPresentation, ScriptedRng};
    use crate::stats::{BaseChances, CoreStats, DamageRange, Statable};
    use crate::status::{DamageSource, EffectKind, Scope, StatusEffect};
    use crate::world::{Facing, Rect};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fighter(id: u32, x: f32, life: i32) -> Combatant {
        let core = CoreStats::default()
            .with_life(life)
            .with_weapon(DamageRange::fixed(10))
            .with_chances(BaseChances::certain());
        Combatant::new(EntityId(id), format!("fighter-{id}"), Rect::new(x, 0.0, 1.0, 1.0))
            .with_statable(Statable::new(core, &CombatConfig::default()))
    }

    fn sword() -> crate::attack::MeleeAttack {
        AttackBuilder::new("Sword")
            .damage_method(DamageMethod::melee_weapon())
            .limiter(AttackLimiter::timed(1.0))
            .melee()
            .unwrap()
    }

    #[test]
    fn expiry_lands_before_attacks_in_the_same_tick() {
        let mut arena = Arena::new(CombatConfig::default());
        arena.spawn(fighter(1, 0.0, 100).with_attack(sword()).with_target(EntityId(2)));
        arena.spawn(fighter(2, 1.5, 100));
        arena.apply_aura(
            EntityId(1),
            Aura::timed("Rage", 0.5).with_effect(StatusEffect::percental(
                EffectKind::DamageDoneWithSource(Scope::Only(DamageSource::Melee)),
                100.0,
            )),
        );

        let mut rng = ScriptedRng::constant(0.5);
        let tick = arena.update(0.5, &mut rng, &mut NullPresentation);

        assert_eq!(tick.expired.len(), 1);
        assert_eq!(tick.reports.len(), 1);
        assert_eq!(tick.reports[0].result.life_damage, 10);
    }

    #[test]
    fn whirlwind_hit_tests_first_frame_on_the_firing_tick() {
        let spin = AttackBuilder::new("Whirlwind")
            .damage_method(DamageMethod::melee_weapon())
            .limiter(AttackLimiter::timed(5.0))
            .animation("spin")
            .whirlwind(vec![
                Rect::new(0.5, -0.5, 1.0, 1.0),
                Rect::new(-0.5, 0.5, 1.0, 1.0),
                Rect::new(-1.5, -0.5, 1.0, 1.0),
                Rect::new(-0.5, -1.5, 1.0, 1.0),
            ])
            .unwrap();
        let mut arena = Arena::new(CombatConfig::default());
        arena.spawn(fighter(1, 0.0, 100).with_attack(spin).with_target(EntityId(2)));
        arena.spawn(fighter(2, 1.2, 100));

        let mut animator = FrameAnimator::new().with_clip("spin", 4, 0.1);
        let mut rng = ScriptedRng::constant(0.5);
        let first = arena.update(0.1, &mut rng, &mut animator);
        assert_eq!(first.reports.len(), 1);
        assert_eq!(first.reports[0].defender, EntityId(2));

        // Only the first frame's region reaches the enemy
        for _ in 0..6 {
            animator.advance(0.1);
            let tick = arena.update(0.1, &mut rng, &mut animator);
            assert!(tick.reports.is_empty());
        }
        let enemy = arena.combatant(EntityId(2)).unwrap();
        assert_eq!(enemy.statable.as_ref().unwrap().life(), 90);
    }

    #[test]
    fn attacker_turns_to_face_target() {
        let mut arena = Arena::new(CombatConfig::default());
        arena.spawn(fighter(1, 3.0, 100).with_target(EntityId(2)));
        arena.spawn(fighter(2, 0.0, 100));
        arena.update(0.1, &mut ScriptedRng::constant(0.5), &mut NullPresentation);
        assert_eq!(arena.combatant(EntityId(1)).unwrap().facing, Facing::Left);
    }

    #[test]
    fn death_reported_once_with_killer() {
        let mut arena = Arena::new(CombatConfig::default());
        arena.spawn(fighter(1, 0.0, 100).with_attack(sword()).with_target(EntityId(2)));
        arena.spawn(fighter(2, 1.5, 15));

        let deaths = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&deaths);
        arena
            .events_mut()
            .entity_died
            .subscribe(move |death| sink.borrow_mut().push(*death));

        let mut rng = ScriptedRng::constant(0.5);
        for _ in 0..40 {
            arena.update(0.1, &mut rng, &mut NullPresentation);
        }

        assert_eq!(
            *deaths.borrow(),
            vec![EntityDied {
                entity: EntityId(2),
                killer: Some(EntityId(1)),
            }]
        );
        assert_eq!(arena.survivors(), vec![EntityId(1)]);
    }

    #[test]
    fn interactables_receive_zero_damage_reports() {
        let mut arena = Arena::new(CombatConfig::default());
        arena.spawn(fighter(1, 0.0, 100).with_attack(sword()).with_target(EntityId(2)));
        arena.spawn(fighter(2, 1.5, 100));
        arena.spawn(Combatant::new(EntityId(3), "crate", Rect::new(1.2, 0.2, 0.5, 0.5)));

        let tick = arena.update(0.1, &mut ScriptedRng::constant(0.5), &mut NullPresentation);
        let crate_report = tick
            .reports
            .iter()
            .find(|r| r.defender == EntityId(3))
            .unwrap();
        assert!(crate_report.result.is_empty());
        assert_eq!(tick.reports.len(), 2);
    }

    #[test]
    fn other_floors_are_untouched() {
        let mut arena = Arena::new(CombatConfig::default());
        arena.spawn(fighter(1, 0.0, 100).with_attack(sword()).with_target(EntityId(2)));
        arena.spawn(fighter(2, 1.5, 100).with_floor(1));

        let tick = arena.update(0.1, &mut ScriptedRng::constant(0.5), &mut NullPresentation);
        assert!(tick.reports.is_empty());
    }
}
