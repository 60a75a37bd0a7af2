//! Projectiles spawned by ranged attacks.
//!
//! A projectile carries its own [`ProjectileMeleeAttack`] and resolves a
//! melee-style strike against whatever it overlaps. Piercing projectiles keep
//! flying, rate-limited per target so one target is not struck every frame.

use super::{AttackReport, HitEffect, strike, targets_in_region};
use crate::combat::DamageMethod;
use crate::config::CombatConfig;
use crate::env::RngOracle;
use crate::world::{Combatant, EntityId, Rect, Vec2};

/// Shape and flight parameters of a projectile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectileSpec {
    /// World units per second.
    pub speed: f32,
    /// Edge length of the square hitbox.
    pub size: f32,
    /// Seconds before the projectile fizzles.
    pub lifetime: f32,
    /// Extra targets the projectile passes through.
    pub pierce: u32,
    pub sprite: String,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            speed: 8.0,
            size: 0.3,
            lifetime: 2.0,
            pierce: 0,
            sprite: "arrow".to_string(),
        }
    }
}

/// Strike used by a projectile on collision, with a per-target re-hit timer.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileMeleeAttack {
    method: DamageMethod,
    hit_effects: Vec<HitEffect>,
    rehit_interval: f32,
    /// Seconds since each recently struck target was hit.
    recent: Vec<(EntityId, f32)>,
}

impl ProjectileMeleeAttack {
    pub fn new(method: DamageMethod, hit_effects: Vec<HitEffect>, rehit_interval: f32) -> Self {
        Self {
            method,
            hit_effects,
            rehit_interval,
            recent: Vec::new(),
        }
    }

    pub fn method(&self) -> &DamageMethod {
        &self.method
    }

    pub fn update(&mut self, dt: f32) {
        let interval = self.rehit_interval;
        for (_, since) in self.recent.iter_mut() {
            *since += dt;
        }
        self.recent.retain(|(_, since)| *since < interval);
    }

    pub fn can_hit(&self, target: EntityId) -> bool {
        !self.recent.iter().any(|(id, _)| *id == target)
    }

    fn record(&mut self, target: EntityId) {
        self.recent.push((target, 0.0));
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    owner: EntityId,
    floor: i32,
    bounds: Rect,
    velocity: Vec2,
    sprite: String,
    lifetime_left: f32,
    pierce_left: u32,
    attack: ProjectileMeleeAttack,
    spent: bool,
}

impl Projectile {
    /// Spawn a projectile centered on `origin`, flying along `direction`.
    pub fn new(
        owner: EntityId,
        floor: i32,
        origin: Vec2,
        direction: Vec2,
        spec: &ProjectileSpec,
        attack: ProjectileMeleeAttack,
    ) -> Self {
        Self {
            owner,
            floor,
            bounds: Rect::centered(origin, spec.size, spec.size),
            velocity: direction.scale(spec.speed),
            sprite: spec.sprite.clone(),
            lifetime_left: spec.lifetime,
            pierce_left: spec.pierce,
            attack,
            spent: false,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn sprite(&self) -> &str {
        &self.sprite
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Move by one step and count down lifetime and re-hit timers.
    pub fn advance(&mut self, dt: f32) {
        if self.spent {
            return;
        }
        self.bounds.translate(self.velocity.scale(dt));
        self.attack.update(dt);
        self.lifetime_left -= dt;
        if self.lifetime_left <= 0.0 {
            self.spent = true;
        }
    }

    /// Strike every overlapping entity the re-hit timer allows.
    ///
    /// The projectile is spent once it has struck more entities than it pierces,
    /// or when its owner is no longer in the arena.
    pub fn collide(
        &mut self,
        combatants: &mut [Combatant],
        rng: &mut dyn RngOracle,
        config: &CombatConfig,
    ) -> Vec<AttackReport> {
        let mut reports = Vec::new();
        if self.spent {
            return reports;
        }
        let Some(owner) = combatants.iter().position(|c| c.id == self.owner) else {
            self.spent = true;
            return reports;
        };

        let speed = self.velocity.length();
        let direction = if speed > 0.0 {
            self.velocity.scale(1.0 / speed)
        } else {
            Vec2::ZERO
        };

        for target in targets_in_region(combatants, Some(owner), self.floor, &self.bounds) {
            let target_id = combatants[target].id;
            if !self.attack.can_hit(target_id) {
                continue;
            }
            let Some(report) = strike(
                combatants,
                owner,
                target,
                direction,
                &self.attack.method,
                &self.attack.hit_effects,
                rng,
                config,
            ) else {
                continue;
            };
            self.attack.record(target_id);
            reports.push(report);

            if self.pierce_left == 0 {
                self.spent = true;
                break;
            }
            self.pierce_left -= 1;
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::stats::{BaseChances, CoreStats, DamageRange, Statable};

    fn fighter(id: u32, x: f32) -> Combatant {
        let core = CoreStats::default()
            .with_life(1_000)
            .with_weapon(DamageRange::fixed(10))
            .with_chances(BaseChances::certain());
        Combatant::new(EntityId(id), "fighter", Rect::new(x, 0.0, 1.0, 1.0))
            .with_statable(Statable::new(core, &CombatConfig::default()))
    }

    fn arrow(pierce: u32) -> Projectile {
        let spec = ProjectileSpec {
            speed: 1.0,
            size: 0.5,
            lifetime: 10.0,
            pierce,
            ..ProjectileSpec::default()
        };
        let attack = ProjectileMeleeAttack::new(
            DamageMethod::melee_weapon(),
            Vec::new(),
            CombatConfig::DEFAULT_PROJECTILE_REHIT_INTERVAL,
        );
        Projectile::new(EntityId(1), 0, Vec2::new(2.5, 0.5), Vec2::new(1.0, 0.0), &spec, attack)
    }

    #[test]
    fn non_piercing_projectile_is_spent_on_first_hit() {
        let mut combatants = vec![fighter(1, 0.0), fighter(2, 2.0)];
        let mut projectile = arrow(0);
        let mut rng = ScriptedRng::constant(0.5);

        let reports = projectile.collide(&mut combatants, &mut rng, &CombatConfig::default());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].defender, EntityId(2));
        assert!(projectile.is_spent());
        assert_eq!(combatants[1].statable.as_ref().unwrap().life(), 990);
    }

    #[test]
    fn piercing_projectile_rehits_only_after_interval() {
        let mut combatants = vec![fighter(1, 0.0), fighter(2, 2.0)];
        let mut projectile = arrow(5);
        let mut rng = ScriptedRng::constant(0.5);
        let config = CombatConfig::default();

        assert_eq!(projectile.collide(&mut combatants, &mut rng, &config).len(), 1);

        // Still overlapping but inside the re-hit window
        projectile.advance(0.1);
        assert!(projectile.collide(&mut combatants, &mut rng, &config).is_empty());
        projectile.advance(0.2);
        assert!(projectile.collide(&mut combatants, &mut rng, &config).is_empty());

        projectile.advance(0.15);
        assert_eq!(projectile.collide(&mut combatants, &mut rng, &config).len(), 1);
        assert!(!projectile.is_spent());
    }

    #[test]
    fn projectile_without_owner_fizzles() {
        let mut combatants = vec![fighter(2, 2.0)];
        let mut projectile = arrow(0);
        let mut rng = ScriptedRng::constant(0.5);
        assert!(projectile
            .collide(&mut combatants, &mut rng, &CombatConfig::default())
            .is_empty());
        assert!(projectile.is_spent());
    }

    #[test]
    fn lifetime_expires() {
        let mut projectile = arrow(0);
        projectile.advance(9.0);
        assert!(!projectile.is_spent());
        projectile.advance(1.0);
        assert!(projectile.is_spent());
    }
}
