//! Ranged attack: spawns a projectile that resolves damage on collision.

use tracing::debug;

use super::{
    Attack, AttackContext, AttackCore, AttackLimiter, Projectile, ProjectileMeleeAttack,
    ProjectileSpec,
};

#[derive(Clone, Debug, PartialEq)]
pub struct RangedAttack {
    core: AttackCore,
    projectile: ProjectileSpec,
}

impl RangedAttack {
    pub(crate) fn from_core(core: AttackCore, projectile: ProjectileSpec) -> Self {
        Self { core, projectile }
    }

    pub fn projectile(&self) -> &ProjectileSpec {
        &self.projectile
    }
}

impl Attack for RangedAttack {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn limiter(&self) -> &AttackLimiter {
        &self.core.limiter
    }

    fn update(&mut self, dt: f32, _ctx: &mut AttackContext<'_>) {
        self.core.limiter.update(dt);
    }

    fn should_fire(&self, ctx: &AttackContext<'_>) -> bool {
        self.core.limiter.is_ready() && ctx.attacker_can_act() && ctx.attackable_target().is_some()
    }

    fn fire(&mut self, ctx: &mut AttackContext<'_>) -> bool {
        if !self.should_fire(ctx) {
            return false;
        }
        ctx.announce(self.core.animation.as_deref(), self.core.sound.as_deref());

        let attacker = ctx.attacker();
        let strike = ProjectileMeleeAttack::new(
            self.core.method,
            self.core.hit_effects.clone(),
            ctx.config.projectile_rehit_interval,
        );
        let projectile = Projectile::new(
            attacker.id,
            attacker.floor,
            attacker.center(),
            attacker.facing.unit(),
            &self.projectile,
            strike,
        );
        debug!(attack = %self.core.name, owner = %attacker.id, "projectile spawned");
        ctx.projectiles.push(projectile);

        if let Some(attacker) = ctx.attacker_statable() {
            self.core.limiter.reset_for(attacker);
        }
        true
    }
}
