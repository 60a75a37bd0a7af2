//! Area melee attack against the region in front of the attacker.

use tracing::debug;

use super::{Attack, AttackContext, AttackCore, AttackLimiter, HitEffect};
use crate::combat::DamageMethod;
use crate::world::Rect;

#[derive(Clone, Debug, PartialEq)]
pub struct MeleeAttack {
    core: AttackCore,
    reach: Option<f32>,
}

impl MeleeAttack {
    pub(crate) fn from_core(core: AttackCore) -> Self {
        Self { core, reach: None }
    }

    /// Override the configured melee reach for this attack.
    pub fn with_reach(mut self, reach: f32) -> Self {
        self.reach = Some(reach);
        self
    }

    pub fn method(&self) -> &DamageMethod {
        &self.core.method
    }

    pub fn hit_effects(&self) -> &[HitEffect] {
        &self.core.hit_effects
    }

    fn region(&self, ctx: &AttackContext<'_>) -> Rect {
        let reach = self.reach.unwrap_or(ctx.config.melee_reach);
        ctx.attacker().front_region(reach)
    }
}

impl Attack for MeleeAttack {
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
        if !self.core.limiter.is_ready() || !ctx.attacker_can_act() {
            return false;
        }
        let region = self.region(ctx);
        ctx.attackable_target()
            .is_some_and(|target| target.bounds.intersects(&region))
    }

    fn fire(&mut self, ctx: &mut AttackContext<'_>) -> bool {
        if !self.should_fire(ctx) {
            return false;
        }
        let region = self.region(ctx);
        ctx.announce(self.core.animation.as_deref(), self.core.sound.as_deref());
        let struck = ctx.strike_region(&region, &self.core.method, &self.core.hit_effects);

        if let Some(attacker) = ctx.attacker_statable() {
            self.core.limiter.reset_for(attacker);
        }
        debug!(attack = %self.core.name, struck, "melee attack fired");
        true
    }
}
