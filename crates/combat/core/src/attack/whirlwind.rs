//! Multi-frame spinning attack timed by the attacker's animation.
//!
//! Firing starts the animation and locks movement. Every later update reads
//! the animation state back and hit-tests once per distinct frame index,
//! using that frame's region. The attack ends when the animation reports
//! done, or is force-terminated if the animation changes underneath it or
//! the attacker dies.

use tracing::{debug, warn};

use super::{Attack, AttackContext, AttackCore, AttackLimiter};
use crate::stats::StatableFlags;
use crate::world::Rect;

#[derive(Clone, Debug, PartialEq)]
pub struct WhirlwindAttack {
    core: AttackCore,
    /// Hit region per animation frame, relative to the attacker's center.
    frame_regions: Vec<Rect>,
    active: bool,
    last_frame: Option<u32>,
    saved_can_move: Option<bool>,
    hit_tests: u32,
}

impl WhirlwindAttack {
    pub(crate) fn from_core(core: AttackCore, frame_regions: Vec<Rect>) -> Self {
        Self {
            core,
            frame_regions,
            active: false,
            last_frame: None,
            saved_can_move: None,
            hit_tests: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of frame hit-tests performed since construction.
    pub fn hit_tests(&self) -> u32 {
        self.hit_tests
    }

    pub fn last_frame(&self) -> Option<u32> {
        self.last_frame
    }

    /// Animation token; falls back to the attack name.
    pub fn token(&self) -> &str {
        self.core.animation.as_deref().unwrap_or(&self.core.name)
    }

    fn frame_region(&self, frame: u32, ctx: &AttackContext<'_>) -> Rect {
        let index = frame as usize % self.frame_regions.len().max(1);
        let offset = self.frame_regions.get(index).copied().unwrap_or_default();
        let center = ctx.attacker().center();
        offset.translated(center)
    }

    fn hit_test(&mut self, frame: u32, ctx: &mut AttackContext<'_>) {
        let region = self.frame_region(frame, ctx);
        let struck = ctx.strike_region(&region, &self.core.method, &self.core.hit_effects);
        self.hit_tests += 1;
        debug!(attack = %self.core.name, frame, struck, "whirlwind frame");
    }

    fn finish(&mut self, ctx: &mut AttackContext<'_>) {
        self.active = false;
        self.last_frame = None;
        let saved = self.saved_can_move.take();
        if let Some(statable) = ctx.attacker_mut().statable.as_mut() {
            if let Some(can_move) = saved {
                statable.set_flag(StatableFlags::CAN_MOVE, can_move);
            }
            statable.set_flag(StatableFlags::IN_SPECIAL_ANIMATION, false);
        }
    }
}

impl Attack for WhirlwindAttack {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn limiter(&self) -> &AttackLimiter {
        &self.core.limiter
    }

    fn update(&mut self, dt: f32, ctx: &mut AttackContext<'_>) {
        self.core.limiter.update(dt);
        if !self.active {
            return;
        }

        let attacker = ctx.attacker();
        let alive = attacker.is_alive();
        let state = ctx.presentation.animation_state(attacker.id);

        match state {
            Some(state) if alive && state.token == self.token() => {
                if self.last_frame != Some(state.frame) {
                    self.last_frame = Some(state.frame);
                    self.hit_test(state.frame, ctx);
                }
                if state.done {
                    debug!(attack = %self.core.name, "whirlwind finished");
                    self.finish(ctx);
                }
            }
            _ => {
                warn!(attack = %self.core.name, alive, "whirlwind interrupted, terminating");
                self.finish(ctx);
            }
        }
    }

    fn should_fire(&self, ctx: &AttackContext<'_>) -> bool {
        if self.active || !self.core.limiter.is_ready() || !ctx.attacker_can_act() {
            return false;
        }
        let Some(target) = ctx.attackable_target() else {
            return false;
        };
        (0..self.frame_regions.len() as u32)
            .any(|frame| self.frame_region(frame, ctx).intersects(&target.bounds))
    }

    fn fire(&mut self, ctx: &mut AttackContext<'_>) -> bool {
        if !self.should_fire(ctx) {
            return false;
        }
        let token = self.token().to_string();
        ctx.announce(Some(&token), self.core.sound.as_deref());

        let Some(statable) = ctx.attacker_mut().statable.as_mut() else {
            return false;
        };
        self.saved_can_move = Some(statable.can_move());
        statable.set_flag(StatableFlags::CAN_MOVE, false);
        statable.set_flag(StatableFlags::IN_SPECIAL_ANIMATION, true);
        self.core.limiter.reset_for(statable);

        self.active = true;
        self.last_frame = None;
        debug!(attack = %self.core.name, "whirlwind started");
        true
    }
}
