//! Pluggable rate gating for attacks.

use tracing::debug;

use super::cooldown::Cooldown;
use crate::stats::Statable;

/// Rate limiter owned by one attack instance.
///
/// Cloning a limiter clones its countdown, so attack templates shared between
/// entities get independent timers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackLimiter {
    /// Fixed interval between attacks.
    Timed(Cooldown),
    /// Interval of `base_interval` at attack speed 100, shorter as it rises.
    AttackSpeed { base_interval: f32, cooldown: Cooldown },
}

impl AttackLimiter {
    pub fn timed(interval: f32) -> Self {
        Self::Timed(Cooldown::ready(interval))
    }

    pub fn attack_speed(base_interval: f32) -> Self {
        Self::AttackSpeed {
            base_interval,
            cooldown: Cooldown::ready(base_interval),
        }
    }

    pub fn cooldown(&self) -> &Cooldown {
        match self {
            Self::Timed(cooldown) | Self::AttackSpeed { cooldown, .. } => cooldown,
        }
    }

    fn cooldown_mut(&mut self) -> &mut Cooldown {
        match self {
            Self::Timed(cooldown) | Self::AttackSpeed { cooldown, .. } => cooldown,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown().is_ready()
    }

    pub fn update(&mut self, dt: f32) {
        self.cooldown_mut().update(dt);
    }

    pub fn reset(&mut self) {
        self.cooldown_mut().reset();
    }

    pub fn reset_with(&mut self, time: f32) {
        self.cooldown_mut().reset_with(time);
    }

    /// Restart after `attacker` fired. Attack-speed limiters rescale by the
    /// attacker's current attack speed.
    pub fn reset_for(&mut self, attacker: &Statable) {
        match self {
            Self::Timed(cooldown) => cooldown.reset(),
            Self::AttackSpeed {
                base_interval,
                cooldown,
            } => {
                let speed = attacker.attack_speed().max(1.0);
                let interval = *base_interval * 100.0 / speed;
                debug!(speed, interval, "attack speed limiter reset");
                cooldown.reset_with(interval);
            }
        }
    }
}
