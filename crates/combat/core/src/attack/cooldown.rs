//! Countdown timers gating attacks.

/// A countdown from `total_time` to zero.
///
/// `time_left` stays within `[0, total_time]`; the cooldown is ready once it
/// reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldown {
    total_time: f32,
    time_left: f32,
}

impl Cooldown {
    /// A cooldown that has just started counting down.
    pub fn new(total_time: f32) -> Self {
        let total_time = total_time.max(0.0);
        Self {
            total_time,
            time_left: total_time,
        }
    }

    /// A cooldown of `total_time` that is ready right away.
    pub fn ready(total_time: f32) -> Self {
        Self {
            total_time: total_time.max(0.0),
            time_left: 0.0,
        }
    }

    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn is_ready(&self) -> bool {
        self.time_left <= 0.0
    }

    /// Fraction of the cooldown still remaining, in `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        if self.total_time <= 0.0 {
            0.0
        } else {
            self.time_left / self.total_time
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.time_left = (self.time_left - dt.max(0.0)).max(0.0);
    }

    /// Restart from `total_time`.
    pub fn reset(&mut self) {
        self.time_left = self.total_time;
    }

    /// Restart with a new total.
    pub fn reset_with(&mut self, total_time: f32) {
        self.total_time = total_time.max(0.0);
        self.time_left = self.total_time;
    }
}
