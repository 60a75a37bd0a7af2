//! Injected random sources.
//!
//! Every roll in the engine (attack table, weapon damage range, affix draws)
//! goes through [`RngOracle`]. Nothing reaches for a global generator, so a
//! seeded [`PcgRng`] replays a fight exactly and [`ScriptedRng`] pins
//! individual outcomes in tests.

/// Random source consumed by combat resolution.
pub trait RngOracle {
    /// Generate the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f32 {
        // 24 mantissa bits keep the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Integer in `[min, max]` inclusive. Returns `min` for empty ranges.
    fn random_range_i32(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (max as i64 - min as i64 + 1) as f32;
        let offset = (self.next_unit() * span) as i64;
        (min as i64 + offset).min(max as i64) as i32
    }

    /// Float in `[min, max)`. Returns `min` for empty ranges.
    fn random_range_f32(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        min + self.next_unit() * (max - min)
    }

    /// Percentage roll in `[0, 100)`.
    fn roll_percent(&mut self) -> f32 {
        self.next_unit() * 100.0
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// Same seed always produces the same sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

/// Deterministic stub returning queued unit values.
///
/// Values are clamped into `[0, 1)` and replayed in order, cycling once the
/// script is exhausted. An empty script always yields `0.0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptedRng {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
                .collect(),
            cursor: 0,
        }
    }

    /// A stub whose every roll is the same value.
    pub fn constant(value: f32) -> Self {
        Self::new([value])
    }

    /// A stub whose percentage rolls come out as the given percentages.
    pub fn percents(values: impl IntoIterator<Item = f32>) -> Self {
        Self::new(values.into_iter().map(|p| p / 100.0))
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_unit() * u32::MAX as f32) as u32
    }

    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
