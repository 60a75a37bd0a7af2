/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Critical damage multiplier every entity starts with before
    /// `CriticalDamageBonus` effects are folded in.
    pub base_critical_multiplier: f32,

    /// Share of the computed damage a `Resisted` attack still deals (percent).
    pub resisted_damage_percent: f32,

    /// Minimum time before a piercing projectile may strike the same target again.
    pub projectile_rehit_interval: f32,

    /// Depth of the melee attack region in front of the attacker (world units).
    pub melee_reach: f32,

    /// How many times the affix registry draws before giving up.
    pub affix_max_tries: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of simultaneously active auras on one entity.
    pub const MAX_AURAS: usize = 32;
    /// Hard cap on stack counts for stacking auras.
    pub const MAX_AURA_STACKS: u8 = 20;
    /// Maximum level any talent can reach.
    pub const MAX_TALENT_LEVEL: u8 = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CRITICAL_MULTIPLIER: f32 = 1.5;
    pub const DEFAULT_RESISTED_DAMAGE_PERCENT: f32 = 50.0;
    pub const DEFAULT_PROJECTILE_REHIT_INTERVAL: f32 = 0.4;
    pub const DEFAULT_MELEE_REACH: f32 = 1.0;
    pub const DEFAULT_AFFIX_MAX_TRIES: u32 = 8;

    pub fn new() -> Self {
        Self {
            base_critical_multiplier: Self::DEFAULT_CRITICAL_MULTIPLIER,
            resisted_damage_percent: Self::DEFAULT_RESISTED_DAMAGE_PERCENT,
            projectile_rehit_interval: Self::DEFAULT_PROJECTILE_REHIT_INTERVAL,
            melee_reach: Self::DEFAULT_MELEE_REACH,
            affix_max_tries: Self::DEFAULT_AFFIX_MAX_TRIES,
        }
    }

    pub fn with_critical_multiplier(mut self, multiplier: f32) -> Self {
        self.base_critical_multiplier = multiplier;
        self
    }

    pub fn with_melee_reach(mut self, reach: f32) -> Self {
        self.melee_reach = reach;
        self
    }

    /// Checks the tunables for values that would corrupt numeric results.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_critical_multiplier >= 1.0) {
            return Err(ConfigError::InvalidField {
                field: "base_critical_multiplier",
                reason: "must be at least 1.0",
            });
        }
        if !(0.0..=100.0).contains(&self.resisted_damage_percent) {
            return Err(ConfigError::InvalidField {
                field: "resisted_damage_percent",
                reason: "must be within [0, 100]",
            });
        }
        if !(self.projectile_rehit_interval >= 0.0) {
            return Err(ConfigError::InvalidField {
                field: "projectile_rehit_interval",
                reason: "must not be negative",
            });
        }
        if !(self.melee_reach > 0.0) {
            return Err(ConfigError::InvalidField {
                field: "melee_reach",
                reason: "must be positive",
            });
        }
        if self.affix_max_tries == 0 {
            return Err(ConfigError::InvalidField {
                field: "affix_max_tries",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

impl crate::error::CombatError for ConfigError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidField { .. } => "CONFIG_INVALID_FIELD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CombatConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_critical_multiplier_below_one() {
        let config = CombatConfig::new().with_critical_multiplier(0.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField {
                field: "base_critical_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_positive_reach() {
        let config = CombatConfig::new().with_melee_reach(0.0);
        assert!(config.validate().is_err());
    }
}
