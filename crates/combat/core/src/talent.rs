//! Data-driven talents.
//!
//! A talent is a [`TalentDefinition`]: requirements plus per-level effect
//! templates. [`TalentTree`] owns every definition and the learned level of
//! each; learning, leveling and unlearning all reduce to re-applying one
//! permanent passive aura named `talent:<name>` with the effects scaled by the
//! current level.

use core::fmt;

use tracing::debug;

use crate::config::CombatConfig;
use crate::error::{CombatError, ErrorSeverity};
use crate::events::{CombatEvents, TalentChanged};
use crate::stats::Statable;
use crate::status::{Aura, EffectTemplate};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TalentId(pub u16);

impl fmt::Display for TalentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "talent#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TalentDefinition {
    pub id: TalentId,
    pub name: String,
    pub max_level: u8,
    /// Character level needed for the first point.
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_level: u8,
    /// Talents that must be at least the given level first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires: Vec<(TalentId, u8)>,
    /// Talents this one unlocks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub following: Vec<TalentId>,
    /// Effect values for one level; level `n` grants `n ×` these.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects_per_level: Vec<EffectTemplate>,
}

impl TalentDefinition {
    pub fn new(id: TalentId, name: impl Into<String>, max_level: u8) -> Self {
        Self {
            id,
            name: name.into(),
            max_level,
            required_level: 0,
            requires: Vec::new(),
            following: Vec::new(),
            effects_per_level: Vec::new(),
        }
    }

    pub fn with_required_level(mut self, level: u8) -> Self {
        self.required_level = level;
        self
    }

    pub fn requiring(mut self, talent: TalentId, level: u8) -> Self {
        self.requires.push((talent, level));
        self
    }

    pub fn unlocking(mut self, talent: TalentId) -> Self {
        self.following.push(talent);
        self
    }

    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effects_per_level.push(effect);
        self
    }

    pub fn aura_name(&self) -> String {
        format!("talent:{}", self.name)
    }

    /// Passive aura granted at `level`.
    pub fn aura_for(&self, level: u8) -> Aura {
        Aura::permanent(self.aura_name())
            .with_effects(self.effects_per_level.iter().map(|e| e.instantiate(level)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TalentError {
    #[error("talent {0} not found")]
    UnknownTalent(TalentId),

    #[error("talent {0} defined twice")]
    DuplicateTalent(TalentId),

    #[error("talent {talent} has invalid max level {max_level}")]
    InvalidMaxLevel { talent: TalentId, max_level: u8 },

    #[error("talent {talent} already at max level {max_level}")]
    MaxLevelReached { talent: TalentId, max_level: u8 },

    #[error("talent {talent} needs character level {required}, have {actual}")]
    CharacterLevelTooLow {
        talent: TalentId,
        required: u8,
        actual: u8,
    },

    #[error("talent {talent} needs {requires} at level {level}")]
    RequirementNotMet {
        talent: TalentId,
        requires: TalentId,
        level: u8,
    },

    #[error("talent {0} is not learned")]
    NotLearned(TalentId),

    #[error("talent {talent} is required by learned talent {dependent}")]
    RequiredBy { talent: TalentId, dependent: TalentId },

    #[error("no room for the aura of talent {0}")]
    AuraRejected(TalentId),

    #[error("saved talent levels do not match the tree")]
    LevelsMismatch,
}

impl CombatError for TalentError {
    fn severity(&self) -> ErrorSeverity {
        use TalentError::*;
        match self {
            DuplicateTalent(_) | InvalidMaxLevel { .. } => ErrorSeverity::Fatal,
            UnknownTalent(_) | LevelsMismatch | AuraRejected(_) => ErrorSeverity::Validation,
            MaxLevelReached { .. }
            | CharacterLevelTooLow { .. }
            | RequirementNotMet { .. }
            | NotLearned(_)
            | RequiredBy { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use TalentError::*;
        match self {
            UnknownTalent(_) => "TALENT_UNKNOWN",
            DuplicateTalent(_) => "TALENT_DUPLICATE",
            InvalidMaxLevel { .. } => "TALENT_INVALID_MAX_LEVEL",
            MaxLevelReached { .. } => "TALENT_MAX_LEVEL",
            CharacterLevelTooLow { .. } => "TALENT_CHARACTER_LEVEL",
            RequirementNotMet { .. } => "TALENT_REQUIREMENT",
            NotLearned(_) => "TALENT_NOT_LEARNED",
            RequiredBy { .. } => "TALENT_REQUIRED_BY",
            AuraRejected(_) => "TALENT_AURA_REJECTED",
            LevelsMismatch => "TALENT_LEVELS_MISMATCH",
        }
    }
}

/// Learned level of every talent, in tree order. This is what gets saved.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TalentLevels {
    pub levels: Vec<(TalentId, u8)>,
}

/// Talent definitions and learned levels of one character.
#[derive(Clone, Debug, PartialEq)]
pub struct TalentTree {
    definitions: Vec<TalentDefinition>,
    levels: Vec<u8>,
}

impl TalentTree {
    /// Validate `definitions` and build an empty tree.
    pub fn new(definitions: Vec<TalentDefinition>) -> Result<Self, TalentError> {
        for (index, definition) in definitions.iter().enumerate() {
            if definitions[..index].iter().any(|d| d.id == definition.id) {
                return Err(TalentError::DuplicateTalent(definition.id));
            }
            if definition.max_level == 0 || definition.max_level > CombatConfig::MAX_TALENT_LEVEL {
                return Err(TalentError::InvalidMaxLevel {
                    talent: definition.id,
                    max_level: definition.max_level,
                });
            }
        }
        for definition in &definitions {
            let referenced = definition
                .requires
                .iter()
                .map(|(id, _)| *id)
                .chain(definition.following.iter().copied());
            for id in referenced {
                if !definitions.iter().any(|d| d.id == id) {
                    return Err(TalentError::UnknownTalent(id));
                }
            }
        }

        let levels = vec![0; definitions.len()];
        Ok(Self {
            definitions,
            levels,
        })
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TalentDefinition, u8)> {
        self.definitions.iter().zip(self.levels.iter().copied())
    }

    /// Definition at position `index`; `None` for out-of-range indices.
    pub fn select(&self, index: usize) -> Option<&TalentDefinition> {
        self.definitions.get(index)
    }

    pub fn definition(&self, id: TalentId) -> Option<&TalentDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    fn index_of(&self, id: TalentId) -> Result<usize, TalentError> {
        self.definitions
            .iter()
            .position(|d| d.id == id)
            .ok_or(TalentError::UnknownTalent(id))
    }

    /// Learned level of `id`; unknown talents read as 0.
    pub fn level(&self, id: TalentId) -> u8 {
        self.index_of(id).map(|i| self.levels[i]).unwrap_or(0)
    }

    /// Checks whether one more point can go into `id`.
    pub fn can_learn(&self, id: TalentId, statable: &Statable) -> Result<(), TalentError> {
        let index = self.index_of(id)?;
        let definition = &self.definitions[index];

        if self.levels[index] >= definition.max_level {
            return Err(TalentError::MaxLevelReached {
                talent: id,
                max_level: definition.max_level,
            });
        }
        if statable.level() < definition.required_level {
            return Err(TalentError::CharacterLevelTooLow {
                talent: id,
                required: definition.required_level,
                actual: statable.level(),
            });
        }
        for &(requires, level) in &definition.requires {
            if self.level(requires) < level {
                return Err(TalentError::RequirementNotMet {
                    talent: id,
                    requires,
                    level,
                });
            }
        }
        Ok(())
    }

    /// Put one point into `id`, returning the new level.
    ///
    /// Nothing changes if the statable has no room for the talent's aura.
    pub fn learn(
        &mut self,
        id: TalentId,
        statable: &mut Statable,
        events: &mut CombatEvents,
    ) -> Result<u8, TalentError> {
        self.can_learn(id, statable)?;
        let index = self.index_of(id)?;
        let level = self.levels[index] + 1;

        let definition = &self.definitions[index];
        if !statable.add_aura(definition.aura_for(level)).is_applied() {
            return Err(TalentError::AuraRejected(id));
        }
        self.levels[index] = level;
        debug!(talent = %definition.name, level, "talent learned");

        let event = TalentChanged { talent: id, level };
        if level == 1 {
            events.talent_learned.publish(&event);
        } else {
            events.talent_level_changed.publish(&event);
        }
        Ok(level)
    }

    /// Take one point out of `id`, returning the new level.
    ///
    /// Refused while any learned talent still requires the current level.
    pub fn unlearn(
        &mut self,
        id: TalentId,
        statable: &mut Statable,
        events: &mut CombatEvents,
    ) -> Result<u8, TalentError> {
        let index = self.index_of(id)?;
        if self.levels[index] == 0 {
            return Err(TalentError::NotLearned(id));
        }
        let level = self.levels[index] - 1;

        for (dependent, dependent_level) in self.iter() {
            if dependent_level == 0 {
                continue;
            }
            let blocked = dependent
                .requires
                .iter()
                .any(|&(required, needed)| required == id && level < needed);
            if blocked {
                return Err(TalentError::RequiredBy {
                    talent: id,
                    dependent: dependent.id,
                });
            }
        }

        self.levels[index] = level;
        let definition = &self.definitions[index];
        let event = TalentChanged { talent: id, level };
        if level == 0 {
            statable.remove_aura(&definition.aura_name());
            events.talent_unlearned.publish(&event);
        } else {
            statable.add_aura(definition.aura_for(level));
            events.talent_level_changed.publish(&event);
        }
        debug!(talent = %definition.name, level, "talent unlearned");
        Ok(level)
    }

    pub fn snapshot(&self) -> TalentLevels {
        TalentLevels {
            levels: self
                .definitions
                .iter()
                .map(|d| d.id)
                .zip(self.levels.iter().copied())
                .collect(),
        }
    }

    /// Restore saved levels and re-grant every learned talent's aura.
    pub fn restore(&mut self, saved: &TalentLevels, statable: &mut Statable) -> Result<(), TalentError> {
        let mut levels = vec![0; self.definitions.len()];
        for &(id, level) in &saved.levels {
            let index = self.index_of(id).map_err(|_| TalentError::LevelsMismatch)?;
            if level > self.definitions[index].max_level {
                return Err(TalentError::LevelsMismatch);
            }
            levels[index] = level;
        }

        for definition in &self.definitions {
            statable.remove_aura(&definition.aura_name());
        }
        self.levels = levels;
        for (definition, level) in self.definitions.iter().zip(self.levels.iter().copied()) {
            if level > 0 {
                statable.add_aura(definition.aura_for(level));
            }
        }
        Ok(())
    }
}
