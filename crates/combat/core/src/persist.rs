//! Versioned save/load boundary.
//!
//! Every persisted value is wrapped in an [`Envelope`] carrying its type name
//! and format version, then encoded with bincode. Loading checks both before
//! touching the payload; a mismatch aborts the load of that value entirely.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::attack::{AttackLimiter, Cooldown};
use crate::error::{CombatError, ErrorSeverity};
use crate::status::{Aura, AuraList};
use crate::talent::TalentLevels;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    #[error("failed to encode {type_name}: {reason}")]
    Encode {
        type_name: &'static str,
        reason: String,
    },

    #[error("failed to decode {type_name}: {reason}")]
    Decode {
        type_name: &'static str,
        reason: String,
    },

    #[error("expected a saved {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("{type_name} version {found} is outside supported range [{expected_min}, {expected_max}]")]
    VersionMismatch {
        type_name: &'static str,
        expected_min: u16,
        expected_max: u16,
        found: u16,
    },
}

impl CombatError for PersistError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Encode { .. } => ErrorSeverity::Internal,
            Self::Decode { .. } | Self::TypeMismatch { .. } | Self::VersionMismatch { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Encode { .. } => "PERSIST_ENCODE",
            Self::Decode { .. } => "PERSIST_DECODE",
            Self::TypeMismatch { .. } => "PERSIST_TYPE_MISMATCH",
            Self::VersionMismatch { .. } => "PERSIST_VERSION_MISMATCH",
        }
    }
}

/// Header plus encoded payload of one persisted value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub type_name: String,
    pub version: u16,
    pub payload: Vec<u8>,
}

/// Check that `found` lies in `[min, max]`.
pub fn require_version(
    type_name: &'static str,
    found: u16,
    min: u16,
    max: u16,
) -> Result<(), PersistError> {
    if (min..=max).contains(&found) {
        Ok(())
    } else {
        Err(PersistError::VersionMismatch {
            type_name,
            expected_min: min,
            expected_max: max,
            found,
        })
    }
}

/// A value that can cross the save/load boundary.
pub trait Persist: Serialize + DeserializeOwned {
    const TYPE_NAME: &'static str;
    /// Version written by [`Persist::save`].
    const VERSION: u16;
    /// Oldest version [`Persist::load`] still accepts.
    const MIN_VERSION: u16 = 1;

    fn save(&self) -> Result<Vec<u8>, PersistError> {
        let encode_err = |e: bincode::Error| PersistError::Encode {
            type_name: Self::TYPE_NAME,
            reason: e.to_string(),
        };
        let envelope = Envelope {
            type_name: Self::TYPE_NAME.to_string(),
            version: Self::VERSION,
            payload: bincode::serialize(self).map_err(encode_err)?,
        };
        bincode::serialize(&envelope).map_err(encode_err)
    }

    fn load(bytes: &[u8]) -> Result<Self, PersistError> {
        let decode_err = |e: bincode::Error| PersistError::Decode {
            type_name: Self::TYPE_NAME,
            reason: e.to_string(),
        };
        let envelope: Envelope = bincode::deserialize(bytes).map_err(decode_err)?;
        if envelope.type_name != Self::TYPE_NAME {
            return Err(PersistError::TypeMismatch {
                expected: Self::TYPE_NAME,
                found: envelope.type_name,
            });
        }
        require_version(Self::TYPE_NAME, envelope.version, Self::MIN_VERSION, Self::VERSION)?;
        bincode::deserialize(&envelope.payload).map_err(decode_err)
    }
}

impl Persist for Aura {
    const TYPE_NAME: &'static str = "Aura";
    const VERSION: u16 = 1;
}

impl Persist for AuraList {
    const TYPE_NAME: &'static str = "AuraList";
    const VERSION: u16 = 1;
}

impl Persist for Cooldown {
    const TYPE_NAME: &'static str = "Cooldown";
    const VERSION: u16 = 1;
}

impl Persist for AttackLimiter {
    const TYPE_NAME: &'static str = "AttackLimiter";
    const VERSION: u16 = 1;
}

impl Persist for TalentLevels {
    const TYPE_NAME: &'static str = "TalentLevels";
    const VERSION: u16 = 1;
}
