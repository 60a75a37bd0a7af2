//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (e.g. `AttackError`, `PersistError`, `TalentError`)
//! are defined next to the code that produces them. This module provides the
//! severity classification and the trait they all implement.
//!
//! Severity follows the failure taxonomy of the engine:
//! - configuration mistakes fail fast at construction or load time (`Fatal`)
//! - soft invalid transitions never surface as errors (callers get `false`/`None`)
//! - version mismatches reject the payload wholesale (`Validation`)

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    ///
    /// Examples: talent requirements not met yet
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: persisted payload with an unsupported version
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - configuration is unusable, loading must abort.
    ///
    /// Examples: attack built without a damage method, unknown category name
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or unusable setup.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
