//! Common error infrastructure for game-core.
//!
//! Transition-specific failures live in [`crate::engine::TransitionError`].
//! This module holds the classification shared by every error the rules can
//! produce, so outer layers can decide how to react without matching on
//! individual variants.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: infrastructure hiccups; the same request may succeed on retry
/// - **Validation**: the request can never succeed against the current record
/// - **Internal**: the stored data or arithmetic broke an invariant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - retrying with the same parameters is safe.
    ///
    /// Examples: store unavailable, write conflict budget exhausted
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown token, eliminated target, location already disabled
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: balance overflow, corrupted record
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Common trait for all game errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Keep `error_code` stable; it is matched on by callers and tests
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
