//! Error types for player transitions.

use crate::error::{ErrorSeverity, GameError};
use crate::state::Location;

/// Reasons a [`super::Transition`] refuses to apply.
///
/// A refused transition never yields a record to persist.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionError {
    #[error("player does not exist or is no longer in play")]
    InvalidPlayer,

    #[error("target does not exist or is no longer in play")]
    InvalidTarget,

    #[error("{location} is already disabled")]
    AlreadyDisabled { location: Location },

    #[error("a record is already stored under this token")]
    TokenCollision,

    #[error("balance would overflow")]
    MoneyOverflow,
}

impl GameError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidPlayer | Self::InvalidTarget | Self::AlreadyDisabled { .. } => {
                ErrorSeverity::Validation
            }
            Self::TokenCollision | Self::MoneyOverflow => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPlayer => "INVALID_PLAYER",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::AlreadyDisabled { .. } => "ALREADY_DISABLED",
            Self::TokenCollision => "TOKEN_COLLISION",
            Self::MoneyOverflow => "MONEY_OVERFLOW",
        }
    }
}
