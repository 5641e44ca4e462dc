//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule violations, repository failures and guard exhaustion so the
//! request layer can map every failure to a distinguishable response.
use std::fmt;

use thiserror::Error;

use game_core::{ErrorSeverity, GameError, Location, TransitionError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("missing parameter `{param}`")]
    MissingParams { param: &'static str },

    #[error("unknown location `{0}` (expected head, chest or back)")]
    UnknownLocation(String),

    #[error("invalid player")]
    InvalidPlayer,

    #[error("target invalid")]
    InvalidTarget,

    #[error("{location} already disabled")]
    AlreadyDisabled { location: Location },

    #[error("token already issued")]
    TokenCollision,

    #[error("balance overflow")]
    MoneyOverflow,

    #[error(transparent)]
    StoreUnavailable(#[from] RepositoryError),

    #[error("gave up on {key} after {attempts} conflicting writes")]
    Contention { key: String, attempts: u32 },

    #[error("player worker stopped before replying")]
    WorkerUnavailable,
}

/// Coarse classification of a [`RuntimeError`] for the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingParams,
    InvalidPlayer,
    InvalidTarget,
    AlreadyDisabled,
    StoreUnavailable,
    Internal,
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParams { .. } | Self::UnknownLocation(_) => ErrorKind::MissingParams,
            Self::InvalidPlayer => ErrorKind::InvalidPlayer,
            Self::InvalidTarget => ErrorKind::InvalidTarget,
            Self::AlreadyDisabled { .. } => ErrorKind::AlreadyDisabled,
            Self::StoreUnavailable(err) if err.is_transient() => ErrorKind::StoreUnavailable,
            Self::StoreUnavailable(RepositoryError::LockPoisoned) => ErrorKind::StoreUnavailable,
            Self::Contention { .. } | Self::WorkerUnavailable => ErrorKind::StoreUnavailable,
            Self::TokenCollision | Self::MoneyOverflow | Self::StoreUnavailable(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Whether the caller may resend the same request.
    ///
    /// Only infrastructure failures qualify; they abort before anything is
    /// written for the failing key.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::StoreUnavailable
    }
}

impl From<TransitionError> for RuntimeError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidPlayer => Self::InvalidPlayer,
            TransitionError::InvalidTarget => Self::InvalidTarget,
            TransitionError::AlreadyDisabled { location } => Self::AlreadyDisabled { location },
            TransitionError::TokenCollision => Self::TokenCollision,
            TransitionError::MoneyOverflow => Self::MoneyOverflow,
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::StoreUnavailable => ErrorSeverity::Recoverable,
            ErrorKind::Internal => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParams { .. } => "MISSING_PARAMS",
            Self::UnknownLocation(_) => "UNKNOWN_LOCATION",
            Self::InvalidPlayer => "INVALID_PLAYER",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::AlreadyDisabled { .. } => "ALREADY_DISABLED",
            Self::TokenCollision => "TOKEN_COLLISION",
            Self::MoneyOverflow => "MONEY_OVERFLOW",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Contention { .. } => "CONTENTION",
            Self::WorkerUnavailable => "WORKER_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::MissingParams => "missing_params",
            ErrorKind::InvalidPlayer => "invalid_player",
            ErrorKind::InvalidTarget => "invalid_target",
            ErrorKind::AlreadyDisabled => "already_disabled",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::Internal => "internal",
        };
        write!(f, "{}", label)
    }
}
