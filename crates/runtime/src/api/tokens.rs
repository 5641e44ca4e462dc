//! Token issuance for new registrations.

use game_core::Token;
use uuid::Uuid;

/// Source of fresh, never-reused player tokens.
pub trait TokenGenerator: Send + Sync {
    fn issue(&self) -> Token;
}

/// Random v4 UUID tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenGenerator for UuidTokens {
    fn issue(&self) -> Token {
        Token::new(Uuid::new_v4().to_string())
    }
}
