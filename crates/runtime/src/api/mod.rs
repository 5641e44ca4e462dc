//! Public runtime API surface.
//!
//! This module gathers the types exposed to the request layer: the error
//! taxonomy, the response payloads and the pluggable token source.

pub mod errors;
pub mod tokens;
pub mod types;

pub use errors::{ErrorKind, Result, RuntimeError};
pub use tokens::{TokenGenerator, UuidTokens};
pub use types::{AttackReport, Bounty, Evacuation, LootReceipt, Registration};
