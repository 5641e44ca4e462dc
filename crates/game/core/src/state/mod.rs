//! Persisted player state.
//!
//! A [`PlayerRecord`] is the only entity the game stores. Runtime layers load
//! and persist records but mutate them exclusively through
//! [`crate::engine::Transition`].
pub mod types;

pub use types::{HitPoints, Location, PlayerRecord, Token};
