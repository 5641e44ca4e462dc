//! Player state transition engine.
//!
//! Every change to a [`crate::state::PlayerRecord`] is one [`Transition`]
//! applied to the record currently stored under a single token. Transitions
//! are pure: they validate, compute the next record and report an [`Effect`],
//! leaving persistence and concurrency control to the caller. Cross-player
//! effects (the kill payout) are expressed as two single-key transitions,
//! [`Transition::Hit`] on the target followed by [`Transition::Credit`] on the
//! attacker.

mod errors;
mod transition;

pub use errors::TransitionError;
pub use transition::{Applied, Effect, Transition};
