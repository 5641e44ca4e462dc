//! Per-key concurrency control for player transitions.
//!
//! The store offers no transactions, so two requests touching the same
//! player could otherwise both read the old record and overwrite each other.
//! A [`TransitionGuard`] makes every read-validate-write on one key behave as
//! if requests ran one at a time:
//!
//! - [`OptimisticGuard`] writes with a version condition and retries on conflict
//! - [`SerialGuard`] funnels each key through a single writer task, for stores
//!   without conditional writes
//!
//! Operations spanning two keys (the kill payout) are two guarded updates;
//! there is no atomicity across keys.

mod optimistic;
mod serial;

pub use optimistic::OptimisticGuard;
pub use serial::SerialGuard;

use async_trait::async_trait;

use game_core::{Applied, PlayerRecord, Token, Transition};

use crate::api::Result;

#[async_trait]
pub trait TransitionGuard: Send + Sync {
    /// Applies `transition` to the record under `token` and persists the
    /// result, linearizably with every other transition on the same token.
    ///
    /// Refused transitions and store failures write nothing.
    async fn apply(&self, token: &Token, transition: Transition) -> Result<Applied>;

    /// Reads the committed record under `token`.
    async fn load(&self, token: &Token) -> Result<Option<PlayerRecord>>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}
