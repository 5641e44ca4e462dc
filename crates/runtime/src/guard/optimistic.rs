//! Compare-and-swap guard over a versioned store.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, warn};

use game_core::{Applied, PlayerRecord, Token, Transition};

use super::TransitionGuard;
use crate::api::{Result, RuntimeError};
use crate::repository::{ConditionalKvStore, PlayerRepository, PutOutcome};

/// Guard that re-reads and retries whenever a conditional write loses a race.
///
/// Each attempt reads the record with its version, runs the transition, and
/// writes only if the version is unchanged. A lost race re-validates against
/// the newer record, so a second hit on the same location fails with
/// `AlreadyDisabled` instead of silently overwriting.
pub struct OptimisticGuard<S> {
    players: PlayerRepository<S>,
    max_attempts: u32,
    backoff: Duration,
}

impl<S: ConditionalKvStore> OptimisticGuard<S> {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

    pub fn new(players: PlayerRepository<S>) -> Self {
        Self {
            players,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            backoff: Duration::from_millis(2),
        }
    }

    /// Caps the number of conditional writes tried per transition (at least one).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Upper bound of the randomized pause after the first conflict; grows
    /// linearly with each further conflict. Zero disables pausing.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn jittered_backoff(&self, attempt: u32) -> Duration {
        let ceiling = self.backoff.saturating_mul(attempt);
        if ceiling.is_zero() {
            return Duration::ZERO;
        }
        let micros = u64::try_from(ceiling.as_micros()).unwrap_or(u64::MAX);
        Duration::from_micros(rand::thread_rng().gen_range(0..=micros))
    }
}

#[async_trait]
impl<S: ConditionalKvStore + 'static> TransitionGuard for OptimisticGuard<S> {
    async fn apply(&self, token: &Token, transition: Transition) -> Result<Applied> {
        for attempt in 1..=self.max_attempts {
            let current = self.players.load_versioned(token).await?;
            let (record, expected) = match current {
                Some(entry) => (Some(entry.value), Some(entry.version)),
                None => (None, None),
            };

            let applied = transition.apply(record.as_ref())?;

            match self.players.save_if(token, &applied.record, expected).await? {
                PutOutcome::Written(version) => {
                    debug!(
                        token = %token,
                        transition = transition.as_str(),
                        version = version.0,
                        attempt,
                        "transition committed"
                    );
                    return Ok(applied);
                }
                PutOutcome::Conflict => {
                    debug!(
                        token = %token,
                        transition = transition.as_str(),
                        attempt,
                        "write conflict, re-reading"
                    );
                    let pause = self.jittered_backoff(attempt);
                    if !pause.is_zero() {
                        tokio::time::sleep(pause).await;
                    }
                }
            }
        }

        warn!(
            token = %token,
            transition = transition.as_str(),
            attempts = self.max_attempts,
            "conflict budget exhausted"
        );
        Err(RuntimeError::Contention {
            key: token.storage_key(),
            attempts: self.max_attempts,
        })
    }

    async fn load(&self, token: &Token) -> Result<Option<PlayerRecord>> {
        Ok(self.players.load(token).await?)
    }

    fn name(&self) -> &'static str {
        "optimistic"
    }
}
