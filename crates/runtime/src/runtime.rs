//! Game service exposing one operation per game event.
//!
//! [`Runtime`] validates request parameters, rolls loot, and drives player
//! transitions through the configured [`TransitionGuard`]. It holds no game
//! state of its own; every request reads and writes the store.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info, warn};

use game_core::{Effect, Location, PlayerRecord, RewardRng, Token, Transition, roll_reward};

use crate::api::{
    AttackReport, Bounty, ErrorKind, Evacuation, LootReceipt, Registration, Result, RuntimeError,
    TokenGenerator, UuidTokens,
};
use crate::config::{GuardStrategy, RuntimeConfig};
use crate::guard::{OptimisticGuard, SerialGuard, TransitionGuard};
use crate::repository::{ConditionalKvStore, InMemoryKvStore, KvStore, PlayerRepository};
use crate::rng::ThreadRewardRng;

/// Entry point for the request layer.
///
/// Cheap to clone; clones share the guard, token source and random source.
#[derive(Clone)]
pub struct Runtime {
    guard: Arc<dyn TransitionGuard>,
    tokens: Arc<dyn TokenGenerator>,
    rng: Arc<Mutex<Box<dyn RewardRng>>>,
    config: Arc<RuntimeConfig>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn guard_name(&self) -> &'static str {
        self.guard.name()
    }

    /// Issues a fresh token and stores a full-health, zero-balance record under it.
    pub async fn register(&self) -> Result<Registration> {
        let token = self.tokens.issue();
        self.guard.apply(&token, Transition::Create).await?;

        info!(token = %token, "player registered");
        Ok(Registration { token })
    }

    /// Pays a tier-dependent random reward to a living player.
    pub async fn loot(&self, token: &str, point_id: &str) -> Result<LootReceipt> {
        let token = require_token(token, "token")?;
        if point_id.is_empty() {
            return Err(RuntimeError::MissingParams { param: "id" });
        }

        let table = &self.config.game.loot;
        let tier = table.tier(point_id);
        let gain = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            roll_reward(table, point_id, &mut **rng)
        };

        let applied = self.guard.apply(&token, Transition::Loot { gain }).await?;
        let total = applied.record.money;

        info!(token = %token, point = point_id, ?tier, gain, total, "loot collected");
        Ok(LootReceipt { gain, total })
    }

    /// Disables one location of `target`. Disabling the last location
    /// eliminates the target and pays its balance to `actor`.
    ///
    /// The target's balance is drained in the same write that eliminates it;
    /// the payout is a second, separate write. If the actor is missing, no
    /// longer in play, or the payout write fails, the balance is forfeited:
    /// money can be destroyed here but never duplicated.
    pub async fn attack(&self, actor: &str, target: &str, location: &str) -> Result<AttackReport> {
        let actor = Token::parse(actor);
        let target = Token::parse(target);
        let (actor, target) = match (actor, target, location.is_empty()) {
            (Some(actor), Some(target), false) => (actor, target),
            (None, _, _) => return Err(RuntimeError::MissingParams { param: "token" }),
            (_, None, _) => return Err(RuntimeError::MissingParams { param: "target" }),
            (_, _, true) => return Err(RuntimeError::MissingParams { param: "part" }),
        };
        let location = Location::from_str(location)
            .map_err(|_| RuntimeError::UnknownLocation(location.to_string()))?;

        let applied = self.guard.apply(&target, Transition::Hit { location }).await?;
        info!(
            actor = %actor,
            target = %target,
            %location,
            alive = applied.record.alive,
            "location disabled"
        );

        let bounty = match applied.effect {
            Effect::Hit {
                bounty: Some(amount),
                ..
            } => Some(self.pay_bounty(&actor, &target, amount).await),
            _ => None,
        };

        Ok(AttackReport {
            success: true,
            target: applied.record,
            bounty,
        })
    }

    async fn pay_bounty(&self, actor: &Token, target: &Token, amount: u64) -> Bounty {
        match self.guard.apply(actor, Transition::Credit { amount }).await {
            Ok(applied) => {
                info!(
                    actor = %actor,
                    target = %target,
                    amount,
                    total = applied.record.money,
                    "target eliminated, bounty paid"
                );
                Bounty {
                    amount,
                    credited_to: Some(actor.clone()),
                }
            }
            Err(err) if err.kind() == ErrorKind::InvalidPlayer => {
                warn!(
                    actor = %actor,
                    target = %target,
                    amount,
                    "target eliminated, attacker not in play; bounty forfeited"
                );
                Bounty {
                    amount,
                    credited_to: None,
                }
            }
            Err(err) => {
                error!(
                    actor = %actor,
                    target = %target,
                    amount,
                    error = %err,
                    "target eliminated, bounty payout failed; bounty forfeited"
                );
                Bounty {
                    amount,
                    credited_to: None,
                }
            }
        }
    }

    /// Takes a living player out of play, banking their balance.
    pub async fn evacuate(&self, token: &str) -> Result<Evacuation> {
        let token = require_token(token, "token")?;
        let applied = self.guard.apply(&token, Transition::Evacuate).await?;
        let money = applied.record.money;

        info!(token = %token, money, "player evacuated");
        Ok(Evacuation {
            success: true,
            money,
        })
    }

    /// Reads the committed record for `token`, if any.
    pub async fn player(&self, token: &str) -> Result<Option<PlayerRecord>> {
        let token = require_token(token, "token")?;
        self.guard.load(&token).await
    }
}

fn require_token(raw: &str, param: &'static str) -> Result<Token> {
    Token::parse(raw).ok_or(RuntimeError::MissingParams { param })
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    guard: Option<Arc<dyn TransitionGuard>>,
    tokens: Option<Arc<dyn TokenGenerator>>,
    rng: Option<Box<dyn RewardRng>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            guard: None,
            tokens: None,
            rng: None,
        }
    }

    /// Set runtime configuration
    ///
    /// Call before [`Self::store`] or [`Self::unconditional_store`]; guards
    /// pick up the configuration in effect when they are built.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a versioned store, guarded by the strategy in the configuration.
    pub fn store<S: ConditionalKvStore + 'static>(mut self, store: Arc<S>) -> Self {
        self.guard = Some(build_guard(&self.config, store, self.config.guard));
        self
    }

    /// Use a store without conditional writes. Always guarded serially.
    pub fn unconditional_store<S: KvStore + 'static>(mut self, store: Arc<S>) -> Self {
        self.guard = Some(Arc::new(serial_guard(&self.config, store)));
        self
    }

    /// Use a pre-built guard as is.
    pub fn guard(mut self, guard: Arc<dyn TransitionGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn tokens(mut self, tokens: impl TokenGenerator + 'static) -> Self {
        self.tokens = Some(Arc::new(tokens));
        self
    }

    pub fn rng(mut self, rng: impl RewardRng + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Finish building. Without a store, records live in a fresh
    /// [`InMemoryKvStore`].
    pub fn build(self) -> Runtime {
        let guard = self.guard.unwrap_or_else(|| {
            build_guard(
                &self.config,
                Arc::new(InMemoryKvStore::new()),
                self.config.guard,
            )
        });
        info!(guard = guard.name(), "runtime ready");

        Runtime {
            guard,
            tokens: self.tokens.unwrap_or_else(|| Arc::new(UuidTokens)),
            rng: Arc::new(Mutex::new(
                self.rng.unwrap_or_else(|| Box::new(ThreadRewardRng)),
            )),
            config: Arc::new(self.config),
        }
    }
}

fn build_guard<S: ConditionalKvStore + 'static>(
    config: &RuntimeConfig,
    store: Arc<S>,
    strategy: GuardStrategy,
) -> Arc<dyn TransitionGuard> {
    match strategy {
        GuardStrategy::Optimistic => Arc::new(
            OptimisticGuard::new(PlayerRepository::new(store))
                .with_max_attempts(config.cas_max_attempts)
                .with_backoff(config.cas_backoff),
        ),
        GuardStrategy::Serial => Arc::new(serial_guard(config, store)),
    }
}

fn serial_guard<S: KvStore + 'static>(config: &RuntimeConfig, store: Arc<S>) -> SerialGuard<S> {
    SerialGuard::new(PlayerRepository::new(store))
        .with_queue_capacity(config.worker_queue_capacity)
        .with_idle_timeout(config.worker_idle_timeout)
}
