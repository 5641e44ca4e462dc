//! Server-side player state engine.
//!
//! This crate wires the pure rules from `game-core` to an external key/value
//! store. Consumers build a [`Runtime`] and call one operation per game event:
//! register, loot, attack and evacuate.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the service and its builder
//! - [`api`] exposes errors, payloads and the token source
//! - [`guard`] keeps concurrent transitions on the same player linearizable
//! - [`repository`] adapts the key/value store to player records
//! - [`config`] loads tunables from the environment
pub mod api;
pub mod config;
pub mod guard;
pub mod repository;
pub mod rng;
pub mod runtime;

mod workers;

pub use api::{
    AttackReport, Bounty, ErrorKind, Evacuation, LootReceipt, Registration, Result, RuntimeError,
    TokenGenerator, UuidTokens,
};
pub use config::{GuardStrategy, RuntimeConfig};
pub use guard::{OptimisticGuard, SerialGuard, TransitionGuard};
pub use repository::{
    ConditionalKvStore, InMemoryKvStore, KvStore, PlayerRepository, PutOutcome, RepositoryError,
    Version, Versioned,
};
pub use rng::ThreadRewardRng;
pub use runtime::{Runtime, RuntimeBuilder};
