//! Pure player rules shared by every host of the game.
//!
//! `game-core` defines the persisted [`PlayerRecord`], the reward tiers used
//! by loot points, and the [`Transition`]s that are the only way a record
//! changes. Nothing here performs I/O; the runtime crate loads records,
//! applies transitions under its concurrency guard, and writes them back.
pub mod config;
pub mod engine;
pub mod error;
pub mod loot;
pub mod state;

pub use config::{GameConfig, LootTable};
pub use engine::{Applied, Effect, Transition, TransitionError};
pub use error::{ErrorSeverity, GameError};
pub use loot::{LootTier, PcgRng, RewardRng, roll_reward};
pub use state::{HitPoints, Location, PlayerRecord, Token};
