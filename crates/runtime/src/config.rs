//! Runtime configuration structures and loaders.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use game_core::GameConfig;

/// Which concurrency guard serializes writes per player key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GuardStrategy {
    /// Versioned conditional writes with retry on conflict.
    #[default]
    Optimistic,
    /// One writer task per key; for stores without conditional writes.
    Serial,
}

impl FromStr for GuardStrategy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_lowercase().as_str() {
            "optimistic" | "cas" => Ok(Self::Optimistic),
            "serial" | "actor" => Ok(Self::Serial),
            other => Err(format!("unknown guard strategy `{other}`")),
        }
    }
}

/// Runtime configuration shared across the service and its guard.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub guard: GuardStrategy,
    pub cas_max_attempts: u32,
    pub cas_backoff: Duration,
    pub worker_queue_capacity: usize,
    /// `None` keeps serial workers alive indefinitely.
    pub worker_idle_timeout: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            guard: GuardStrategy::default(),
            cas_max_attempts: 16,
            cas_backoff: Duration::from_millis(2),
            worker_queue_capacity: 32,
            worker_idle_timeout: Some(Duration::from_secs(300)),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `RAID_GUARD` - `optimistic` or `serial` (default: optimistic)
    /// - `RAID_CAS_MAX_RETRIES` - Conditional write attempts per transition (default: 16)
    /// - `RAID_CAS_BACKOFF_MS` - Backoff ceiling after a conflict (default: 2)
    /// - `RAID_WORKER_QUEUE` - Per-player worker queue size (default: 32)
    /// - `RAID_WORKER_IDLE_SECS` - Idle seconds before a worker retires, 0 = never (default: 300)
    /// - `RAID_HIGH_TIER_THRESHOLD` - Lowest point id paying high-tier loot (default: 61)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(guard) = read_env::<GuardStrategy>("RAID_GUARD") {
            config.guard = guard;
        }
        if let Some(attempts) = read_env::<u32>("RAID_CAS_MAX_RETRIES") {
            config.cas_max_attempts = attempts.max(1);
        }
        if let Some(ms) = read_env::<u64>("RAID_CAS_BACKOFF_MS") {
            config.cas_backoff = Duration::from_millis(ms);
        }
        if let Some(capacity) = read_env::<usize>("RAID_WORKER_QUEUE") {
            config.worker_queue_capacity = capacity.max(1);
        }
        if let Some(secs) = read_env::<u64>("RAID_WORKER_IDLE_SECS") {
            config.worker_idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(threshold) = read_env::<i64>("RAID_HIGH_TIER_THRESHOLD") {
            config.game.loot = config.game.loot.with_high_tier_threshold(threshold);
        }

        config
    }

    pub fn with_guard(mut self, guard: GuardStrategy) -> Self {
        self.guard = guard;
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok()?.parse().ok()
}
