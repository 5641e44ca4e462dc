#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use game_core::{HitPoints, PcgRng, PlayerRecord, Token};
use runtime::repository::Result as RepoResult;
use runtime::{
    ConditionalKvStore, GuardStrategy, InMemoryKvStore, KvStore, PlayerRepository, PutOutcome,
    RepositoryError, Runtime, RuntimeConfig, TokenGenerator, Version, Versioned,
};

/// Deterministic tokens: `p-1`, `p-2`, ...
#[derive(Default)]
pub struct SequentialTokens {
    next: AtomicU64,
}

impl TokenGenerator for SequentialTokens {
    fn issue(&self) -> Token {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        Token::new(format!("p-{n}"))
    }
}

/// Store wrapper that pauses after every read, widening the window between
/// a transition's read and its write so concurrent requests interleave.
pub struct SlowStore {
    inner: InMemoryKvStore,
    read_delay: Duration,
}

impl SlowStore {
    pub fn new(read_delay: Duration) -> Self {
        Self {
            inner: InMemoryKvStore::new(),
            read_delay,
        }
    }

    pub fn inner(&self) -> &InMemoryKvStore {
        &self.inner
    }
}

#[async_trait]
impl KvStore for SlowStore {
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self.inner.get(key).await?;
        tokio::time::sleep(self.read_delay).await;
        Ok(value)
    }

    async fn put(&self, key: &str, value: String) -> RepoResult<()> {
        tokio::task::yield_now().await;
        self.inner.put(key, value).await
    }
}

#[async_trait]
impl ConditionalKvStore for SlowStore {
    async fn get_versioned(&self, key: &str) -> RepoResult<Option<Versioned<String>>> {
        let value = self.inner.get_versioned(key).await?;
        tokio::time::sleep(self.read_delay).await;
        Ok(value)
    }

    async fn put_if(
        &self,
        key: &str,
        value: String,
        expected: Option<Version>,
    ) -> RepoResult<PutOutcome> {
        tokio::task::yield_now().await;
        self.inner.put_if(key, value, expected).await
    }
}

/// Store wrapper that fails every call on selected keys, leaving other keys
/// untouched.
#[derive(Default)]
pub struct KeyFailingStore {
    inner: InMemoryKvStore,
    failing: Mutex<HashSet<String>>,
}

impl KeyFailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryKvStore {
        &self.inner
    }

    pub fn fail_key(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn check(&self, key: &str) -> RepoResult<()> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(RepositoryError::Unavailable(format!("{key} unreachable")));
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for KeyFailingStore {
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        self.check(key)?;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: String) -> RepoResult<()> {
        self.check(key)?;
        self.inner.put(key, value).await
    }
}

#[async_trait]
impl ConditionalKvStore for KeyFailingStore {
    async fn get_versioned(&self, key: &str) -> RepoResult<Option<Versioned<String>>> {
        self.check(key)?;
        self.inner.get_versioned(key).await
    }

    async fn put_if(
        &self,
        key: &str,
        value: String,
        expected: Option<Version>,
    ) -> RepoResult<PutOutcome> {
        self.check(key)?;
        self.inner.put_if(key, value, expected).await
    }
}

/// Store whose conditional writes always lose the race. Plain writes go
/// through, so records can still be seeded.
#[derive(Default)]
pub struct ConflictingStore {
    inner: InMemoryKvStore,
    conditional_writes: AtomicU64,
}

impl ConflictingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditional_writes(&self) -> u64 {
        self.conditional_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KvStore for ConflictingStore {
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: String) -> RepoResult<()> {
        self.inner.put(key, value).await
    }
}

#[async_trait]
impl ConditionalKvStore for ConflictingStore {
    async fn get_versioned(&self, key: &str) -> RepoResult<Option<Versioned<String>>> {
        self.inner.get_versioned(key).await
    }

    async fn put_if(
        &self,
        _key: &str,
        _value: String,
        _expected: Option<Version>,
    ) -> RepoResult<PutOutcome> {
        self.conditional_writes.fetch_add(1, Ordering::SeqCst);
        Ok(PutOutcome::Conflict)
    }
}

pub fn config(guard: GuardStrategy) -> RuntimeConfig {
    RuntimeConfig {
        cas_max_attempts: 64,
        ..RuntimeConfig::default()
    }
    .with_guard(guard)
}

pub fn runtime_over<S: ConditionalKvStore + 'static>(
    store: Arc<S>,
    guard: GuardStrategy,
) -> Runtime {
    init_tracing();
    Runtime::builder()
        .config(config(guard))
        .store(store)
        .tokens(SequentialTokens::default())
        .rng(PcgRng::new(0x5eed))
        .build()
}

/// Routes runtime logs through the test harness. Set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn record(head: u8, chest: u8, back: u8, money: u64) -> PlayerRecord {
    PlayerRecord {
        hp: HitPoints { head, chest, back },
        money,
        alive: true,
    }
}

pub async fn seed<S: KvStore>(store: &Arc<S>, token: &str, record: PlayerRecord) {
    PlayerRepository::new(Arc::clone(store))
        .save(&Token::new(token), &record)
        .await
        .expect("seeding should succeed");
}

pub async fn stored<S: KvStore>(store: &Arc<S>, token: &str) -> Option<PlayerRecord> {
    PlayerRepository::new(Arc::clone(store))
        .load(&Token::new(token))
        .await
        .expect("reading back should succeed")
}

/// Sum of every balance in the store.
pub fn total_money(store: &InMemoryKvStore) -> u64 {
    store
        .entries()
        .expect("store readable")
        .iter()
        .map(|(key, raw)| {
            PlayerRepository::<InMemoryKvStore>::decode(key, raw)
                .expect("valid record")
                .money
        })
        .sum()
}
