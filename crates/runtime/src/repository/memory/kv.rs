//! In-memory key/value store with per-key versions.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::repository::{
    ConditionalKvStore, KvStore, PutOutcome, RepositoryError, Result, Version, Versioned,
};

/// In-memory implementation of both store contracts.
///
/// Versions start at 1 and increase by one on every write to the same key.
/// Failures can be injected with [`InMemoryKvStore::fail_next`] to exercise
/// the store-unavailable paths.
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, Versioned<String>>>,
    pending_failures: AtomicUsize,
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            pending_failures: AtomicUsize::new(0),
        }
    }

    /// Make the next `count` store calls fail with [`RepositoryError::Unavailable`].
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// All stored key/value pairs, sorted by key.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut pairs: Vec<(String, String)> = entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect();
        pairs.sort_unstable();
        Ok(pairs)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<()> {
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match injected {
            Ok(_) => Err(RepositoryError::Unavailable(
                "injected store failure".to_string(),
            )),
            Err(_) => Ok(()),
        }
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_versioned(key).await?.map(|entry| entry.value))
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.check_available()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let next = entries
            .get(key)
            .map_or(Version(1), |entry| Version(entry.version.0 + 1));
        entries.insert(key.to_string(), Versioned::new(value, next));
        Ok(())
    }
}

#[async_trait]
impl ConditionalKvStore for InMemoryKvStore {
    async fn get_versioned(&self, key: &str) -> Result<Option<Versioned<String>>> {
        self.check_available()?;
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn put_if(
        &self,
        key: &str,
        value: String,
        expected: Option<Version>,
    ) -> Result<PutOutcome> {
        self.check_available()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let current = entries.get(key).map(|entry| entry.version);
        if current != expected {
            return Ok(PutOutcome::Conflict);
        }

        let next = Version(current.map_or(1, |version| version.0 + 1));
        entries.insert(key.to_string(), Versioned::new(value, next));
        Ok(PutOutcome::Written(next))
    }
}
