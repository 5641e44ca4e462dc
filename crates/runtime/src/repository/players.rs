//! Typed access to player records stored as JSON under `player:<token>`.

use std::sync::Arc;

use game_core::{PlayerRecord, Token};

use super::{ConditionalKvStore, KvStore, PutOutcome, RepositoryError, Result, Version, Versioned};

/// Player records on top of a raw key/value store.
///
/// Decoding rejects records that break the structural invariants of
/// [`PlayerRecord`], so a corrupted entry is never mistaken for a valid one.
pub struct PlayerRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for PlayerRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> PlayerRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn encode(record: &PlayerRecord) -> Result<String> {
        Ok(serde_json::to_string(record)?)
    }

    pub fn decode(key: &str, raw: &str) -> Result<PlayerRecord> {
        let record: PlayerRecord =
            serde_json::from_str(raw).map_err(|err| RepositoryError::CorruptedData {
                key: key.to_string(),
                reason: err.to_string(),
            })?;
        record
            .check_invariants()
            .map_err(|reason| RepositoryError::CorruptedData {
                key: key.to_string(),
                reason: reason.to_string(),
            })?;
        Ok(record)
    }
}

impl<S: KvStore> PlayerRepository<S> {
    pub async fn load(&self, token: &Token) -> Result<Option<PlayerRecord>> {
        let key = token.storage_key();
        match self.store.get(&key).await? {
            Some(raw) => Ok(Some(Self::decode(&key, &raw)?)),
            None => Ok(None),
        }
    }

    pub async fn save(&self, token: &Token, record: &PlayerRecord) -> Result<()> {
        let raw = Self::encode(record)?;
        self.store.put(&token.storage_key(), raw).await
    }
}

impl<S: ConditionalKvStore> PlayerRepository<S> {
    pub async fn load_versioned(&self, token: &Token) -> Result<Option<Versioned<PlayerRecord>>> {
        let key = token.storage_key();
        match self.store.get_versioned(&key).await? {
            Some(entry) => {
                let record = Self::decode(&key, &entry.value)?;
                Ok(Some(Versioned::new(record, entry.version)))
            }
            None => Ok(None),
        }
    }

    pub async fn save_if(
        &self,
        token: &Token,
        record: &PlayerRecord,
        expected: Option<Version>,
    ) -> Result<PutOutcome> {
        let raw = Self::encode(record)?;
        self.store
            .put_if(&token.storage_key(), raw, expected)
            .await
    }
}
