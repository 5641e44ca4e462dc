//! Contracts for the external key/value store.

use async_trait::async_trait;

use super::Result;

/// Opaque write version handed out by a [`ConditionalKvStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub u64);

/// A value together with the version it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: Version,
}

impl<T> Versioned<T> {
    pub fn new(value: T, version: Version) -> Self {
        Self { value, version }
    }
}

/// Result of a conditional write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutOutcome {
    /// The write landed; the key now carries this version.
    Written(Version),
    /// The key changed since the expected version was read. Nothing was written.
    Conflict,
}

/// Plain asynchronous get/put store keyed by string.
///
/// Every call may suspend and may fail transiently. The store gives no
/// isolation between concurrent callers touching the same key.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: String) -> Result<()>;
}

/// Store that can condition a write on the version last read.
#[async_trait]
pub trait ConditionalKvStore: KvStore {
    async fn get_versioned(&self, key: &str) -> Result<Option<Versioned<String>>>;

    /// Writes `value` only if the key is still at `expected`.
    ///
    /// `expected = None` means the key must not exist yet.
    async fn put_if(
        &self,
        key: &str,
        value: String,
        expected: Option<Version>,
    ) -> Result<PutOutcome>;
}
