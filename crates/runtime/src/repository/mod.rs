//! Repository layer over the external key/value store.
//!
//! The store itself is an external collaborator: string keys, string values,
//! no transactions. [`KvStore`] is the minimal contract; stores that can
//! condition a write on the version they handed out also implement
//! [`ConditionalKvStore`]. [`PlayerRepository`] adds key naming and the JSON
//! record layout on top of either.

mod error;
mod memory;
mod players;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryKvStore;
pub use players::PlayerRepository;
pub use traits::{ConditionalKvStore, KvStore, PutOutcome, Version, Versioned};
