//! In-memory store implementations for tests and local runs.

mod kv;

pub use kv::InMemoryKvStore;
