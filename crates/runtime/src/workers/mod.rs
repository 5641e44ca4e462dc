//! Worker tasks that back the serial guard.
//!
//! Each [`PlayerWorker`] owns every read and write of one player key.

mod player;

pub(crate) use player::{Command, PlayerWorker, WorkerRegistry};
