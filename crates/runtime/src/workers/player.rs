//! Single-writer task for one player key.
//!
//! Receives transitions from [`crate::guard::SerialGuard`], applies them one
//! at a time against the stored record, and replies with the outcome.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::{debug, warn};

use game_core::{Applied, Token, Transition};

use crate::api::Result;
use crate::repository::{KvStore, PlayerRepository};

/// Live workers by token. Entries are inserted by the guard and removed by
/// the worker itself when it retires.
pub(crate) type WorkerRegistry = Arc<Mutex<HashMap<Token, mpsc::Sender<Command>>>>;

/// Commands that can be sent to a player worker
pub(crate) enum Command {
    /// Apply a transition and persist the result.
    Apply {
        transition: Transition,
        reply: oneshot::Sender<Result<Applied>>,
    },
}

/// Background task that serializes all writes to one player key.
pub(crate) struct PlayerWorker<S> {
    token: Token,
    players: PlayerRepository<S>,
    command_rx: mpsc::Receiver<Command>,
    registry: WorkerRegistry,
    idle_timeout: Option<Duration>,
}

impl<S: KvStore + 'static> PlayerWorker<S> {
    pub(crate) fn new(
        token: Token,
        players: PlayerRepository<S>,
        command_rx: mpsc::Receiver<Command>,
        registry: WorkerRegistry,
        idle_timeout: Option<Duration>,
    ) -> Self {
        Self {
            token,
            players,
            command_rx,
            registry,
            idle_timeout,
        }
    }

    /// Main worker loop.
    pub(crate) async fn run(mut self) {
        loop {
            let next = match self.idle_timeout {
                Some(idle) => match tokio::time::timeout(idle, self.command_rx.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        self.retire().await;
                        return;
                    }
                },
                None => self.command_rx.recv().await,
            };

            match next {
                Some(command) => self.handle_command(command).await,
                None => break,
            }
        }
        debug!(token = %self.token, "player worker stopped");
    }

    async fn handle_command(&self, command: Command) {
        match command {
            Command::Apply { transition, reply } => {
                let result = self.apply(transition).await;
                let _ = reply.send(result);
            }
        }
    }

    async fn apply(&self, transition: Transition) -> Result<Applied> {
        let current = self.players.load(&self.token).await?;
        let applied = transition.apply(current.as_ref())?;
        self.players.save(&self.token, &applied.record).await?;

        debug!(
            token = %self.token,
            transition = transition.as_str(),
            "transition committed"
        );
        Ok(applied)
    }

    /// Leaves the registry after an idle period.
    ///
    /// The queue is closed while the registry lock is held, so no caller can
    /// reach this worker afterwards, and anything already queued is still
    /// served before the entry disappears. A caller that raced the close gets
    /// its command back and spawns a fresh worker once the lock is released.
    async fn retire(&mut self) {
        let registry = Arc::clone(&self.registry);
        let mut registry = registry.lock().await;
        self.command_rx.close();

        let mut drained = 0usize;
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command).await;
            drained += 1;
        }
        if drained > 0 {
            warn!(
                token = %self.token,
                drained,
                "commands arrived while retiring"
            );
        }

        registry.remove(&self.token);
        debug!(token = %self.token, "player worker retired");
    }
}
