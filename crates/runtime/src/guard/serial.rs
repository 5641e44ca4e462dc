//! Single-writer-per-key guard for stores without conditional writes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::debug;

use game_core::{Applied, PlayerRecord, Token, Transition};

use super::TransitionGuard;
use crate::api::{Result, RuntimeError};
use crate::repository::{KvStore, PlayerRepository};
use crate::workers::{Command, PlayerWorker, WorkerRegistry};

/// Guard that routes every transition for a token through one worker task.
///
/// Workers are spawned on first use and retire after sitting idle for
/// `idle_timeout`. Retirement happens under the registry lock, so a token
/// never has two live workers.
///
/// Serialization only holds within this process: every instance writing to
/// the same store must route through the same guard.
pub struct SerialGuard<S> {
    players: PlayerRepository<S>,
    registry: WorkerRegistry,
    queue_capacity: usize,
    idle_timeout: Option<Duration>,
}

impl<S: KvStore + 'static> SerialGuard<S> {
    pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

    /// Sends to a retired worker are retried against a fresh one this many times.
    const MAX_SEND_ATTEMPTS: usize = 3;

    pub fn new(players: PlayerRepository<S>) -> Self {
        Self {
            players,
            registry: Arc::new(Mutex::new(HashMap::new())),
            queue_capacity: Self::DEFAULT_QUEUE_CAPACITY,
            idle_timeout: Some(Duration::from_secs(300)),
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// `None` keeps workers alive for the lifetime of the guard.
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Number of tokens that currently have a worker.
    pub async fn active_workers(&self) -> usize {
        self.registry.lock().await.len()
    }

    async fn sender_for(&self, token: &Token) -> mpsc::Sender<Command> {
        let mut registry = self.registry.lock().await;
        if let Some(sender) = registry.get(token) {
            if !sender.is_closed() {
                return sender.clone();
            }
        }

        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        let worker = PlayerWorker::new(
            token.clone(),
            self.players.clone(),
            receiver,
            Arc::clone(&self.registry),
            self.idle_timeout,
        );
        tokio::spawn(worker.run());
        debug!(token = %token, "player worker spawned");

        registry.insert(token.clone(), sender.clone());
        sender
    }
}

#[async_trait]
impl<S: KvStore + 'static> TransitionGuard for SerialGuard<S> {
    async fn apply(&self, token: &Token, transition: Transition) -> Result<Applied> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let mut command = Command::Apply {
            transition,
            reply: reply_tx,
        };

        let mut delivered = false;
        for _ in 0..Self::MAX_SEND_ATTEMPTS {
            let sender = self.sender_for(token).await;
            match sender.send(command).await {
                Ok(()) => {
                    delivered = true;
                    break;
                }
                // The worker retired between lookup and send; try a fresh one.
                Err(mpsc::error::SendError(returned)) => command = returned,
            }
        }
        if !delivered {
            return Err(RuntimeError::WorkerUnavailable);
        }

        reply_rx
            .await
            .map_err(|_| RuntimeError::WorkerUnavailable)?
    }

    async fn load(&self, token: &Token) -> Result<Option<PlayerRecord>> {
        Ok(self.players.load(token).await?)
    }

    fn name(&self) -> &'static str {
        "serial"
    }
}
