//! Bot runtime: polls the transport and runs one task per inbound message
//!
//! Intake never waits on a model call. Each message updates the user's
//! context in arrival order, then its replies and model call run in their
//! own task in a [`JoinSet`]. A panicking task is logged and the loop keeps
//! going.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::Dialogue;
pub use traits::*;

use crate::llm::LlmService;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Pause after a failed poll before trying again
const DEFAULT_POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub struct BotRuntime<S, L, T>
where
    S: ContextStore + 'static,
    L: LlmService + 'static,
    T: Transport + 'static,
{
    dialogue: Arc<Dialogue<S, L, T>>,
    transport: Arc<T>,
    poll_error_backoff: Duration,
}

impl<S, L, T> BotRuntime<S, L, T>
where
    S: ContextStore + 'static,
    L: LlmService + 'static,
    T: Transport + 'static,
{
    pub fn new(store: S, llm: L, transport: Arc<T>) -> Self {
        Self {
            dialogue: Arc::new(Dialogue::new(store, llm, transport.clone())),
            transport,
            poll_error_backoff: DEFAULT_POLL_ERROR_BACKOFF,
        }
    }

    #[must_use]
    pub fn with_poll_error_backoff(mut self, backoff: Duration) -> Self {
        self.poll_error_backoff = backoff;
        self
    }

    /// Run until `shutdown` is cancelled, then wait for in-flight messages
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!("Bot runtime started, waiting for messages");

        let mut tasks = JoinSet::new();

        loop {
            // Keep one poll in flight while reaping finished tasks
            let mut poll = self.transport.poll_updates();
            let polled = loop {
                tokio::select! {
                    () = shutdown.cancelled() => break None,
                    Some(joined) = tasks.join_next() => reap(joined),
                    polled = &mut poll => break Some(polled),
                }
            };

            let Some(polled) = polled else { break };

            match polled {
                Ok(updates) => {
                    // Context updates land in arrival order; only replies and
                    // model calls run concurrently
                    for update in updates {
                        let Some(turn) = self.dialogue.begin(&update) else {
                            continue;
                        };
                        let dialogue = self.dialogue.clone();
                        tasks.spawn(async move { dialogue.finish(turn).await });
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Polling error");
                    tokio::select! {
                        () = shutdown.cancelled() => break,
                        () = tokio::time::sleep(self.poll_error_backoff) => {}
                    }
                }
            }
        }

        tracing::info!(in_flight = tasks.len(), "Shutting down, waiting for in-flight messages");
        while let Some(joined) = tasks.join_next().await {
            reap(joined);
        }
        tracing::info!("Bot runtime stopped");
    }
}

fn reap(joined: Result<(), JoinError>) {
    match joined {
        Ok(()) => {}
        Err(e) if e.is_panic() => {
            tracing::error!(error = %e, "Message task panicked");
        }
        Err(e) => {
            tracing::debug!(error = %e, "Message task cancelled");
        }
    }
}
