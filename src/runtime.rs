//! Runtime for executing conversations
//!
//! The manager maps chat ids to per-chat runtimes, creating them on demand.
//! Each runtime is the only writer of its chat's session.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::state_machine::Event;
use crate::telegram::ChatId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

/// Handle table shared by the manager and its runtimes
pub(crate) type Registry = Arc<RwLock<HashMap<ChatId, ConversationHandle>>>;

/// Handle to interact with a running conversation
pub struct ConversationHandle {
    pub event_tx: mpsc::UnboundedSender<Event>,
}

/// Manager for all conversation runtimes
pub struct RuntimeManager<S: MessageSender + 'static> {
    sender: Arc<S>,
    runtimes: Registry,
    idle_timeout: Duration,
}

impl<S: MessageSender + 'static> RuntimeManager<S> {
    pub fn new(sender: Arc<S>, idle_timeout: Duration) -> Self {
        Self {
            sender,
            runtimes: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Send an event to a chat, starting its runtime if needed
    pub async fn send_event(&self, chat_id: ChatId, event: Event) {
        // Fast path: runtime already running
        let event = {
            let runtimes = self.runtimes.read().await;
            match runtimes.get(&chat_id) {
                Some(handle) => match handle.event_tx.send(event) {
                    Ok(()) => return,
                    Err(mpsc::error::SendError(event)) => event,
                },
                None => event,
            }
        };

        let mut runtimes = self.runtimes.write().await;
        if let Some(handle) = runtimes.get(&chat_id) {
            // Another caller may have started it while we waited for the lock
            if !handle.event_tx.is_closed() {
                if let Err(e) = handle.event_tx.send(event) {
                    tracing::error!(chat_id = %chat_id, error = %e, "Failed to queue event");
                }
                return;
            }
        }

        // Drop handles whose runtime has stopped
        runtimes.retain(|_, handle| !handle.event_tx.is_closed());

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let runtime = ConversationRuntime::new(
            chat_id,
            self.sender.clone(),
            event_rx,
            self.runtimes.clone(),
            self.idle_timeout,
        );
        tokio::spawn(runtime.run());

        if let Err(e) = event_tx.send(event) {
            tracing::error!(chat_id = %chat_id, error = %e, "Failed to queue event");
        }
        runtimes.insert(chat_id, ConversationHandle { event_tx });
    }

    /// Number of chats with a live runtime
    pub async fn active_count(&self) -> usize {
        self.runtimes.read().await.len()
    }
}
