//! Per-chat conversation runtime
//!
//! One task per active chat owns that chat's state and consumes its events
//! in arrival order, so updates from the same chat never race.

use super::traits::MessageSender;
use super::Registry;
use crate::state_machine::{transition, ActiveFlow, ConvState, Effect, Event};
use crate::telegram::ChatId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Single-writer runtime for one chat
pub struct ConversationRuntime<S>
where
    S: MessageSender + 'static,
{
    chat_id: ChatId,
    state: ConvState,
    sender: Arc<S>,
    event_rx: mpsc::UnboundedReceiver<Event>,
    /// Handle table shared with the manager, used to deregister on idle
    registry: Registry,
    idle_timeout: Duration,
}

impl<S> ConversationRuntime<S>
where
    S: MessageSender + 'static,
{
    pub fn new(
        chat_id: ChatId,
        sender: Arc<S>,
        event_rx: mpsc::UnboundedReceiver<Event>,
        registry: Registry,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            chat_id,
            state: ConvState::Idle,
            sender,
            event_rx,
            registry,
            idle_timeout,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(chat_id = %self.chat_id, "Starting conversation runtime");

        loop {
            match tokio::time::timeout(self.idle_timeout, self.event_rx.recv()).await {
                Ok(Some(event)) => self.process_event(event).await,
                Ok(None) => break,
                Err(_) => {
                    // A flow in progress keeps the runtime alive. Flows have no
                    // expiry, so a chat that walks away mid-quiz or mid-report
                    // holds its task and registry entry until it sends
                    // /cancelar, /start or the pending answer.
                    if !self.state.is_idle() {
                        continue;
                    }
                    // Sends happen under the registry read lock, so nothing
                    // can be queued between this check and deregistering.
                    let mut runtimes = self.registry.write().await;
                    match self.event_rx.try_recv() {
                        Ok(event) => {
                            drop(runtimes);
                            self.process_event(event).await;
                        }
                        Err(_) => {
                            runtimes.remove(&self.chat_id);
                            break;
                        }
                    }
                }
            }
        }

        tracing::debug!(chat_id = %self.chat_id, "Conversation runtime stopped");
    }

    async fn process_event(&mut self, event: Event) {
        // Pure state transition
        let result = transition(&self.state, event);

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        debug_assert!(self.state.is_valid(), "invalid state: {:?}", self.state);
        if old_state.active_flow() != self.state.active_flow() {
            tracing::debug!(
                chat_id = %self.chat_id,
                from = ?old_state.active_flow(),
                to = ?self.state.active_flow(),
                "Flow changed"
            );
        } else if self.state.active_flow() == ActiveFlow::RiskQuiz {
            tracing::debug!(
                chat_id = %self.chat_id,
                question = self.state.current_question_index(),
                "Quiz in progress"
            );
        }

        for effect in result.effects {
            self.execute_effect(effect).await;
        }
    }

    /// Delivery failures are logged and do not stop later effects
    async fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::Reply(message) => {
                if let Err(e) = self.sender.send_message(self.chat_id, &message).await {
                    tracing::warn!(
                        chat_id = %self.chat_id,
                        error = %e,
                        kind = ?e.kind,
                        "Failed to deliver reply"
                    );
                }
            }

            Effect::RecordReport { text } => {
                let report_id = uuid::Uuid::new_v4();
                tracing::info!(
                    chat_id = %self.chat_id,
                    report_id = %report_id,
                    report = %text,
                    "New sinkhole report received"
                );
            }
        }
    }
}
