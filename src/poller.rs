//! Long-polling update loop
//!
//! Pulls updates from the transport, turns text messages into events and
//! hands them to the runtime manager. Non-text updates are skipped.

use crate::runtime::{MessageSender, RuntimeManager, UpdateSource};
use crate::state_machine::Event;
use crate::telegram::{TelegramError, TelegramErrorKind, Update};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Delay before the next poll after `failures` consecutive errors
pub fn retry_delay(failures: u32) -> Duration {
    let factor = 2u32.saturating_pow(failures.saturating_sub(1));
    INITIAL_BACKOFF.saturating_mul(factor).min(MAX_BACKOFF)
}

pub struct Poller<U, S>
where
    U: UpdateSource,
    S: MessageSender + 'static,
{
    source: Arc<U>,
    manager: Arc<RuntimeManager<S>>,
    bot_username: Option<String>,
    timeout: Duration,
    offset: Option<i64>,
}

impl<U, S> Poller<U, S>
where
    U: UpdateSource,
    S: MessageSender + 'static,
{
    pub fn new(
        source: Arc<U>,
        manager: Arc<RuntimeManager<S>>,
        bot_username: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            manager,
            bot_username,
            timeout,
            offset: None,
        }
    }

    /// Poll until `shutdown` fires. Returns an error only for failures that
    /// retrying cannot fix (a rejected token).
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<(), TelegramError> {
        let mut failures = 0u32;

        loop {
            let result = tokio::select! {
                () = shutdown.cancelled() => break,
                result = self.source.get_updates(self.offset, self.timeout) => result,
            };

            match result {
                Ok(updates) => {
                    failures = 0;
                    self.dispatch(updates).await;
                }
                Err(e) if e.kind == TelegramErrorKind::Auth => {
                    tracing::error!(error = %e, "Bot token rejected, stopping poller");
                    return Err(e);
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    let delay = e.retry_after.unwrap_or_else(|| retry_delay(failures));
                    tracing::warn!(
                        error = %e,
                        kind = ?e.kind,
                        retryable = e.is_retryable(),
                        attempt = failures,
                        delay_secs = delay.as_secs(),
                        "Polling failed, backing off"
                    );
                    tokio::select! {
                        () = shutdown.cancelled() => break,
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        tracing::info!("Poller stopped");
        Ok(())
    }

    async fn dispatch(&mut self, updates: Vec<Update>) {
        for update in updates {
            self.offset = Some(self.offset.map_or(update.update_id + 1, |o| {
                o.max(update.update_id + 1)
            }));

            let Some((chat_id, text)) = update.text_message() else {
                tracing::debug!(update_id = update.update_id, "Skipping non-text update");
                continue;
            };

            match Event::from_text(text, self.bot_username.as_deref()) {
                Some(event) => self.manager.send_event(chat_id, event).await,
                None => {
                    tracing::debug!(chat_id = %chat_id, "Skipping command addressed to another bot");
                }
            }
        }
    }
}
