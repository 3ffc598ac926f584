//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the runtime and poller with mock transports.

use crate::state_machine::OutboundMessage;
use crate::telegram::{ChatId, TelegramClient, TelegramError, Update};
use async_trait::async_trait;
use std::time::Duration;

/// Outbound message delivery
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(
        &self,
        chat_id: ChatId,
        message: &OutboundMessage,
    ) -> Result<(), TelegramError>;
}

/// Inbound update stream
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Fetch updates with `update_id >= offset`, waiting up to `timeout`
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError>;
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_message(
        &self,
        chat_id: ChatId,
        message: &OutboundMessage,
    ) -> Result<(), TelegramError> {
        TelegramClient::send_message(self, chat_id, message).await
    }
}

#[async_trait]
impl UpdateSource for TelegramClient {
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        TelegramClient::get_updates(self, offset, timeout).await
    }
}
