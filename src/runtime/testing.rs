//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::state_machine::OutboundMessage;
use crate::telegram::{ChatId, TelegramError, Update};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Mock Transport
// ============================================================================

/// Records sent messages and serves queued update batches
#[derive(Default)]
pub struct MockTransport {
    /// Record of all delivered messages
    pub sent: Mutex<Vec<(ChatId, OutboundMessage)>>,
    /// Queued `get_updates` results, served in order
    batches: Mutex<VecDeque<Result<Vec<Update>, TelegramError>>>,
    /// Offsets requested by the poller
    pub offsets: Mutex<Vec<Option<i64>>>,
    /// Chats whose deliveries fail
    failing_chats: Mutex<Vec<ChatId>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_updates(&self, updates: Vec<Update>) {
        self.batches.lock().unwrap().push_back(Ok(updates));
    }

    pub fn queue_error(&self, error: TelegramError) {
        self.batches.lock().unwrap().push_back(Err(error));
    }

    pub fn fail_deliveries_to(&self, chat_id: ChatId) {
        self.failing_chats.lock().unwrap().push(chat_id);
    }

    /// Texts delivered to one chat, in order
    pub fn texts_for(&self, chat_id: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, message)| message.text.clone())
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Wait until at least `count` messages were delivered
    pub async fn wait_for_sent(&self, count: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while self.sent_count() < count {
            assert!(
                tokio::time::Instant::now() < deadline,
                "Timed out waiting for {count} messages, got {}",
                self.sent_count()
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl MessageSender for MockTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        message: &OutboundMessage,
    ) -> Result<(), TelegramError> {
        if self.failing_chats.lock().unwrap().contains(&chat_id) {
            return Err(TelegramError::from_status(400, "Bad Request: chat not found"));
        }
        self.sent.lock().unwrap().push((chat_id, message.clone()));
        Ok(())
    }
}

#[async_trait]
impl UpdateSource for MockTransport {
    async fn get_updates(
        &self,
        offset: Option<i64>,
        _timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        self.offsets.lock().unwrap().push(offset);
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => {
                // Behave like an empty long poll
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(vec![])
            }
        }
    }
}

/// Build a text-message update
pub fn text_update(update_id: i64, chat_id: i64, text: &str) -> Update {
    serde_json::from_value(serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "chat": {"id": chat_id, "type": "private"},
            "text": text
        }
    }))
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::risk::RiskTier;
    use crate::runtime::RuntimeManager;
    use crate::state_machine::Event;
    use std::sync::Arc;

    fn text(value: &str) -> Event {
        Event::Text {
            text: value.to_string(),
        }
    }

    fn manager(transport: &Arc<MockTransport>) -> RuntimeManager<MockTransport> {
        RuntimeManager::new(transport.clone(), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_mock_transport_serves_batches_in_order() {
        let transport = MockTransport::new();
        transport.queue_updates(vec![text_update(1, 7, "hola")]);
        transport.queue_error(TelegramError::network("reset"));

        let first = transport.get_updates(None, Duration::from_secs(1)).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(transport.get_updates(Some(2), Duration::from_secs(1)).await.is_err());
        assert!(transport.get_updates(Some(2), Duration::from_secs(1)).await.unwrap().is_empty());
        assert_eq!(*transport.offsets.lock().unwrap(), vec![None, Some(2), Some(2)]);
    }

    #[tokio::test]
    async fn test_start_sends_menu() {
        let transport = Arc::new(MockTransport::new());
        let manager = manager(&transport);

        manager.send_event(ChatId(1), Event::Start).await;
        transport.wait_for_sent(1).await;

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].0, ChatId(1));
        assert_eq!(sent[0].1.text, content::WELCOME);
        assert!(sent[0].1.keyboard.is_some());
    }

    #[tokio::test]
    async fn test_full_quiz_in_order() {
        let transport = Arc::new(MockTransport::new());
        let manager = manager(&transport);
        let chat = ChatId(10);

        // Fire everything without waiting: the runtime must keep order
        manager.send_event(chat, text(content::LABEL_RISK_QUIZ)).await;
        for answer in ["sí", "sí", "sí", "no"] {
            manager.send_event(chat, text(answer)).await;
        }
        transport.wait_for_sent(6).await;

        let texts = transport.texts_for(chat);
        assert_eq!(texts[0], content::quiz_intro());
        assert_eq!(texts[1], content::question(1));
        assert_eq!(texts[2], content::question(2));
        assert_eq!(texts[3], content::question(3));
        assert!(texts[4].contains(RiskTier::High.label()));
        assert_eq!(texts[5], content::emergency_numbers());
    }

    #[tokio::test]
    async fn test_chats_are_isolated() {
        let transport = Arc::new(MockTransport::new());
        let manager = manager(&transport);
        let quiz_chat = ChatId(1);
        let report_chat = ChatId(2);

        manager.send_event(quiz_chat, text(content::LABEL_RISK_QUIZ)).await;
        manager.send_event(report_chat, text(content::LABEL_REPORT)).await;
        manager.send_event(quiz_chat, text("no")).await;
        manager.send_event(report_chat, text("no")).await;
        transport.wait_for_sent(4).await;

        let quiz = transport.texts_for(quiz_chat);
        assert_eq!(quiz[1], content::question(1));

        let report = transport.texts_for(report_chat);
        assert_eq!(report[0], content::REPORT_INSTRUCTIONS);
        assert_eq!(report[1..], content::report_received("no"));
        assert_eq!(manager.active_count().await, 2);
    }

    #[tokio::test]
    async fn test_cancel_mid_quiz_then_menu_text() {
        let transport = Arc::new(MockTransport::new());
        let manager = manager(&transport);
        let chat = ChatId(3);

        manager.send_event(chat, text(content::LABEL_RISK_QUIZ)).await;
        manager.send_event(chat, text("sí")).await;
        manager.send_event(chat, Event::Cancel).await;
        // Back at the menu router: a bare answer is not menu text
        manager.send_event(chat, text("sí")).await;
        transport.wait_for_sent(4).await;

        let texts = transport.texts_for(chat);
        assert_eq!(texts[2], content::CANCELLED);
        assert_eq!(texts[3], content::USE_MENU);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_stop_runtime() {
        let transport = Arc::new(MockTransport::new());
        let manager = manager(&transport);
        let failing = ChatId(4);
        let healthy = ChatId(5);
        transport.fail_deliveries_to(failing);

        manager.send_event(failing, text(content::LABEL_RISK_QUIZ)).await;
        manager.send_event(failing, text("sí")).await;
        manager.send_event(healthy, Event::Start).await;
        transport.wait_for_sent(1).await;

        assert!(transport.texts_for(failing).is_empty());
        assert_eq!(transport.texts_for(healthy), vec![content::WELCOME.to_string()]);
    }

    #[tokio::test]
    async fn test_idle_runtime_is_released_and_recreated() {
        let transport = Arc::new(MockTransport::new());
        let manager = RuntimeManager::new(transport.clone(), Duration::from_millis(30));
        let chat = ChatId(6);

        manager.send_event(chat, text(content::LABEL_INFO)).await;
        transport.wait_for_sent(1).await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(manager.active_count().await, 0);

        manager.send_event(chat, text(content::LABEL_GUIDE)).await;
        transport.wait_for_sent(2).await;
        assert_eq!(transport.texts_for(chat)[1], content::IMMEDIATE_HELP);
    }

    #[tokio::test]
    async fn test_active_flow_survives_idle_timeout() {
        let transport = Arc::new(MockTransport::new());
        let manager = RuntimeManager::new(transport.clone(), Duration::from_millis(30));
        let chat = ChatId(7);

        manager.send_event(chat, text(content::LABEL_REPORT)).await;
        transport.wait_for_sent(1).await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(manager.active_count().await, 1);

        manager.send_event(chat, text("Av. Siempre Viva 742")).await;
        transport.wait_for_sent(2).await;
        assert_eq!(
            transport.texts_for(chat)[1..],
            content::report_received("Av. Siempre Viva 742")
        );
    }
}
