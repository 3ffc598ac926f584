//! Effects produced by state transitions

use crate::content::MENU_KEYBOARD;

/// Rendering mode for outbound text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Telegram's legacy `Markdown` dialect
    Markdown,
}

/// A reply keyboard: rows of button labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<String>>,
    pub resize: bool,
}

impl ReplyKeyboard {
    pub fn main_menu() -> Self {
        Self {
            rows: MENU_KEYBOARD
                .iter()
                .map(|row| row.iter().map(|label| (*label).to_string()).collect())
                .collect(),
            resize: true,
        }
    }
}

/// A message to deliver to the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub keyboard: Option<ReplyKeyboard>,
}

impl OutboundMessage {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: Some(ParseMode::Markdown),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: ReplyKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message to the chat
    Reply(OutboundMessage),

    /// Record a submitted incident report. Reports are logged, not stored.
    RecordReport { text: String },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply(OutboundMessage::markdown(text))
    }

    pub fn reply_with_menu(text: impl Into<String>) -> Self {
        Effect::Reply(OutboundMessage::markdown(text).with_keyboard(ReplyKeyboard::main_menu()))
    }

    /// Text of a reply effect, `None` for other effects
    #[cfg(test)]
    pub fn reply_text(&self) -> Option<&str> {
        match self {
            Effect::Reply(message) => Some(&message.text),
            Effect::RecordReport { .. } => None,
        }
    }
}
