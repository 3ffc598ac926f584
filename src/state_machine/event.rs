//! Events that can occur in a conversation

use crate::content::LABEL_CANCEL;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `/start` or `/inicio`
    Start,
    /// `/cancelar` or the cancel button
    Cancel,
    /// Any other command. Never treated as an answer or a report.
    UnknownCommand { command: String },
    /// Plain text, including menu button labels
    Text { text: String },
}

impl Event {
    /// Classify inbound message text.
    ///
    /// `bot_username` is used to honour `/cmd@BotName` addressing. Returns
    /// `None` for a command addressed to some other bot.
    pub fn from_text(text: &str, bot_username: Option<&str>) -> Option<Self> {
        if text.trim() == LABEL_CANCEL {
            return Some(Event::Cancel);
        }

        let Some(rest) = text.strip_prefix('/') else {
            return Some(Event::Text {
                text: text.to_string(),
            });
        };

        let token = rest.split_whitespace().next().unwrap_or_default();
        let (command, target) = match token.split_once('@') {
            Some((command, target)) => (command, Some(target)),
            None => (token, None),
        };

        if let (Some(target), Some(me)) = (target, bot_username) {
            if !target.eq_ignore_ascii_case(me) {
                return None;
            }
        }

        Some(match command.to_lowercase().as_str() {
            "start" | "inicio" => Event::Start,
            "cancelar" => Event::Cancel,
            _ => Event::UnknownCommand {
                command: command.to_string(),
            },
        })
    }
}
