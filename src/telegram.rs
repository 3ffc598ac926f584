//! Telegram Bot API transport
//!
//! Long polling in, `sendMessage` out. Nothing here knows about flows.

mod client;
mod error;
mod types;

pub use client::TelegramClient;
pub use error::{TelegramError, TelegramErrorKind};
pub use types::{ChatId, Update};
