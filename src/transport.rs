//! Messaging transport abstraction
//!
//! The dialogue only needs two things from a chat platform: a stream of
//! inbound text messages tagged with who sent them and where, and a way to
//! post a reply into a chat.

mod telegram;

pub use telegram::TelegramTransport;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Stable identity of a user, supplied by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

/// Destination chat for replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Formatting applied to an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Markdown,
}

/// One inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub update_id: i64,
    pub user_id: UserId,
    pub chat_id: ChatId,
    /// `None` for stickers, photos and other non-text messages
    pub text: Option<String>,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error (HTTP {status}): {description}")]
    Api { status: u16, description: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Wait for the next batch of inbound messages.
    ///
    /// Implementations track their own delivery offset so a batch is
    /// never returned twice.
    async fn poll_updates(&self) -> Result<Vec<Update>, TransportError>;

    /// Post a message into a chat
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn poll_updates(&self) -> Result<Vec<Update>, TransportError> {
        (**self).poll_updates().await
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), TransportError> {
        (**self).send_message(chat_id, text, format).await
    }
}
