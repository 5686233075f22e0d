//! Telegram Bot API transport (long polling)

use super::{ChatId, TextFormat, Transport, TransportError, Update, UserId};
use crate::config::TelegramConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

const API_BASE: &str = "https://api.telegram.org";

/// Seconds the server may hold a `getUpdates` call open
const LONG_POLL_SECS: u64 = 30;

/// Telegram rejects messages longer than this many characters
const MAX_MESSAGE_CHARS: usize = 4096;

pub struct TelegramTransport {
    client: Client,
    /// `{API_BASE}/bot{token}`; never log this
    base_url: String,
    /// Next update id to request; 0 means "whatever is pending"
    offset: AtomicI64,
}

impl TelegramTransport {
    pub fn new(config: &TelegramConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!("{API_BASE}/bot{}", config.bot_token),
            offset: AtomicI64::new(0),
        })
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TransportError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        // reqwest errors carry the URL, which embeds the bot token
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(params)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let body: ApiResponse<R> = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.without_url().to_string()))?;

        into_result(status.as_u16(), body)
    }

    /// Offset for the next `getUpdates`, `None` before anything was received
    fn current_offset(&self) -> Option<i64> {
        let offset = self.offset.load(Ordering::SeqCst);
        (offset > 0).then_some(offset)
    }

    /// Move the offset past every update in `raw`.
    ///
    /// Skipped updates count too, or they would be redelivered. The offset
    /// never moves backwards.
    fn acknowledge(&self, raw: &[RawUpdate]) {
        if let Some(last) = raw.iter().map(|u| u.update_id).max() {
            self.offset.fetch_max(last + 1, Ordering::SeqCst);
        }
    }

    async fn send_chunk(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), TransportError> {
        let params = SendMessage {
            chat_id: chat_id.0,
            text,
            parse_mode: match format {
                TextFormat::Markdown => Some("Markdown"),
                TextFormat::Plain => None,
            },
        };

        match self.call::<_, IgnoredAny>("sendMessage", &params).await {
            Err(e) if needs_plain_resend(format, &e) => {
                tracing::warn!(chat_id = %chat_id, error = %e, "Markdown rejected, resending as plain text");
                let plain = SendMessage {
                    parse_mode: None,
                    ..params
                };
                self.call::<_, IgnoredAny>("sendMessage", &plain).await?;
                Ok(())
            }
            other => other.map(|_| ()),
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn poll_updates(&self) -> Result<Vec<Update>, TransportError> {
        let params = GetUpdates {
            offset: self.current_offset(),
            timeout: LONG_POLL_SECS,
            allowed_updates: &["message"],
        };

        let raw: Vec<RawUpdate> = self.call("getUpdates", &params).await?;
        self.acknowledge(&raw);

        Ok(raw.into_iter().filter_map(RawUpdate::into_update).collect())
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), TransportError> {
        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            self.send_chunk(chat_id, &chunk, format).await?;
        }
        Ok(())
    }
}

fn into_result<R>(status: u16, body: ApiResponse<R>) -> Result<R, TransportError> {
    if body.ok {
        body.result
            .ok_or_else(|| TransportError::Decode("Response has no result".to_string()))
    } else {
        Err(TransportError::Api {
            status,
            description: body
                .description
                .unwrap_or_else(|| "no description".to_string()),
        })
    }
}

/// Only Markdown sends fall back, so the plain resend is attempted once
fn needs_plain_resend(format: TextFormat, error: &TransportError) -> bool {
    format == TextFormat::Markdown && is_markdown_rejection(error)
}

fn is_markdown_rejection(error: &TransportError) -> bool {
    matches!(
        error,
        TransportError::Api { status: 400, description } if description.contains("can't parse entities")
    )
}

/// Split text into chunks of at most `max_chars` characters.
///
/// Prefers line boundaries; a single overlong line is split mid-line.
fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_chars {
            for c in line.chars() {
                if current_len == max_chars {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push(c);
                current_len += 1;
            }
        } else {
            current.push_str(line);
            current_len += line_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// Bot API types

#[derive(Debug, Serialize)]
struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<R> {
    ok: bool,
    result: Option<R>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUpdate {
    update_id: i64,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    chat: RawChat,
    from: Option<RawUser>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: i64,
}

impl RawUpdate {
    /// Messages without a sender (channel posts) have no user to track
    fn into_update(self) -> Option<Update> {
        let message = self.message?;
        let from = message.from?;
        Some(Update {
            update_id: self.update_id,
            user_id: UserId(from.id),
            chat_id: ChatId(message.chat.id),
            text: message.text,
        })
    }
}
