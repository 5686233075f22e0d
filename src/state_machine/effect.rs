//! Effects produced by state transitions

use super::state::ContextPatch;
use crate::prompts::Prompt;
use crate::transport::TextFormat;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Merge a partial update into the user's stored context
    UpdateContext(ContextPatch),

    /// Send a message to the user's chat
    Reply { text: String, format: TextFormat },

    /// Run a prompt against the model; completes with `LlmResponse` or `LlmFailed`
    RequestLlm {
        prompt: Prompt,
        idea: String,
        /// Earlier critique passed back as assistant context
        prior_teardown: Option<String>,
    },
}

impl Effect {
    pub fn reply_plain(text: impl Into<String>) -> Self {
        Effect::Reply {
            text: text.into(),
            format: TextFormat::Plain,
        }
    }

    pub fn reply_markdown(text: impl Into<String>) -> Self {
        Effect::Reply {
            text: text.into(),
            format: TextFormat::Markdown,
        }
    }
}
