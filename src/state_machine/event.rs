//! Events that can occur in a conversation

use crate::prompts::Prompt;

/// Marker that turns a message into a command
const COMMAND_PREFIX: char = '/';

/// Commands that work on the stored idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FollowUp {
    RoastMore,
    PivotMe,
    Comparps,
}

impl FollowUp {
    /// Command name as typed by the user, without the slash
    pub fn command(self) -> &'static str {
        match self {
            FollowUp::RoastMore => "roastmore",
            FollowUp::PivotMe => "pivotme",
            FollowUp::Comparps => "comparps",
        }
    }

    pub fn prompt(self) -> Prompt {
        match self {
            FollowUp::RoastMore => Prompt::Roast,
            FollowUp::PivotMe => Prompt::Pivots,
            FollowUp::Comparps => Prompt::Comps,
        }
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    Start,
    IdeaSubmitted {
        text: String,
    },
    FollowUp(FollowUp),

    // LLM events
    LlmResponse {
        prompt: Prompt,
        /// Idea the request was built from
        idea: String,
        text: String,
    },
    LlmFailed {
        prompt: Prompt,
    },
}

impl Event {
    /// Interpret an inbound chat message.
    ///
    /// Returns `None` for input the bot ignores: blank messages and
    /// unrecognized commands.
    pub fn from_text(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }

        let Some(rest) = text.strip_prefix(COMMAND_PREFIX) else {
            return Some(Event::IdeaSubmitted {
                text: text.to_string(),
            });
        };

        let token = rest.split_whitespace().next().unwrap_or_default();
        // Group chats address commands as /name@botname
        let name = token.split('@').next().unwrap_or_default();

        match name {
            "start" | "help" => Some(Event::Start),
            "roastmore" => Some(Event::FollowUp(FollowUp::RoastMore)),
            "pivotme" => Some(Event::FollowUp(FollowUp::PivotMe)),
            "comparps" => Some(Event::FollowUp(FollowUp::Comparps)),
            _ => None,
        }
    }
}
