//! Dialogue executor: runs one inbound message through the state machine

use super::traits::ContextStore;
use crate::llm::{LlmMessage, LlmRequest, LlmService};
use crate::prompts::{missing_idea_message, Prompt};
use crate::state_machine::{transition, Effect, Event, TransitionError};
use crate::transport::{ChatId, TextFormat, Transport, Update, UserId};
use std::collections::VecDeque;
use std::sync::Arc;

/// Replies and model calls left over once a message's context updates are stored
#[derive(Debug)]
pub struct PendingTurn {
    user_id: UserId,
    chat_id: ChatId,
    effects: Vec<Effect>,
}

/// Generic dialogue that can work with any store, LLM, and transport implementations
pub struct Dialogue<S, L, T>
where
    S: ContextStore,
    L: LlmService,
    T: Transport,
{
    store: S,
    llm: L,
    transport: Arc<T>,
}

impl<S, L, T> Dialogue<S, L, T>
where
    S: ContextStore,
    L: LlmService,
    T: Transport,
{
    pub fn new(store: S, llm: L, transport: Arc<T>) -> Self {
        Self {
            store,
            llm,
            transport,
        }
    }

    /// Handle one inbound message from start to final reply
    #[cfg(test)]
    pub async fn handle(&self, update: Update) {
        if let Some(turn) = self.begin(&update) {
            self.finish(turn).await;
        }
    }

    /// Run the part of a message that must happen in arrival order.
    ///
    /// Parses the text, runs the transition and merges its context updates
    /// into the store. Returns the replies and model calls still to run, or
    /// `None` for inert input.
    pub fn begin(&self, update: &Update) -> Option<PendingTurn> {
        let Some(event) = update.text.as_deref().and_then(Event::from_text) else {
            tracing::debug!(
                update_id = update.update_id,
                user_id = %update.user_id,
                "Ignoring inert message"
            );
            return None;
        };

        Some(PendingTurn {
            user_id: update.user_id,
            chat_id: update.chat_id,
            effects: self.apply_event(update.user_id, event),
        })
    }

    /// Run the replies and model calls of a turn started with [`Self::begin`]
    pub async fn finish(&self, turn: PendingTurn) {
        let PendingTurn {
            user_id,
            chat_id,
            effects,
        } = turn;

        // Model calls yield follow-on events whose effects join the queue
        let mut effects: VecDeque<Effect> = effects.into();
        while let Some(effect) = effects.pop_front() {
            if let Some(generated_event) = self.execute_effect(user_id, chat_id, effect).await {
                effects.extend(self.apply_event(user_id, generated_event));
            }
        }
    }

    /// Transition on the current context and merge context updates right away.
    /// Everything else is returned in order.
    fn apply_event(&self, user_id: UserId, event: Event) -> Vec<Effect> {
        let context = self.store.get(user_id);

        let result = match transition(&context, event) {
            Ok(r) => r,
            Err(TransitionError::NoIdeaInContext(follow_up)) => {
                tracing::info!(
                    user_id = %user_id,
                    command = follow_up.command(),
                    "Follow-up without an idea"
                );
                return vec![Effect::reply_plain(missing_idea_message(follow_up.command()))];
            }
        };

        tracing::debug!(
            user_id = %user_id,
            from = context.state.name(),
            to = result.new_state.name(),
            effects = result.effects.len(),
            "Transition"
        );

        result
            .effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::UpdateContext(patch) => {
                    self.store.merge(user_id, &patch);
                    None
                }
                other => Some(other),
            })
            .collect()
    }

    async fn execute_effect(&self, user_id: UserId, chat_id: ChatId, effect: Effect) -> Option<Event> {
        match effect {
            Effect::UpdateContext(patch) => {
                self.store.merge(user_id, &patch);
                None
            }

            Effect::Reply { text, format } => {
                self.reply(chat_id, &text, format).await;
                None
            }

            Effect::RequestLlm {
                prompt,
                idea,
                prior_teardown,
            } => {
                let request = build_request(prompt, &idea, prior_teardown);

                match self.llm.complete(&request).await {
                    Ok(response) => {
                        if response.truncated() {
                            tracing::warn!(user_id = %user_id, flow = %prompt, "Model output hit the token limit");
                        }
                        Some(Event::LlmResponse {
                            prompt,
                            idea,
                            text: response.text,
                        })
                    }
                    Err(e) => {
                        tracing::error!(
                            user_id = %user_id,
                            flow = %prompt,
                            error = %e,
                            "{prompt} error"
                        );
                        Some(Event::LlmFailed { prompt })
                    }
                }
            }
        }
    }

    /// Delivery failures are logged and otherwise dropped
    async fn reply(&self, chat_id: ChatId, text: &str, format: TextFormat) {
        if let Err(e) = self.transport.send_message(chat_id, text, format).await {
            tracing::warn!(chat_id = %chat_id, error = %e, "Failed to send message");
        }
    }
}

/// System prompt, optional prior critique as assistant turn, then the user turn
fn build_request(prompt: Prompt, idea: &str, prior_teardown: Option<String>) -> LlmRequest {
    let context = prior_teardown
        .into_iter()
        .map(LlmMessage::assistant)
        .collect();
    LlmRequest::new(prompt.system_prompt(), context, prompt.user_message(idea))
}
