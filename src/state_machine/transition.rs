//! Pure state transition function

use super::{ContextPatch, Effect, Event, FollowUp, IdeaState, UserContext};
use crate::prompts::{Prompt, TEARDOWN_FOOTER, WELCOME_MESSAGE};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    /// State the user ends up in once the context updates are merged
    pub new_state: IdeaState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: IdeaState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("/{} needs a submitted idea", .0.command())]
    NoIdeaInContext(FollowUp),
}

/// Pure transition function
///
/// Given the user's current context and an event, decide the next state and
/// the effects that get there. Context changes are expressed as
/// [`Effect::UpdateContext`] patches; `new_state` is what merging them yields.
pub fn transition(
    context: &UserContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let state = &context.state;

    match (state, event) {
        // Stateless usage message
        (_, Event::Start) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::reply_markdown(WELCOME_MESSAGE)))
        }

        // Any state + idea -> IdeaOnly, before the model is asked
        (_, Event::IdeaSubmitted { text }) => {
            let patch = ContextPatch::submit_idea(text.clone());
            Ok(
                TransitionResult::new(IdeaState::IdeaOnly { idea: text.clone() })
                    .with_effect(Effect::UpdateContext(patch))
                    .with_effect(Effect::reply_plain(Prompt::Teardown.acknowledgement()))
                    .with_effect(Effect::RequestLlm {
                        prompt: Prompt::Teardown,
                        idea: text,
                        prior_teardown: None,
                    }),
            )
        }

        // Follow-ups need an idea
        (IdeaState::NoIdea, Event::FollowUp(follow_up)) => {
            Err(TransitionError::NoIdeaInContext(follow_up))
        }

        (
            IdeaState::IdeaOnly { idea } | IdeaState::IdeaWithTeardown { idea, .. },
            Event::FollowUp(follow_up),
        ) => {
            let prompt = follow_up.prompt();
            let prior_teardown = if prompt.uses_prior_teardown() {
                state.teardown().map(str::to_string)
            } else {
                None
            };
            Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::reply_plain(prompt.acknowledgement()))
                .with_effect(Effect::RequestLlm {
                    prompt,
                    idea: idea.clone(),
                    prior_teardown,
                }))
        }

        // Critique ready: attach it if its idea is still current, reply either way
        (
            _,
            Event::LlmResponse {
                prompt: Prompt::Teardown,
                idea,
                text,
            },
        ) => {
            let patch = ContextPatch::attach_teardown(idea, text.clone());
            let new_state = context.clone().apply(&patch).state;
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::UpdateContext(patch))
                .with_effect(Effect::reply_markdown(format!("{text}{TEARDOWN_FOOTER}"))))
        }

        // Follow-up answers never touch the stored context
        (_, Event::LlmResponse { text, .. }) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::reply_markdown(text)))
        }

        // Failure keeps whatever was already stored
        (_, Event::LlmFailed { prompt }) => Ok(TransitionResult::new(state.clone())
            .with_effect(Effect::reply_plain(prompt.failure_reply()))),
    }
}
