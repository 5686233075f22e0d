//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::prompts::Prompt;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,30}"
}

fn arb_state() -> impl Strategy<Value = IdeaState> {
    prop_oneof![
        Just(IdeaState::NoIdea),
        arb_text().prop_map(|idea| IdeaState::IdeaOnly { idea }),
        (arb_text(), arb_text())
            .prop_map(|(idea, teardown)| IdeaState::IdeaWithTeardown { idea, teardown }),
    ]
}

fn arb_context() -> impl Strategy<Value = UserContext> {
    arb_state().prop_map(|state| UserContext { state })
}

fn arb_follow_up() -> impl Strategy<Value = FollowUp> {
    prop_oneof![
        Just(FollowUp::RoastMore),
        Just(FollowUp::PivotMe),
        Just(FollowUp::Comparps),
    ]
}

fn arb_prompt() -> impl Strategy<Value = Prompt> {
    prop_oneof![
        Just(Prompt::Teardown),
        Just(Prompt::Roast),
        Just(Prompt::Pivots),
        Just(Prompt::Comps),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Start),
        arb_text().prop_map(|text| Event::IdeaSubmitted { text }),
        arb_follow_up().prop_map(Event::FollowUp),
        (arb_prompt(), arb_text(), arb_text())
            .prop_map(|(prompt, idea, text)| Event::LlmResponse { prompt, idea, text }),
        arb_prompt().prop_map(|prompt| Event::LlmFailed { prompt }),
    ]
}

fn arb_patch() -> impl Strategy<Value = ContextPatch> {
    prop_oneof![
        Just(ContextPatch::default()),
        Just(ContextPatch::clear_teardown()),
        arb_text().prop_map(|idea| ContextPatch::submit_idea(idea)),
        (arb_text(), arb_text()).prop_map(|(idea, t)| ContextPatch::attach_teardown(idea, t)),
    ]
}

/// Merge every `UpdateContext` effect in order
fn apply_effects(context: &UserContext, effects: &[Effect]) -> UserContext {
    effects.iter().fold(context.clone(), |ctx, effect| match effect {
        Effect::UpdateContext(patch) => ctx.apply(patch),
        _ => ctx,
    })
}

fn requests_llm(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::RequestLlm { .. }))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// `new_state` is exactly what merging the emitted patches produces
    #[test]
    fn new_state_matches_applied_patches(ctx in arb_context(), event in arb_event()) {
        if let Ok(result) = transition(&ctx, event) {
            prop_assert_eq!(apply_effects(&ctx, &result.effects).state, result.new_state);
        }
    }

    /// Follow-ups from `NoIdea` are rejected and never reach the model
    #[test]
    fn follow_up_without_idea_never_calls_model(follow_up in arb_follow_up()) {
        let result = transition(&UserContext::default(), Event::FollowUp(follow_up));
        prop_assert_eq!(result.unwrap_err(), TransitionError::NoIdeaInContext(follow_up));
    }

    /// Submitting an idea lands in `IdeaOnly` before any model call
    #[test]
    fn submission_clears_teardown(ctx in arb_context(), text in arb_text()) {
        let result = transition(&ctx, Event::IdeaSubmitted { text: text.clone() }).unwrap();
        prop_assert_eq!(&result.new_state, &IdeaState::IdeaOnly { idea: text });

        let update_pos = result.effects.iter().position(|e| matches!(e, Effect::UpdateContext(_)));
        let ack_pos = result.effects.iter().position(|e| matches!(e, Effect::Reply { .. }));
        let request_pos = result.effects.iter().position(|e| matches!(e, Effect::RequestLlm { .. }));
        prop_assert!(update_pos < ack_pos);
        prop_assert!(ack_pos < request_pos);
    }

    /// Follow-ups leave the stored idea and teardown untouched
    #[test]
    fn follow_ups_preserve_state(ctx in arb_context(), follow_up in arb_follow_up(), text in arb_text()) {
        if let Ok(result) = transition(&ctx, Event::FollowUp(follow_up)) {
            prop_assert_eq!(&result.new_state, &ctx.state);
            prop_assert!(requests_llm(&result.effects));
        }
        let result = transition(&ctx, Event::LlmResponse {
            prompt: follow_up.prompt(),
            idea: ctx.last_idea().unwrap_or_default().to_string(),
            text,
        }).unwrap();
        prop_assert_eq!(&result.new_state, &ctx.state);
    }

    /// Only idea submissions and follow-ups call the model
    #[test]
    fn llm_results_never_request_again(ctx in arb_context(), prompt in arb_prompt(), text in arb_text()) {
        let ok = transition(&ctx, Event::LlmResponse { prompt, idea: text.clone(), text }).unwrap();
        prop_assert!(!requests_llm(&ok.effects));
        let failed = transition(&ctx, Event::LlmFailed { prompt }).unwrap();
        prop_assert!(!requests_llm(&failed.effects));
        prop_assert_eq!(&failed.new_state, &ctx.state);
    }

    /// A teardown is never stored without the idea it was generated for
    #[test]
    fn teardown_always_belongs_to_current_idea(
        ctx in arb_context(),
        patches in proptest::collection::vec(arb_patch(), 0..8),
    ) {
        let mut ctx = ctx;
        for patch in &patches {
            let before = ctx.last_idea().map(str::to_string);
            ctx = ctx.apply(patch);
            if ctx.last_teardown().is_some() {
                prop_assert!(ctx.last_idea().is_some());
            }
            // A teardown patch alone never changes the idea
            if *patch == ContextPatch::clear_teardown() {
                prop_assert_eq!(ctx.last_idea().map(str::to_string), before);
            }
        }
    }

    /// A critique generated for another idea never lands in the context
    #[test]
    fn mismatched_teardown_is_dropped(ctx in arb_context(), other in arb_text(), teardown in arb_text()) {
        prop_assume!(ctx.last_idea() != Some(other.as_str()));
        let merged = ctx.clone().apply(&ContextPatch::attach_teardown(other, teardown));
        prop_assert_eq!(merged, ctx);
    }
}
