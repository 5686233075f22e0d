//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the dialogue with mock implementations.
//! The LLM and transport seams are [`crate::llm::LlmService`] and
//! [`crate::transport::Transport`].

use crate::state_machine::{ContextPatch, UserContext};
use crate::store::ConversationStore;
use crate::transport::UserId;
use std::sync::Arc;

/// Storage for per-user conversation context
pub trait ContextStore: Send + Sync {
    /// Current context, or the empty default for unseen users
    fn get(&self, user_id: UserId) -> UserContext;

    /// Merge a partial update and return the resulting context
    fn merge(&self, user_id: UserId, patch: &ContextPatch) -> UserContext;
}

impl ContextStore for ConversationStore {
    fn get(&self, user_id: UserId) -> UserContext {
        ConversationStore::get(self, user_id)
    }

    fn merge(&self, user_id: UserId, patch: &ContextPatch) -> UserContext {
        ConversationStore::merge(self, user_id, patch)
    }
}

impl<T: ContextStore + ?Sized> ContextStore for Arc<T> {
    fn get(&self, user_id: UserId) -> UserContext {
        (**self).get(user_id)
    }

    fn merge(&self, user_id: UserId, patch: &ContextPatch) -> UserContext {
        (**self).merge(user_id, patch)
    }
}
