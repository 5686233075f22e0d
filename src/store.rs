//! In-memory conversation store
//!
//! One [`UserContext`] per user for the lifetime of the process. Nothing is
//! evicted and nothing survives a restart.

use crate::state_machine::{ContextPatch, UserContext};
use crate::transport::UserId;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Thread-safe map of user contexts
#[derive(Debug, Default)]
pub struct ConversationStore {
    contexts: RwLock<HashMap<UserId, UserContext>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current context for `user_id`, or an empty one for unseen users
    pub fn get(&self, user_id: UserId) -> UserContext {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Merge `patch` into the user's context and return the result.
    ///
    /// The read-modify-write happens under one write lock, so patches that
    /// depend on the current idea are checked against the latest value.
    pub fn merge(&self, user_id: UserId, patch: &ContextPatch) -> UserContext {
        let mut contexts = self
            .contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = contexts.entry(user_id).or_default();
        *entry = std::mem::take(entry).apply(patch);
        entry.clone()
    }

    /// Number of users seen so far
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
