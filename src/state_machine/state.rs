//! Conversation state types

/// What the bot knows about one user's pitch
///
/// A teardown can only exist alongside the idea it critiques.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdeaState {
    /// Nothing submitted yet
    #[default]
    NoIdea,
    /// Idea stored; critique pending or failed
    IdeaOnly { idea: String },
    /// Idea stored together with its critique
    IdeaWithTeardown { idea: String, teardown: String },
}

impl IdeaState {
    pub fn idea(&self) -> Option<&str> {
        match self {
            IdeaState::NoIdea => None,
            IdeaState::IdeaOnly { idea } | IdeaState::IdeaWithTeardown { idea, .. } => Some(idea),
        }
    }

    pub fn teardown(&self) -> Option<&str> {
        match self {
            IdeaState::IdeaWithTeardown { teardown, .. } => Some(teardown),
            IdeaState::NoIdea | IdeaState::IdeaOnly { .. } => None,
        }
    }

    /// State name for logging
    pub fn name(&self) -> &'static str {
        match self {
            IdeaState::NoIdea => "no_idea",
            IdeaState::IdeaOnly { .. } => "idea_only",
            IdeaState::IdeaWithTeardown { .. } => "idea_with_teardown",
        }
    }
}

/// Per-user record held by the conversation store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserContext {
    pub state: IdeaState,
}

impl UserContext {
    pub fn last_idea(&self) -> Option<&str> {
        self.state.idea()
    }

    pub fn last_teardown(&self) -> Option<&str> {
        self.state.teardown()
    }

    /// Apply a partial update, leaving untouched fields as they are.
    ///
    /// Setting an idea always drops the previous teardown. A teardown is
    /// attached only when the idea it was generated for is still current.
    #[must_use]
    pub fn apply(self, patch: &ContextPatch) -> Self {
        let mut state = self.state;

        if let Some(idea) = &patch.idea {
            state = IdeaState::IdeaOnly { idea: idea.clone() };
        }

        match &patch.teardown {
            None => {}
            Some(TeardownUpdate::Clear) => {
                if let IdeaState::IdeaWithTeardown { idea, .. } = state {
                    state = IdeaState::IdeaOnly { idea };
                }
            }
            Some(TeardownUpdate::Attach { for_idea, teardown }) => {
                if state.idea() == Some(for_idea.as_str()) {
                    state = IdeaState::IdeaWithTeardown {
                        idea: for_idea.clone(),
                        teardown: teardown.clone(),
                    };
                }
            }
        }

        Self { state }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TeardownUpdate {
    Clear,
    Attach { for_idea: String, teardown: String },
}

/// Partial update merged into a [`UserContext`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextPatch {
    idea: Option<String>,
    teardown: Option<TeardownUpdate>,
}

impl ContextPatch {
    /// New idea submitted: store it and forget any earlier critique
    pub fn submit_idea(idea: impl Into<String>) -> Self {
        Self {
            idea: Some(idea.into()),
            teardown: Some(TeardownUpdate::Clear),
        }
    }

    /// Critique generated for `for_idea`
    pub fn attach_teardown(for_idea: impl Into<String>, teardown: impl Into<String>) -> Self {
        Self {
            idea: None,
            teardown: Some(TeardownUpdate::Attach {
                for_idea: for_idea.into(),
                teardown: teardown.into(),
            }),
        }
    }

    #[cfg(test)]
    pub fn clear_teardown() -> Self {
        Self {
            idea: None,
            teardown: Some(TeardownUpdate::Clear),
        }
    }
}
