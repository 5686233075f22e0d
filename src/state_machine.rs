//! Per-user dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! The runtime feeds [`Event`]s through [`transition`] and executes the
//! returned [`Effect`]s; nothing in here performs I/O.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, FollowUp};
pub use state::{ContextPatch, IdeaState, UserContext};
pub use transition::{transition, TransitionError};
