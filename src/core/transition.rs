//! Transitions between states.

use super::event::{Event, Trigger};
use super::guard::Guard;
use super::state::StateId;
use std::fmt;

/// Action run while a transition is taken, after exits and before entries.
pub type Action<C> = Box<dyn Fn(&mut C) + Send + Sync>;

/// How a transition treats the state it shares with its target's branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// The source is exited even when the target lies inside it.
    #[default]
    External,
    /// Source and target are ancestor and descendant (or the same state); the
    /// shallower of the two is neither exited nor re-entered.
    Local,
}

/// An edge of the graph, evaluated on dispatch and never consumed.
pub struct Transition<C, E: Event> {
    pub source: StateId,
    pub target: StateId,
    pub trigger: Trigger<E::Id>,
    pub guard: Option<Guard<C>>,
    pub action: Option<Action<C>>,
    pub kind: TransitionKind,
}

impl<C, E: Event> Transition<C, E> {
    /// Whether a search for `query` considers this transition at all.
    pub fn responds_to(&self, query: Option<E::Id>) -> bool {
        self.trigger.matches(query)
    }

    /// Check the guard, if any, against the context.
    pub fn is_enabled(&self, ctx: &C) -> bool {
        self.guard.as_ref().is_none_or(|g| g.check(ctx))
    }

    pub fn is_local(&self) -> bool {
        self.kind == TransitionKind::Local
    }

    pub(crate) fn act(&self, ctx: &mut C) {
        if let Some(action) = &self.action {
            action(ctx);
        }
    }
}

impl<C, E: Event> fmt::Debug for Transition<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("trigger", &self.trigger)
            .field("guarded", &self.guard.is_some())
            .field("action", &self.action.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}
