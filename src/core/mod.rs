//! Core statechart types and pure logic.
//!
//! This module contains the data model of a statechart and the lookups that
//! never mutate anything:
//! - States, pseudostates and their callbacks
//! - Events, triggers, guards and transitions
//! - The immutable graph arena with ancestry queries
//! - History and deep-history target resolution
//!
//! Mutation of the active configuration is confined to [`crate::engine`].

mod event;
mod graph;
mod guard;
mod history;
mod state;
mod transition;

pub use event::{Event, Trigger};
pub use graph::{Ancestors, Graph};
pub use guard::Guard;
pub use history::{recorded_leaf, resolve_target};
pub(crate) use state::Shape;
pub use state::{EntryFn, ExitFn, Hooks, RunFn, StateId, StateKind, StateNode};
pub use transition::{Action, Transition, TransitionKind};
