//! Builder API for statechart construction.
//!
//! This module provides fluent builders for declaring the state tree and the
//! transition table, plus shorthands for the most common transition shapes.

pub mod error;
pub mod graph;
pub mod transition;

pub use error::BuildError;
pub use graph::GraphBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Event, StateId};

/// Start an external transition fired by `event`.
///
/// # Example
///
/// ```
/// use hsm_engine::builder::{on_event, GraphBuilder};
///
/// let mut builder = GraphBuilder::<(), i32>::new();
/// let root = builder.root("ROOT");
/// let red = builder.state("Red", root);
/// let green = builder.state("Green", root);
/// builder.initial(root, red);
/// builder.transition(on_event(red, green, 1))?;
/// # Ok::<(), hsm_engine::builder::BuildError>(())
/// ```
pub fn on_event<C, E: Event>(from: StateId, to: StateId, event: E::Id) -> TransitionBuilder<C, E> {
    TransitionBuilder::new().from(from).to(to).on(event)
}

/// Start an automatic transition, typically one branch of a choice.
///
/// # Example
///
/// ```
/// use hsm_engine::builder::{automatic, GraphBuilder};
///
/// let mut builder = GraphBuilder::<u32, i32>::new();
/// let root = builder.root("ROOT");
/// let start = builder.state("Start", root);
/// let pick = builder.choice("Pick", root);
/// let small = builder.state("Small", root);
/// let large = builder.state("Large", root);
/// builder.initial(root, start);
/// builder
///     .transition(automatic(pick, large).when(|n: &u32| *n > 10))?
///     .transition(automatic(pick, small))?;
/// # Ok::<(), hsm_engine::builder::BuildError>(())
/// ```
pub fn automatic<C, E: Event>(from: StateId, to: StateId) -> TransitionBuilder<C, E> {
    TransitionBuilder::new().from(from).to(to).automatic()
}
