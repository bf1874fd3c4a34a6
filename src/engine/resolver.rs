//! Locating the transition that answers an event.

use crate::core::{Event, Graph, StateId, Transition};

/// Find the transition answering `query` from the active `leaf`.
///
/// Ancestors are searched from the leaf outward, each one's transitions in
/// declaration order. Entries triggered by `query` or automatic entries are
/// candidates; a candidate whose guard fails is skipped and the search goes
/// on, first along the same table and then outward. `None` as `query` is the
/// automatic search, which only automatic entries answer.
pub fn find_transition<'g, C, E: Event>(
    graph: &'g Graph<C, E>,
    leaf: StateId,
    query: Option<E::Id>,
    ctx: &C,
) -> Option<&'g Transition<C, E>> {
    for state in graph.ancestors(leaf) {
        for transition in graph.transitions_from(state) {
            if !transition.responds_to(query) {
                continue;
            }
            if transition.is_enabled(ctx) {
                return Some(transition);
            }
            tracing::trace!(
                source = graph.name(state),
                target = graph.name(transition.target),
                "guard rejected transition"
            );
        }
    }
    None
}

/// Ask the `run` callbacks of the active path, leaf first, whether one of them
/// wants to move the machine.
///
/// The first callback returning a state other than the current leaf wins.
pub fn requested_by_run<C, E: Event>(
    graph: &Graph<C, E>,
    ctx: &mut C,
    leaf: StateId,
    event: &E,
) -> Option<StateId> {
    graph.ancestors(leaf).find_map(|state| {
        graph
            .state(state)
            .run(ctx, state, event)
            .filter(|&requested| requested != leaf)
    })
}
