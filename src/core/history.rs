//! Pseudostate target resolution.
//!
//! A transition names a nominal target; when that target is a history
//! pseudostate the concrete destination depends on what was recorded in the
//! active-child slots the last time the parent was active. Everything here is
//! a pure lookup over those slots.

use super::event::Event;
use super::graph::Graph;
use super::state::{StateId, StateKind};

/// Follow active-child slots down from `from` until an empty slot.
///
/// Returns `from` itself when nothing is recorded below it.
pub fn recorded_leaf<C, E: Event>(
    graph: &Graph<C, E>,
    active: &[Option<StateId>],
    from: StateId,
) -> StateId {
    let mut leaf = from;
    let mut hops = 0;
    while let Some(child) = active.get(leaf.0).copied().flatten() {
        leaf = child;
        hops += 1;
        // Slots always point one level down, so the chain is bounded by the tree height.
        debug_assert!(hops <= graph.len(), "active-child slots form a cycle");
    }
    leaf
}

/// Map a nominal transition target to the state the walker should enter.
///
/// - normal states and choices resolve to themselves;
/// - shallow history resolves to the parent's recorded child, or the
///   pseudostate's fallback, or the parent's initial child;
/// - deep history resolves to the leaf of the parent's recorded path, or the
///   pseudostate's fallback, or the parent's initial child;
/// - the root resolves to `None`: the transition is a no-op.
///
/// # Example
///
/// ```rust
/// use hsm_engine::builder::GraphBuilder;
/// use hsm_engine::core::resolve_target;
///
/// let mut builder = GraphBuilder::<(), i32>::new();
/// let root = builder.root("ROOT");
/// let a = builder.state("A", root);
/// let a1 = builder.state("A1", a);
/// let a2 = builder.state("A2", a);
/// let a_h = builder.history("A_H", a);
/// builder.initial(root, a).initial(a, a1);
/// let graph = builder.build().unwrap();
///
/// let mut active = vec![None; graph.len()];
/// assert_eq!(resolve_target(&graph, &active, a_h), Some(a1));
///
/// active[a.index()] = Some(a2);
/// assert_eq!(resolve_target(&graph, &active, a_h), Some(a2));
/// assert_eq!(resolve_target(&graph, &active, root), None);
/// ```
pub fn resolve_target<C, E: Event>(
    graph: &Graph<C, E>,
    active: &[Option<StateId>],
    target: StateId,
) -> Option<StateId> {
    let node = graph.state(target);
    match node.kind() {
        StateKind::Root => None,
        StateKind::Normal | StateKind::Choice => Some(target),
        StateKind::History => {
            let parent = node.parent()?;
            let recorded = active.get(parent.0).copied().flatten();
            Some(recorded.unwrap_or_else(|| fallback(graph, target, parent)))
        }
        StateKind::DeepHistory => {
            let parent = node.parent()?;
            let leaf = recorded_leaf(graph, active, parent);
            if leaf == parent {
                Some(fallback(graph, target, parent))
            } else {
                Some(leaf)
            }
        }
    }
}

/// Destination of a history pseudostate that has nothing recorded.
fn fallback<C, E: Event>(graph: &Graph<C, E>, pseudostate: StateId, parent: StateId) -> StateId {
    graph
        .state(pseudostate)
        .initial()
        .or_else(|| graph.state(parent).default_child())
        .unwrap_or(parent)
}
