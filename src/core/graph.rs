//! The immutable state graph.
//!
//! A [`Graph`] owns every state and transition of one statechart. It is
//! built once through [`GraphBuilder`](crate::builder::GraphBuilder), shared
//! by reference between machines, and never mutated afterwards: the runtime
//! active configuration lives in each [`Machine`](crate::engine::Machine).

use super::event::Event;
use super::state::{StateId, StateKind, StateNode};
use super::transition::Transition;
use std::fmt;

/// A validated statechart: states in an arena plus their transition tables.
pub struct Graph<C, E: Event> {
    states: Vec<StateNode<C, E>>,
    transitions: Vec<Transition<C, E>>,
    /// Indices into `transitions`, per source state, in declaration order.
    outgoing: Vec<Vec<usize>>,
    root: StateId,
}

impl<C, E: Event> Graph<C, E> {
    /// Assemble a graph from raw parts. Callers must validate the result
    /// before handing it out.
    pub(crate) fn assemble(states: Vec<StateNode<C, E>>, transitions: Vec<Transition<C, E>>) -> Self {
        let mut outgoing = vec![Vec::new(); states.len()];
        for (index, transition) in transitions.iter().enumerate() {
            if let Some(slot) = outgoing.get_mut(transition.source.0) {
                slot.push(index);
            }
        }

        let root = states
            .iter()
            .position(|s| s.kind() == StateKind::Root)
            .map_or(StateId(0), StateId);

        Self {
            states,
            transitions,
            outgoing,
            root,
        }
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    /// Number of states, pseudostates included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub(crate) fn contains(&self, id: StateId) -> bool {
        id.0 < self.states.len()
    }

    /// Access a state node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by the builder of this graph.
    pub fn state(&self, id: StateId) -> &StateNode<C, E> {
        &self.states[id.0]
    }

    /// All state ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(StateId)
    }

    pub fn name(&self, id: StateId) -> &str {
        self.state(id).name()
    }

    pub fn kind(&self, id: StateId) -> StateKind {
        self.state(id).kind()
    }

    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.state(id).parent()
    }

    /// Look a state up by its declared name.
    pub fn find(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name).map(StateId)
    }

    /// Direct children of a state, in declaration order.
    pub fn children(&self, id: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.ids().filter(move |&child| self.parent(child) == Some(id))
    }

    pub fn is_leaf(&self, id: StateId) -> bool {
        self.children(id).next().is_none()
    }

    /// Transitions whose source is `id`, in declaration order.
    pub fn transitions_from(&self, id: StateId) -> impl Iterator<Item = &Transition<C, E>> + '_ {
        self.outgoing
            .get(id.0)
            .into_iter()
            .flatten()
            .map(move |&index| &self.transitions[index])
    }

    /// Every transition in declaration order.
    pub fn transitions(&self) -> &[Transition<C, E>] {
        &self.transitions
    }

    /// The state itself followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: StateId) -> Ancestors<'_, C, E> {
        Ancestors {
            graph: self,
            next: Some(id),
        }
    }

    /// Whether `ancestor` is `descendant` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: StateId, descendant: StateId) -> bool {
        self.ancestors(descendant).any(|s| s == ancestor)
    }

    /// Least common ancestor of two states, either of them included.
    ///
    /// Walks both parent chains pairwise; no depth index is kept. Returns
    /// `None` only for states of disconnected trees.
    pub fn common_ancestor(&self, a: StateId, b: StateId) -> Option<StateId> {
        self.ancestors(a).find(|&candidate| self.is_ancestor_or_self(candidate, b))
    }

    /// The root of the tree `id` belongs to.
    pub fn root_of(&self, id: StateId) -> StateId {
        self.ancestors(id).last().unwrap_or(id)
    }
}

impl<C, E: Event> fmt::Debug for Graph<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("root", &self.root)
            .field("states", &self.states)
            .field("transitions", &self.transitions)
            .finish()
    }
}

/// Iterator over a state and its ancestors, innermost first.
pub struct Ancestors<'g, C, E: Event> {
    graph: &'g Graph<C, E>,
    next: Option<StateId>,
}

impl<C, E: Event> Iterator for Ancestors<'_, C, E> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let current = self.next?;
        self.next = self.graph.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::Trigger;
    use crate::core::state::{Hooks, Shape};
    use crate::core::transition::TransitionKind;

    type TestGraph = Graph<(), i32>;

    fn node(name: &str, parent: Option<usize>, shape: Shape<(), i32>) -> StateNode<(), i32> {
        StateNode::new(name.to_string(), parent.map(StateId), shape)
    }

    fn composite(initial: Option<usize>) -> Shape<(), i32> {
        Shape::Normal {
            initial: initial.map(StateId),
            hooks: Hooks::new(),
        }
    }

    // ROOT(0) -> A(1) -> AA(2) -> AAA(3), AAB(4); ROOT -> B(5)
    fn sample() -> TestGraph {
        let states = vec![
            node(
                "ROOT",
                None,
                Shape::Root {
                    initial: Some(StateId(1)),
                    hooks: Hooks::new(),
                },
            ),
            node("A", Some(0), composite(Some(2))),
            node("AA", Some(1), composite(Some(3))),
            node("AAA", Some(2), composite(None)),
            node("AAB", Some(2), composite(None)),
            node("B", Some(0), composite(None)),
        ];
        let transitions = vec![
            Transition {
                source: StateId(3),
                target: StateId(4),
                trigger: Trigger::On(4),
                guard: None,
                action: None,
                kind: TransitionKind::External,
            },
            Transition {
                source: StateId(2),
                target: StateId(5),
                trigger: Trigger::On(4),
                guard: None,
                action: None,
                kind: TransitionKind::External,
            },
            Transition {
                source: StateId(3),
                target: StateId(5),
                trigger: Trigger::Auto,
                guard: None,
                action: None,
                kind: TransitionKind::External,
            },
        ];
        Graph::assemble(states, transitions)
    }

    #[test]
    fn root_is_located() {
        let graph = sample();

        assert_eq!(graph.root(), StateId(0));
        assert_eq!(graph.root_of(StateId(4)), StateId(0));
        assert_eq!(graph.root_of(StateId(0)), StateId(0));
    }

    #[test]
    fn ancestors_walk_up_to_root() {
        let graph = sample();
        let chain: Vec<_> = graph.ancestors(StateId(4)).collect();

        assert_eq!(chain, vec![StateId(4), StateId(2), StateId(1), StateId(0)]);
    }

    #[test]
    fn common_ancestor_of_siblings_is_parent() {
        let graph = sample();

        assert_eq!(graph.common_ancestor(StateId(3), StateId(4)), Some(StateId(2)));
        assert_eq!(graph.common_ancestor(StateId(3), StateId(5)), Some(StateId(0)));
    }

    #[test]
    fn common_ancestor_includes_endpoints() {
        let graph = sample();

        assert_eq!(graph.common_ancestor(StateId(2), StateId(4)), Some(StateId(2)));
        assert_eq!(graph.common_ancestor(StateId(4), StateId(1)), Some(StateId(1)));
        assert_eq!(graph.common_ancestor(StateId(3), StateId(3)), Some(StateId(3)));
    }

    #[test]
    fn transitions_grouped_by_source_in_order() {
        let graph = sample();
        let from_aaa: Vec<_> = graph.transitions_from(StateId(3)).map(|t| t.target).collect();

        assert_eq!(from_aaa, vec![StateId(4), StateId(5)]);
        assert_eq!(graph.transitions_from(StateId(5)).count(), 0);
        assert_eq!(graph.transitions().len(), 3);
    }

    #[test]
    fn lookup_by_name_and_children() {
        let graph = sample();

        assert_eq!(graph.find("AAB"), Some(StateId(4)));
        assert_eq!(graph.find("nope"), None);
        assert_eq!(graph.name(StateId(1)), "A");

        let children: Vec<_> = graph.children(StateId(2)).collect();
        assert_eq!(children, vec![StateId(3), StateId(4)]);
        assert!(graph.is_leaf(StateId(5)));
        assert!(!graph.is_leaf(StateId(1)));
    }
}
