//! Builder for constructing statechart graphs.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Event, Graph, Hooks, Shape, StateId, StateNode, Transition};
use crate::validation::{validate, GraphViolation};
use stillwater::validation::Validation;

/// Builder that allocates state ids and collects transitions.
///
/// States are declared parent first; each declaration returns the
/// [`StateId`] used to refer to the state afterwards. Initial children are
/// declared separately with [`initial`](Self::initial), once the children
/// exist. Nothing is checked until [`build`](Self::build), which reports every
/// structural defect at once.
///
/// # Example
///
/// ```rust
/// use hsm_engine::builder::{GraphBuilder, TransitionBuilder};
/// use hsm_engine::core::Hooks;
///
/// let mut builder = GraphBuilder::<Vec<&'static str>, i32>::new();
/// let root = builder.root("ROOT");
/// let off = builder.state("Off", root);
/// let on = builder.state_with(
///     "On",
///     root,
///     Hooks::new().on_entry(|log: &mut Vec<&'static str>, _| log.push("lamp lit")),
/// );
/// builder.initial(root, off);
/// builder
///     .transition(TransitionBuilder::new().from(off).to(on).on(1))?
///     .transition(TransitionBuilder::new().from(on).to(off).on(1))?;
///
/// let graph = builder.build()?;
/// assert_eq!(graph.len(), 3);
/// assert_eq!(graph.find("On"), Some(on));
/// # Ok::<(), hsm_engine::builder::BuildError>(())
/// ```
pub struct GraphBuilder<C, E: Event> {
    states: Vec<StateNode<C, E>>,
    transitions: Vec<Transition<C, E>>,
    declared: Vec<GraphViolation>,
}

impl<C, E: Event> GraphBuilder<C, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            declared: Vec::new(),
        }
    }

    fn push(&mut self, name: impl Into<String>, parent: Option<StateId>, shape: Shape<C, E>) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(StateNode::new(name.into(), parent, shape));
        id
    }

    /// Declare the root state without callbacks.
    pub fn root(&mut self, name: impl Into<String>) -> StateId {
        self.root_with(name, Hooks::new())
    }

    /// Declare the root state with callbacks.
    pub fn root_with(&mut self, name: impl Into<String>, hooks: Hooks<C, E>) -> StateId {
        self.push(
            name,
            None,
            Shape::Root {
                initial: None,
                hooks,
            },
        )
    }

    /// Declare a normal state without callbacks.
    pub fn state(&mut self, name: impl Into<String>, parent: StateId) -> StateId {
        self.state_with(name, parent, Hooks::new())
    }

    /// Declare a normal state with callbacks.
    pub fn state_with(
        &mut self,
        name: impl Into<String>,
        parent: StateId,
        hooks: Hooks<C, E>,
    ) -> StateId {
        self.push(
            name,
            Some(parent),
            Shape::Normal {
                initial: None,
                hooks,
            },
        )
    }

    /// Declare a shallow history pseudostate of `parent`.
    pub fn history(&mut self, name: impl Into<String>, parent: StateId) -> StateId {
        self.push(name, Some(parent), Shape::History { fallback: None })
    }

    /// Declare a deep history pseudostate of `parent`.
    pub fn deep_history(&mut self, name: impl Into<String>, parent: StateId) -> StateId {
        self.push(name, Some(parent), Shape::DeepHistory { fallback: None })
    }

    /// Declare a choice pseudostate under `parent`.
    pub fn choice(&mut self, name: impl Into<String>, parent: StateId) -> StateId {
        self.push(name, Some(parent), Shape::Choice)
    }

    /// Declare the initial child of a composite state, or the fallback of a
    /// history pseudostate used while nothing has been recorded.
    ///
    /// Choices have no initial state; declaring one is reported by
    /// [`build`](Self::build).
    pub fn initial(&mut self, state: StateId, initial: StateId) -> &mut Self {
        let Some(node) = self.states.get_mut(state.0) else {
            self.declared.push(GraphViolation::UnknownState { id: state });
            return self;
        };

        match &mut node.shape {
            Shape::Root { initial: slot, .. } | Shape::Normal { initial: slot, .. } => {
                *slot = Some(initial);
            }
            Shape::History { fallback } | Shape::DeepHistory { fallback } => {
                *fallback = Some(initial);
            }
            Shape::Choice => {
                let violation = GraphViolation::InitialOnChoice {
                    state: node.name.clone(),
                };
                self.declared.push(violation);
            }
        }
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder is incomplete.
    pub fn transition(&mut self, builder: TransitionBuilder<C, E>) -> Result<&mut Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(&mut self, transition: Transition<C, E>) -> &mut Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(&mut self, transitions: Vec<Transition<C, E>>) -> &mut Self {
        self.transitions.extend(transitions);
        self
    }

    /// Validate and build the graph.
    /// Returns every violation found if the graph is malformed.
    pub fn build(self) -> Result<Graph<C, E>, BuildError> {
        let graph = Graph::assemble(self.states, self.transitions);

        match validate(&graph, &self.declared) {
            Validation::Success(()) => {
                tracing::debug!(
                    states = graph.len(),
                    transitions = graph.transitions().len(),
                    root = graph.name(graph.root()),
                    "statechart graph built"
                );
                Ok(graph)
            }
            Validation::Failure(violations) => {
                Err(BuildError::InvalidGraph(violations.iter().cloned().collect()))
            }
        }
    }
}

impl<C, E: Event> Default for GraphBuilder<C, E> {
    fn default() -> Self {
        Self::new()
    }
}
