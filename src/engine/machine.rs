//! Run-to-completion driver.

use crate::core::{recorded_leaf, resolve_target, Event, Graph, StateId};
use crate::engine::error::DispatchError;
use crate::engine::resolver::{find_transition, requested_by_run};
use crate::engine::walker::{Step, Walker};

/// Transitions a single dispatch may take before it is abandoned.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Where a dispatch stands between two iterations.
enum Phase<'g, C> {
    /// Looking for the next transition from the current leaf.
    Searching,
    /// A transition was selected and its target resolved.
    Applying(Step<'g, C>),
    /// Nothing more to do: the dispatch is complete.
    Stable,
}

/// A running instance of a statechart.
///
/// The machine borrows its [`Graph`] and owns only the active-child slots,
/// one per state. Following the slots from the root gives the current
/// configuration; slots of exited states keep pointing at their last active
/// child, which is what history pseudostates restore. Several machines can
/// share one graph.
///
/// The user context is passed to every operation rather than stored, so
/// callbacks cannot reach the machine and dispatch is never re-entered.
///
/// # Example
///
/// ```rust
/// use hsm_engine::builder::{on_event, GraphBuilder};
/// use hsm_engine::engine::Machine;
///
/// let mut builder = GraphBuilder::<u32, i32>::new();
/// let root = builder.root("ROOT");
/// let idle = builder.state("Idle", root);
/// let busy = builder.state("Busy", root);
/// builder.initial(root, idle);
/// builder
///     .transition(on_event(idle, busy, 1).action(|jobs: &mut u32| *jobs += 1))?
///     .transition(on_event(busy, idle, 2))?;
/// let graph = builder.build()?;
///
/// let mut jobs = 0;
/// let mut machine = Machine::new(&graph);
/// assert_eq!(machine.initialize(&mut jobs), Ok(idle));
/// assert_eq!(machine.dispatch(&mut jobs, &1), Ok(busy));
/// assert_eq!(machine.dispatch(&mut jobs, &1), Ok(busy));
/// assert_eq!(jobs, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Machine<'g, C, E: Event> {
    graph: &'g Graph<C, E>,
    active: Vec<Option<StateId>>,
    initialized: bool,
    max_steps: Option<usize>,
}

impl<'g, C, E: Event> Machine<'g, C, E> {
    /// Create an uninitialized machine over `graph`.
    pub fn new(graph: &'g Graph<C, E>) -> Self {
        Self {
            graph,
            active: vec![None; graph.len()],
            initialized: false,
            max_steps: Some(DEFAULT_MAX_STEPS),
        }
    }

    /// Cap the number of transitions one dispatch (or initialize) may take.
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = Some(max);
        self
    }

    /// Let a dispatch run until it settles, however many transitions that
    /// takes. A graph with an automatic cycle will then never return.
    pub fn without_step_limit(mut self) -> Self {
        self.max_steps = None;
        self
    }

    pub fn graph(&self) -> &'g Graph<C, E> {
        self.graph
    }

    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Enter the root, descend through initial children, then take any
    /// automatic transitions enabled in that configuration.
    ///
    /// Returns the settled leaf. An initial chain ending in a choice is
    /// resolved here exactly as it would be during a dispatch. `run`
    /// callbacks are not consulted since there is no event. Calling it again
    /// enters the initial configuration again without exiting the current one.
    ///
    /// # Errors
    ///
    /// [`DispatchError::MaxStepsExceeded`] when automatic transitions keep
    /// firing past the step limit.
    pub fn initialize(&mut self, ctx: &mut C) -> Result<StateId, DispatchError> {
        let leaf = Walker::new(self.graph, &mut self.active).initialize(ctx);
        self.initialized = true;
        tracing::debug!(leaf = self.graph.name(leaf), "machine initialized");
        self.run_to_completion(ctx, leaf, None, None)
    }

    /// Process one event to completion and return the settled leaf.
    ///
    /// The first search answers `event`; after each transition the search is
    /// repeated for automatic transitions only. When a search finds nothing,
    /// the `run` callbacks of the active path get a chance to request a
    /// transition. An event nobody handles leaves the machine untouched.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::NotInitialized`] before [`initialize`](Self::initialize)
    /// - [`DispatchError::MaxStepsExceeded`] when automatic transitions keep
    ///   firing past the step limit; the machine stays in the configuration
    ///   reached so far
    pub fn dispatch(&mut self, ctx: &mut C, event: &E) -> Result<StateId, DispatchError> {
        let leaf = self.active_leaf().ok_or(DispatchError::NotInitialized)?;
        tracing::debug!(event = ?event, leaf = self.graph.name(leaf), "dispatching event");
        self.run_to_completion(ctx, leaf, Some(event.id()), Some(event))
    }

    fn run_to_completion(
        &mut self,
        ctx: &mut C,
        mut leaf: StateId,
        mut query: Option<E::Id>,
        event: Option<&E>,
    ) -> Result<StateId, DispatchError> {
        let mut taken = 0usize;
        let mut phase = Phase::Searching;

        loop {
            phase = match phase {
                Phase::Searching => self.search(ctx, leaf, query, event),
                Phase::Applying(step) => {
                    if let Some(max) = self.max_steps.filter(|&max| taken >= max) {
                        tracing::warn!(
                            max,
                            leaf = self.graph.name(leaf),
                            "dispatch exceeded step limit"
                        );
                        return Err(DispatchError::MaxStepsExceeded {
                            max,
                            state: self.graph.name(leaf).to_string(),
                        });
                    }
                    taken += 1;
                    leaf = Walker::new(self.graph, &mut self.active).apply(ctx, leaf, &step);
                    query = None;
                    Phase::Searching
                }
                Phase::Stable => {
                    tracing::debug!(
                        leaf = self.graph.name(leaf),
                        transitions = taken,
                        "dispatch settled"
                    );
                    return Ok(leaf);
                }
            };
        }
    }

    /// `event` is `None` while settling after initialization: only automatic
    /// transitions apply and `run` callbacks are skipped.
    fn search(
        &self,
        ctx: &mut C,
        leaf: StateId,
        query: Option<E::Id>,
        event: Option<&E>,
    ) -> Phase<'g, C> {
        let graph = self.graph;

        if let Some(transition) = find_transition(graph, leaf, query, ctx) {
            tracing::debug!(
                source = graph.name(transition.source),
                target = graph.name(transition.target),
                kind = ?transition.kind,
                "transition selected"
            );
            return match resolve_target(graph, &self.active, transition.target) {
                Some(target) => Phase::Applying(Step::taking(transition, target)),
                None => Phase::Stable,
            };
        }

        let Some(event) = event else {
            return Phase::Stable;
        };
        match requested_by_run(graph, ctx, leaf, event) {
            Some(requested) => {
                tracing::debug!(
                    leaf = graph.name(leaf),
                    target = graph.name(requested),
                    "run callback requested transition"
                );
                match resolve_target(graph, &self.active, requested) {
                    Some(target) => Phase::Applying(Step::requested(leaf, target)),
                    None => Phase::Stable,
                }
            }
            None => Phase::Stable,
        }
    }

    /// Forget the history recorded below `state`.
    ///
    /// Only the slot of `state` itself is cleared: its next default entry
    /// follows the initial child again. When `state` is currently active the
    /// active leaf becomes `state` until the next transition.
    pub fn reset(&mut self, state: StateId) {
        if let Some(slot) = self.active.get_mut(state.0) {
            *slot = None;
        }
    }

    /// Forget every recorded slot and return to the uninitialized state.
    pub fn reset_all(&mut self) {
        self.active.iter_mut().for_each(|slot| *slot = None);
        self.initialized = false;
    }

    /// The innermost active state, or `None` before initialization.
    pub fn active_leaf(&self) -> Option<StateId> {
        self.initialized
            .then(|| recorded_leaf(self.graph, &self.active, self.graph.root()))
    }

    /// The child recorded in `state`'s slot, active or historical.
    pub fn active_child(&self, state: StateId) -> Option<StateId> {
        self.active.get(state.0).copied().flatten()
    }

    /// The active configuration from the root down to the leaf.
    pub fn active_path(&self) -> Vec<StateId> {
        let mut path: Vec<_> = self
            .active_leaf()
            .map(|leaf| self.graph.ancestors(leaf).collect())
            .unwrap_or_default();
        path.reverse();
        path
    }

    /// Whether `state` is part of the active configuration.
    pub fn is_active(&self, state: StateId) -> bool {
        self.active_leaf()
            .is_some_and(|leaf| self.graph.is_ancestor_or_self(state, leaf))
    }
}

impl<C, E: Event> std::fmt::Debug for Machine<'_, C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("active_path", &self.active_path())
            .field("initialized", &self.initialized)
            .field("max_steps", &self.max_steps)
            .finish()
    }
}
