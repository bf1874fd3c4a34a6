//! State nodes of a statechart graph.
//!
//! States live in an arena owned by [`Graph`](crate::core::Graph) and are
//! addressed by [`StateId`] handles. Only normal and root states can carry
//! behavior: pseudostates (history, deep history, choice) have no [`Hooks`]
//! field at all, so a misplaced callback cannot even be expressed.

use std::fmt;

/// Stable handle of a state inside its graph.
///
/// Handles are allocated by [`GraphBuilder`](crate::builder::GraphBuilder) in
/// declaration order and stay valid for the lifetime of the built graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Position of the state in the graph's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The role a state plays in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Regular state, either a leaf or a composite with an initial child.
    Normal,
    /// Shallow history pseudostate: restores one level of its parent.
    History,
    /// Deep history pseudostate: restores the full recorded path of its parent.
    DeepHistory,
    /// Choice pseudostate: picks an outgoing automatic transition by guard.
    Choice,
    /// The single top-level state of the graph.
    Root,
}

impl StateKind {
    /// Whether this kind is a pseudostate (never part of a settled configuration
    /// except a choice with no enabled branch).
    pub fn is_pseudostate(self) -> bool {
        matches!(self, Self::History | Self::DeepHistory | Self::Choice)
    }

    /// Whether this kind redirects to recorded history.
    pub fn is_history(self) -> bool {
        matches!(self, Self::History | Self::DeepHistory)
    }
}

/// Callback invoked when a state is entered or exited.
pub type EntryFn<C> = Box<dyn Fn(&mut C, StateId) + Send + Sync>;

/// Callback invoked when a state is exited.
pub type ExitFn<C> = EntryFn<C>;

/// Callback consulted while the dispatch is otherwise settled. Returning a
/// state requests a transition to it.
pub type RunFn<C, E> = Box<dyn Fn(&mut C, StateId, &E) -> Option<StateId> + Send + Sync>;

/// Behavior attached to a normal or root state.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::Hooks;
///
/// let hooks: Hooks<Vec<String>, i32> = Hooks::new()
///     .on_entry(|log: &mut Vec<String>, _| log.push("enter".to_string()))
///     .on_exit(|log: &mut Vec<String>, _| log.push("exit".to_string()));
///
/// assert!(hooks.has_entry());
/// assert!(!hooks.has_run());
/// ```
pub struct Hooks<C, E> {
    entry: Option<EntryFn<C>>,
    exit: Option<ExitFn<C>>,
    run: Option<RunFn<C, E>>,
}

impl<C, E> Hooks<C, E> {
    /// Hooks with no callbacks.
    pub fn new() -> Self {
        Self {
            entry: None,
            exit: None,
            run: None,
        }
    }

    /// Set the entry callback.
    pub fn on_entry<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut C, StateId) + Send + Sync + 'static,
    {
        self.entry = Some(Box::new(f));
        self
    }

    /// Set the exit callback.
    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut C, StateId) + Send + Sync + 'static,
    {
        self.exit = Some(Box::new(f));
        self
    }

    /// Set the run callback.
    pub fn on_run<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut C, StateId, &E) -> Option<StateId> + Send + Sync + 'static,
    {
        self.run = Some(Box::new(f));
        self
    }

    pub fn has_entry(&self) -> bool {
        self.entry.is_some()
    }

    pub fn has_exit(&self) -> bool {
        self.exit.is_some()
    }

    pub fn has_run(&self) -> bool {
        self.run.is_some()
    }

    pub(crate) fn entry(&self, ctx: &mut C, state: StateId) {
        if let Some(entry) = &self.entry {
            entry(ctx, state);
        }
    }

    pub(crate) fn exit(&self, ctx: &mut C, state: StateId) {
        if let Some(exit) = &self.exit {
            exit(ctx, state);
        }
    }

    pub(crate) fn run(&self, ctx: &mut C, state: StateId, event: &E) -> Option<StateId> {
        self.run.as_ref().and_then(|run| run(ctx, state, event))
    }
}

impl<C, E> Default for Hooks<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> fmt::Debug for Hooks<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("entry", &self.has_entry())
            .field("exit", &self.has_exit())
            .field("run", &self.has_run())
            .finish()
    }
}

/// Per-kind payload of a state.
pub(crate) enum Shape<C, E> {
    Root {
        initial: Option<StateId>,
        hooks: Hooks<C, E>,
    },
    Normal {
        initial: Option<StateId>,
        hooks: Hooks<C, E>,
    },
    History {
        fallback: Option<StateId>,
    },
    DeepHistory {
        fallback: Option<StateId>,
    },
    Choice,
}

/// A state of the graph: name, parent link and kind-specific data.
pub struct StateNode<C, E> {
    pub(crate) name: String,
    pub(crate) parent: Option<StateId>,
    pub(crate) shape: Shape<C, E>,
}

impl<C, E> StateNode<C, E> {
    pub(crate) fn new(name: String, parent: Option<StateId>, shape: Shape<C, E>) -> Self {
        Self {
            name,
            parent,
            shape,
        }
    }

    /// The name given at declaration time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent state, absent only for the root.
    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    pub fn kind(&self) -> StateKind {
        match self.shape {
            Shape::Root { .. } => StateKind::Root,
            Shape::Normal { .. } => StateKind::Normal,
            Shape::History { .. } => StateKind::History,
            Shape::DeepHistory { .. } => StateKind::DeepHistory,
            Shape::Choice => StateKind::Choice,
        }
    }

    /// Declared initial child of a composite state, or the fallback of a
    /// history pseudostate. Always `None` for choices.
    pub fn initial(&self) -> Option<StateId> {
        match self.shape {
            Shape::Root { initial, .. } | Shape::Normal { initial, .. } => initial,
            Shape::History { fallback } | Shape::DeepHistory { fallback } => fallback,
            Shape::Choice => None,
        }
    }

    /// Callbacks of the state. Pseudostates have none.
    pub fn hooks(&self) -> Option<&Hooks<C, E>> {
        match &self.shape {
            Shape::Root { hooks, .. } | Shape::Normal { hooks, .. } => Some(hooks),
            _ => None,
        }
    }

    /// Initial child used when the state is entered by default.
    ///
    /// Unlike [`initial`](Self::initial), history fallbacks are not
    /// included: they only apply when the pseudostate is a transition target.
    pub(crate) fn default_child(&self) -> Option<StateId> {
        match self.shape {
            Shape::Root { initial, .. } | Shape::Normal { initial, .. } => initial,
            _ => None,
        }
    }

    pub(crate) fn enter(&self, ctx: &mut C, id: StateId) {
        if let Some(hooks) = self.hooks() {
            hooks.entry(ctx, id);
        }
    }

    pub(crate) fn leave(&self, ctx: &mut C, id: StateId) {
        if let Some(hooks) = self.hooks() {
            hooks.exit(ctx, id);
        }
    }

    pub(crate) fn run(&self, ctx: &mut C, id: StateId, event: &E) -> Option<StateId> {
        self.hooks().and_then(|hooks| hooks.run(ctx, id, event))
    }
}

impl<C, E> fmt::Debug for StateNode<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("kind", &self.kind())
            .field("initial", &self.initial())
            .finish()
    }
}
