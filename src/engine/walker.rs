//! Exit and entry sequences between two configurations.
//!
//! The walker owns no state of its own: it borrows the graph and the
//! machine's active-child slots for the duration of one transition. Exits
//! leave the slots untouched so that history survives; entries overwrite the
//! slots along the entered branch.

use crate::core::{Action, Event, Graph, StateId, StateKind, Transition, TransitionKind};

/// A transition ready to be walked: its nominal target already resolved.
pub(crate) struct Step<'g, C> {
    pub source: StateId,
    pub target: StateId,
    pub kind: TransitionKind,
    pub action: Option<&'g Action<C>>,
}

impl<'g, C> Step<'g, C> {
    pub fn taking<E: Event>(transition: &'g Transition<C, E>, target: StateId) -> Self {
        Self {
            source: transition.source,
            target,
            kind: transition.kind,
            action: transition.action.as_ref(),
        }
    }

    /// External move requested by a `run` callback of the active path.
    pub fn requested(leaf: StateId, target: StateId) -> Self {
        Self {
            source: leaf,
            target,
            kind: TransitionKind::External,
            action: None,
        }
    }

    fn act(&self, ctx: &mut C) {
        if let Some(action) = self.action {
            action(ctx);
        }
    }
}

pub(crate) struct Walker<'a, 'g, C, E: Event> {
    graph: &'g Graph<C, E>,
    active: &'a mut [Option<StateId>],
}

impl<'a, 'g, C, E: Event> Walker<'a, 'g, C, E> {
    pub fn new(graph: &'g Graph<C, E>, active: &'a mut [Option<StateId>]) -> Self {
        Self { graph, active }
    }

    /// Enter the root, then follow initial children down.
    pub fn initialize(&mut self, ctx: &mut C) -> StateId {
        let root = self.graph.root();
        self.enter(ctx, root);
        self.settle(ctx, root)
    }

    /// Take `step` from the active `leaf` and return the new leaf.
    ///
    /// Order: exits leaf-first up to the boundary, the action, entries from
    /// below the boundary down to the target, then initial descent.
    pub fn apply(&mut self, ctx: &mut C, leaf: StateId, step: &Step<'g, C>) -> StateId {
        let Some(boundary) = self.boundary(step) else {
            step.act(ctx);
            return leaf;
        };

        for state in self.graph.ancestors(leaf).take_while(|&s| s != boundary) {
            self.leave(ctx, state);
        }
        step.act(ctx);
        self.link(step.target, boundary);
        self.enter_below(ctx, boundary, step.target);
        self.settle(ctx, step.target)
    }

    /// The deepest state that stays active through the step, or `None` for a
    /// local self-transition that only runs its action.
    fn boundary(&self, step: &Step<'g, C>) -> Option<StateId> {
        let graph = self.graph;
        let (source, target) = (step.source, step.target);

        if step.kind == TransitionKind::Local {
            if source == target {
                return None;
            }
            if graph.is_ancestor_or_self(source, target) {
                return Some(source);
            }
            if graph.is_ancestor_or_self(target, source) {
                return Some(target);
            }
            tracing::warn!(
                source = graph.name(source),
                target = graph.name(target),
                "local transition between unrelated states taken as external"
            );
        }

        let common = graph
            .common_ancestor(source, target)
            .unwrap_or_else(|| graph.root());
        if common == source || common == target {
            Some(graph.parent(common).unwrap_or(common))
        } else {
            Some(common)
        }
    }

    /// Point every slot between `boundary` and `target` at the branch leading
    /// to `target`.
    fn link(&mut self, target: StateId, boundary: StateId) {
        let mut state = target;
        while state != boundary {
            let Some(parent) = self.graph.parent(state) else {
                break;
            };
            self.active[parent.0] = Some(state);
            state = parent;
        }
    }

    /// Enter each state strictly below `boundary` down to `target`, outermost
    /// first, along the slots set by [`link`](Self::link).
    fn enter_below(&mut self, ctx: &mut C, boundary: StateId, target: StateId) {
        let mut state = boundary;
        while state != target {
            let Some(child) = self.active[state.0] else {
                break;
            };
            self.enter(ctx, child);
            state = child;
        }
    }

    /// Descend through initial children from `state` until a leaf or a choice.
    fn settle(&mut self, ctx: &mut C, state: StateId) -> StateId {
        let mut current = state;
        loop {
            let node = self.graph.state(current);
            if node.kind() == StateKind::Choice {
                return current;
            }
            let Some(child) = node.default_child() else {
                return current;
            };
            self.active[current.0] = Some(child);
            self.enter(ctx, child);
            current = child;
        }
    }

    fn enter(&self, ctx: &mut C, state: StateId) {
        tracing::trace!(state = self.graph.name(state), "entry");
        self.graph.state(state).enter(ctx, state);
    }

    fn leave(&self, ctx: &mut C, state: StateId) {
        tracing::trace!(state = self.graph.name(state), "exit");
        self.graph.state(state).leave(ctx, state);
    }
}
