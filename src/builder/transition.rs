//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, Event, Guard, StateId, Transition, TransitionKind, Trigger};

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use hsm_engine::builder::{GraphBuilder, TransitionBuilder};
///
/// struct Ctx {
///     armed: bool,
///     fired: u32,
/// }
///
/// let mut builder = GraphBuilder::<Ctx, i32>::new();
/// let root = builder.root("ROOT");
/// let idle = builder.state("Idle", root);
/// let firing = builder.state("Firing", root);
///
/// let transition = TransitionBuilder::<Ctx, i32>::new()
///     .from(idle)
///     .to(firing)
///     .on(1)
///     .when(|ctx: &Ctx| ctx.armed)
///     .action(|ctx: &mut Ctx| ctx.fired += 1)
///     .build()
///     .unwrap();
///
/// assert!(transition.is_enabled(&Ctx { armed: true, fired: 0 }));
/// assert!(!transition.is_enabled(&Ctx { armed: false, fired: 0 }));
/// ```
pub struct TransitionBuilder<C, E: Event> {
    source: Option<StateId>,
    target: Option<StateId>,
    trigger: Option<Trigger<E::Id>>,
    guard: Option<Guard<C>>,
    action: Option<Action<C>>,
    kind: TransitionKind,
}

impl<C, E: Event> TransitionBuilder<C, E> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            source: None,
            target: None,
            trigger: None,
            guard: None,
            action: None,
            kind: TransitionKind::External,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: StateId) -> Self {
        self.source = Some(state);
        self
    }

    /// Set the nominal target state (required). May be a pseudostate.
    pub fn to(mut self, state: StateId) -> Self {
        self.target = Some(state);
        self
    }

    /// Fire on the given event id.
    pub fn on(mut self, event: E::Id) -> Self {
        self.trigger = Some(Trigger::On(event));
        self
    }

    /// Fire without an event, whenever the source is active and the guard
    /// holds.
    pub fn automatic(mut self) -> Self {
        self.trigger = Some(Trigger::Auto);
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Set the action run between exits and entries (optional).
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Make this a local transition.
    pub fn local(self) -> Self {
        self.kind(TransitionKind::Local)
    }

    pub fn kind(mut self, kind: TransitionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<C, E>, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let target = self.target.ok_or(BuildError::MissingTarget)?;
        let trigger = self.trigger.ok_or(BuildError::MissingTrigger)?;

        Ok(Transition {
            source,
            target,
            trigger,
            guard: self.guard,
            action: self.action,
            kind: self.kind,
        })
    }
}

impl<C, E: Event> Default for TransitionBuilder<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (StateId, StateId) {
        (StateId(1), StateId(2))
    }

    #[test]
    fn builder_validates_required_fields() {
        let (a, _) = ids();
        let result = TransitionBuilder::<(), i32>::new().from(a).build();

        assert!(matches!(result, Err(BuildError::MissingTarget)));
    }

    #[test]
    fn builder_requires_source() {
        let (_, b) = ids();
        let result = TransitionBuilder::<(), i32>::new().to(b).on(1).build();

        assert!(matches!(result, Err(BuildError::MissingSource)));
    }

    #[test]
    fn builder_requires_trigger() {
        let (a, b) = ids();
        let result = TransitionBuilder::<(), i32>::new().from(a).to(b).build();

        assert!(matches!(result, Err(BuildError::MissingTrigger)));
    }

    #[test]
    fn fluent_api_builds_transition() {
        let (a, b) = ids();
        let transition = TransitionBuilder::<(), i32>::new()
            .from(a)
            .to(b)
            .on(4)
            .build()
            .unwrap();

        assert_eq!(transition.source, a);
        assert_eq!(transition.target, b);
        assert_eq!(transition.trigger, Trigger::On(4));
        assert_eq!(transition.kind, TransitionKind::External);
        assert!(transition.guard.is_none());
        assert!(transition.action.is_none());
    }

    #[test]
    fn transition_builder_with_guard_and_action() {
        let (a, b) = ids();
        let transition = TransitionBuilder::<u32, i32>::new()
            .from(a)
            .to(b)
            .automatic()
            .when(|n: &u32| *n > 1)
            .action(|n: &mut u32| *n += 10)
            .local()
            .build()
            .unwrap();

        assert!(transition.trigger.is_auto());
        assert!(transition.is_local());
        assert!(transition.is_enabled(&2));
        assert!(!transition.is_enabled(&1));

        let mut n = 0;
        transition.act(&mut n);
        assert_eq!(n, 10);
    }
}
