//! Guard predicates for controlling transitions.
//!
//! Guards are boolean functions over the user context that decide whether a
//! transition may fire. They are expected to be free of side effects.

use std::fmt;

/// Predicate that determines if a transition can fire.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::Guard;
///
/// struct Door {
///     locked: bool,
/// }
///
/// let can_open = Guard::new(|door: &Door| !door.locked);
///
/// assert!(can_open.check(&Door { locked: false }));
/// assert!(!can_open.check(&Door { locked: true }));
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate over the context.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against the context.
    pub fn check(&self, ctx: &C) -> bool {
        (self.predicate)(ctx)
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
