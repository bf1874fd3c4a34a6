//! Events and transition triggers.

use std::fmt::Debug;

/// Something that can be dispatched to a machine.
///
/// Transitions are matched on [`Event::id`]; the event value itself, with any
/// payload it carries, is handed to `run` callbacks. Plain integers are events
/// whose id is the value itself.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::Event;
///
/// #[derive(Debug)]
/// enum Input {
///     Coin(u32),
///     Push,
/// }
///
/// impl Event for Input {
///     type Id = u8;
///
///     fn id(&self) -> u8 {
///         match self {
///             Self::Coin(_) => 1,
///             Self::Push => 2,
///         }
///     }
/// }
///
/// assert_eq!(Input::Coin(25).id(), 1);
/// assert_eq!(7i32.id(), 7);
/// ```
pub trait Event: Debug {
    /// Identifier compared against transition triggers.
    type Id: Copy + Eq + Debug;

    fn id(&self) -> Self::Id;
}

macro_rules! integer_events {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Event for $ty {
                type Id = $ty;

                fn id(&self) -> $ty {
                    *self
                }
            }
        )*
    };
}

integer_events!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// What makes a transition fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger<Id> {
    /// Automatic (eventless) transition, attempted on every search.
    Auto,
    /// Fires when an event with this id is dispatched.
    On(Id),
}

impl<Id: Copy + Eq> Trigger<Id> {
    /// Whether a search for `query` considers this trigger a candidate.
    ///
    /// `None` is the automatic search that follows every applied transition;
    /// only [`Trigger::Auto`] answers it. Automatic triggers also answer
    /// searches for concrete events.
    pub fn matches(&self, query: Option<Id>) -> bool {
        match self {
            Self::Auto => true,
            Self::On(id) => query == Some(*id),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}
