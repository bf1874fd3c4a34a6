//! hsm-engine: a table-driven hierarchical state machine engine
//!
//! States form a tree under a single root. Transitions are declared in a
//! table, fire on an event or automatically, and may be guarded. A dispatch
//! runs to completion: after the triggering transition, automatic transitions
//! keep firing until none is enabled.
//!
//! The graph is immutable once built and can be shared by any number of
//! machines; each [`Machine`] keeps only its active configuration and
//! history. Callbacks receive the user context by `&mut` for the duration of
//! a single call.
//!
//! # Core Concepts
//!
//! - **States**: normal and root states carry entry, exit and run callbacks
//! - **Pseudostates**: shallow history, deep history and choice redirect a
//!   transition instead of being settled in
//! - **Transitions**: external (exit and re-enter the source) or local
//! - **Validation**: malformed graphs are rejected at build time with every
//!   violation listed
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::builder::{automatic, on_event, GraphBuilder};
//! use hsm_engine::core::Hooks;
//! use hsm_engine::engine::Machine;
//!
//! #[derive(Default)]
//! struct Door {
//!     locked: bool,
//!     log: Vec<&'static str>,
//! }
//!
//! const PUSH: i32 = 1;
//! const LOCK: i32 = 2;
//!
//! let mut builder = GraphBuilder::<Door, i32>::new();
//! let root = builder.root("ROOT");
//! let closed = builder.state("Closed", root);
//! let open = builder.state_with(
//!     "Open",
//!     root,
//!     Hooks::new().on_entry(|door: &mut Door, _| door.log.push("opened")),
//! );
//! let check = builder.choice("Check", root);
//! builder.initial(root, closed);
//! builder
//!     .transition(on_event(closed, check, PUSH))?
//!     .transition(
//!         on_event(closed, closed, LOCK)
//!             .local()
//!             .action(|door: &mut Door| door.locked = true),
//!     )?
//!     .transition(automatic(check, open).when(|door: &Door| !door.locked))?
//!     .transition(automatic(check, closed))?
//!     .transition(on_event(open, closed, PUSH))?;
//! let graph = builder.build()?;
//!
//! let mut door = Door::default();
//! let mut machine = Machine::new(&graph);
//! machine.initialize(&mut door)?;
//!
//! assert_eq!(machine.dispatch(&mut door, &PUSH)?, open);
//! assert_eq!(machine.dispatch(&mut door, &PUSH)?, closed);
//! assert_eq!(machine.dispatch(&mut door, &LOCK)?, closed);
//! assert_eq!(machine.dispatch(&mut door, &PUSH)?, closed);
//! assert_eq!(door.log, vec!["opened"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, GraphBuilder, TransitionBuilder};
pub use core::{Event, Graph, Guard, Hooks, StateId, StateKind, Transition, TransitionKind, Trigger};
pub use engine::{DispatchError, Machine};
