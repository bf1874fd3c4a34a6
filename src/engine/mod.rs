//! Runtime: driving a machine over a built graph.
//!
//! This module is the only place the active configuration changes.
//!
//! # Key Concepts
//!
//! - **Resolver**: finds the transition answering an event, innermost state
//!   first, skipping entries whose guard fails
//! - **Walker**: runs exits, the action and entries between the old and new
//!   configuration, then descends through initial children
//! - **Machine**: repeats search and walk until no automatic transition is
//!   enabled (run to completion)
//!
//! Each dispatch is synchronous: every callback has returned by the time
//! [`Machine::dispatch`] does.

mod error;
mod machine;
mod resolver;
mod walker;

pub use error::DispatchError;
pub use machine::{Machine, DEFAULT_MAX_STEPS};
pub use resolver::{find_transition, requested_by_run};
