//! Dispatch errors.

use thiserror::Error;

/// Errors that can occur while driving a machine.
///
/// An event nobody handles is not an error: `dispatch` returns the unchanged
/// leaf, as unhandled events are silently ignored in statecharts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Machine not initialized. Call .initialize(ctx) before .dispatch()")]
    NotInitialized,

    #[error("Dispatch did not settle after {max} transitions (last state '{state}')")]
    MaxStepsExceeded { max: usize, state: String },
}
