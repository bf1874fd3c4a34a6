//! Structural defects a graph can have.

use crate::core::StateId;
use thiserror::Error;

/// A rule broken by a graph under construction.
///
/// States are reported by name when the reference is valid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphViolation {
    #[error("State id {id} does not belong to this graph")]
    UnknownState { id: StateId },

    #[error("State '{state}' has a parent declared after it")]
    ParentDeclaredLater { state: String },

    #[error("No root state declared")]
    MissingRoot,

    #[error("More than one root state declared: {roots:?}")]
    MultipleRoots { roots: Vec<String> },

    #[error("Root state '{state}' has a parent")]
    RootWithParent { state: String },

    #[error("State '{state}' has no parent")]
    MissingParent { state: String },

    #[error("Composite state '{state}' has children but no initial child")]
    MissingInitial { state: String },

    #[error("Initial '{initial}' of state '{state}' is not one of its children")]
    InitialNotChild { state: String, initial: String },

    #[error("Initial '{initial}' of state '{state}' is a history pseudostate")]
    InitialIsHistory { state: String, initial: String },

    #[error("Choice '{state}' cannot declare an initial state")]
    InitialOnChoice { state: String },

    #[error("Pseudostate '{state}' has child '{child}'")]
    PseudostateWithChildren { state: String, child: String },

    #[error("Fallback '{fallback}' of history '{state}' is outside its parent")]
    FallbackOutsideParent { state: String, fallback: String },

    #[error("Transition from '{source_state}' targets the root")]
    RootAsTarget { source_state: String },

    #[error("Choice '{state}' has a transition triggered by an event")]
    EventOnChoice { state: String },

    #[error("History pseudostate '{state}' cannot be a transition source")]
    TransitionFromHistory { state: String },

    #[error("Local transition between unrelated states '{source_state}' and '{target}'")]
    LocalUnrelated { source_state: String, target: String },
}
