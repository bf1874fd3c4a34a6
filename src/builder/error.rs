//! Build errors for graph and transition builders.

use crate::validation::GraphViolation;
use thiserror::Error;

/// Errors that can occur when building graphs and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition source state not specified. Call .from(state)")]
    MissingSource,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingTarget,

    #[error("Transition trigger not specified. Call .on(event) or .automatic()")]
    MissingTrigger,

    #[error("Graph failed validation with {} violation(s): {}", .0.len(), summary(.0))]
    InvalidGraph(Vec<GraphViolation>),
}

fn summary(violations: &[GraphViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
