//! Structural rules checked once when a graph is built.

use crate::core::{Event, Graph, StateId, StateKind, Transition};
use crate::validation::violations::GraphViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of one rule: success, or every violation it found.
pub type RuleResult = Validation<(), NonEmptyVec<GraphViolation>>;

/// Check every structural rule, accumulating ALL violations.
///
/// `declared` carries violations the builder detected while recording
/// declarations (such as an initial state set on a choice); they are
/// reported together with the structural ones.
///
/// Dangling state references are checked first and short-circuit the rest,
/// since every other rule navigates the tree.
pub fn validate<C, E: Event>(graph: &Graph<C, E>, declared: &[GraphViolation]) -> RuleResult {
    let references = check_references(graph);
    if references.is_failure() {
        return references;
    }

    let mut checks: Vec<RuleResult> = declared
        .iter()
        .cloned()
        .map(Validation::fail)
        .collect();

    checks.push(check_root(graph));

    for id in graph.ids() {
        checks.push(check_state(graph, id));
    }

    for transition in graph.transitions() {
        checks.push(check_transition(graph, transition));
    }

    Validation::all_vec(checks).map(|_| ())
}

fn rule(ok: bool, violation: impl FnOnce() -> GraphViolation) -> RuleResult {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

fn all(checks: Vec<RuleResult>) -> RuleResult {
    if checks.is_empty() {
        return Validation::success(());
    }
    Validation::all_vec(checks).map(|_| ())
}

fn name<C, E: Event>(graph: &Graph<C, E>, id: StateId) -> String {
    graph.name(id).to_string()
}

fn check_references<C, E: Event>(graph: &Graph<C, E>) -> RuleResult {
    let mut checks = Vec::new();

    for id in graph.ids() {
        let node = graph.state(id);
        if let Some(parent) = node.parent() {
            checks.push(rule(graph.contains(parent), || GraphViolation::UnknownState {
                id: parent,
            }));
            checks.push(rule(parent < id, || GraphViolation::ParentDeclaredLater {
                state: name(graph, id),
            }));
        }
        if let Some(initial) = node.initial() {
            checks.push(rule(graph.contains(initial), || GraphViolation::UnknownState {
                id: initial,
            }));
        }
    }

    for transition in graph.transitions() {
        for id in [transition.source, transition.target] {
            checks.push(rule(graph.contains(id), || GraphViolation::UnknownState { id }));
        }
    }

    all(checks)
}

fn check_root<C, E: Event>(graph: &Graph<C, E>) -> RuleResult {
    let roots: Vec<StateId> = graph
        .ids()
        .filter(|&id| graph.kind(id) == StateKind::Root)
        .collect();

    match roots.as_slice() {
        [] => Validation::fail(GraphViolation::MissingRoot),
        [root] => rule(graph.parent(*root).is_none(), || {
            GraphViolation::RootWithParent {
                state: name(graph, *root),
            }
        }),
        _ => Validation::fail(GraphViolation::MultipleRoots {
            roots: roots.iter().map(|&id| name(graph, id)).collect(),
        }),
    }
}

fn check_state<C, E: Event>(graph: &Graph<C, E>, id: StateId) -> RuleResult {
    let node = graph.state(id);
    let kind = node.kind();
    let mut checks = Vec::new();

    if kind != StateKind::Root {
        checks.push(rule(node.parent().is_some(), || {
            GraphViolation::MissingParent {
                state: name(graph, id),
            }
        }));
    }

    match kind {
        StateKind::Root | StateKind::Normal => match node.initial() {
            Some(initial) => {
                checks.push(rule(graph.parent(initial) == Some(id), || {
                    GraphViolation::InitialNotChild {
                        state: name(graph, id),
                        initial: name(graph, initial),
                    }
                }));
                checks.push(rule(!graph.kind(initial).is_history(), || {
                    GraphViolation::InitialIsHistory {
                        state: name(graph, id),
                        initial: name(graph, initial),
                    }
                }));
            }
            None => checks.push(rule(graph.is_leaf(id), || GraphViolation::MissingInitial {
                state: name(graph, id),
            })),
        },
        StateKind::History | StateKind::DeepHistory | StateKind::Choice => {
            for child in graph.children(id) {
                checks.push(Validation::fail(GraphViolation::PseudostateWithChildren {
                    state: name(graph, id),
                    child: name(graph, child),
                }));
            }
            if let (Some(fallback), Some(parent)) = (node.initial(), node.parent()) {
                let inside = fallback != parent && graph.is_ancestor_or_self(parent, fallback);
                checks.push(rule(inside, || GraphViolation::FallbackOutsideParent {
                    state: name(graph, id),
                    fallback: name(graph, fallback),
                }));
                if node.kind().is_history() {
                    checks.push(rule(!graph.kind(fallback).is_history(), || {
                        GraphViolation::InitialIsHistory {
                            state: name(graph, id),
                            initial: name(graph, fallback),
                        }
                    }));
                }
            }
        }
    }

    all(checks)
}

fn check_transition<C, E: Event>(graph: &Graph<C, E>, transition: &Transition<C, E>) -> RuleResult {
    let source = transition.source;
    let target = transition.target;
    let source_kind = graph.kind(source);
    let mut checks = Vec::new();

    checks.push(rule(graph.kind(target) != StateKind::Root, || {
        GraphViolation::RootAsTarget {
            source_state: name(graph, source),
        }
    }));

    checks.push(rule(!source_kind.is_history(), || {
        GraphViolation::TransitionFromHistory {
            state: name(graph, source),
        }
    }));

    if source_kind == StateKind::Choice {
        checks.push(rule(transition.trigger.is_auto(), || {
            GraphViolation::EventOnChoice {
                state: name(graph, source),
            }
        }));
    }

    if transition.is_local() {
        let related = graph.is_ancestor_or_self(source, target)
            || graph.is_ancestor_or_self(target, source);
        checks.push(rule(related, || GraphViolation::LocalUnrelated {
            source_state: name(graph, source),
            target: name(graph, target),
        }));
    }

    all(checks)
}
