//! End-to-end callback ordering over a three-level statechart.
//!
//! ```text
//! ROOT
//! ├── A            (initial AA)
//! │   ├── AA       (initial AAA)
//! │   │   ├── AAA
//! │   │   └── AAB
//! │   ├── AB
//! │   ├── AC
//! │   ├── A_H      shallow history, fallback AB
//! │   ├── A_DH     deep history, fallback AC
//! │   └── A_CHOICE
//! ├── B            (initial BA)
//! │   ├── BA
//! │   ├── BB
//! │   ├── BC
//! │   └── B_H      shallow history, fallback BC
//! └── C
//! ```

use hsm_engine::builder::{automatic, on_event, GraphBuilder, TransitionBuilder};
use hsm_engine::core::{Graph, Hooks, StateId};
use hsm_engine::engine::Machine;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

const EV1: i32 = 1;
const EV2: i32 = 2;
const EV3: i32 = 3;
const EV4: i32 = 4;
const EV5: i32 = 5;
const EV6: i32 = 6;
const EV7: i32 = 7;
const EV8: i32 = 8;
const EV9: i32 = 9;
const EV10: i32 = 10;
const EV11: i32 = 11;
const EV12: i32 = 12;
const UNKNOWN: i32 = 99;

struct Recorder {
    log: Vec<String>,
    guard_open: bool,
    guard_panics: bool,
    choice_a: bool,
    choice_b: bool,
    choice_a_calls: Cell<usize>,
    choice_b_calls: Cell<usize>,
    redirect: Option<(&'static str, StateId)>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            log: Vec::new(),
            guard_open: true,
            guard_panics: false,
            choice_a: false,
            choice_b: false,
            choice_a_calls: Cell::new(0),
            choice_b_calls: Cell::new(0),
            redirect: None,
        }
    }

    fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }
}

fn recorded(name: &'static str) -> Hooks<Recorder, i32> {
    Hooks::new()
        .on_entry(move |ctx: &mut Recorder, _| ctx.log.push(format!("entry {name}")))
        .on_exit(move |ctx: &mut Recorder, _| ctx.log.push(format!("exit {name}")))
        .on_run(move |ctx: &mut Recorder, _, event: &i32| {
            ctx.log.push(format!("run {name} {event}"));
            ctx.redirect
                .filter(|(from, _)| *from == name)
                .map(|(_, to)| to)
        })
}

fn logged(builder: TransitionBuilder<Recorder, i32>) -> TransitionBuilder<Recorder, i32> {
    builder.action(|ctx: &mut Recorder| ctx.log.push("action".to_string()))
}

fn tran(from: StateId, to: StateId, event: i32) -> TransitionBuilder<Recorder, i32> {
    logged(on_event(from, to, event).when(|ctx: &Recorder| {
        assert!(!ctx.guard_panics, "guard failed");
        ctx.guard_open
    }))
}

fn chart() -> Graph<Recorder, i32> {
    let mut g = GraphBuilder::<Recorder, i32>::new();
    let root = g.root_with("ROOT", recorded("ROOT"));
    let a = g.state_with("A", root, recorded("A"));
    let b = g.state_with("B", root, recorded("B"));
    let c = g.state_with("C", root, recorded("C"));
    let aa = g.state_with("AA", a, recorded("AA"));
    let ab = g.state_with("AB", a, recorded("AB"));
    let ac = g.state_with("AC", a, recorded("AC"));
    let ba = g.state_with("BA", b, recorded("BA"));
    let bb = g.state_with("BB", b, recorded("BB"));
    let bc = g.state_with("BC", b, recorded("BC"));
    let aaa = g.state_with("AAA", aa, recorded("AAA"));
    let aab = g.state_with("AAB", aa, recorded("AAB"));
    let a_h = g.history("A_H", a);
    let a_dh = g.deep_history("A_DH", a);
    let a_choice = g.choice("A_CHOICE", a);
    let b_h = g.history("B_H", b);

    g.initial(root, a)
        .initial(a, aa)
        .initial(b, ba)
        .initial(aa, aaa)
        .initial(a_h, ab)
        .initial(b_h, bc)
        .initial(a_dh, ac);

    let choose_a = |ctx: &Recorder| {
        ctx.choice_a_calls.set(ctx.choice_a_calls.get() + 1);
        ctx.choice_a
    };
    let choose_b = |ctx: &Recorder| {
        ctx.choice_b_calls.set(ctx.choice_b_calls.get() + 1);
        ctx.choice_b
    };

    let table = [
        tran(a, b, EV1),
        tran(b, a, EV1),
        tran(a, bb, EV2),
        tran(aa, ab, EV3),
        tran(ab, b, EV3),
        tran(b, a_h, EV3),
        tran(aaa, aab, EV4),
        tran(aa, b, EV4),
        tran(b, a_h, EV4),
        tran(b, a_dh, EV5),
        tran(aa, a_choice, EV6),
        logged(automatic(a_choice, b).when(choose_a)),
        logged(automatic(a_choice, c).when(choose_b)),
        tran(a, b_h, EV7),
        tran(aaa, aaa, EV8),
        tran(aa, aab, EV9),
        tran(aa, aab, EV10).local(),
        tran(aab, aa, EV12).local(),
        tran(aaa, aaa, EV11).local(),
    ];
    for transition in table {
        g.transition(transition).expect("complete transition");
    }

    g.build().expect("valid chart")
}

fn id(graph: &Graph<Recorder, i32>, name: &str) -> StateId {
    graph.find(name).expect("declared state")
}

fn names(graph: &Graph<Recorder, i32>, path: &[StateId]) -> Vec<String> {
    path.iter().map(|&s| graph.name(s).to_string()).collect()
}

/// Initialize and forget the initial entries.
fn started(graph: &Graph<Recorder, i32>) -> (Machine<'_, Recorder, i32>, Recorder) {
    let mut ctx = Recorder::new();
    let mut machine = Machine::new(graph);
    machine.initialize(&mut ctx).expect("initial configuration");
    ctx.log.clear();
    (machine, ctx)
}

#[test]
fn initialize_enters_initial_chain_twice() {
    let graph = chart();
    let mut ctx = Recorder::new();
    let mut machine = Machine::new(&graph);

    assert_eq!(machine.initialize(&mut ctx), Ok(id(&graph, "AAA")));
    assert_eq!(ctx.take(), ["entry ROOT", "entry A", "entry AA", "entry AAA"]);

    assert_eq!(machine.initialize(&mut ctx), Ok(id(&graph, "AAA")));
    assert_eq!(ctx.take(), ["entry ROOT", "entry A", "entry AA", "entry AAA"]);
}

#[test]
fn a_to_b_exits_to_root_and_enters_initial_child() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(machine.dispatch(&mut ctx, &EV1), Ok(id(&graph, "BA")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "exit AA", "exit A", "action", "entry B", "entry BA", "run BA 1",
            "run B 1", "run ROOT 1",
        ]
    );
}

#[test]
fn b_to_a_reenters_initial_chain() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    machine.dispatch(&mut ctx, &EV1).unwrap();
    ctx.log.clear();

    assert_eq!(machine.dispatch(&mut ctx, &EV1), Ok(id(&graph, "AAA")));
    assert_eq!(
        ctx.take(),
        [
            "exit BA", "exit B", "action", "entry A", "entry AA", "entry AAA", "run AAA 1",
            "run AA 1", "run A 1", "run ROOT 1",
        ]
    );
}

#[test]
fn a_to_bb_enters_nested_target_directly() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    machine.dispatch(&mut ctx, &EV1).unwrap();
    machine.dispatch(&mut ctx, &EV1).unwrap();
    ctx.log.clear();

    assert_eq!(machine.dispatch(&mut ctx, &EV2), Ok(id(&graph, "BB")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "exit AA", "exit A", "action", "entry B", "entry BB", "run BB 2",
            "run B 2", "run ROOT 2",
        ]
    );
}

#[test]
fn aa_to_ab_stays_inside_a() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(machine.dispatch(&mut ctx, &EV3), Ok(id(&graph, "AB")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "exit AA", "action", "entry AB", "run AB 3", "run A 3", "run ROOT 3",
        ]
    );
}

#[test]
fn shallow_history_returns_to_last_child() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    machine.dispatch(&mut ctx, &EV3).unwrap();
    ctx.log.clear();

    assert_eq!(machine.dispatch(&mut ctx, &EV3), Ok(id(&graph, "BA")));
    assert_eq!(
        ctx.take(),
        [
            "exit AB", "exit A", "action", "entry B", "entry BA", "run BA 3", "run B 3",
            "run ROOT 3",
        ]
    );

    assert_eq!(machine.dispatch(&mut ctx, &EV3), Ok(id(&graph, "AB")));
    assert_eq!(
        ctx.take(),
        [
            "exit BA", "exit B", "action", "entry A", "entry AB", "run AB 3", "run A 3",
            "run ROOT 3",
        ]
    );
}

#[test]
fn aaa_to_aab_exits_only_the_leaf() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(machine.dispatch(&mut ctx, &EV4), Ok(id(&graph, "AAB")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "action", "entry AAB", "run AAB 4", "run AA 4", "run A 4", "run ROOT 4",
        ]
    );
}

#[test]
fn shallow_history_restores_one_level_only() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    machine.dispatch(&mut ctx, &EV4).unwrap();
    assert_eq!(machine.dispatch(&mut ctx, &EV4), Ok(id(&graph, "BA")));
    ctx.log.clear();

    assert_eq!(machine.dispatch(&mut ctx, &EV4), Ok(id(&graph, "AAA")));
    assert_eq!(
        ctx.take(),
        [
            "exit BA", "exit B", "action", "entry A", "entry AA", "entry AAA", "run AAA 4",
            "run AA 4", "run A 4", "run ROOT 4",
        ]
    );
}

#[test]
fn deep_history_restores_full_path() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    machine.dispatch(&mut ctx, &EV4).unwrap();
    machine.dispatch(&mut ctx, &EV4).unwrap();
    ctx.log.clear();

    assert_eq!(machine.dispatch(&mut ctx, &EV5), Ok(id(&graph, "AAB")));
    assert_eq!(
        ctx.take(),
        [
            "exit BA", "exit B", "action", "entry A", "entry AA", "entry AAB", "run AAB 5",
            "run AA 5", "run A 5", "run ROOT 5",
        ]
    );
}

#[test]
fn deep_history_without_record_uses_fallback() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    machine.dispatch(&mut ctx, &EV1).unwrap();
    machine.reset(id(&graph, "A"));
    ctx.log.clear();

    assert_eq!(machine.dispatch(&mut ctx, &EV5), Ok(id(&graph, "AC")));
    assert_eq!(ctx.log[..4], ["exit BA", "exit B", "action", "entry A"]);
    assert_eq!(ctx.log[4], "entry AC");
}

#[test]
fn choice_without_enabled_branch_waits_then_leaves() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(machine.dispatch(&mut ctx, &EV6), Ok(id(&graph, "A_CHOICE")));
    assert_eq!(
        ctx.take(),
        ["exit AAA", "exit AA", "action", "run A 6", "run ROOT 6"]
    );
    assert_eq!(ctx.choice_a_calls.get(), 1);
    assert_eq!(ctx.choice_b_calls.get(), 1);
    assert_eq!(
        names(&graph, &machine.active_path()),
        ["ROOT", "A", "A_CHOICE"]
    );

    ctx.choice_b = true;

    assert_eq!(machine.dispatch(&mut ctx, &EV6), Ok(id(&graph, "C")));
    assert_eq!(
        ctx.take(),
        ["exit A", "action", "entry C", "run C 6", "run ROOT 6"]
    );
}

#[test]
fn choice_with_enabled_branch_passes_through() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    ctx.choice_a = true;

    assert_eq!(machine.dispatch(&mut ctx, &EV6), Ok(id(&graph, "BA")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "exit AA", "action", "exit A", "action", "entry B", "entry BA",
            "run BA 6", "run B 6", "run ROOT 6",
        ]
    );
    assert_eq!(ctx.choice_a_calls.get(), 1);
    assert_eq!(ctx.choice_b_calls.get(), 0);
}

#[test]
fn history_without_record_uses_fallback() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(machine.dispatch(&mut ctx, &EV7), Ok(id(&graph, "BC")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "exit AA", "exit A", "action", "entry B", "entry BC", "run BC 7",
            "run B 7", "run ROOT 7",
        ]
    );
}

#[test]
fn external_self_transition_reenters_leaf() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(machine.dispatch(&mut ctx, &EV8), Ok(id(&graph, "AAA")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "action", "entry AAA", "run AAA 8", "run AA 8", "run A 8", "run ROOT 8",
        ]
    );
}

#[test]
fn external_transition_into_child_reenters_source() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(machine.dispatch(&mut ctx, &EV9), Ok(id(&graph, "AAB")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "exit AA", "action", "entry AA", "entry AAB", "run AAB 9", "run AA 9",
            "run A 9", "run ROOT 9",
        ]
    );
}

#[test]
fn local_transition_into_child_keeps_source() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(machine.dispatch(&mut ctx, &EV10), Ok(id(&graph, "AAB")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "action", "entry AAB", "run AAB 10", "run AA 10", "run A 10",
            "run ROOT 10",
        ]
    );
}

#[test]
fn local_transition_to_parent_redescends_through_initial() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    machine.dispatch(&mut ctx, &EV10).unwrap();
    ctx.log.clear();

    assert_eq!(machine.dispatch(&mut ctx, &EV12), Ok(id(&graph, "AAA")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAB", "action", "entry AAA", "run AAA 12", "run AA 12", "run A 12",
            "run ROOT 12",
        ]
    );
}

#[test]
fn local_self_transition_runs_action_only() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(machine.dispatch(&mut ctx, &EV11), Ok(id(&graph, "AAA")));
    assert_eq!(
        ctx.take(),
        ["action", "run AAA 11", "run AA 11", "run A 11", "run ROOT 11"]
    );
}

#[test]
fn closed_guard_leaves_configuration_alone() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    ctx.guard_open = false;

    assert_eq!(machine.dispatch(&mut ctx, &EV1), Ok(id(&graph, "AAA")));
    assert_eq!(
        ctx.take(),
        ["run AAA 1", "run AA 1", "run A 1", "run ROOT 1"]
    );
}

#[test]
fn panicking_guard_leaves_configuration_alone() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    let before = machine.active_path();
    ctx.guard_panics = true;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| machine.dispatch(&mut ctx, &EV1)));

    assert!(outcome.is_err());
    assert!(ctx.take().is_empty());
    assert_eq!(machine.active_path(), before);

    ctx.guard_panics = false;
    assert_eq!(machine.dispatch(&mut ctx, &EV1), Ok(id(&graph, "BA")));
    assert_eq!(
        ctx.take(),
        [
            "exit AAA", "exit AA", "exit A", "action", "entry B", "entry BA", "run BA 1",
            "run B 1", "run ROOT 1",
        ]
    );
}

#[test]
fn unknown_event_only_consults_run_callbacks() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    let before = machine.active_path();

    assert_eq!(machine.dispatch(&mut ctx, &UNKNOWN), Ok(id(&graph, "AAA")));
    assert_eq!(
        ctx.take(),
        ["run AAA 99", "run AA 99", "run A 99", "run ROOT 99"]
    );
    assert_eq!(machine.active_path(), before);
}

#[test]
fn run_callback_moves_machine() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    ctx.redirect = Some(("AA", id(&graph, "C")));

    assert_eq!(machine.dispatch(&mut ctx, &UNKNOWN), Ok(id(&graph, "C")));
    assert_eq!(
        ctx.take(),
        [
            "run AAA 99", "run AA 99", "exit AAA", "exit AA", "exit A", "entry C", "run C 99",
            "run ROOT 99",
        ]
    );
}

#[test]
fn run_callback_targeting_root_settles() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);
    ctx.redirect = Some(("A", graph.root()));

    assert_eq!(machine.dispatch(&mut ctx, &UNKNOWN), Ok(id(&graph, "AAA")));
    assert_eq!(ctx.take(), ["run AAA 99", "run AA 99", "run A 99"]);
}

#[test]
fn active_path_tracks_configuration() {
    let graph = chart();
    let (mut machine, mut ctx) = started(&graph);

    assert_eq!(
        names(&graph, &machine.active_path()),
        ["ROOT", "A", "AA", "AAA"]
    );

    machine.dispatch(&mut ctx, &EV2).unwrap();

    assert_eq!(names(&graph, &machine.active_path()), ["ROOT", "B", "BB"]);
    assert!(machine.is_active(id(&graph, "B")));
    assert!(!machine.is_active(id(&graph, "A")));
    assert_eq!(machine.active_child(id(&graph, "A")), Some(id(&graph, "AA")));
}
