use autopad_core::engine::{Engine, TimingPolicy};
use autopad_core::report::buttons;
use autopad_core::script::open_card::{DRAW_STEPS, DRAW_TARGET, PREPARE_STEPS};
use autopad_core::script::{DEFAULT_HOLD, open_card_script};
use autopad_core::telemetry::{TelemetryEventKind, TelemetryRecorder};

fn run_to_done(mut engine: Engine, budget: u32) -> (u32, Vec<(u32, &'static str)>) {
    let mut telemetry = TelemetryRecorder::new();
    let mut transitions = vec![(0, engine.phase_name())];
    for tick in 0..budget {
        engine.next_report(&mut telemetry);
        let name = engine.phase_name();
        if transitions.last().is_some_and(|(_, last)| *last != name) {
            transitions.push((tick + 1, name));
        }
        if engine.is_done() {
            return (engine.ticks_elapsed(), transitions);
        }
    }
    panic!("script still in phase {} after {budget} ticks", engine.phase_name());
}

#[test]
fn script_spends_the_whole_pull_budget_then_parks() {
    let engine = Engine::new(open_card_script(), TimingPolicy::HoldSettle).unwrap();
    let (total, transitions) = run_to_done(engine, 300_000);

    assert_eq!(
        transitions
            .iter()
            .map(|(_, name)| *name)
            .collect::<Vec<_>>(),
        ["sync", "prepare", "draw", "done"]
    );
    assert_eq!(transitions[1].0, 101);
    assert!(total < 300_000);
}

#[test]
fn draw_loop_counts_passes_toward_the_target() {
    let mut engine = Engine::new(open_card_script(), TimingPolicy::HoldSettle).unwrap();
    let mut telemetry = TelemetryRecorder::new();

    // One full draw pass takes the sum of its step windows.
    let pass_ticks: u32 = DRAW_STEPS
        .iter()
        .map(|step| step.hold.as_u32() + step.settle.as_u32())
        .sum();
    let prepare_ticks: u32 = PREPARE_STEPS
        .iter()
        .map(|step| step.hold.as_u32() + step.settle.as_u32())
        .sum();
    let sync_ticks = 101 + 63; // burst plus its settle window

    for _ in 0..(sync_ticks + prepare_ticks + pass_ticks * 3) {
        engine.next_report(&mut telemetry);
    }
    assert_eq!(engine.phase_name(), "draw");
    assert_eq!(engine.passes(2), 3);

    let passes = telemetry
        .oldest_first()
        .filter(|record| record.event == TelemetryEventKind::LoopPass(2))
        .count();
    assert_eq!(passes, 3);
}

#[test]
fn every_press_uses_the_default_hold_window() {
    let mut engine = Engine::new(open_card_script(), TimingPolicy::HoldSettle).unwrap();
    let mut telemetry = TelemetryRecorder::new();

    // Skip the sync burst and its settle.
    for _ in 0..(101 + 63) {
        engine.next_report(&mut telemetry);
    }

    // First prepare step: B held for the default window, then neutral.
    for tick in 0..DEFAULT_HOLD.as_u32() {
        let report = engine.next_report(&mut telemetry);
        assert_eq!(report.buttons, buttons::B, "tick {tick}");
    }
    assert!(engine.next_report(&mut telemetry).is_neutral());
}

#[test]
fn pull_budget_matches_the_operating_plan() {
    assert_eq!(DRAW_TARGET, 100);
    assert_eq!(PREPARE_STEPS.len(), 14);
    assert_eq!(DRAW_STEPS.len(), 12);
}
