//! Mercenary-mission script: dispatch every squad, wait out the mission
//! timer at neutral, collect, and dispatch again.
//!
//! Timings were captured in milliseconds. The original build busy-waited
//! seven minutes inside its report callback; here that wait is a dedicated
//! phase whose single step settles at neutral for the full mission timer, so
//! the pad keeps streaming reports throughout.

use crate::report::Action;
use crate::script::{Phase, PhaseExit, PhaseKind, Script, ScriptStep, ScriptTable, SyncBurst, Ticks};

/// Neutral window after the re-sync burst before the first menu press.
pub const SYNC_SETTLE: Ticks = Ticks::from_millis(500);

/// Mission timer: seven minutes at neutral before collecting.
pub const MISSION_WAIT: Ticks = Ticks::from_millis(7 * 60_000);

/// Dispatch rounds before the script parks in its terminal phase. The
/// original looped forever; bounding the run keeps completion observable.
pub const MISSION_RUNS: u16 = 10;

const fn press_ms(action: Action, settle_millis: u32) -> ScriptStep {
    ScriptStep::press(action, Ticks::from_millis(settle_millis))
}

/// Collect finished missions and walk back to the dispatch board.
pub const PREPARE_STEPS: [ScriptStep; 28] = [
    press_ms(Action::B, 1_000),
    press_ms(Action::B, 1_000),
    press_ms(Action::B, 1_000),
    press_ms(Action::B, 1_500),
    press_ms(Action::Plus, 1_500),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::A, 1_000),
    press_ms(Action::A, 1_000),
    press_ms(Action::B, 2_000),
    press_ms(Action::A, 1_000),
    press_ms(Action::B, 2_000),
    press_ms(Action::A, 1_000),
    press_ms(Action::B, 2_000),
    press_ms(Action::A, 1_000),
    press_ms(Action::B, 2_000),
    press_ms(Action::A, 1_000),
    press_ms(Action::B, 2_000),
    press_ms(Action::A, 1_000),
    press_ms(Action::B, 2_000),
    press_ms(Action::A, 1_000),
    press_ms(Action::B, 2_000),
    press_ms(Action::A, 1_000),
    press_ms(Action::B, 2_000),
    press_ms(Action::A, 1_000),
    press_ms(Action::B, 1_000),
];

/// Pick the mission and fill the squad roster slot by slot.
pub const CHOOSE_STEPS: [ScriptStep; 40] = [
    press_ms(Action::A, 500),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::A, 1_000),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::A, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::A, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadLeft, 50),
    press_ms(Action::A, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadLeft, 50),
    press_ms(Action::PadLeft, 50),
    press_ms(Action::PadLeft, 50),
    press_ms(Action::A, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::A, 50),
    press_ms(Action::PadDown, 50),
    press_ms(Action::A, 50),
    press_ms(Action::X, 1_000),
    press_ms(Action::A, 500),
    press_ms(Action::PadUp, 100),
    press_ms(Action::A, 300),
    press_ms(Action::A, 4_000),
    press_ms(Action::A, 500),
];

/// Confirm the dispatch.
pub const START_STEPS: [ScriptStep; 1] = [press_ms(Action::Plus, 100)];

/// Hold neutral for the full mission timer.
pub const WAIT_STEPS: [ScriptStep; 1] = [ScriptStep::new(Action::Reset, Ticks::new(1), MISSION_WAIT)];

static PREPARE_TABLE: ScriptTable = ScriptTable::new("prepare", &PREPARE_STEPS);
static CHOOSE_TABLE: ScriptTable = ScriptTable::new("choose-squad", &CHOOSE_STEPS);
static START_TABLE: ScriptTable = ScriptTable::new("start-mission", &START_STEPS);
static WAIT_TABLE: ScriptTable = ScriptTable::new("mission-wait", &WAIT_STEPS);

const PREPARE: usize = 1;
const CHOOSE: usize = 2;
const START: usize = 3;
const WAIT: usize = 4;
const DONE: usize = 5;

static PHASES: [Phase; 6] = [
    Phase::new(
        "sync",
        PhaseKind::Sync(SyncBurst::standard(SYNC_SETTLE)),
        PhaseExit::To(PREPARE),
    ),
    Phase::new(
        "prepare",
        PhaseKind::Table(&PREPARE_TABLE),
        PhaseExit::To(CHOOSE),
    ),
    Phase::new(
        "choose-squad",
        PhaseKind::Table(&CHOOSE_TABLE),
        PhaseExit::To(START),
    ),
    Phase::new(
        "start-mission",
        PhaseKind::Table(&START_TABLE),
        PhaseExit::To(WAIT),
    ),
    Phase::new(
        "mission-wait",
        PhaseKind::Table(&WAIT_TABLE),
        PhaseExit::LoopUntil {
            target: MISSION_RUNS,
            back_to: PREPARE,
            then: DONE,
        },
    ),
    Phase::done(),
];

/// Complete mercenary-mission script.
pub static MISSION_SCRIPT: Script = Script::new("mission", &PHASES);

/// Returns the shared mercenary-mission script.
#[must_use]
pub const fn mission_script() -> Script {
    MISSION_SCRIPT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::DEFAULT_HOLD;

    #[test]
    fn script_shape_matches_recovered_tables() {
        assert_eq!(MISSION_SCRIPT.phase_count(), 6);
        assert_eq!(MISSION_SCRIPT.validate(), Ok(()));

        assert_eq!(PREPARE_STEPS.len(), 28);
        assert_eq!(CHOOSE_STEPS.len(), 40);
        assert_eq!(START_STEPS.len(), 1);

        for step in PREPARE_STEPS.iter().chain(CHOOSE_STEPS.iter()) {
            assert_eq!(step.hold, DEFAULT_HOLD);
        }
    }

    #[test]
    fn mission_wait_holds_neutral_for_the_full_timer() {
        let wait = WAIT_STEPS[0];
        assert_eq!(wait.action, Action::Reset);
        assert_eq!(wait.settle, MISSION_WAIT);
        assert_eq!(MISSION_WAIT, Ticks::new(52_500));
    }

    #[test]
    fn wait_phase_loops_back_to_collection() {
        let wait = &MISSION_SCRIPT.phases()[WAIT];
        assert_eq!(
            wait.exit,
            PhaseExit::LoopUntil {
                target: MISSION_RUNS,
                back_to: PREPARE,
                then: DONE,
            }
        );
    }
}
