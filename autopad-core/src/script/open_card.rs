//! Core-crystal drawing script: navigate to the draw menu, then draw on
//! repeat until the pull budget is spent.
//!
//! Timings for this script were captured in milliseconds, so every settle
//! window goes through [`Ticks::from_millis`]. Holds use the shared default
//! tap window.

use crate::report::Action;
use crate::script::{Phase, PhaseExit, PhaseKind, Script, ScriptStep, ScriptTable, SyncBurst, Ticks};

/// Neutral window after the re-sync burst before the first menu press.
pub const SYNC_SETTLE: Ticks = Ticks::from_millis(500);

/// Crystals to spend before the script parks in its terminal phase. The
/// original looped forever; bounding the run keeps completion observable.
pub const DRAW_TARGET: u16 = 100;

const fn press_ms(action: Action, settle_millis: u32) -> ScriptStep {
    ScriptStep::press(action, Ticks::from_millis(settle_millis))
}

/// Dismiss leftover dialogs and walk the menus to the draw screen.
pub const PREPARE_STEPS: [ScriptStep; 14] = [
    press_ms(Action::B, 50),
    press_ms(Action::B, 50),
    press_ms(Action::B, 50),
    press_ms(Action::B, 50),
    press_ms(Action::B, 50),
    press_ms(Action::B, 1_000),
    press_ms(Action::Plus, 1_500),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::PadRight, 50),
    press_ms(Action::A, 1_000),
    press_ms(Action::PadRight, 50),
    press_ms(Action::A, 1_000),
    press_ms(Action::PadRight, 50),
];

/// Draw one core crystal and skip through the reveal; looped per draw.
pub const DRAW_STEPS: [ScriptStep; 12] = [
    press_ms(Action::A, 500),
    press_ms(Action::A, 500),
    press_ms(Action::PadUp, 50),
    press_ms(Action::PadUp, 50),
    press_ms(Action::A, 500),
    press_ms(Action::A, 2_000),
    press_ms(Action::PadUp, 50),
    press_ms(Action::A, 10_000),
    press_ms(Action::Plus, 500),
    press_ms(Action::A, 1_000),
    press_ms(Action::A, 500),
    press_ms(Action::B, 3_000),
];

static PREPARE_TABLE: ScriptTable = ScriptTable::new("prepare", &PREPARE_STEPS);
static DRAW_TABLE: ScriptTable = ScriptTable::new("draw", &DRAW_STEPS);

const PREPARE: usize = 1;
const DRAW: usize = 2;
const DONE: usize = 3;

static PHASES: [Phase; 4] = [
    Phase::new(
        "sync",
        PhaseKind::Sync(SyncBurst::standard(SYNC_SETTLE)),
        PhaseExit::To(PREPARE),
    ),
    Phase::new(
        "prepare",
        PhaseKind::Table(&PREPARE_TABLE),
        PhaseExit::To(DRAW),
    ),
    Phase::new(
        "draw",
        PhaseKind::Table(&DRAW_TABLE),
        PhaseExit::LoopUntil {
            target: DRAW_TARGET,
            back_to: DRAW,
            then: DONE,
        },
    ),
    Phase::done(),
];

/// Complete core-crystal drawing script.
pub static OPEN_CARD_SCRIPT: Script = Script::new("open-card", &PHASES);

/// Returns the shared core-crystal drawing script.
#[must_use]
pub const fn open_card_script() -> Script {
    OPEN_CARD_SCRIPT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::DEFAULT_HOLD;

    #[test]
    fn script_shape_matches_recovered_tables() {
        assert_eq!(OPEN_CARD_SCRIPT.phase_count(), 4);
        assert_eq!(OPEN_CARD_SCRIPT.validate(), Ok(()));

        assert_eq!(PREPARE_STEPS.len(), 14);
        assert_eq!(DRAW_STEPS.len(), 12);

        for step in PREPARE_STEPS.iter().chain(DRAW_STEPS.iter()) {
            assert_eq!(step.hold, DEFAULT_HOLD);
        }
    }

    #[test]
    fn draw_phase_loops_until_the_pull_budget_is_spent() {
        let draw = &OPEN_CARD_SCRIPT.phases()[DRAW];
        assert_eq!(
            draw.exit,
            PhaseExit::LoopUntil {
                target: DRAW_TARGET,
                back_to: DRAW,
                then: DONE,
            }
        );
    }

    #[test]
    fn longest_settle_follows_the_draw_confirmation() {
        let confirm = DRAW_STEPS[7];
        assert_eq!(confirm.action, Action::A);
        assert_eq!(confirm.settle, Ticks::from_millis(10_000));
    }
}
