//! Blade-feeding script: buy meat, swap blades in, feed them, repeat.
//!
//! Timings in this script were captured as raw report counts on the original
//! rig, so every duration here is already in ticks. Each step is asserted for
//! the five-tick echo window the capture rig used, then the pad settles for
//! the step's own window.

use crate::report::Action;
use crate::script::{Phase, PhaseExit, PhaseKind, Script, ScriptStep, ScriptTable, SyncBurst, Ticks};

/// Assert window used by every step; mirrors the capture rig's five-report echo.
pub const ECHO_HOLD: Ticks = Ticks::new(5);

/// Neutral window after the re-sync burst before the first menu press.
pub const SYNC_SETTLE: Ticks = Ticks::new(200);

const SETTLE_TAP: Ticks = Ticks::new(10);
const SETTLE_STEP: Ticks = Ticks::new(20);
const SETTLE_MENU: Ticks = Ticks::new(50);
const SETTLE_SCENE: Ticks = Ticks::new(100);
const SETTLE_SAVE: Ticks = Ticks::new(200);

/// Blades swapped in per feed cycle; the roster walk selects three slots.
pub const BLADES_PER_CYCLE: u16 = 3;
/// A presses per blade batch while feeding. The capture rig's counter exits
/// only once it passes 300, so the press fires 301 times.
pub const EAT_PRESSES: u16 = 301;
/// Feed cycles needed to work through the 62-blade roster at three per cycle.
pub const FEED_CYCLES: u16 = 21;

const fn echo(action: Action, settle: Ticks) -> ScriptStep {
    ScriptStep::new(action, ECHO_HOLD, settle)
}

/// Back out of any dialog left open before the run starts.
pub const PREPARE_STEPS: [ScriptStep; 4] = [
    echo(Action::B, SETTLE_TAP),
    echo(Action::B, SETTLE_TAP),
    echo(Action::B, SETTLE_TAP),
    echo(Action::B, SETTLE_MENU),
];

/// Talk to the vendor and buy one batch of meat.
pub const BUY_STEPS: [ScriptStep; 8] = [
    echo(Action::A, SETTLE_STEP),
    echo(Action::A, SETTLE_STEP),
    echo(Action::A, SETTLE_STEP),
    echo(Action::A, SETTLE_STEP),
    echo(Action::PadLeft, SETTLE_STEP),
    echo(Action::A, SETTLE_STEP),
    echo(Action::B, SETTLE_STEP),
    echo(Action::B, SETTLE_MENU),
];

/// Open the blade-management menu and enter the swap screen.
pub const CHANGE_BLADE_STEPS: [ScriptStep; 8] = [
    echo(Action::Plus, SETTLE_MENU),
    echo(Action::A, SETTLE_STEP),
    echo(Action::A, SETTLE_STEP),
    echo(Action::PadRight, SETTLE_STEP),
    echo(Action::A, SETTLE_STEP),
    echo(Action::Minus, SETTLE_MENU),
    echo(Action::PadDown, SETTLE_STEP),
    echo(Action::A, SETTLE_STEP),
];

/// Move to the next roster slot and swap that blade in; looped once per blade.
pub const SELECT_SLOT_STEPS: [ScriptStep; 2] = [
    echo(Action::PadDown, SETTLE_STEP),
    echo(Action::A, SETTLE_STEP),
];

/// Leave the swap screen and focus the first swapped-in blade.
pub const EAT_PREPARE_STEPS: [ScriptStep; 4] = [
    echo(Action::B, SETTLE_MENU),
    echo(Action::PadRight, SETTLE_STEP),
    echo(Action::PadRight, SETTLE_STEP),
    echo(Action::PadRight, SETTLE_STEP),
];

/// One feeding press; looped [`EAT_PRESSES`] times.
pub const EAT_STEPS: [ScriptStep; 1] = [echo(Action::A, SETTLE_TAP)];

/// Confirm the fed blades, save, and return to the field.
pub const CONFIRM_STEPS: [ScriptStep; 15] = [
    echo(Action::B, SETTLE_MENU),
    echo(Action::B, SETTLE_MENU),
    echo(Action::Plus, SETTLE_SCENE),
    echo(Action::Plus, SETTLE_SCENE),
    echo(Action::A, SETTLE_SCENE),
    echo(Action::PadRight, SETTLE_SCENE),
    echo(Action::A, SETTLE_SCENE),
    echo(Action::PadRight, SETTLE_SCENE),
    echo(Action::A, SETTLE_SAVE),
    echo(Action::A, SETTLE_MENU),
    echo(Action::Zr, SETTLE_SAVE),
    echo(Action::A, SETTLE_MENU),
    echo(Action::Zr, SETTLE_SAVE),
    echo(Action::A, SETTLE_MENU),
    echo(Action::Plus, SETTLE_SAVE),
];

static PREPARE_TABLE: ScriptTable = ScriptTable::new("prepare", &PREPARE_STEPS);
static BUY_TABLE: ScriptTable = ScriptTable::new("buy-meat", &BUY_STEPS);
static CHANGE_BLADE_TABLE: ScriptTable = ScriptTable::new("change-blade", &CHANGE_BLADE_STEPS);
static SELECT_SLOT_TABLE: ScriptTable = ScriptTable::new("select-slot", &SELECT_SLOT_STEPS);
static EAT_PREPARE_TABLE: ScriptTable = ScriptTable::new("eat-prepare", &EAT_PREPARE_STEPS);
static EAT_TABLE: ScriptTable = ScriptTable::new("eat", &EAT_STEPS);
static CONFIRM_TABLE: ScriptTable = ScriptTable::new("confirm-blade", &CONFIRM_STEPS);

const PREPARE: usize = 1;
const BUY: usize = 2;
const CHANGE_BLADE: usize = 3;
const SELECT_SLOT: usize = 4;
const EAT_PREPARE: usize = 5;
const EAT: usize = 6;
const CONFIRM: usize = 7;
const DONE: usize = 8;

static PHASES: [Phase; 9] = [
    Phase::new(
        "sync",
        PhaseKind::Sync(SyncBurst::standard(SYNC_SETTLE)),
        PhaseExit::To(PREPARE),
    ),
    Phase::new(
        "prepare",
        PhaseKind::Table(&PREPARE_TABLE),
        PhaseExit::To(BUY),
    ),
    Phase::new(
        "buy-meat",
        PhaseKind::Table(&BUY_TABLE),
        PhaseExit::To(CHANGE_BLADE),
    ),
    Phase::new(
        "change-blade",
        PhaseKind::Table(&CHANGE_BLADE_TABLE),
        PhaseExit::To(SELECT_SLOT),
    ),
    Phase::new(
        "select-slot",
        PhaseKind::Table(&SELECT_SLOT_TABLE),
        PhaseExit::LoopUntil {
            target: BLADES_PER_CYCLE,
            back_to: SELECT_SLOT,
            then: EAT_PREPARE,
        },
    ),
    Phase::new(
        "eat-prepare",
        PhaseKind::Table(&EAT_PREPARE_TABLE),
        PhaseExit::To(EAT),
    ),
    Phase::new(
        "eat",
        PhaseKind::Table(&EAT_TABLE),
        PhaseExit::LoopUntil {
            target: EAT_PRESSES,
            back_to: EAT,
            then: CONFIRM,
        },
    ),
    Phase::new(
        "confirm-blade",
        PhaseKind::Table(&CONFIRM_TABLE),
        PhaseExit::LoopUntil {
            target: FEED_CYCLES,
            back_to: PREPARE,
            then: DONE,
        },
    ),
    Phase::done(),
];

/// Complete blade-feeding script.
pub static EAT_MEAT_SCRIPT: Script = Script::new("eat-meat", &PHASES);

/// Returns the shared blade-feeding script.
#[must_use]
pub const fn eat_meat_script() -> Script {
    EAT_MEAT_SCRIPT
}
