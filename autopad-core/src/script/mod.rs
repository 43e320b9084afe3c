//! Script data structures shared by firmware and host targets.
//!
//! A script is a directed graph of phases. Each phase is either the fixed
//! controller re-sync burst, a table of timed steps, or the terminal idle
//! state. The engine interprets this data without embedding any knowledge of
//! the game being driven, so adding an automation run means adding a data
//! module here, not another state machine. Everything in this module is
//! `no_std` friendly so the same tables compile for both the MCU firmware
//! and the host-side emulator.

use core::fmt;

use crate::report::Action;

pub mod eat_meat;
pub mod mission;
pub mod open_card;

pub use eat_meat::{EAT_MEAT_SCRIPT, eat_meat_script};
pub use mission::{MISSION_SCRIPT, mission_script};
pub use open_card::{OPEN_CARD_SCRIPT, open_card_script};

/// Host polling interval; one tick equals one interrupt IN report.
pub const TICK_PERIOD_MS: u32 = 8;

/// Most phases any script is expected to declare, with headroom.
pub const MAX_SCRIPT_PHASES: usize = 16;

/// Duration expressed in polling ticks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct Ticks(u16);

impl Ticks {
    pub const ZERO: Self = Self(0);

    /// Wraps a raw tick count.
    #[must_use]
    pub const fn new(ticks: u16) -> Self {
        Self(ticks)
    }

    /// Converts a millisecond duration, rounding up so a nonzero input never
    /// collapses to zero ticks.
    ///
    /// # Panics
    ///
    /// Panics when the duration exceeds the `u16` tick range; for the const
    /// script tables this surfaces as a compile error.
    #[must_use]
    pub const fn from_millis(millis: u32) -> Self {
        let ticks = millis.div_ceil(TICK_PERIOD_MS);
        assert!(ticks <= u16::MAX as u32, "duration exceeds the tick range");
        Self(ticks as u16)
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0 as u32
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}t", self.0)
    }
}

/// Hold window used by button taps that the original scripts left implicit.
pub const DEFAULT_HOLD: Ticks = Ticks::from_millis(50);

/// One timed entry of a script table.
///
/// The action is asserted for `hold` ticks, then the pad returns to neutral
/// for `settle` ticks before the next step may assert. The settle window is
/// what keeps the host from coalescing two adjacent presses into one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScriptStep {
    pub action: Action,
    pub hold: Ticks,
    pub settle: Ticks,
}

impl ScriptStep {
    #[must_use]
    pub const fn new(action: Action, hold: Ticks, settle: Ticks) -> Self {
        Self {
            action,
            hold,
            settle,
        }
    }

    /// A standard tap: default hold window, caller-declared settle.
    #[must_use]
    pub const fn press(action: Action, settle: Ticks) -> Self {
        Self::new(action, DEFAULT_HOLD, settle)
    }
}

/// Ordered steps executed sequentially while a table phase is active.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScriptTable {
    pub name: &'static str,
    pub steps: &'static [ScriptStep],
}

impl ScriptTable {
    #[must_use]
    pub const fn new(name: &'static str, steps: &'static [ScriptStep]) -> Self {
        Self { name, steps }
    }

    /// Returns the number of steps in execution order.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Timing of the raw controller re-sync burst.
///
/// The burst is not table-driven: it asserts L+R and then A at fixed tick
/// counts to force the host to re-associate the controller binding, and
/// transitions unconditionally once `total_ticks` have elapsed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SyncBurst {
    /// Ticks at which L+R is asserted for a single frame.
    pub grip_ticks: [u16; 2],
    /// Ticks at which A is asserted for a single frame.
    pub confirm_ticks: [u16; 2],
    /// Last tick of the burst; the phase exits at the end of this tick.
    pub total_ticks: u16,
    /// Neutral window observed before the next phase drives its first step.
    pub settle: Ticks,
}

impl SyncBurst {
    /// Burst shared by every recovered script: L+R at ticks 25/50, A at
    /// ticks 75/100, exit after tick 100.
    #[must_use]
    pub const fn standard(settle: Ticks) -> Self {
        Self {
            grip_ticks: [25, 50],
            confirm_ticks: [75, 100],
            total_ticks: 100,
            settle,
        }
    }
}

/// What a phase does while it is active.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PhaseKind {
    /// Fixed-tick controller re-sync burst.
    Sync(SyncBurst),
    /// Step through the table one settled step at a time.
    Table(&'static ScriptTable),
    /// Terminal state: neutral reports forever.
    Idle,
}

/// Where control flows once a phase finishes its table (or burst).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PhaseExit {
    /// Advance to the phase at this index.
    To(usize),
    /// Counted loop edge: route to `back_to` until the phase has completed
    /// `target` passes, then take the exit edge to `then`.
    LoopUntil {
        target: u16,
        back_to: usize,
        then: usize,
    },
    /// Remain in this phase indefinitely (terminal phases only).
    Halt,
}

/// One named stage of an automation script.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Phase {
    pub name: &'static str,
    pub kind: PhaseKind,
    pub exit: PhaseExit,
}

impl Phase {
    #[must_use]
    pub const fn new(name: &'static str, kind: PhaseKind, exit: PhaseExit) -> Self {
        Self { name, kind, exit }
    }

    /// Terminal phase emitting neutral reports forever.
    #[must_use]
    pub const fn done() -> Self {
        Self::new("done", PhaseKind::Idle, PhaseExit::Halt)
    }
}

/// Immutable automation script shared across targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Script {
    pub name: &'static str,
    pub phases: &'static [Phase],
}

impl Script {
    #[must_use]
    pub const fn new(name: &'static str, phases: &'static [Phase]) -> Self {
        Self { name, phases }
    }

    /// Returns the phase list in declaration order.
    #[must_use]
    pub const fn phases(&self) -> &'static [Phase] {
        self.phases
    }

    /// Returns the number of phases in the script.
    #[must_use]
    pub const fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Checks the script for defects that would leave the engine stuck.
    ///
    /// Rejecting malformed data here keeps the per-tick path free of error
    /// handling: a validated script cannot produce an out-of-range cursor or
    /// a zero-length duty cycle.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.phases.is_empty() {
            return Err(ScriptError::EmptyScript);
        }
        if self.phases.len() > MAX_SCRIPT_PHASES {
            return Err(ScriptError::TooManyPhases);
        }

        let mut has_terminal = false;
        for (phase_index, phase) in self.phases.iter().enumerate() {
            match phase.kind {
                PhaseKind::Table(table) => {
                    if table.is_empty() {
                        return Err(ScriptError::EmptyTable { phase: phase_index });
                    }
                    for (step_index, step) in table.steps.iter().enumerate() {
                        if step.hold.is_zero() || step.settle.is_zero() {
                            return Err(ScriptError::ZeroDuration {
                                phase: phase_index,
                                step: step_index,
                            });
                        }
                    }
                }
                PhaseKind::Sync(burst) => {
                    if burst.total_ticks == 0 || burst.settle.is_zero() {
                        return Err(ScriptError::ZeroDuration {
                            phase: phase_index,
                            step: 0,
                        });
                    }
                }
                PhaseKind::Idle => has_terminal = true,
            }

            match phase.exit {
                PhaseExit::To(next) => {
                    if next >= self.phases.len() {
                        return Err(ScriptError::EdgeOutOfRange { phase: phase_index });
                    }
                }
                PhaseExit::LoopUntil {
                    target,
                    back_to,
                    then,
                } => {
                    if target == 0 {
                        return Err(ScriptError::ZeroLoopTarget { phase: phase_index });
                    }
                    if back_to >= self.phases.len() || then >= self.phases.len() {
                        return Err(ScriptError::EdgeOutOfRange { phase: phase_index });
                    }
                }
                PhaseExit::Halt => {}
            }
        }

        if !has_terminal {
            return Err(ScriptError::NoTerminalPhase);
        }

        Ok(())
    }
}

/// Defects detected while loading a script.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScriptError {
    /// The script declares no phases at all.
    EmptyScript,
    /// The script exceeds [`MAX_SCRIPT_PHASES`].
    TooManyPhases,
    /// A table phase references a table with no steps.
    EmptyTable { phase: usize },
    /// A step (or burst) declares a zero hold or settle window.
    ZeroDuration { phase: usize, step: usize },
    /// A loop edge with target zero would exit before its first pass.
    ZeroLoopTarget { phase: usize },
    /// An exit edge points past the end of the phase list.
    EdgeOutOfRange { phase: usize },
    /// No phase terminates the script; the engine could never reach Done.
    NoTerminalPhase,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::EmptyScript => f.write_str("script declares no phases"),
            ScriptError::TooManyPhases => f.write_str("script exceeds the phase capacity"),
            ScriptError::EmptyTable { phase } => {
                write!(f, "phase {phase} references an empty table")
            }
            ScriptError::ZeroDuration { phase, step } => {
                write!(f, "phase {phase} step {step} declares a zero duration")
            }
            ScriptError::ZeroLoopTarget { phase } => {
                write!(f, "phase {phase} declares a zero loop target")
            }
            ScriptError::EdgeOutOfRange { phase } => {
                write!(f, "phase {phase} exits past the end of the script")
            }
            ScriptError::NoTerminalPhase => f.write_str("script has no terminal phase"),
        }
    }
}
