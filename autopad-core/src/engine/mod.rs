//! Open-loop report engine.
//!
//! The engine turns a validated [`Script`] into an endless stream of
//! [`Report`] frames, one per polling tick. It owns all sequencing state: the
//! active phase, the step cursor, the hold/settle gate, and the per-phase
//! loop counters. Each call to [`Engine::next_report`] advances exactly one
//! tick, so timing is derived entirely from the host's polling cadence and
//! never from a blocking wait.
//!
//! The engine is open-loop: it receives nothing back from the host, so a
//! missed menu or dropped frame on the console is invisible here. Scripts are
//! written to tolerate that by re-syncing at power-on and settling long
//! enough after each press.

use crate::report::{Action, Report};
use crate::script::{
    MAX_SCRIPT_PHASES, Phase, PhaseExit, PhaseKind, Script, ScriptError, ScriptStep, SyncBurst,
    Ticks,
};
use crate::telemetry::TelemetryRecorder;

/// How a step's declared windows map onto asserted and neutral ticks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimingPolicy {
    /// Assert for the step's hold window, settle for its settle window.
    HoldSettle,
    /// Capture-rig compatibility: a fixed echo window replaces the step's
    /// hold; the settle window still comes from the step.
    EchoHold { echoes: u16 },
}

impl TimingPolicy {
    /// Echo window used by the original capture rig.
    pub const DEFAULT_ECHOES: u16 = 5;

    /// The capture-rig compatible policy with its standard echo window.
    #[must_use]
    pub const fn legacy() -> Self {
        TimingPolicy::EchoHold {
            echoes: Self::DEFAULT_ECHOES,
        }
    }

    /// Splits a step into (asserted, neutral) tick counts. The asserted
    /// window is always at least one tick.
    fn windows(self, step: &ScriptStep) -> (u16, u16) {
        match self {
            TimingPolicy::HoldSettle => (step.hold.as_u16(), step.settle.as_u16()),
            // The settle window is untouched so two asserted steps always
            // have a neutral frame between them.
            TimingPolicy::EchoHold { echoes } => (echoes.max(1), step.settle.as_u16()),
        }
    }
}

impl Default for TimingPolicy {
    fn default() -> Self {
        TimingPolicy::HoldSettle
    }
}

/// Per-tick gate state within the active phase.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum GateState {
    /// Counting through the re-sync burst.
    Sync { tick: u16 },
    /// Next tick asserts the step under the cursor.
    Drive,
    /// Asserting the current step.
    Hold { remaining: u16, settle: u16 },
    /// Holding neutral after a step's assert window.
    Settle { remaining: u16 },
    /// Holding neutral after a phase change, before the phase starts.
    EntryDelay { remaining: u16 },
    /// Terminal phase reached; neutral forever.
    Parked,
}

/// Deterministic script interpreter emitting one report per tick.
pub struct Engine {
    script: Script,
    policy: TimingPolicy,
    phase_index: usize,
    cursor: usize,
    gate: GateState,
    passes: [u16; MAX_SCRIPT_PHASES],
    tick: u32,
    started: bool,
    complete_recorded: bool,
}

impl Engine {
    /// Validates the script and prepares it for its first tick.
    pub fn new(script: Script, policy: TimingPolicy) -> Result<Self, ScriptError> {
        script.validate()?;
        let gate = initial_gate(&script.phases[0]);
        Ok(Self {
            script,
            policy,
            phase_index: 0,
            cursor: 0,
            gate,
            passes: [0; MAX_SCRIPT_PHASES],
            tick: 0,
            started: false,
            complete_recorded: false,
        })
    }

    /// Index of the active phase.
    #[must_use]
    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// Name of the active phase.
    #[must_use]
    pub fn phase_name(&self) -> &'static str {
        self.script.phases[self.phase_index].name
    }

    /// Ticks emitted since power-on.
    #[must_use]
    pub fn ticks_elapsed(&self) -> u32 {
        self.tick
    }

    /// Completed passes recorded against the given phase.
    #[must_use]
    pub fn passes(&self, phase: usize) -> u16 {
        self.passes.get(phase).copied().unwrap_or(0)
    }

    /// The script this engine is running.
    #[must_use]
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Returns `true` once the terminal phase has been reached.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(
            self.script.phases[self.phase_index].kind,
            PhaseKind::Idle
        )
    }

    /// Produces the report for the next tick and advances all timing state.
    pub fn next_report(&mut self, telemetry: &mut TelemetryRecorder) -> Report {
        if !self.started {
            self.started = true;
            telemetry.record_phase_entered(self.phase_index, self.tick);
            if self.is_done() {
                self.mark_complete(telemetry);
            }
        }

        let report = self.step_tick(telemetry);
        self.tick = self.tick.wrapping_add(1);
        report
    }

    fn step_tick(&mut self, telemetry: &mut TelemetryRecorder) -> Report {
        let phase = self.script.phases[self.phase_index];
        match (phase.kind, self.gate) {
            (PhaseKind::Sync(burst), GateState::Sync { tick }) => {
                self.sync_tick(&burst, tick, telemetry)
            }
            (PhaseKind::Table(table), GateState::Drive) => {
                let step = table.steps[self.cursor];
                let (asserted, settle) = self.policy.windows(&step);
                self.after_asserted_tick(asserted - 1, settle, telemetry);
                Report::from_action(step.action)
            }
            (PhaseKind::Table(table), GateState::Hold { remaining, settle }) => {
                let step = table.steps[self.cursor];
                self.after_asserted_tick(remaining - 1, settle, telemetry);
                Report::from_action(step.action)
            }
            (_, GateState::Settle { remaining }) => {
                if remaining > 1 {
                    self.gate = GateState::Settle {
                        remaining: remaining - 1,
                    };
                } else {
                    self.finish_step(telemetry);
                }
                Report::neutral()
            }
            (_, GateState::EntryDelay { remaining }) => {
                if remaining > 1 {
                    self.gate = GateState::EntryDelay {
                        remaining: remaining - 1,
                    };
                } else {
                    self.gate = initial_gate(&self.script.phases[self.phase_index]);
                }
                Report::neutral()
            }
            // Parked, or a gate left behind by a phase change; hold neutral.
            _ => Report::neutral(),
        }
    }

    fn sync_tick(
        &mut self,
        burst: &SyncBurst,
        tick: u16,
        telemetry: &mut TelemetryRecorder,
    ) -> Report {
        let mut report = Report::neutral();
        if burst.grip_ticks.contains(&tick) {
            report.apply(Action::L);
            report.apply(Action::R);
        } else if burst.confirm_ticks.contains(&tick) {
            report.apply(Action::A);
        }

        if tick >= burst.total_ticks {
            self.take_exit(burst.settle, telemetry);
        } else {
            self.gate = GateState::Sync { tick: tick + 1 };
        }
        report
    }

    /// Bookkeeping after a tick that asserted the current step.
    fn after_asserted_tick(&mut self, remaining: u16, settle: u16, telemetry: &mut TelemetryRecorder) {
        if remaining > 0 {
            self.gate = GateState::Hold { remaining, settle };
        } else if settle > 0 {
            self.gate = GateState::Settle { remaining: settle };
        } else {
            self.finish_step(telemetry);
        }
    }

    fn finish_step(&mut self, telemetry: &mut TelemetryRecorder) {
        let PhaseKind::Table(table) = self.script.phases[self.phase_index].kind else {
            return;
        };
        self.cursor += 1;
        if self.cursor < table.len() {
            self.gate = GateState::Drive;
        } else {
            self.take_exit(Ticks::ZERO, telemetry);
        }
    }

    /// Takes the active phase's exit edge. `entry_delay` is a neutral window
    /// observed inside the next phase before it drives its first step.
    fn take_exit(&mut self, entry_delay: Ticks, telemetry: &mut TelemetryRecorder) {
        match self.script.phases[self.phase_index].exit {
            PhaseExit::To(next) => self.enter_phase(next, entry_delay, telemetry),
            PhaseExit::LoopUntil {
                target,
                back_to,
                then,
            } => {
                let pass = self.passes[self.phase_index].saturating_add(1);
                self.passes[self.phase_index] = pass;
                telemetry.record_loop_pass(self.phase_index, pass, target, self.tick);
                if pass >= target {
                    // Reset so a later visit to this loop starts fresh.
                    self.passes[self.phase_index] = 0;
                    telemetry.record_loop_exit(self.phase_index, pass, target, self.tick);
                    self.enter_phase(then, entry_delay, telemetry);
                } else {
                    self.enter_phase(back_to, entry_delay, telemetry);
                }
            }
            PhaseExit::Halt => self.enter_phase(self.phase_index, entry_delay, telemetry),
        }
    }

    fn enter_phase(&mut self, index: usize, entry_delay: Ticks, telemetry: &mut TelemetryRecorder) {
        let looping_in_place = index == self.phase_index;
        self.phase_index = index;
        self.cursor = 0;
        if !looping_in_place {
            telemetry.record_phase_entered(index, self.tick);
        }

        let phase = &self.script.phases[index];
        if matches!(phase.kind, PhaseKind::Idle) {
            self.mark_complete(telemetry);
        }

        self.gate = if entry_delay.is_zero() || matches!(phase.kind, PhaseKind::Idle) {
            initial_gate(phase)
        } else {
            GateState::EntryDelay {
                remaining: entry_delay.as_u16(),
            }
        };
    }

    fn mark_complete(&mut self, telemetry: &mut TelemetryRecorder) {
        if !self.complete_recorded {
            self.complete_recorded = true;
            telemetry.record_script_complete(self.tick);
        }
    }
}

fn initial_gate(phase: &Phase) -> GateState {
    match phase.kind {
        PhaseKind::Sync(_) => GateState::Sync { tick: 0 },
        PhaseKind::Table(_) => GateState::Drive,
        PhaseKind::Idle => GateState::Parked,
    }
}
