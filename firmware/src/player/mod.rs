#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Report player bridging the portable engine with the firmware tasks.
//!
//! The player owns the engine and its telemetry ring. Every HID IN
//! opportunity pulls one report through [`Player::tick`], which also mirrors
//! fresh telemetry to defmt (or stdout on the host) and publishes progress
//! to the status atomics.

use autopad_core::engine::{Engine, TimingPolicy};
use autopad_core::report::Report;
use autopad_core::script::{Script, ScriptError};
use autopad_core::telemetry::{EventId, TelemetryRecord, TelemetryRecorder};

use crate::status;

#[cfg(not(any(
    feature = "script-eat-meat",
    feature = "script-open-card",
    feature = "script-mission"
)))]
compile_error!("enable exactly one script-* feature");

#[cfg(any(
    all(feature = "script-eat-meat", feature = "script-open-card"),
    all(feature = "script-eat-meat", feature = "script-mission"),
    all(feature = "script-open-card", feature = "script-mission"),
))]
compile_error!("enable exactly one script-* feature");

/// Script baked into this image.
#[cfg(feature = "script-eat-meat")]
#[must_use]
pub fn active_script() -> (Script, TimingPolicy) {
    // The blade-feeding timings were captured under the echo policy.
    (autopad_core::script::eat_meat_script(), TimingPolicy::legacy())
}

/// Script baked into this image.
#[cfg(feature = "script-open-card")]
#[must_use]
pub fn active_script() -> (Script, TimingPolicy) {
    (
        autopad_core::script::open_card_script(),
        TimingPolicy::HoldSettle,
    )
}

/// Script baked into this image.
#[cfg(feature = "script-mission")]
#[must_use]
pub fn active_script() -> (Script, TimingPolicy) {
    (
        autopad_core::script::mission_script(),
        TimingPolicy::HoldSettle,
    )
}

/// Owns the engine, its telemetry ring, and the log/status mirroring.
pub struct Player {
    engine: Engine,
    telemetry: TelemetryRecorder,
    logged_through: EventId,
}

impl Player {
    /// Builds a player for the image's baked-in script.
    pub fn from_active_script() -> Result<Self, ScriptError> {
        let (script, policy) = active_script();
        Self::new(script, policy)
    }

    pub fn new(script: Script, policy: TimingPolicy) -> Result<Self, ScriptError> {
        let engine = Engine::new(script, policy)?;
        Ok(Self {
            engine,
            telemetry: TelemetryRecorder::new(),
            logged_through: 0,
        })
    }

    /// Name of the script this player runs.
    #[must_use]
    pub fn script_name(&self) -> &'static str {
        self.engine.script().name
    }

    /// Returns `true` once the script has parked in its terminal phase.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.engine.is_done()
    }

    /// Produces the next report, mirrors telemetry, and publishes progress.
    pub fn tick(&mut self) -> Report {
        let report = self.engine.next_report(&mut self.telemetry);
        self.log_fresh_events();
        status::record_progress(
            self.engine.phase_index(),
            self.engine.ticks_elapsed(),
            self.engine.is_done(),
        );
        report
    }

    fn log_fresh_events(&mut self) {
        if self.telemetry.next_id() == self.logged_through {
            return;
        }
        for record in self.telemetry.oldest_first() {
            if record.id >= self.logged_through {
                log_event(self.engine.script(), record);
            }
        }
        self.logged_through = self.telemetry.next_id();
    }
}

fn log_event(script: &Script, record: &TelemetryRecord) {
    let phase_name = phase_label(script, record.event.to_raw());
    emit_log(record.event.to_raw(), phase_name, record.tick);
}

/// Resolves the phase index embedded in a raw event code, when present.
fn phase_label(script: &Script, raw: u16) -> &'static str {
    let band = raw & 0xFF00;
    if band == 0 {
        return "-";
    }
    let index = usize::from(raw) & 0x00FF;
    script
        .phases()
        .get(index)
        .map_or("?", |phase| phase.name)
}

#[cfg(target_os = "none")]
fn emit_log(code: u16, phase: &'static str, tick: u32) {
    defmt::info!(
        "player: event={=u16:#x} phase={=str} tick={=u32}",
        code,
        phase,
        tick
    );
}

#[cfg(not(target_os = "none"))]
fn emit_log(code: u16, phase: &'static str, tick: u32) {
    println!("player: event={code:#x} phase={phase} tick={tick}");
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test body: the status atomics are process-global.
    #[test]
    fn active_script_publishes_progress_through_the_sync_burst() {
        let mut player = Player::from_active_script().unwrap();
        assert!(!player.is_done());

        let first = player.tick();
        assert!(first.is_neutral());

        let progress = status::snapshot();
        assert_eq!(progress.phase_index, 0);
        assert_eq!(progress.ticks_elapsed, 1);
        assert!(!progress.done);

        for _ in 0..100 {
            player.tick();
        }
        assert_eq!(status::snapshot().phase_index, 1);
        assert!(!player.is_done());
    }
}
