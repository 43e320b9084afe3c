//! Telemetry event catalog shared by firmware and host targets.
//!
//! The engine records a compact trace of phase transitions and loop progress
//! into a fixed-size ring. Events serialize to numeric codes so diagnostics
//! channels can forward them without string formatting on the device.

use core::fmt;

use heapless::{HistoryBuf, OldestOrdered};

/// Monotonically increasing identifier assigned to each recorded event.
pub type EventId = u32;

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 128;

/// Discriminated telemetry events emitted while a script runs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryEventKind {
    /// The engine entered the phase at this index.
    PhaseEntered(u8),
    /// A looping phase completed one pass.
    LoopPass(u8),
    /// A looping phase reached its target and took its exit edge.
    LoopExit(u8),
    /// The script reached its terminal phase.
    ScriptComplete,
    /// Unrecognized code preserved verbatim.
    Custom(u16),
}

impl fmt::Display for TelemetryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryEventKind::PhaseEntered(phase) => write!(f, "phase-entered {phase}"),
            TelemetryEventKind::LoopPass(phase) => write!(f, "loop-pass {phase}"),
            TelemetryEventKind::LoopExit(phase) => write!(f, "loop-exit {phase}"),
            TelemetryEventKind::ScriptComplete => f.write_str("script-complete"),
            TelemetryEventKind::Custom(code) => write!(f, "custom({code})"),
        }
    }
}

impl TelemetryEventKind {
    const SCRIPT_COMPLETE_CODE: u16 = 0x0001;
    const PHASE_ENTERED_BASE: u16 = 0x0100;
    const LOOP_PASS_BASE: u16 = 0x0200;
    const LOOP_EXIT_BASE: u16 = 0x0300;
    const BAND: u16 = 0x0100;

    /// Encodes the event into a compact transport-friendly discriminant.
    #[must_use]
    pub const fn to_raw(self) -> u16 {
        match self {
            TelemetryEventKind::PhaseEntered(phase) => Self::PHASE_ENTERED_BASE + phase as u16,
            TelemetryEventKind::LoopPass(phase) => Self::LOOP_PASS_BASE + phase as u16,
            TelemetryEventKind::LoopExit(phase) => Self::LOOP_EXIT_BASE + phase as u16,
            TelemetryEventKind::ScriptComplete => Self::SCRIPT_COMPLETE_CODE,
            TelemetryEventKind::Custom(code) => code,
        }
    }

    /// Decodes a raw discriminant, falling back to [`Custom`](Self::Custom).
    #[must_use]
    pub fn from_raw(code: u16) -> Self {
        match code {
            Self::SCRIPT_COMPLETE_CODE => TelemetryEventKind::ScriptComplete,
            value if (Self::PHASE_ENTERED_BASE..Self::LOOP_PASS_BASE).contains(&value) => {
                TelemetryEventKind::PhaseEntered(band_offset(value, Self::PHASE_ENTERED_BASE))
            }
            value if (Self::LOOP_PASS_BASE..Self::LOOP_EXIT_BASE).contains(&value) => {
                TelemetryEventKind::LoopPass(band_offset(value, Self::LOOP_PASS_BASE))
            }
            value if (Self::LOOP_EXIT_BASE..Self::LOOP_EXIT_BASE + Self::BAND).contains(&value) => {
                TelemetryEventKind::LoopExit(band_offset(value, Self::LOOP_EXIT_BASE))
            }
            other => TelemetryEventKind::Custom(other),
        }
    }
}

/// Payloads carried alongside telemetry events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryPayload {
    /// No additional metadata accompanies the event.
    None,
    /// Progress of a counted loop.
    Loop(LoopTelemetry),
    /// Summary of a completed script run.
    Completion(CompletionTelemetry),
}

/// Loop progress payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LoopTelemetry {
    pub pass: u16,
    pub target: u16,
}

impl LoopTelemetry {
    #[must_use]
    pub const fn new(pass: u16, target: u16) -> Self {
        Self { pass, target }
    }
}

/// Script completion payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CompletionTelemetry {
    /// Ticks elapsed from power-on to the terminal phase.
    pub total_ticks: u32,
}

impl CompletionTelemetry {
    #[must_use]
    pub const fn new(total_ticks: u32) -> Self {
        Self { total_ticks }
    }
}

/// Telemetry record stored in the ring buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TelemetryRecord {
    pub id: EventId,
    /// Tick counter value when the event was recorded.
    pub tick: u32,
    pub event: TelemetryEventKind,
    pub details: TelemetryPayload,
}

/// Telemetry ring buffer type alias.
pub type TelemetryRing<const CAPACITY: usize = TELEMETRY_RING_CAPACITY> =
    HistoryBuf<TelemetryRecord, CAPACITY>;

/// Records engine events into a fixed-size ring buffer.
pub struct TelemetryRecorder<const CAPACITY: usize = TELEMETRY_RING_CAPACITY> {
    ring: TelemetryRing<CAPACITY>,
    next_event_id: EventId,
}

impl<const CAPACITY: usize> TelemetryRecorder<CAPACITY> {
    /// Creates a new telemetry recorder with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_event_id: 0,
        }
    }

    /// Returns an iterator over the recorded telemetry in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, TelemetryRecord> {
        self.ring.oldest_ordered()
    }

    /// Returns the most recent telemetry record, if available.
    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.ring.recent()
    }

    /// Returns the number of records currently stored.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` when no telemetry records are stored.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Identifier the next recorded event will receive.
    #[must_use]
    pub fn next_id(&self) -> EventId {
        self.next_event_id
    }

    /// Records a phase entry.
    pub fn record_phase_entered(&mut self, phase: usize, tick: u32) -> EventId {
        self.record(
            TelemetryEventKind::PhaseEntered(truncate_index(phase)),
            TelemetryPayload::None,
            tick,
        )
    }

    /// Records one completed pass of a counted loop.
    pub fn record_loop_pass(&mut self, phase: usize, pass: u16, target: u16, tick: u32) -> EventId {
        self.record(
            TelemetryEventKind::LoopPass(truncate_index(phase)),
            TelemetryPayload::Loop(LoopTelemetry::new(pass, target)),
            tick,
        )
    }

    /// Records a counted loop reaching its target.
    pub fn record_loop_exit(&mut self, phase: usize, passes: u16, target: u16, tick: u32) -> EventId {
        self.record(
            TelemetryEventKind::LoopExit(truncate_index(phase)),
            TelemetryPayload::Loop(LoopTelemetry::new(passes, target)),
            tick,
        )
    }

    /// Records the script reaching its terminal phase.
    pub fn record_script_complete(&mut self, tick: u32) -> EventId {
        self.record(
            TelemetryEventKind::ScriptComplete,
            TelemetryPayload::Completion(CompletionTelemetry::new(tick)),
            tick,
        )
    }

    /// Records an arbitrary telemetry event with the supplied payload.
    pub fn record(
        &mut self,
        event: TelemetryEventKind,
        payload: TelemetryPayload,
        tick: u32,
    ) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);

        self.ring.write(TelemetryRecord {
            id,
            tick,
            event,
            details: payload,
        });

        id
    }
}

impl<const CAPACITY: usize> Default for TelemetryRecorder<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

fn band_offset(value: u16, base: u16) -> u8 {
    match u8::try_from(value - base) {
        Ok(offset) => offset,
        Err(_) => u8::MAX,
    }
}

fn truncate_index(index: usize) -> u8 {
    match u8::try_from(index) {
        Ok(value) => value,
        Err(_) => u8::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_codes_round_trip() {
        let fixtures = [
            TelemetryEventKind::PhaseEntered(0),
            TelemetryEventKind::PhaseEntered(8),
            TelemetryEventKind::LoopPass(4),
            TelemetryEventKind::LoopExit(7),
            TelemetryEventKind::ScriptComplete,
        ];

        for event in fixtures {
            assert_eq!(TelemetryEventKind::from_raw(event.to_raw()), event);
        }

        assert_eq!(
            TelemetryEventKind::from_raw(0xBEEF),
            TelemetryEventKind::Custom(0xBEEF)
        );
    }

    #[test]
    fn recorder_assigns_sequential_ids() {
        let mut recorder = TelemetryRecorder::<8>::new();
        assert!(recorder.is_empty());

        let first = recorder.record_phase_entered(1, 101);
        let second = recorder.record_loop_pass(2, 1, 300, 150);
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.next_id(), 2);

        let latest = recorder.latest().copied().unwrap();
        assert_eq!(latest.event, TelemetryEventKind::LoopPass(2));
        assert_eq!(latest.tick, 150);
        assert_eq!(
            latest.details,
            TelemetryPayload::Loop(LoopTelemetry::new(1, 300))
        );
    }

    #[test]
    fn ring_keeps_the_most_recent_records() {
        let mut recorder = TelemetryRecorder::<4>::new();
        for tick in 0..6u32 {
            recorder.record_phase_entered(tick as usize, tick);
        }

        assert_eq!(recorder.len(), 4);
        let oldest = recorder.oldest_first().next().copied().unwrap();
        assert_eq!(oldest.id, 2);
        assert_eq!(oldest.event, TelemetryEventKind::PhaseEntered(2));
    }

    #[test]
    fn completion_event_carries_the_final_tick() {
        let mut recorder = TelemetryRecorder::<8>::new();
        recorder.record_script_complete(42_000);

        let record = recorder.latest().copied().unwrap();
        assert_eq!(record.event, TelemetryEventKind::ScriptComplete);
        match record.details {
            TelemetryPayload::Completion(details) => assert_eq!(details.total_ticks, 42_000),
            _ => panic!("expected completion payload"),
        }
    }
}
