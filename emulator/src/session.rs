use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use autopad_core::engine::{Engine, TimingPolicy};
use autopad_core::report::Report;
use autopad_core::script::{self, Script, TICK_PERIOD_MS};
use autopad_core::telemetry::{
    EventId, TelemetryEventKind, TelemetryPayload, TelemetryRecord, TelemetryRecorder,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TranscriptProfile {
    EatMeat,
    OpenCard,
    Mission,
}

impl TranscriptProfile {
    pub fn log_path(self) -> &'static str {
        match self {
            TranscriptProfile::EatMeat => "transcripts/eat-meat.log",
            TranscriptProfile::OpenCard => "transcripts/open-card.log",
            TranscriptProfile::Mission => "transcripts/mission.log",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            TranscriptProfile::EatMeat => "autopad emulator transcript: blade feeding",
            TranscriptProfile::OpenCard => "autopad emulator transcript: card pulls",
            TranscriptProfile::Mission => "autopad emulator transcript: mission farming",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, String> {
        if tag.eq_ignore_ascii_case("eat-meat") {
            Ok(Self::EatMeat)
        } else if tag.eq_ignore_ascii_case("open-card") {
            Ok(Self::OpenCard)
        } else if tag.eq_ignore_ascii_case("mission") {
            Ok(Self::Mission)
        } else {
            Err(format!("Unknown script profile `{tag}`"))
        }
    }

    fn script(self) -> (Script, TimingPolicy) {
        match self {
            // Blade-feeding timings were captured under the echo policy.
            TranscriptProfile::EatMeat => (script::eat_meat_script(), TimingPolicy::legacy()),
            TranscriptProfile::OpenCard => (script::open_card_script(), TimingPolicy::HoldSettle),
            TranscriptProfile::Mission => (script::mission_script(), TimingPolicy::HoldSettle),
        }
    }

    /// Tick budget with headroom over the profile's expected full run.
    pub fn default_budget(self) -> u32 {
        match self {
            TranscriptProfile::EatMeat => 200_000,
            TranscriptProfile::OpenCard => 300_000,
            TranscriptProfile::Mission => 700_000,
        }
    }
}

/// Result of driving one script to completion or to the tick budget.
pub struct Outcome {
    pub done: bool,
    pub ticks: u32,
    pub phase_changes: usize,
    pub final_phase: &'static str,
}

impl Outcome {
    pub fn emulated_millis(&self) -> u64 {
        u64::from(self.ticks) * u64::from(TICK_PERIOD_MS)
    }
}

/// Drives one engine tick-by-tick, mirroring what the firmware streams over
/// USB into a transcript file.
pub struct Session {
    engine: Engine,
    telemetry: TelemetryRecorder,
    logged_through: EventId,
    transcript: TranscriptLogger,
}

impl Session {
    pub fn new(profile: TranscriptProfile) -> io::Result<Self> {
        let (script, policy) = profile.script();
        let engine = Engine::new(script, policy)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
        let transcript = TranscriptLogger::new(profile)?;

        Ok(Self {
            engine,
            telemetry: TelemetryRecorder::new(),
            logged_through: 0,
            transcript,
        })
    }

    pub fn script_name(&self) -> &'static str {
        self.engine.script().name
    }

    /// Runs until the script parks or the tick budget is exhausted.
    pub fn run(&mut self, tick_budget: u32) -> io::Result<Outcome> {
        let mut previous = Report::neutral();
        let mut phase_changes = 0;

        for _ in 0..tick_budget {
            let report = self.engine.next_report(&mut self.telemetry);
            phase_changes += self.drain_telemetry()?;

            if report != previous {
                self.transcript
                    .pad_edge(self.engine.ticks_elapsed(), &report)?;
                previous = report;
            }

            if self.engine.is_done() {
                break;
            }
        }

        let outcome = Outcome {
            done: self.engine.is_done(),
            ticks: self.engine.ticks_elapsed(),
            phase_changes,
            final_phase: self.engine.phase_name(),
        };
        self.transcript.summary(&outcome)?;
        Ok(outcome)
    }

    fn drain_telemetry(&mut self) -> io::Result<usize> {
        if self.telemetry.next_id() == self.logged_through {
            return Ok(0);
        }

        let mut phase_changes = 0;
        let script = self.engine.script();
        let mut fresh: Vec<(u32, String, bool)> = Vec::new();
        for record in self.telemetry.oldest_first() {
            if record.id >= self.logged_through {
                fresh.push((
                    record.tick,
                    describe_event(script, record),
                    matches!(record.event, TelemetryEventKind::PhaseEntered(_)),
                ));
            }
        }
        self.logged_through = self.telemetry.next_id();

        for (tick, line, is_phase_entry) in fresh {
            if is_phase_entry {
                phase_changes += 1;
            }
            self.transcript.event(tick, &line)?;
        }
        Ok(phase_changes)
    }
}

fn describe_event(script: &Script, record: &TelemetryRecord) -> String {
    let raw = record.event.to_raw();
    let phase = if raw & 0xFF00 == 0 {
        "-"
    } else {
        script
            .phases()
            .get(usize::from(raw) & 0x00FF)
            .map_or("?", |phase| phase.name)
    };

    match record.details {
        TelemetryPayload::None => format!("{} phase={phase}", record.event),
        TelemetryPayload::Loop(info) => format!(
            "{} phase={phase} pass={}/{}",
            record.event, info.pass, info.target
        ),
        TelemetryPayload::Completion(info) => format!(
            "{} phase={phase} total-ticks={}",
            record.event, info.total_ticks
        ),
    }
}

struct TranscriptLogger {
    writer: BufWriter<std::fs::File>,
}

impl TranscriptLogger {
    fn new(profile: TranscriptProfile) -> io::Result<Self> {
        let path = Path::new(profile.log_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut logger = Self {
            writer: BufWriter::new(file),
        };

        logger.write_header(profile)?;
        Ok(logger)
    }

    fn write_header(&mut self, profile: TranscriptProfile) -> io::Result<()> {
        writeln!(self.writer, "# {}", profile.header())?;
        writeln!(
            self.writer,
            "# Offsets are ticks since power-on ({TICK_PERIOD_MS} ms each)"
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn event(&mut self, tick: u32, line: &str) -> io::Result<()> {
        writeln!(self.writer, "[+{tick:>8} t] EVT {line}")
    }

    fn pad_edge(&mut self, tick: u32, report: &Report) -> io::Result<()> {
        let bytes = report.as_bytes();
        write!(self.writer, "[+{tick:>8} t] PAD")?;
        for byte in bytes {
            write!(self.writer, " {byte:02x}")?;
        }
        writeln!(self.writer)
    }

    fn summary(&mut self, outcome: &Outcome) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "# {} after {} ticks ({} ms), {} phase changes, last phase `{}`",
            if outcome.done { "complete" } else { "incomplete" },
            outcome.ticks,
            outcome.emulated_millis(),
            outcome.phase_changes,
            outcome.final_phase,
        )?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_tags_round_trip() {
        assert_eq!(
            TranscriptProfile::from_tag("eat-meat"),
            Ok(TranscriptProfile::EatMeat)
        );
        assert_eq!(
            TranscriptProfile::from_tag("OPEN-CARD"),
            Ok(TranscriptProfile::OpenCard)
        );
        assert!(TranscriptProfile::from_tag("draw-cards").is_err());
    }

    #[test]
    fn open_card_session_finishes_inside_the_default_budget() {
        let profile = TranscriptProfile::OpenCard;
        let mut session = Session::new(profile).unwrap();
        let outcome = session.run(profile.default_budget()).unwrap();

        assert!(outcome.done);
        assert_eq!(outcome.final_phase, "done");
        // sync, prepare, draw, and the terminal phase.
        assert_eq!(outcome.phase_changes, 4);
    }

    #[test]
    fn starved_budget_reports_an_unfinished_run() {
        let mut session = Session::new(TranscriptProfile::Mission).unwrap();
        let outcome = session.run(50).unwrap();

        assert!(!outcome.done);
        assert_eq!(outcome.ticks, 50);
        assert_eq!(outcome.final_phase, "sync");
    }
}
