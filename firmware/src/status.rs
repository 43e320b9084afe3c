#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Shared progress storage for the firmware target.
//!
//! Lightweight atomics expose the player's position to the other tasks, so
//! the alert task can react to completion without sharing mutable state with
//! the USB report pump.

use portable_atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

/// Index of the phase the player is currently executing.
static PHASE_INDEX: AtomicU8 = AtomicU8::new(0);
/// Ticks emitted since power-on.
static TICKS_ELAPSED: AtomicU32 = AtomicU32::new(0);
/// Set once the script reaches its terminal phase.
static SCRIPT_DONE: AtomicBool = AtomicBool::new(false);

/// Progress values captured at a single point in time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ProgressSnapshot {
    pub phase_index: u8,
    pub ticks_elapsed: u32,
    pub done: bool,
}

/// Publishes the player's position after a tick.
pub fn record_progress(phase_index: usize, ticks_elapsed: u32, done: bool) {
    let phase = match u8::try_from(phase_index) {
        Ok(value) => value,
        Err(_) => u8::MAX,
    };
    PHASE_INDEX.store(phase, Ordering::Relaxed);
    TICKS_ELAPSED.store(ticks_elapsed, Ordering::Relaxed);
    SCRIPT_DONE.store(done, Ordering::Relaxed);
}

/// Returns `true` once the script has parked in its terminal phase.
pub fn is_done() -> bool {
    SCRIPT_DONE.load(Ordering::Relaxed)
}

/// Builds a [`ProgressSnapshot`] from the stored values.
pub fn snapshot() -> ProgressSnapshot {
    ProgressSnapshot {
        phase_index: PHASE_INDEX.load(Ordering::Relaxed),
        ticks_elapsed: TICKS_ELAPSED.load(Ordering::Relaxed),
        done: SCRIPT_DONE.load(Ordering::Relaxed),
    }
}
