#![no_std]

// Shared report-sequencing engine for the autopad feature set.
//
// This crate stays portable across MCU firmware and host tooling by avoiding the
// Rust standard library and exposing abstractions the other crates can adopt.

pub mod engine;
pub mod report;
pub mod script;
pub mod telemetry;
