//! # Salatr Library
//!
//! Internal library for the salatr binary.
//!
//! This library exists to enable testing of the display engine and schedule
//! logic, and to keep CLI dispatch (main.rs) separate from application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Salatr` struct owns resources and the main loop
//! - **Display Engine**: `core` resolves the per-second `DisplayState` from
//!   prayer windows; `display` renders it
//! - **Schedule**: `schedule` builds each day's prayer instants from the CSV
//!   timetable and fallback times; `hijri` handles the Islamic calendar
//! - **Configuration**: `config` module for TOML settings with hot reload
//! - **Infrastructure**: signal handling, single-instance lock, logging,
//!   and the real/simulated time source

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

// Public API modules
pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod core;
pub mod display;
pub mod hijri;
pub mod lock;
pub mod schedule;
pub mod signals;
pub mod time_source;

// Internal modules
mod salatr;

// Re-export for binary
pub use salatr::Salatr;

// Fixtures shared between unit and integration tests
#[cfg(any(test, feature = "testing-support"))]
pub mod test_support;
