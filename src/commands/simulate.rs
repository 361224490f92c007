//! Simulate command - replay a time range under the simulated clock.
//!
//! Runs the full kiosk loop headless, with every log line stamped with the
//! simulated time. Invaluable for checking a new timetable before Ramadan:
//! `salatr simulate "2026-02-17 18:00:00" "2026-02-18 06:00:00"` replays the
//! first Taraweeh night in a second or two.

use anyhow::{Context, Result, anyhow};
use std::sync::Arc;

use crate::Salatr;
use crate::time_source::{self, SimulatedTimeSource};

/// Handle the simulate command.
pub fn handle_simulate_command(
    debug_enabled: bool,
    start_time: &str,
    end_time: &str,
    multiplier: f64,
) -> Result<()> {
    let start = time_source::parse_datetime(start_time).map_err(|e| anyhow!(e))?;
    let end = time_source::parse_datetime(end_time).map_err(|e| anyhow!(e))?;
    anyhow::ensure!(end > start, "end time must be after start time");

    time_source::init_time_source(Arc::new(SimulatedTimeSource::new(start, end, multiplier)));

    log_version!();
    log_block_start!("Simulating {} .. {}", start_time, end_time);
    if multiplier > 0.0 {
        log_indented!("Speed: {}x real time", multiplier);
    } else {
        log_indented!("Speed: fast-forward");
    }

    Salatr::new(debug_enabled)
        .without_lock()
        .headless()
        .run()
        .context("simulation run failed")
}
