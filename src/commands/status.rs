//! Status command - print the currently resolved display state.
//!
//! Resolves the state from the same config, timetable and engine the kiosk
//! uses, so the output always agrees with what a kiosk started right now
//! would show. `--json` emits a machine-readable report for scripting
//! (waybar modules, home automation, health checks).

use anyhow::{Context, Result};
use serde_json::json;

use crate::config::Config;
use crate::core::{self, DisplayState};
use crate::display::format_countdown;
use crate::hijri;
use crate::schedule::{self, PrayerName, ScheduleOutcome, Timetable};
use crate::time_source;

/// Handle the status command.
pub fn handle_status_command(json: bool) -> Result<()> {
    let config = Config::load()?;

    let timetable = match config.timetable_path()? {
        Some(path) => Some(Timetable::load(&path)?),
        None => None,
    };

    let now = time_source::now();
    let date = now.date_naive();
    let manual = config.manual_day_times().context("invalid fallback times")?;
    let outcome = schedule::build_for_date(
        date,
        timetable.as_ref(),
        manual.as_ref(),
        &config.taraweeh(),
        config.hijri_offset(),
    );

    match outcome {
        ScheduleOutcome::Ready(schedule) => {
            let logic = config.logic();
            let taraweeh = config.taraweeh();
            let state = core::resolve_display_state(&schedule, &logic, &taraweeh, now);
            let maghrib_adhan = schedule.get(PrayerName::Maghrib).map(|p| p.adhan);
            let hijri_date = hijri::for_display(now, maghrib_adhan, config.hijri_offset());

            if json {
                let report = json!({
                    "now": now.to_rfc3339(),
                    "hijri": hijri_date.to_string(),
                    "state": serde_json::to_value(&state)?,
                    "schedule": serde_json::to_value(&schedule)?,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                log_version!();
                log_block_start!("Hijri date: {}", hijri_date);
                print_state(&state);
                log_end!();
            }
        }
        ScheduleOutcome::Unavailable { reason } => {
            if json {
                let report = json!({
                    "now": now.to_rfc3339(),
                    "error": reason,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                log_version!();
                log_pipe!();
                log_error!("Schedule unavailable: {}", reason);
                log_end!();
            }
        }
    }

    Ok(())
}

fn print_state(state: &DisplayState) {
    let name = state.prayer().name;
    match state {
        DisplayState::NextPrayer {
            prayer,
            countdown_seconds,
            tomorrow,
        } => {
            log_block_start!(
                "Next prayer: {} at {}{}",
                name,
                prayer.adhan_label,
                if *tomorrow { " (tomorrow)" } else { "" }
            );
            log_indented!("Azan in {}", format_countdown(*countdown_seconds));
        }
        DisplayState::PreAdhan {
            countdown_seconds, ..
        } => log_block_start!("{} azan in {}s", name, countdown_seconds),
        DisplayState::AdhanMoment { .. } => log_block_start!("{} azan is being called", name),
        DisplayState::IqamaWait {
            countdown_seconds, ..
        } => log_block_start!(
            "{} jamat in {}",
            name,
            format_countdown(*countdown_seconds)
        ),
        DisplayState::PreIqama {
            countdown_seconds, ..
        } => log_block_start!("{} jamat in {}s", name, countdown_seconds),
        DisplayState::PrayerInProgress { .. } => log_block_start!("{} is in progress", name),
    }
}
