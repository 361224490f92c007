//! Application coordinator: resource lifecycle and the tick driver.
//!
//! `Salatr` owns everything with a lifetime (the single-instance lock, the
//! signal handler, the config watcher, the terminal) and runs the main
//! loop. Each iteration takes a fresh wall-clock reading, resolves exactly
//! one [`DisplayState`] from a consistent snapshot of schedule and settings,
//! draws it, then blocks until the next whole second or an early wakeup
//! (reload signal, config change, shutdown).
//!
//! Builder methods support the non-kiosk contexts:
//! - `Salatr::new(debug).run()`: normal kiosk startup
//! - `Salatr::new(debug).without_lock().headless().run()`: simulation,
//!   where state transitions are logged instead of rendered

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::atomic::Ordering;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, SystemTime};

use crate::config::{self, Config};
use crate::core::{self, DisplayState};
use crate::display::{Frame, Renderer, format_countdown};
use crate::hijri;
use crate::lock;
use crate::logger::Log;
use crate::schedule::{self, PrayerName, ScheduleOutcome, Timetable};
use crate::signals::{SignalMessage, SignalState, setup_signal_handler};
use crate::time_source;

/// Builder for configuring and running the kiosk.
pub struct Salatr {
    debug_enabled: bool,
    create_lock: bool,
    headless: bool,
}

/// Owned summary of the last announced state, for change detection.
/// Countdowns are deliberately excluded so a ticking countdown is one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StateSnapshot {
    kind: &'static str,
    prayer: PrayerName,
}

impl StateSnapshot {
    fn of(state: &DisplayState) -> Self {
        Self {
            kind: state.kind_str(),
            prayer: state.prayer().name,
        }
    }
}

impl Salatr {
    /// Create a new runner with defaults matching normal kiosk startup.
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            create_lock: true,
            headless: false,
        }
    }

    /// Skip lock file creation (simulation runs alongside a live kiosk).
    pub fn without_lock(mut self) -> Self {
        self.create_lock = false;
        self
    }

    /// Log state transitions instead of drawing frames.
    pub fn headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Execute the kiosk with the configured settings.
    pub fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        config.log_config();

        let _lock = if self.create_lock {
            Some(lock::acquire_lock().context("failed to acquire single-instance lock")?)
        } else {
            None
        };

        let signal_state = setup_signal_handler(self.debug_enabled)?;
        config::start_config_watcher(
            &config,
            signal_state.signal_sender.clone(),
            self.debug_enabled,
        )?;

        let mut timetable = load_timetable(&config);
        let mut schedule_date = time_source::now().date_naive();
        let mut outcome = build_schedule(schedule_date, &config, timetable.as_ref());
        log_outcome(&outcome, schedule_date);

        let mut renderer = if self.headless {
            None
        } else {
            let renderer = Renderer::new().context("failed to take over the terminal")?;
            // The frame owns the screen now; route nothing through stdout.
            Log::set_enabled(false);
            Some(renderer)
        };

        let mut last_snapshot: Option<StateSnapshot> = None;
        let mut last_wall = time_source::system_now();
        let mut needs_rebuild = false;

        while signal_state.running.load(Ordering::SeqCst) && !time_source::simulation_ended() {
            let now = time_source::now();

            // A suspend/resume gap or a day rollover invalidates the schedule.
            let wall = time_source::system_now();
            if wall_clock_jumped(last_wall, wall) {
                log_pipe!();
                log_warning!("Wall clock jumped; rebuilding today's schedule");
                needs_rebuild = true;
            }
            last_wall = wall;

            if needs_rebuild || now.date_naive() != schedule_date {
                needs_rebuild = false;
                schedule_date = now.date_naive();
                outcome = build_schedule(schedule_date, &config, timetable.as_ref());
                log_outcome(&outcome, schedule_date);
                last_snapshot = None;
            }

            let logic = config.logic();
            let taraweeh = config.taraweeh();

            let state = match &outcome {
                ScheduleOutcome::Ready(schedule) => Some(core::resolve_display_state(
                    schedule, &logic, &taraweeh, now,
                )),
                ScheduleOutcome::Unavailable { .. } => None,
            };

            let snapshot = state.as_ref().map(StateSnapshot::of);
            if snapshot != last_snapshot {
                if let Some(ref state) = state {
                    announce_state(state);
                }
                last_snapshot = snapshot;
            }

            if let Some(renderer) = renderer.as_mut() {
                let maghrib_adhan = match &outcome {
                    ScheduleOutcome::Ready(schedule) => {
                        schedule.get(PrayerName::Maghrib).map(|p| p.adhan)
                    }
                    ScheduleOutcome::Unavailable { .. } => None,
                };
                let frame = Frame {
                    now,
                    masjid_name: config.masjid_name(),
                    sub_location: config.sub_location(),
                    hijri: hijri::for_display(now, maghrib_adhan, config.hijri_offset()),
                    outcome: &outcome,
                    state,
                    logic: &logic,
                    taraweeh: &taraweeh,
                };
                renderer.draw(&frame)?;
            }

            // Sleep to the next whole second, waking early for messages.
            match wait_for_tick(&signal_state, millis_until_next_tick(now)) {
                Some(SignalMessage::Shutdown) => break,
                Some(SignalMessage::Reload) => {
                    match Config::load() {
                        Ok(new_config) => {
                            config = new_config;
                            timetable = load_timetable(&config);
                            needs_rebuild = true;
                            if self.debug_enabled {
                                log_pipe!();
                                log_debug!("Configuration reloaded");
                            }
                        }
                        Err(e) => {
                            log_pipe!();
                            log_warning!(
                                "Reload failed, keeping previous configuration: {:#}",
                                e
                            );
                        }
                    }
                    // Re-evaluate immediately, off the one-second cadence.
                    continue;
                }
                None => {}
            }
        }

        drop(renderer);
        Log::set_enabled(true);
        log_block_start!("Shutting down salatr");
        log_end!();
        Ok(())
    }
}

/// Load the configured timetable, degrading to fallback times on error.
fn load_timetable(config: &Config) -> Option<Timetable> {
    let path = match config.timetable_path() {
        Ok(Some(path)) => path,
        Ok(None) => return None,
        Err(e) => {
            log_pipe!();
            log_warning!("Cannot resolve timetable path: {:#}", e);
            return None;
        }
    };
    match Timetable::load(&path) {
        Ok(timetable) => {
            log_block_start!("Loaded timetable ({} days)", timetable.len());
            log_indented!("{}", path.display());
            Some(timetable)
        }
        Err(e) => {
            log_pipe!();
            log_warning!("Timetable unavailable, using fallback times: {:#}", e);
            None
        }
    }
}

/// Build the schedule for `date` from timetable and fallback times.
fn build_schedule(
    date: NaiveDate,
    config: &Config,
    timetable: Option<&Timetable>,
) -> ScheduleOutcome {
    let manual = match config.manual_day_times() {
        Ok(manual) => manual,
        // Validation already rejected unparseable times; treat a late error
        // as "no fallback" rather than killing the kiosk.
        Err(_) => None,
    };
    schedule::build_for_date(
        date,
        timetable,
        manual.as_ref(),
        &config.taraweeh(),
        config.hijri_offset(),
    )
}

fn log_outcome(outcome: &ScheduleOutcome, date: NaiveDate) {
    match outcome {
        ScheduleOutcome::Ready(schedule) => {
            log_block_start!("Prayer schedule for {}", date);
            for prayer in schedule.prayers() {
                log_indented!(
                    "{:<8} azan {}  jamat {}",
                    prayer.name.as_str(),
                    prayer.adhan_label,
                    prayer.iqama_label
                );
            }
        }
        ScheduleOutcome::Unavailable { reason } => {
            log_pipe!();
            log_error!("Schedule unavailable: {}", reason);
            log_indented!("The display will show a diagnostic until this is fixed");
        }
    }
}

/// Announce a state transition in the log (visible in headless/simulate runs).
fn announce_state(state: &DisplayState) {
    let name = state.prayer().name;
    match state {
        DisplayState::PreAdhan {
            countdown_seconds, ..
        } => log_block_start!("{} azan in {}s", name, countdown_seconds),
        DisplayState::AdhanMoment { .. } => log_block_start!("{} azan", name),
        DisplayState::IqamaWait {
            countdown_seconds, ..
        } => log_block_start!(
            "Waiting for {} jamat ({} remaining)",
            name,
            format_countdown(*countdown_seconds)
        ),
        DisplayState::PreIqama {
            countdown_seconds, ..
        } => log_block_start!("{} jamat in {}s", name, countdown_seconds),
        DisplayState::PrayerInProgress { .. } => log_block_start!("Now praying {}", name),
        DisplayState::NextPrayer {
            prayer,
            countdown_seconds,
            tomorrow,
        } => log_block_start!(
            "Next prayer: {} at {}{} ({})",
            name,
            prayer.adhan_label,
            if *tomorrow { " tomorrow" } else { "" },
            format_countdown(*countdown_seconds)
        ),
    }
}

/// Milliseconds until the next whole wall-clock second.
fn millis_until_next_tick(now: chrono::DateTime<chrono::Local>) -> Duration {
    let subsec = now.timestamp_subsec_millis() as u64;
    Duration::from_millis((crate::constants::TICK_INTERVAL_MILLIS - subsec % 1000).max(1))
}

/// Block until the next tick, returning early with any pending message.
fn wait_for_tick(signal_state: &SignalState, wait: Duration) -> Option<SignalMessage> {
    if time_source::is_simulated() {
        // Simulated time: advance the clock, then drain without blocking.
        time_source::sleep(wait);
        signal_state.signal_receiver.try_recv().ok()
    } else {
        match signal_state.signal_receiver.recv_timeout(wait) {
            Ok(msg) => Some(msg),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Detect suspend/resume or manual clock changes between two ticks.
///
/// Small forward drift is normal; anything beyond the threshold (either
/// direction) means our schedule may belong to the wrong day.
fn wall_clock_jumped(previous: SystemTime, current: SystemTime) -> bool {
    let threshold = Duration::from_secs(crate::constants::TIME_JUMP_THRESHOLD_SECS);
    match current.duration_since(previous) {
        Ok(elapsed) => elapsed >= threshold,
        // Clock went backwards; NTP nudges are tiny, bigger means trouble.
        Err(e) => e.duration() >= threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_jump_detection() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        assert!(!wall_clock_jumped(base, base + Duration::from_secs(1)));
        assert!(!wall_clock_jumped(base, base + Duration::from_secs(29)));
        assert!(wall_clock_jumped(base, base + Duration::from_secs(31)));
        // Backwards jumps count too.
        assert!(wall_clock_jumped(base + Duration::from_secs(120), base));
        assert!(!wall_clock_jumped(base + Duration::from_secs(2), base));
    }

    #[test]
    fn tick_lands_on_the_next_whole_second() {
        use chrono::TimeZone;
        let now = chrono::Local
            .with_ymd_and_hms(2026, 3, 6, 12, 0, 0)
            .unwrap();
        assert_eq!(millis_until_next_tick(now), Duration::from_millis(1000));

        let now = now + chrono::Duration::milliseconds(750);
        assert_eq!(millis_until_next_tick(now), Duration::from_millis(250));
    }
}
