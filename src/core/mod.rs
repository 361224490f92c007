//! The display-state engine.
//!
//! Once per second (and immediately after any schedule or settings change)
//! the kiosk asks this module one question: what should the hero panel show
//! right now? The answer is a single [`DisplayState`], resolved
//! deterministically from the day's [`PrayerSchedule`], the configured
//! offsets, and one wall-clock reading.
//!
//! Resolution walks the prayers in canonical order and, per prayer, its
//! windows in a fixed priority order ([`WINDOW_PRIORITY`]), returning the
//! first match. The priority order is not chronological: a pre-iqama
//! countdown outranks everything else for its prayer, so that when windows
//! overlap (tightly spaced iqama, or a placeholder prayer whose iqama equals
//! its adhan) the most actionable screen wins. When nothing matches, the
//! fallback picks the chronologically nearest upcoming adhan, wrapping to
//! the first prayer of the next day after Isha (or Taraweeh) has ended.
//!
//! Everything here is a pure function of its inputs: no clock reads, no
//! shared state, no I/O. The tick driver in [`crate::salatr`] owns the loop.

pub mod windows;

pub use windows::{PrayerWindows, WindowKind};

use chrono::{DateTime, Duration, Local};
use serde::Serialize;

use crate::constants::{
    DEFAULT_ADHAN_DURATION_SECONDS, DEFAULT_PRAYER_DURATION_MINUTES, DEFAULT_PRE_ADHAN_SECONDS,
    DEFAULT_PRE_IQAMA_SECONDS, DEFAULT_TARAWEEH_ADHAN_OFFSET_MINUTES,
    DEFAULT_TARAWEEH_IQAMA_OFFSET_MINUTES,
};
use crate::schedule::{Prayer, PrayerSchedule};

/// The four offsets that shape every prayer's windows.
///
/// Values are validated at the settings boundary (see `config::validation`);
/// the engine itself trusts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogicConfig {
    pub pre_adhan_seconds: u64,
    pub adhan_duration_seconds: u64,
    pub pre_iqama_seconds: u64,
    pub prayer_duration_minutes: u64,
}

impl Default for LogicConfig {
    fn default() -> Self {
        Self {
            pre_adhan_seconds: DEFAULT_PRE_ADHAN_SECONDS,
            adhan_duration_seconds: DEFAULT_ADHAN_DURATION_SECONDS,
            pre_iqama_seconds: DEFAULT_PRE_IQAMA_SECONDS,
            prayer_duration_minutes: DEFAULT_PRAYER_DURATION_MINUTES,
        }
    }
}

/// Taraweeh-specific settings.
///
/// Only `duration_minutes` is read by the engine. The two offsets are
/// consumed by the schedule builder, which derives the Taraweeh instants
/// from the Isha iqama on Ramadan nights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaraweehConfig {
    pub duration_minutes: Option<u64>,
    pub adhan_offset_minutes: u64,
    pub iqama_offset_minutes: u64,
}

impl Default for TaraweehConfig {
    fn default() -> Self {
        Self {
            duration_minutes: None,
            adhan_offset_minutes: DEFAULT_TARAWEEH_ADHAN_OFFSET_MINUTES,
            iqama_offset_minutes: DEFAULT_TARAWEEH_IQAMA_OFFSET_MINUTES,
        }
    }
}

/// What the hero panel shows at one evaluated instant.
///
/// Exactly one variant holds at any time; a fresh value is computed every
/// tick and never mutated. Countdowns are whole seconds, floored, measured
/// from the instant of evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState<'a> {
    /// Default state: counting down to the nearest upcoming adhan.
    /// `tomorrow` marks the post-Isha wraparound to the next day's first
    /// prayer.
    NextPrayer {
        prayer: &'a Prayer,
        countdown_seconds: i64,
        tomorrow: bool,
    },
    /// Final countdown to the adhan.
    PreAdhan {
        prayer: &'a Prayer,
        countdown_seconds: i64,
    },
    /// The adhan is being called; no countdown.
    AdhanMoment { prayer: &'a Prayer },
    /// Between adhan and the pre-iqama countdown; counts down to the iqama.
    IqamaWait {
        prayer: &'a Prayer,
        countdown_seconds: i64,
    },
    /// Final countdown to the iqama.
    PreIqama {
        prayer: &'a Prayer,
        countdown_seconds: i64,
    },
    /// Congregation is praying; no countdown.
    PrayerInProgress { prayer: &'a Prayer },
}

impl<'a> DisplayState<'a> {
    /// The prayer this state is about.
    pub fn prayer(&self) -> &'a Prayer {
        match self {
            DisplayState::NextPrayer { prayer, .. }
            | DisplayState::PreAdhan { prayer, .. }
            | DisplayState::AdhanMoment { prayer }
            | DisplayState::IqamaWait { prayer, .. }
            | DisplayState::PreIqama { prayer, .. }
            | DisplayState::PrayerInProgress { prayer } => prayer,
        }
    }

    /// Remaining seconds, if this state carries a countdown.
    pub fn countdown_seconds(&self) -> Option<i64> {
        match self {
            DisplayState::NextPrayer {
                countdown_seconds, ..
            }
            | DisplayState::PreAdhan {
                countdown_seconds, ..
            }
            | DisplayState::IqamaWait {
                countdown_seconds, ..
            }
            | DisplayState::PreIqama {
                countdown_seconds, ..
            } => Some(*countdown_seconds),
            DisplayState::AdhanMoment { .. } | DisplayState::PrayerInProgress { .. } => None,
        }
    }

    /// Short lowercase tag for logs and the status command.
    pub fn kind_str(&self) -> &'static str {
        match self {
            DisplayState::NextPrayer { .. } => "next-prayer",
            DisplayState::PreAdhan { .. } => "pre-adhan",
            DisplayState::AdhanMoment { .. } => "adhan",
            DisplayState::IqamaWait { .. } => "iqama-wait",
            DisplayState::PreIqama { .. } => "pre-iqama",
            DisplayState::PrayerInProgress { .. } => "prayer-in-progress",
        }
    }
}

/// The rule table: window kinds in evaluation order, highest priority first.
///
/// Kept as data rather than nested conditionals so the ordering is auditable
/// and testable on its own.
pub const WINDOW_PRIORITY: [WindowKind; 5] = [
    WindowKind::PreIqama,
    WindowKind::PreAdhan,
    WindowKind::AdhanMoment,
    WindowKind::IqamaWait,
    WindowKind::PrayerInProgress,
];

/// Resolve the display state for `now`.
///
/// Pure function; returns exactly one state per call. The first prayer (in
/// canonical order) with a matching window of the highest available priority
/// wins, which keeps the result deterministic even when windows of several
/// prayers overlap at a boundary instant.
pub fn resolve_display_state<'a>(
    schedule: &'a PrayerSchedule,
    logic: &LogicConfig,
    taraweeh: &TaraweehConfig,
    now: DateTime<Local>,
) -> DisplayState<'a> {
    for prayer in schedule.prayers() {
        let windows = PrayerWindows::compute(prayer, logic, taraweeh);
        for kind in WINDOW_PRIORITY {
            if windows.contains(kind, now) {
                return state_for(kind, prayer, &windows, now);
            }
        }
    }
    next_prayer(schedule, now)
}

/// Is `now` inside this prayer's in-progress window?
///
/// This is the row-highlight predicate for the timetable view. It delegates
/// to the same window calculation the resolver uses, so the table and the
/// hero panel can never disagree about whether a prayer is running.
pub fn is_prayer_currently_active(
    prayer: &Prayer,
    logic: &LogicConfig,
    taraweeh: &TaraweehConfig,
    now: DateTime<Local>,
) -> bool {
    PrayerWindows::compute(prayer, logic, taraweeh).contains(WindowKind::PrayerInProgress, now)
}

/// Build the state for a matched window.
fn state_for<'a>(
    kind: WindowKind,
    prayer: &'a Prayer,
    windows: &PrayerWindows,
    now: DateTime<Local>,
) -> DisplayState<'a> {
    match kind {
        WindowKind::PreAdhan => DisplayState::PreAdhan {
            prayer,
            countdown_seconds: whole_seconds_until(windows.adhan, now),
        },
        WindowKind::AdhanMoment => DisplayState::AdhanMoment { prayer },
        // IqamaWait counts down to the iqama itself, not to the window end.
        WindowKind::IqamaWait => DisplayState::IqamaWait {
            prayer,
            countdown_seconds: whole_seconds_until(windows.iqama, now),
        },
        WindowKind::PreIqama => DisplayState::PreIqama {
            prayer,
            countdown_seconds: whole_seconds_until(windows.iqama, now),
        },
        WindowKind::PrayerInProgress => DisplayState::PrayerInProgress { prayer },
    }
}

/// Fallback when no window matched: the nearest strictly-future adhan,
/// wrapping to the first prayer of the next calendar day when today's are
/// all past.
fn next_prayer<'a>(schedule: &'a PrayerSchedule, now: DateTime<Local>) -> DisplayState<'a> {
    let upcoming = schedule
        .prayers()
        .iter()
        .filter(|p| p.adhan > now)
        .min_by_key(|p| p.adhan);

    match upcoming {
        Some(prayer) => DisplayState::NextPrayer {
            prayer,
            countdown_seconds: whole_seconds_until(prayer.adhan, now),
            tomorrow: false,
        },
        None => {
            let prayer = schedule.first();
            let target = prayer.adhan + Duration::days(1);
            DisplayState::NextPrayer {
                prayer,
                countdown_seconds: whole_seconds_until(target, now),
                tomorrow: true,
            }
        }
    }
}

/// Floored whole seconds from `now` until `target`.
fn whole_seconds_until(target: DateTime<Local>, now: DateTime<Local>) -> i64 {
    (target - now).num_seconds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::PrayerName;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 6, h, m, s).unwrap()
    }

    fn prayer(name: PrayerName, adhan: DateTime<Local>, iqama: DateTime<Local>) -> Prayer {
        Prayer::new(
            name,
            adhan,
            iqama,
            adhan.format("%I:%M %p").to_string(),
            iqama.format("%I:%M %p").to_string(),
        )
        .unwrap()
    }

    fn logic() -> LogicConfig {
        LogicConfig {
            pre_adhan_seconds: 60,
            adhan_duration_seconds: 60,
            pre_iqama_seconds: 30,
            prayer_duration_minutes: 10,
        }
    }

    /// Fajr 05:00/05:20 and Dhuhr 13:00/13:15, the §8-style day.
    fn two_prayer_day() -> PrayerSchedule {
        PrayerSchedule::new(vec![
            prayer(PrayerName::Fajr, at(5, 0, 0), at(5, 20, 0)),
            prayer(PrayerName::Dhuhr, at(13, 0, 0), at(13, 15, 0)),
        ])
        .unwrap()
    }

    #[test]
    fn full_fajr_cycle() {
        let schedule = two_prayer_day();
        let taraweeh = TaraweehConfig::default();
        let cfg = logic();
        let resolve = |now| resolve_display_state(&schedule, &cfg, &taraweeh, now);

        assert_eq!(
            resolve(at(4, 59, 5)),
            DisplayState::PreAdhan {
                prayer: schedule.get(PrayerName::Fajr).unwrap(),
                countdown_seconds: 55,
            }
        );
        assert_eq!(
            resolve(at(5, 0, 30)),
            DisplayState::AdhanMoment {
                prayer: schedule.get(PrayerName::Fajr).unwrap(),
            }
        );
        assert_eq!(
            resolve(at(5, 1, 30)),
            DisplayState::IqamaWait {
                prayer: schedule.get(PrayerName::Fajr).unwrap(),
                countdown_seconds: 1110,
            }
        );
        assert_eq!(
            resolve(at(5, 19, 45)),
            DisplayState::PreIqama {
                prayer: schedule.get(PrayerName::Fajr).unwrap(),
                countdown_seconds: 15,
            }
        );
        assert_eq!(
            resolve(at(5, 20, 30)),
            DisplayState::PrayerInProgress {
                prayer: schedule.get(PrayerName::Fajr).unwrap(),
            }
        );
        // After Fajr ends the display points at Dhuhr.
        match resolve(at(5, 31, 0)) {
            DisplayState::NextPrayer {
                prayer,
                countdown_seconds,
                tomorrow,
            } => {
                assert_eq!(prayer.name, PrayerName::Dhuhr);
                assert_eq!(countdown_seconds, (at(13, 0, 0) - at(5, 31, 0)).num_seconds());
                assert!(!tomorrow);
            }
            other => panic!("expected NextPrayer, got {other:?}"),
        }
    }

    #[test]
    fn boundary_instants_belong_to_the_later_window() {
        let schedule = two_prayer_day();
        let taraweeh = TaraweehConfig::default();
        let cfg = logic();

        assert_eq!(
            resolve_display_state(&schedule, &cfg, &taraweeh, at(4, 59, 0)),
            DisplayState::PreAdhan {
                prayer: schedule.get(PrayerName::Fajr).unwrap(),
                countdown_seconds: 60,
            }
        );
        assert_eq!(
            resolve_display_state(&schedule, &cfg, &taraweeh, at(5, 0, 0)),
            DisplayState::AdhanMoment {
                prayer: schedule.get(PrayerName::Fajr).unwrap(),
            }
        );
    }

    #[test]
    fn collapsed_iqama_wait_jumps_to_pre_iqama() {
        // Iqama 75s after adhan: the wait window [A+60, I-30) is degenerate.
        let schedule = PrayerSchedule::new(vec![prayer(
            PrayerName::Maghrib,
            at(18, 0, 0),
            at(18, 1, 15),
        )])
        .unwrap();
        let taraweeh = TaraweehConfig::default();
        let cfg = logic();

        // Just past the adhan screen: straight into PreIqama.
        assert_eq!(
            resolve_display_state(&schedule, &cfg, &taraweeh, at(18, 1, 0)),
            DisplayState::PreIqama {
                prayer: schedule.get(PrayerName::Maghrib).unwrap(),
                countdown_seconds: 15,
            }
        );
    }

    #[test]
    fn pre_iqama_outranks_pre_adhan_within_a_prayer() {
        // Placeholder entry with iqama == adhan: at A-20 both the PreAdhan
        // and PreIqama windows contain now; priority picks PreIqama.
        let schedule =
            PrayerSchedule::new(vec![prayer(PrayerName::Dhuhr, at(13, 0, 0), at(13, 0, 0))])
                .unwrap();
        let cfg = logic();
        let taraweeh = TaraweehConfig::default();

        assert_eq!(
            resolve_display_state(&schedule, &cfg, &taraweeh, at(12, 59, 40)),
            DisplayState::PreIqama {
                prayer: schedule.get(PrayerName::Dhuhr).unwrap(),
                countdown_seconds: 20,
            }
        );
    }

    #[test]
    fn earlier_prayer_wins_on_overlap() {
        // Asr's in-progress window still covers Maghrib's pre-adhan window;
        // canonical order makes Asr the winner for its whole duration.
        let schedule = PrayerSchedule::new(vec![
            prayer(PrayerName::Asr, at(17, 0, 0), at(17, 10, 0)),
            prayer(PrayerName::Maghrib, at(17, 15, 0), at(17, 25, 0)),
        ])
        .unwrap();
        let cfg = logic();
        let taraweeh = TaraweehConfig::default();

        assert_eq!(
            resolve_display_state(&schedule, &cfg, &taraweeh, at(17, 14, 30)),
            DisplayState::PrayerInProgress {
                prayer: schedule.get(PrayerName::Asr).unwrap(),
            }
        );
        // Once Asr ends, Maghrib (whose adhan screen already elapsed while
        // Asr was running) surfaces in its iqama wait.
        assert_eq!(
            resolve_display_state(&schedule, &cfg, &taraweeh, at(17, 20, 0)),
            DisplayState::IqamaWait {
                prayer: schedule.get(PrayerName::Maghrib).unwrap(),
                countdown_seconds: 300,
            }
        );
    }

    #[test]
    fn wraps_to_tomorrow_after_the_last_prayer() {
        let schedule = PrayerSchedule::new(vec![
            prayer(PrayerName::Fajr, at(5, 0, 0), at(5, 20, 0)),
            prayer(PrayerName::Isha, at(21, 0, 0), at(21, 30, 0)),
        ])
        .unwrap();
        let cfg = logic();
        let taraweeh = TaraweehConfig::default();

        match resolve_display_state(&schedule, &cfg, &taraweeh, at(22, 0, 0)) {
            DisplayState::NextPrayer {
                prayer,
                countdown_seconds,
                tomorrow,
            } => {
                assert_eq!(prayer.name, PrayerName::Fajr);
                assert!(tomorrow);
                // 22:00 -> 05:00 next day is exactly seven hours.
                assert_eq!(countdown_seconds, 7 * 3600);
            }
            other => panic!("expected NextPrayer, got {other:?}"),
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let schedule = two_prayer_day();
        let cfg = logic();
        let taraweeh = TaraweehConfig::default();

        for now in [at(4, 59, 30), at(5, 0, 0), at(5, 10, 0), at(23, 50, 0)] {
            let a = resolve_display_state(&schedule, &cfg, &taraweeh, now);
            let b = resolve_display_state(&schedule, &cfg, &taraweeh, now);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn list_predicate_matches_the_in_progress_window() {
        let schedule = two_prayer_day();
        let cfg = logic();
        let taraweeh = TaraweehConfig::default();
        let fajr = schedule.get(PrayerName::Fajr).unwrap();

        assert!(!is_prayer_currently_active(fajr, &cfg, &taraweeh, at(5, 19, 59)));
        assert!(is_prayer_currently_active(fajr, &cfg, &taraweeh, at(5, 20, 0)));
        assert!(is_prayer_currently_active(fajr, &cfg, &taraweeh, at(5, 29, 59)));
        assert!(!is_prayer_currently_active(fajr, &cfg, &taraweeh, at(5, 30, 0)));
    }
}
