//! Per-prayer time window calculation.
//!
//! For one prayer with adhan instant `A` and iqama instant `I`, the display
//! logic carves the surrounding time into five candidate windows:
//!
//! | Window           | Interval                                      |
//! |------------------|-----------------------------------------------|
//! | PreAdhan         | `[A - pre_adhan, A)`                          |
//! | AdhanMoment      | `[A, A + adhan_duration)`                     |
//! | IqamaWait        | `[A + adhan_duration, I - pre_iqama)`         |
//! | PreIqama         | `[I - pre_iqama, I)`                          |
//! | PrayerInProgress | `[I, I + duration)`                           |
//!
//! Every interval is half-open: an instant equal to a window's start belongs
//! to that window, an instant equal to its end belongs to the next. The
//! IqamaWait window only exists when its bounds are non-degenerate; with a
//! short adhan-to-iqama gap the display goes straight from the adhan screen
//! to the pre-iqama countdown.

use chrono::{DateTime, Duration, Local};

use super::{LogicConfig, TaraweehConfig};
use crate::constants::DEFAULT_TARAWEEH_DURATION_MINUTES;
use crate::schedule::{Prayer, PrayerName};

/// Identifies one of the five candidate windows of a prayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    PreAdhan,
    AdhanMoment,
    IqamaWait,
    PreIqama,
    PrayerInProgress,
}

/// The absolute boundaries of one prayer's windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrayerWindows {
    pub pre_adhan_start: DateTime<Local>,
    pub adhan: DateTime<Local>,
    pub adhan_end: DateTime<Local>,
    pub pre_iqama_start: DateTime<Local>,
    pub iqama: DateTime<Local>,
    pub prayer_end: DateTime<Local>,
}

impl PrayerWindows {
    /// Compute the window boundaries for `prayer`.
    ///
    /// Taraweeh uses its own configured duration (falling back to
    /// `DEFAULT_TARAWEEH_DURATION_MINUTES`); every other prayer uses
    /// `logic.prayer_duration_minutes`.
    pub fn compute(prayer: &Prayer, logic: &LogicConfig, taraweeh: &TaraweehConfig) -> Self {
        let duration_minutes = if prayer.name == PrayerName::Taraweeh {
            taraweeh
                .duration_minutes
                .unwrap_or(DEFAULT_TARAWEEH_DURATION_MINUTES)
        } else {
            logic.prayer_duration_minutes
        };

        let adhan = prayer.adhan;
        let iqama = prayer.iqama;

        Self {
            pre_adhan_start: adhan - Duration::seconds(logic.pre_adhan_seconds as i64),
            adhan,
            adhan_end: adhan + Duration::seconds(logic.adhan_duration_seconds as i64),
            pre_iqama_start: iqama - Duration::seconds(logic.pre_iqama_seconds as i64),
            iqama,
            prayer_end: iqama + Duration::minutes(duration_minutes as i64),
        }
    }

    /// Whether the IqamaWait window exists at all for this prayer.
    pub fn iqama_wait_exists(&self) -> bool {
        self.adhan_end < self.pre_iqama_start
    }

    /// Half-open membership test for one window.
    pub fn contains(&self, kind: WindowKind, now: DateTime<Local>) -> bool {
        match kind {
            WindowKind::PreAdhan => in_range(now, self.pre_adhan_start, self.adhan),
            WindowKind::AdhanMoment => in_range(now, self.adhan, self.adhan_end),
            WindowKind::IqamaWait => {
                self.iqama_wait_exists() && in_range(now, self.adhan_end, self.pre_iqama_start)
            }
            WindowKind::PreIqama => in_range(now, self.pre_iqama_start, self.iqama),
            WindowKind::PrayerInProgress => in_range(now, self.iqama, self.prayer_end),
        }
    }
}

/// `[start, end)` membership.
fn in_range(t: DateTime<Local>, start: DateTime<Local>, end: DateTime<Local>) -> bool {
    t >= start && t < end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 6, h, m, s).unwrap()
    }

    fn fajr(adhan: DateTime<Local>, iqama: DateTime<Local>) -> Prayer {
        Prayer::new(
            PrayerName::Fajr,
            adhan,
            iqama,
            "05:00 AM".into(),
            "05:20 AM".into(),
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

    #[test]
    fn boundaries_are_half_open() {
        let prayer = fajr(at(5, 0, 0), at(5, 20, 0));
        let windows = PrayerWindows::compute(&prayer, &logic(), &TaraweehConfig::default());

        // Start of PreAdhan belongs to PreAdhan.
        assert!(windows.contains(WindowKind::PreAdhan, at(4, 59, 0)));
        // The adhan instant itself belongs to AdhanMoment, not PreAdhan.
        assert!(!windows.contains(WindowKind::PreAdhan, at(5, 0, 0)));
        assert!(windows.contains(WindowKind::AdhanMoment, at(5, 0, 0)));
        // End of AdhanMoment belongs to IqamaWait.
        assert!(!windows.contains(WindowKind::AdhanMoment, at(5, 1, 0)));
        assert!(windows.contains(WindowKind::IqamaWait, at(5, 1, 0)));
        // IqamaWait ends where PreIqama begins.
        assert!(!windows.contains(WindowKind::IqamaWait, at(5, 19, 30)));
        assert!(windows.contains(WindowKind::PreIqama, at(5, 19, 30)));
        // The iqama instant starts the prayer.
        assert!(!windows.contains(WindowKind::PreIqama, at(5, 20, 0)));
        assert!(windows.contains(WindowKind::PrayerInProgress, at(5, 20, 0)));
        // And the prayer ends exactly at iqama + duration.
        assert!(!windows.contains(WindowKind::PrayerInProgress, at(5, 30, 0)));
    }

    #[test]
    fn iqama_wait_collapses_when_gap_is_short() {
        // Iqama 60s after adhan: adhan_end (A+60) == pre_iqama_start (I-30)
        // leaves no room, and a negative-length window must not match either.
        let prayer = fajr(at(5, 0, 0), at(5, 1, 0));
        let windows = PrayerWindows::compute(&prayer, &logic(), &TaraweehConfig::default());

        assert!(!windows.iqama_wait_exists());
        for (h, m, s) in [(5, 0, 30), (5, 0, 45), (5, 0, 59)] {
            assert!(
                !windows.contains(WindowKind::IqamaWait, at(h, m, s)),
                "IqamaWait must never match at {h:02}:{m:02}:{s:02}"
            );
        }
        // The instant after the adhan screen falls through to PreIqama.
        assert!(windows.contains(WindowKind::PreIqama, at(5, 0, 45)));
    }

    #[test]
    fn taraweeh_duration_overrides_default() {
        let prayer = Prayer::new(
            PrayerName::Taraweeh,
            at(21, 0, 0),
            at(21, 15, 0),
            "09:00 PM".into(),
            "09:15 PM".into(),
        )
        .unwrap();
        let taraweeh = TaraweehConfig {
            duration_minutes: Some(45),
            ..TaraweehConfig::default()
        };
        let windows = PrayerWindows::compute(&prayer, &logic(), &taraweeh);

        assert!(windows.contains(WindowKind::PrayerInProgress, at(21, 59, 59)));
        assert!(!windows.contains(WindowKind::PrayerInProgress, at(22, 0, 0)));
    }

    #[test]
    fn taraweeh_duration_defaults_to_an_hour_when_unset() {
        let prayer = Prayer::new(
            PrayerName::Taraweeh,
            at(21, 0, 0),
            at(21, 15, 0),
            "09:00 PM".into(),
            "09:15 PM".into(),
        )
        .unwrap();
        let windows = PrayerWindows::compute(&prayer, &logic(), &TaraweehConfig::default());

        assert!(windows.contains(WindowKind::PrayerInProgress, at(22, 14, 59)));
        assert!(!windows.contains(WindowKind::PrayerInProgress, at(22, 15, 0)));
    }
}
