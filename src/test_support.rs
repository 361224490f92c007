//! Shared fixtures for unit and integration tests.
//!
//! Compiled only for tests (and the `testing-support` feature, which the
//! crate's own dev-dependency enables for integration tests).

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::core::LogicConfig;
use crate::schedule::{Prayer, PrayerName, PrayerSchedule};

/// An instant on the fixture day.
pub fn on_day(date: NaiveDate, h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local
        .from_local_datetime(&date.and_hms_opt(h, m, s).expect("valid clock time"))
        .single()
        .expect("unambiguous local time")
}

/// A typical five-prayer winter day on `date`.
pub fn sample_day(date: NaiveDate) -> PrayerSchedule {
    let prayer = |name, (ah, am): (u32, u32), (ih, im): (u32, u32)| {
        Prayer::new(
            name,
            on_day(date, ah, am, 0),
            on_day(date, ih, im, 0),
            format!("{:02}:{:02}", ah, am),
            format!("{:02}:{:02}", ih, im),
        )
        .expect("fixture times are ordered")
    };

    PrayerSchedule::new(vec![
        prayer(PrayerName::Fajr, (5, 32), (5, 50)),
        prayer(PrayerName::Dhuhr, (12, 45), (13, 15)),
        prayer(PrayerName::Asr, (16, 12), (16, 30)),
        prayer(PrayerName::Maghrib, (18, 22), (18, 27)),
        prayer(PrayerName::Isha, (19, 48), (20, 15)),
    ])
    .expect("fixture schedule is valid")
}

/// The offsets used throughout the documentation examples.
pub fn sample_logic() -> LogicConfig {
    LogicConfig {
        pre_adhan_seconds: 60,
        adhan_duration_seconds: 60,
        pre_iqama_seconds: 30,
        prayer_duration_minutes: 10,
    }
}
