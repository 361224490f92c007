//! Prayer schedule types and the daily schedule provider.
//!
//! A [`PrayerSchedule`] is the day's resolved set of prayer instants, built
//! once per day (or on reload) by [`builder`] from the CSV timetable and the
//! manual fallback times in the config. It is immutable after construction
//! and replaced wholesale, never mutated in place.

pub mod builder;
pub mod timetable;

pub use builder::build_for_date;
pub use timetable::Timetable;

use anyhow::{Result, ensure};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Label shown for a prayer time that has no announced value.
pub const TIME_UNAVAILABLE: &str = "-";

/// The fixed set of prayers the kiosk knows about.
///
/// Taraweeh is optional and only scheduled on Ramadan nights. Names are
/// compared as values, never by display-string matching, so renaming or
/// localizing labels can never change scheduling behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Taraweeh,
}

impl PrayerName {
    /// Canonical display and tie-break order. The resolver and the
    /// next-prayer fallback both depend on this ordering.
    pub const CANONICAL_ORDER: [PrayerName; 6] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
        PrayerName::Taraweeh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
            PrayerName::Taraweeh => "Taraweeh",
        }
    }

    /// Position in the canonical order, used for sorting.
    fn ordinal(&self) -> usize {
        Self::CANONICAL_ORDER
            .iter()
            .position(|n| n == self)
            .expect("every PrayerName appears in CANONICAL_ORDER")
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prayer of the current day, fully resolved to absolute instants.
///
/// `adhan` is the call to prayer, `iqama` the congregation start. The labels
/// are preformatted display strings; either may be [`TIME_UNAVAILABLE`] for a
/// placeholder entry with no announced time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prayer {
    pub name: PrayerName,
    pub adhan: DateTime<Local>,
    pub iqama: DateTime<Local>,
    pub adhan_label: String,
    pub iqama_label: String,
}

impl Prayer {
    /// Construct a prayer, enforcing that the congregation never starts
    /// before its call.
    pub fn new(
        name: PrayerName,
        adhan: DateTime<Local>,
        iqama: DateTime<Local>,
        adhan_label: String,
        iqama_label: String,
    ) -> Result<Self> {
        ensure!(
            iqama >= adhan,
            "{name}: iqama ({iqama}) must not precede adhan ({adhan})"
        );
        Ok(Self {
            name,
            adhan,
            iqama,
            adhan_label,
            iqama_label,
        })
    }
}

/// The day's prayers in canonical order.
///
/// Guaranteed non-empty and free of duplicate names; both are enforced at
/// construction so downstream code never has to re-check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerSchedule {
    prayers: Vec<Prayer>,
}

impl PrayerSchedule {
    pub fn new(mut prayers: Vec<Prayer>) -> Result<Self> {
        ensure!(!prayers.is_empty(), "a prayer schedule cannot be empty");
        prayers.sort_by_key(|p| p.name.ordinal());
        for pair in prayers.windows(2) {
            ensure!(
                pair[0].name != pair[1].name,
                "duplicate schedule entry for {}",
                pair[0].name
            );
        }
        Ok(Self { prayers })
    }

    pub fn prayers(&self) -> &[Prayer] {
        &self.prayers
    }

    /// First prayer in canonical order (the wraparound target).
    pub fn first(&self) -> &Prayer {
        &self.prayers[0]
    }

    pub fn get(&self, name: PrayerName) -> Option<&Prayer> {
        self.prayers.iter().find(|p| p.name == name)
    }
}

/// Result of building a day's schedule.
///
/// `Unavailable` means no usable timetable data exists for the day; the
/// display engine must not run and the renderer shows a diagnostic instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOutcome {
    Ready(PrayerSchedule),
    Unavailable { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 6, h, m, 0).unwrap()
    }

    fn prayer(name: PrayerName, adhan_h: u32, iqama_h: u32) -> Prayer {
        Prayer::new(
            name,
            at(adhan_h, 0),
            at(iqama_h, 0),
            format!("{:02}:00 AM", adhan_h),
            format!("{:02}:00 AM", iqama_h),
        )
        .unwrap()
    }

    #[test]
    fn prayer_rejects_iqama_before_adhan() {
        let result = Prayer::new(
            PrayerName::Fajr,
            at(5, 30),
            at(5, 0),
            "05:30 AM".into(),
            "05:00 AM".into(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn schedule_rejects_empty_input() {
        assert!(PrayerSchedule::new(Vec::new()).is_err());
    }

    #[test]
    fn schedule_rejects_duplicates() {
        let prayers = vec![
            prayer(PrayerName::Fajr, 5, 5),
            prayer(PrayerName::Fajr, 6, 6),
        ];
        assert!(PrayerSchedule::new(prayers).is_err());
    }

    #[test]
    fn schedule_sorts_into_canonical_order() {
        let prayers = vec![
            prayer(PrayerName::Isha, 20, 20),
            prayer(PrayerName::Fajr, 5, 5),
            prayer(PrayerName::Maghrib, 18, 18),
        ];
        let schedule = PrayerSchedule::new(prayers).unwrap();
        let names: Vec<PrayerName> = schedule.prayers().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![PrayerName::Fajr, PrayerName::Maghrib, PrayerName::Isha]
        );
        assert_eq!(schedule.first().name, PrayerName::Fajr);
    }
}
