//! Hijri (Islamic) calendar conversion and display rules.
//!
//! Uses the arithmetic "civil" tabular calendar (30-year cycle, epoch
//! 1 Muharram 1 AH = 16 July 622 CE Julian) via Julian day numbers. Masjids
//! that follow local moon sighting can nudge the result with
//! `hijri_offset_days` in the config.
//!
//! Two display rules live here as well:
//! - the header date advances to the next Hijri day at Maghrib, not at
//!   midnight;
//! - a night counts as a Ramadan night (Taraweeh is scheduled) when the
//!   Hijri day that begins at that evening's Maghrib falls in Ramadan.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::constants::RAMADAN_MONTH;

/// Julian day number of 1 Muharram 1 AH in the civil tabular calendar.
const HIJRI_EPOCH_JDN: i64 = 1_948_440;

const MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Shaban",
    "Ramadan",
    "Shawwal",
    "Dhul Qadah",
    "Dhul Hijjah",
];

/// A date in the tabular Hijri calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HijriDate {
    pub year: i64,
    /// 1-based month number; Ramadan is 9.
    pub month: u32,
    pub day: u32,
}

impl HijriDate {
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    pub fn is_ramadan(&self) -> bool {
        self.month == RAMADAN_MONTH
    }
}

impl std::fmt::Display for HijriDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} AH", self.day, self.month_name(), self.year)
    }
}

/// Convert a Gregorian calendar date to its Hijri equivalent.
pub fn from_gregorian(date: NaiveDate) -> HijriDate {
    let jdn = gregorian_jdn(date.year() as i64, date.month() as i64, date.day() as i64);

    // Standard integer arithmetic for the 30-year tabular cycle.
    let l0 = jdn - HIJRI_EPOCH_JDN + 10_632;
    let n = (l0 - 1) / 10_631;
    let l1 = l0 - 10_631 * n + 354;
    let j = ((10_985 - l1) / 5_316) * ((50 * l1) / 17_719)
        + (l1 / 5_670) * ((43 * l1) / 15_238);
    let l2 = l1 - ((30 - j) / 15) * ((17_719 * j) / 50) - (j / 16) * ((15_238 * j) / 43) + 29;
    let month = (24 * l2) / 709;
    let day = l2 - (709 * month) / 24;
    let year = 30 * n + j - 30;

    HijriDate {
        year,
        month: month as u32,
        day: day as u32,
    }
}

/// The Hijri date to show in the header at instant `now`.
///
/// After the day's Maghrib adhan the Hijri day has already turned over, so
/// the header must show the next date even though the Gregorian day has not
/// changed yet. `offset_days` is the user's moon-sighting adjustment.
pub fn for_display(
    now: DateTime<Local>,
    maghrib_adhan: Option<DateTime<Local>>,
    offset_days: i64,
) -> HijriDate {
    let mut date = now.date_naive();
    if let Some(maghrib) = maghrib_adhan
        && now >= maghrib
    {
        date += Duration::days(1);
    }
    from_gregorian(date + Duration::days(offset_days))
}

/// Whether Taraweeh belongs on the evening of `date`.
///
/// The night after `date`'s Maghrib carries the next Hijri day, so the first
/// Taraweeh of Ramadan happens on the Gregorian evening before 1 Ramadan.
pub fn is_taraweeh_night(date: NaiveDate, offset_days: i64) -> bool {
    from_gregorian(date + Duration::days(offset_days + 1)).is_ramadan()
}

/// Julian day number of a proleptic-Gregorian date.
fn gregorian_jdn(year: i64, month: i64, day: i64) -> i64 {
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32_045
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn known_conversions() {
        // 1 Ramadan 1445 matched 11 March 2024.
        assert_eq!(
            from_gregorian(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()),
            HijriDate {
                year: 1445,
                month: 9,
                day: 1
            }
        );
        // Millennium day fell in Ramadan 1420.
        assert_eq!(
            from_gregorian(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
            HijriDate {
                year: 1420,
                month: 9,
                day: 24
            }
        );
    }

    #[test]
    fn month_names_line_up() {
        let date = from_gregorian(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(date.month_name(), "Ramadan");
        assert!(date.is_ramadan());
        assert_eq!(date.to_string(), "1 Ramadan 1445 AH");
    }

    #[test]
    fn display_date_advances_at_maghrib() {
        let maghrib = Local.with_ymd_and_hms(2024, 3, 11, 18, 10, 0).unwrap();
        let before = Local.with_ymd_and_hms(2024, 3, 11, 17, 0, 0).unwrap();
        let after = Local.with_ymd_and_hms(2024, 3, 11, 19, 0, 0).unwrap();

        assert_eq!(for_display(before, Some(maghrib), 0).day, 1);
        assert_eq!(for_display(after, Some(maghrib), 0).day, 2);
        // Exactly at Maghrib the date has turned over.
        assert_eq!(for_display(maghrib, Some(maghrib), 0).day, 2);
    }

    #[test]
    fn offset_shifts_the_displayed_date() {
        let noon = Local.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();
        assert_eq!(for_display(noon, None, 0).day, 1);
        assert_eq!(for_display(noon, None, -1).month, 8);
        assert_eq!(for_display(noon, None, 1).day, 2);
    }

    #[test]
    fn taraweeh_nights_bracket_ramadan() {
        // Evening of 10 March 2024 begins 1 Ramadan: first Taraweeh night.
        assert!(is_taraweeh_night(
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            0
        ));
        assert!(!is_taraweeh_night(
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            0
        ));
        // Deep in Shaban there is no Taraweeh.
        assert!(!is_taraweeh_night(
            NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
            0
        ));
    }
}
