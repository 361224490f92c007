//! CSV timetable parsing.
//!
//! Masjids publish their adhan/iqama times as a per-day CSV, one row per
//! Gregorian date:
//!
//! ```csv
//! date,fajr_adhan,fajr_iqama,dhuhr_adhan,dhuhr_iqama,asr_adhan,asr_iqama,maghrib_adhan,maghrib_iqama,isha_adhan,isha_iqama
//! 2026-03-06,05:32,05:50,12:45,13:15,16:12,16:30,18:22,18:27,19:48,20:15
//! ```
//!
//! Dates are `%Y-%m-%d`, times `%H:%M` (seconds optional), and `-` marks an
//! unannounced entry. A header row is recognized and skipped. Parse failures
//! carry the offending line number so a typo in a 365-row file is findable.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::path::Path;

use super::PrayerName;

/// Adhan/iqama pair for one prayer slot; `None` means unannounced (`-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotTimes {
    pub adhan: Option<NaiveTime>,
    pub iqama: Option<NaiveTime>,
}

/// The five daily congregation slots of one timetable row.
///
/// Taraweeh never appears here; it is derived from Isha by the schedule
/// builder on Ramadan nights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayTimes {
    pub fajr: SlotTimes,
    pub dhuhr: SlotTimes,
    pub asr: SlotTimes,
    pub maghrib: SlotTimes,
    pub isha: SlotTimes,
}

impl DayTimes {
    /// The slot for a congregation prayer; `None` for Taraweeh.
    pub fn slot(&self, name: PrayerName) -> Option<SlotTimes> {
        match name {
            PrayerName::Fajr => Some(self.fajr),
            PrayerName::Dhuhr => Some(self.dhuhr),
            PrayerName::Asr => Some(self.asr),
            PrayerName::Maghrib => Some(self.maghrib),
            PrayerName::Isha => Some(self.isha),
            PrayerName::Taraweeh => None,
        }
    }
}

/// A full date-keyed timetable loaded from CSV.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    days: HashMap<NaiveDate, DayTimes>,
}

impl Timetable {
    /// Load and parse a timetable file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read timetable file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse timetable file {}", path.display()))
    }

    /// Parse timetable CSV content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut days = HashMap::new();

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields[0].eq_ignore_ascii_case("date") {
                // Header row.
                continue;
            }
            if fields.len() != 11 {
                bail!(
                    "line {line_no}: expected 11 fields (date + 5 adhan/iqama pairs), got {}",
                    fields.len()
                );
            }

            let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
                .with_context(|| format!("line {line_no}: invalid date '{}'", fields[0]))?;

            let mut slots = [SlotTimes::default(); 5];
            for (slot, pair) in slots.iter_mut().zip(fields[1..].chunks(2)) {
                slot.adhan = parse_time_field(pair[0])
                    .with_context(|| format!("line {line_no}: invalid time '{}'", pair[0]))?;
                slot.iqama = parse_time_field(pair[1])
                    .with_context(|| format!("line {line_no}: invalid time '{}'", pair[1]))?;
            }

            let previous = days.insert(
                date,
                DayTimes {
                    fajr: slots[0],
                    dhuhr: slots[1],
                    asr: slots[2],
                    maghrib: slots[3],
                    isha: slots[4],
                },
            );
            if previous.is_some() {
                bail!("line {line_no}: duplicate row for {date}");
            }
        }

        Ok(Self { days })
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayTimes> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Parse a clock time, accepting `HH:MM` and `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .with_context(|| format!("invalid time '{s}', expected HH:MM"))
}

/// A timetable field: a time, or `-` for unannounced.
fn parse_time_field(s: &str) -> Result<Option<NaiveTime>> {
    if s == super::TIME_UNAVAILABLE {
        return Ok(None);
    }
    parse_time(s).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
date,fajr_adhan,fajr_iqama,dhuhr_adhan,dhuhr_iqama,asr_adhan,asr_iqama,maghrib_adhan,maghrib_iqama,isha_adhan,isha_iqama
2026-03-06,05:32,05:50,12:45,13:15,16:12,16:30,18:22,18:27,19:48,20:15
2026-03-07,05:30,05:50,12:45,13:15,16:13,16:30,18:23,18:28,19:49,20:15
";

    #[test]
    fn parses_rows_keyed_by_date() {
        let timetable = Timetable::parse(SAMPLE).unwrap();
        assert_eq!(timetable.len(), 2);

        let day = timetable
            .get(NaiveDate::from_ymd_opt(2026, 3, 6).unwrap())
            .unwrap();
        assert_eq!(day.fajr.adhan, NaiveTime::from_hms_opt(5, 32, 0));
        assert_eq!(day.fajr.iqama, NaiveTime::from_hms_opt(5, 50, 0));
        assert_eq!(day.isha.iqama, NaiveTime::from_hms_opt(20, 15, 0));
    }

    #[test]
    fn dash_means_unannounced() {
        let csv = "2026-03-06,05:32,-,12:45,13:15,16:12,16:30,18:22,18:27,19:48,20:15\n";
        let timetable = Timetable::parse(csv).unwrap();
        let day = timetable
            .get(NaiveDate::from_ymd_opt(2026, 3, 6).unwrap())
            .unwrap();
        assert_eq!(day.fajr.adhan, NaiveTime::from_hms_opt(5, 32, 0));
        assert_eq!(day.fajr.iqama, None);
    }

    #[test]
    fn errors_carry_the_line_number() {
        let csv = "2026-03-06,05:32,05:50,12:45,13:15,16:12,16:30,18:22,18:27,19:48,20:15\n\
                   2026-03-07,nonsense,05:50,12:45,13:15,16:12,16:30,18:22,18:27,19:48,20:15\n";
        let err = Timetable::parse(csv).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn rejects_short_rows_and_duplicates() {
        assert!(Timetable::parse("2026-03-06,05:32\n").is_err());

        let dup = "2026-03-06,05:32,05:50,12:45,13:15,16:12,16:30,18:22,18:27,19:48,20:15\n\
                   2026-03-06,05:32,05:50,12:45,13:15,16:12,16:30,18:22,18:27,19:48,20:15\n";
        assert!(Timetable::parse(dup).is_err());
    }

    #[test]
    fn accepts_times_with_seconds() {
        assert_eq!(
            parse_time("05:32:10").unwrap(),
            NaiveTime::from_hms_opt(5, 32, 10).unwrap()
        );
        assert!(parse_time("25:00").is_err());
    }
}
