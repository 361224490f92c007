//! Assembles one day's [`PrayerSchedule`] from timetable data.
//!
//! Source precedence: the CSV timetable row for the date, then the manual
//! fallback times from the config. If neither yields a complete Fajr–Isha
//! set the result is [`ScheduleOutcome::Unavailable`] and the kiosk shows a
//! diagnostic instead of running the display engine.
//!
//! Taraweeh is appended only on Ramadan nights, derived from the Isha iqama
//! using the configured offsets; it is never read from the timetable.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone};

use super::timetable::{DayTimes, Timetable};
use super::{Prayer, PrayerName, PrayerSchedule, ScheduleOutcome, TIME_UNAVAILABLE};
use crate::core::TaraweehConfig;
use crate::hijri;

/// Build the schedule for `date`.
pub fn build_for_date(
    date: NaiveDate,
    timetable: Option<&Timetable>,
    manual: Option<&DayTimes>,
    taraweeh: &TaraweehConfig,
    hijri_offset_days: i64,
) -> ScheduleOutcome {
    let day = timetable.and_then(|t| t.get(date)).or(manual);

    let Some(day) = day else {
        return ScheduleOutcome::Unavailable {
            reason: format!(
                "no timetable row for {date} and no fallback times configured"
            ),
        };
    };

    match assemble(date, day, taraweeh, hijri_offset_days) {
        Ok(schedule) => ScheduleOutcome::Ready(schedule),
        Err(e) => ScheduleOutcome::Unavailable {
            reason: format!("{e:#}"),
        },
    }
}

fn assemble(
    date: NaiveDate,
    day: &DayTimes,
    taraweeh: &TaraweehConfig,
    hijri_offset_days: i64,
) -> Result<PrayerSchedule> {
    let mut prayers = Vec::with_capacity(6);

    for name in [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ] {
        let slot = day.slot(name).expect("congregation prayers have slots");
        let Some(adhan_time) = slot.adhan else {
            bail!("timetable for {date} has no {name} adhan time");
        };

        let adhan = localize(date, adhan_time)
            .with_context(|| format!("{name} adhan on {date}"))?;
        // An unannounced iqama collapses onto the adhan; the label keeps the
        // sentinel so the table shows a dash.
        let (iqama, iqama_label) = match slot.iqama {
            Some(iqama_time) => {
                let iqama = localize(date, iqama_time)
                    .with_context(|| format!("{name} iqama on {date}"))?;
                (iqama, time_label(iqama_time))
            }
            None => (adhan, TIME_UNAVAILABLE.to_string()),
        };

        prayers.push(Prayer::new(
            name,
            adhan,
            iqama,
            time_label(adhan_time),
            iqama_label,
        )?);
    }

    if hijri::is_taraweeh_night(date, hijri_offset_days) {
        let isha_iqama = prayers
            .iter()
            .find(|p| p.name == PrayerName::Isha)
            .expect("Isha was just pushed")
            .iqama;
        let adhan = isha_iqama + Duration::minutes(taraweeh.adhan_offset_minutes as i64);
        let iqama = isha_iqama + Duration::minutes(taraweeh.iqama_offset_minutes as i64);
        prayers.push(Prayer::new(
            PrayerName::Taraweeh,
            adhan,
            iqama,
            time_label(adhan.time()),
            time_label(iqama.time()),
        )?);
    }

    PrayerSchedule::new(prayers)
}

/// Anchor a clock time onto `date` in the local timezone.
///
/// On a DST spring-forward day a nonexistent time resolves to the earliest
/// valid interpretation rather than failing the whole schedule.
fn localize(date: NaiveDate, time: NaiveTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .with_context(|| format!("{time} does not exist on {date} in the local timezone"))
}

/// 12-hour display label, e.g. `05:32 AM`.
fn time_label(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}
