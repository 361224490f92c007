//! Configuration system for salatr.
//!
//! Settings live in a TOML file, by default
//! `$XDG_CONFIG_HOME/salatr/salatr.toml` (overridable with `--config`).
//! A missing file is generated from a commented default template on first
//! run. All values are validated at load time; the display engine itself
//! never re-checks them.
//!
//! ```toml
//! #[Display]
//! masjid_name = "Masjid As-Salam"     # Header title
//! sub_location = "Community Hall"     # Subtitle under the title
//! timetable = "timetable.csv"         # Per-day times, relative to this file
//!
//! #[Countdown offsets]
//! pre_adhan_seconds = 60              # Pre-adhan countdown length (0-3600)
//! adhan_duration_seconds = 60         # Adhan screen hold time (0-3600)
//! pre_iqama_seconds = 30              # Pre-iqama countdown length (0-3600)
//! prayer_duration_minutes = 10        # Congregation length (1-360)
//!
//! #[Hijri]
//! hijri_offset_days = 0               # Moon-sighting adjustment (-3..=3)
//!
//! #[Taraweeh]
//! taraweeh_duration_minutes = 60      # Taraweeh length (1-360)
//! taraweeh_adhan_offset_minutes = 10  # Adhan, minutes after Isha iqama
//! taraweeh_iqama_offset_minutes = 20  # Iqama, minutes after Isha iqama
//!
//! #[Fallback times]                   # Used when no timetable row matches
//! fajr_adhan = "05:30"
//! fajr_iqama = "05:50"
//! # ... dhuhr/asr/maghrib/isha pairs ...
//! ```

pub mod builder;
pub mod loading;
pub mod validation;
pub mod watcher;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::constants::*;
use crate::core::{LogicConfig, TaraweehConfig};
use crate::schedule::timetable::{self, DayTimes, SlotTimes};

// Re-export public API
pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};
pub use watcher::start_config_watcher;

/// All configurable options, loaded from `salatr.toml`.
///
/// Every field is optional; defaults come from [`crate::constants`]. The
/// struct is replaced wholesale on reload, never patched in place.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Masjid name shown in the header strip.
    pub masjid_name: Option<String>,
    /// Secondary line under the masjid name (hall, city, ...).
    pub sub_location: Option<String>,
    /// Path to the CSV timetable, absolute or relative to the config dir.
    pub timetable: Option<String>,

    pub pre_adhan_seconds: Option<u64>,
    pub adhan_duration_seconds: Option<u64>,
    pub pre_iqama_seconds: Option<u64>,
    pub prayer_duration_minutes: Option<u64>,

    /// Days added to the computed Hijri date (local moon sighting).
    pub hijri_offset_days: Option<i64>,

    pub taraweeh_duration_minutes: Option<u64>,
    pub taraweeh_adhan_offset_minutes: Option<u64>,
    pub taraweeh_iqama_offset_minutes: Option<u64>,

    // Fallback day used whenever the timetable has no row for the date.
    pub fajr_adhan: Option<String>,
    pub fajr_iqama: Option<String>,
    pub dhuhr_adhan: Option<String>,
    pub dhuhr_iqama: Option<String>,
    pub asr_adhan: Option<String>,
    pub asr_iqama: Option<String>,
    pub maghrib_adhan: Option<String>,
    pub maghrib_iqama: Option<String>,
    pub isha_adhan: Option<String>,
    pub isha_iqama: Option<String>,
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    /// Get configuration path using the module's get_config_path function
    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    /// The window offsets consumed by the display engine.
    pub fn logic(&self) -> LogicConfig {
        LogicConfig {
            pre_adhan_seconds: self.pre_adhan_seconds.unwrap_or(DEFAULT_PRE_ADHAN_SECONDS),
            adhan_duration_seconds: self
                .adhan_duration_seconds
                .unwrap_or(DEFAULT_ADHAN_DURATION_SECONDS),
            pre_iqama_seconds: self.pre_iqama_seconds.unwrap_or(DEFAULT_PRE_IQAMA_SECONDS),
            prayer_duration_minutes: self
                .prayer_duration_minutes
                .unwrap_or(DEFAULT_PRAYER_DURATION_MINUTES),
        }
    }

    /// Taraweeh duration and scheduling offsets.
    pub fn taraweeh(&self) -> TaraweehConfig {
        TaraweehConfig {
            duration_minutes: self.taraweeh_duration_minutes,
            adhan_offset_minutes: self
                .taraweeh_adhan_offset_minutes
                .unwrap_or(DEFAULT_TARAWEEH_ADHAN_OFFSET_MINUTES),
            iqama_offset_minutes: self
                .taraweeh_iqama_offset_minutes
                .unwrap_or(DEFAULT_TARAWEEH_IQAMA_OFFSET_MINUTES),
        }
    }

    pub fn hijri_offset(&self) -> i64 {
        self.hijri_offset_days.unwrap_or(DEFAULT_HIJRI_OFFSET_DAYS)
    }

    pub fn masjid_name(&self) -> &str {
        self.masjid_name.as_deref().unwrap_or(DEFAULT_MASJID_NAME)
    }

    pub fn sub_location(&self) -> &str {
        self.sub_location.as_deref().unwrap_or("")
    }

    /// Absolute path of the timetable file, if one is configured.
    pub fn timetable_path(&self) -> Result<Option<PathBuf>> {
        let Some(ref raw) = self.timetable else {
            return Ok(None);
        };
        let path = PathBuf::from(raw);
        if path.is_absolute() {
            Ok(Some(path))
        } else {
            Ok(Some(loading::get_config_base_dir()?.join(path)))
        }
    }

    /// The fallback day assembled from the flat `*_adhan`/`*_iqama` fields,
    /// or `None` when no time field is set at all.
    pub fn manual_day_times(&self) -> Result<Option<DayTimes>> {
        let slots = [
            ("fajr", &self.fajr_adhan, &self.fajr_iqama),
            ("dhuhr", &self.dhuhr_adhan, &self.dhuhr_iqama),
            ("asr", &self.asr_adhan, &self.asr_iqama),
            ("maghrib", &self.maghrib_adhan, &self.maghrib_iqama),
            ("isha", &self.isha_adhan, &self.isha_iqama),
        ];

        if slots.iter().all(|(_, a, i)| a.is_none() && i.is_none()) {
            return Ok(None);
        }

        let mut parsed = [SlotTimes::default(); 5];
        for (slot, (field, adhan, iqama)) in parsed.iter_mut().zip(slots) {
            if let Some(s) = adhan {
                slot.adhan = Some(
                    timetable::parse_time(s).with_context(|| format!("{field}_adhan"))?,
                );
            }
            if let Some(s) = iqama {
                slot.iqama = Some(
                    timetable::parse_time(s).with_context(|| format!("{field}_iqama"))?,
                );
            }
        }

        Ok(Some(DayTimes {
            fajr: parsed[0],
            dhuhr: parsed[1],
            asr: parsed[2],
            maghrib: parsed[3],
            isha: parsed[4],
        }))
    }

    /// Log the effective configuration in the standard block format.
    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");
        log_indented!("Masjid: {}", self.masjid_name());

        match self.timetable {
            Some(ref file) => log_indented!("Timetable: {}", file),
            None => log_indented!("Timetable: none (using fallback times)"),
        }

        let logic = self.logic();
        log_indented!(
            "Offsets: pre-adhan {}s, adhan {}s, pre-iqama {}s",
            logic.pre_adhan_seconds,
            logic.adhan_duration_seconds,
            logic.pre_iqama_seconds
        );
        log_indented!("Prayer duration: {} minutes", logic.prayer_duration_minutes);

        let hijri_offset = self.hijri_offset();
        if hijri_offset != 0 {
            log_indented!("Hijri offset: {:+} days", hijri_offset);
        }

        let taraweeh = self.taraweeh();
        log_indented!(
            "Taraweeh: {} min, adhan +{} min / iqama +{} min after Isha iqama",
            taraweeh
                .duration_minutes
                .unwrap_or(DEFAULT_TARAWEEH_DURATION_MINUTES),
            taraweeh.adhan_offset_minutes,
            taraweeh.iqama_offset_minutes
        );
    }
}
