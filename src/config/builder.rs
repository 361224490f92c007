//! Default configuration generation.
//!
//! On first run salatr writes a fully commented template so a kiosk can be
//! set up by editing one obvious file. Only the fallback times are filled
//! with placeholders; a real deployment should point `timetable` at the
//! masjid's CSV.

use anyhow::{Context, Result};
use std::path::Path;

/// The template written on first run.
const DEFAULT_CONFIG: &str = r##"#[Display]
masjid_name = "Masjid"              # Header title
sub_location = ""                   # Subtitle under the title
#timetable = "timetable.csv"        # Per-day CSV, relative to this file

#[Countdown offsets]
pre_adhan_seconds = 60              # Pre-adhan countdown length (0-3600)
adhan_duration_seconds = 60         # Adhan screen hold time (0-3600)
pre_iqama_seconds = 30              # Pre-iqama countdown length (0-3600)
prayer_duration_minutes = 10        # Congregation length (1-360)

#[Hijri]
hijri_offset_days = 0               # Moon-sighting adjustment (-3..=3)

#[Taraweeh]
taraweeh_duration_minutes = 60      # Taraweeh length (1-360)
taraweeh_adhan_offset_minutes = 10  # Adhan, minutes after Isha iqama
taraweeh_iqama_offset_minutes = 20  # Iqama, minutes after Isha iqama

#[Fallback times]                   # Used when no timetable row matches
fajr_adhan = "05:30"
fajr_iqama = "05:50"
dhuhr_adhan = "12:45"
dhuhr_iqama = "13:15"
asr_adhan = "16:15"
asr_iqama = "16:30"
maghrib_adhan = "18:20"
maghrib_iqama = "18:25"
isha_adhan = "19:45"
isha_iqama = "20:15"
"##;

/// Write the default configuration file, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("failed to create config directory {}", parent.display())
        })?;
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config to {}", path.display()))?;

    log_block_start!("Created default configuration");
    log_indented!("{}", path.display());
    log_indented!("Edit the fallback times or point 'timetable' at your CSV");

    Ok(())
}
