//! Configuration validation.
//!
//! Everything the display engine later trusts is checked here, once, at load
//! time: offset ranges, duration ranges, the Taraweeh offset ordering, and
//! the parseability of the fallback times. Error messages name the offending
//! field and its limits.

use anyhow::{Context, Result};

use super::Config;
use crate::constants::*;

/// Validate a parsed configuration before it reaches the rest of the app.
pub fn validate_config(config: &Config) -> Result<()> {
    for (field, value) in [
        ("pre_adhan_seconds", config.pre_adhan_seconds),
        ("adhan_duration_seconds", config.adhan_duration_seconds),
        ("pre_iqama_seconds", config.pre_iqama_seconds),
    ] {
        if let Some(secs) = value
            && secs > MAXIMUM_OFFSET_SECONDS
        {
            anyhow::bail!(
                "{field} ({secs}) must be at most {MAXIMUM_OFFSET_SECONDS} seconds"
            );
        }
    }

    for (field, value) in [
        ("prayer_duration_minutes", config.prayer_duration_minutes),
        ("taraweeh_duration_minutes", config.taraweeh_duration_minutes),
    ] {
        if let Some(minutes) = value
            && !(1..=MAXIMUM_PRAYER_DURATION_MINUTES).contains(&minutes)
        {
            anyhow::bail!(
                "{field} ({minutes}) must be between 1 and {MAXIMUM_PRAYER_DURATION_MINUTES} minutes"
            );
        }
    }

    if let Some(offset) = config.hijri_offset_days
        && !(-MAXIMUM_HIJRI_OFFSET_DAYS..=MAXIMUM_HIJRI_OFFSET_DAYS).contains(&offset)
    {
        anyhow::bail!(
            "hijri_offset_days ({offset}) must be between {} and {MAXIMUM_HIJRI_OFFSET_DAYS}",
            -MAXIMUM_HIJRI_OFFSET_DAYS
        );
    }

    let taraweeh = config.taraweeh();
    if taraweeh.iqama_offset_minutes < taraweeh.adhan_offset_minutes {
        anyhow::bail!(
            "taraweeh_iqama_offset_minutes ({}) must not be smaller than taraweeh_adhan_offset_minutes ({})",
            taraweeh.iqama_offset_minutes,
            taraweeh.adhan_offset_minutes
        );
    }

    // Surface unparseable fallback times now rather than at midnight rollover.
    config
        .manual_day_times()
        .context("invalid fallback prayer time")?;

    Ok(())
}
