//! Default values and validation limits shared across the application.

/// Seconds before the adhan during which the pre-adhan countdown is shown.
pub const DEFAULT_PRE_ADHAN_SECONDS: u64 = 60;

/// Seconds the adhan announcement screen stays up once the adhan time hits.
pub const DEFAULT_ADHAN_DURATION_SECONDS: u64 = 60;

/// Seconds before the iqama during which the line-up countdown is shown.
pub const DEFAULT_PRE_IQAMA_SECONDS: u64 = 30;

/// Minutes a congregation prayer is considered in progress after its iqama.
pub const DEFAULT_PRAYER_DURATION_MINUTES: u64 = 10;

/// Minutes Taraweeh runs when no override is configured.
pub const DEFAULT_TARAWEEH_DURATION_MINUTES: u64 = 60;

/// Minutes after the Isha iqama at which the Taraweeh adhan is announced.
pub const DEFAULT_TARAWEEH_ADHAN_OFFSET_MINUTES: u64 = 10;

/// Minutes after the Isha iqama at which Taraweeh congregation starts.
pub const DEFAULT_TARAWEEH_IQAMA_OFFSET_MINUTES: u64 = 20;

/// Days added to the computed Hijri date to match local moon sighting.
pub const DEFAULT_HIJRI_OFFSET_DAYS: i64 = 0;

/// Header text shown when the config provides no masjid name.
pub const DEFAULT_MASJID_NAME: &str = "Masjid";

// Validation limits. Offsets beyond these almost certainly indicate a typo
// (e.g. minutes entered into a seconds field) and are rejected at load time.

/// Longest accepted pre-adhan/pre-iqama/adhan-duration offset, in seconds.
pub const MAXIMUM_OFFSET_SECONDS: u64 = 3600;

/// Longest accepted prayer duration, in minutes.
pub const MAXIMUM_PRAYER_DURATION_MINUTES: u64 = 360;

/// Largest accepted Hijri adjustment in either direction, in days.
pub const MAXIMUM_HIJRI_OFFSET_DAYS: i64 = 3;

/// Hijri month number of Ramadan, the only month with Taraweeh.
pub const RAMADAN_MONTH: u32 = 9;

/// Main loop cadence: one evaluation per wall-clock second.
pub const TICK_INTERVAL_MILLIS: u64 = 1000;

/// Wall-clock gap (seconds) treated as a suspend/resume or clock jump,
/// forcing a schedule rebuild.
pub const TIME_JUMP_THRESHOLD_SECS: u64 = 30;
