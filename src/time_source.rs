//! Time source abstraction for supporting both real-time and simulated time.
//!
//! The kiosk loop, the schedule builder, and the logger all read the clock
//! through this module so that `salatr simulate` can replay a whole day in
//! seconds without touching the system clock. The global source defaults to
//! real time and is installed once at startup.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::{Duration as StdDuration, SystemTime};

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Get the current system time (for wall-clock gap detection)
    fn system_now(&self) -> SystemTime;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn system_now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time source for `salatr simulate`.
///
/// Two modes:
/// - Linear acceleration: time flows continuously at `multiplier`x real speed
/// - Fast-forward (multiplier = 0.0): every sleep advances time instantly
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    /// Acceleration factor (e.g. 60.0 = one simulated minute per real second).
    /// 0.0 means fast-forward.
    time_multiplier: f64,
    /// Simulated time elapsed so far, advanced by `sleep`.
    elapsed: std::sync::Mutex<StdDuration>,
}

impl SimulatedTimeSource {
    /// Create a new simulated time source running from `start_time` to
    /// `end_time` at `multiplier`x real speed (0.0 = fast-forward).
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, multiplier: f64) -> Self {
        Self {
            start_time,
            end_time,
            time_multiplier: if multiplier < 0.0 { 0.0 } else { multiplier },
            elapsed: std::sync::Mutex::new(StdDuration::ZERO),
        }
    }

    fn current_time(&self) -> DateTime<Local> {
        let elapsed = *self.elapsed.lock().unwrap();
        let simulated = self.start_time
            + ChronoDuration::milliseconds(elapsed.as_millis().min(i64::MAX as u128) as i64);
        simulated.min(self.end_time)
    }

    /// Check if the simulation has reached its end time
    pub fn has_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn system_now(&self) -> SystemTime {
        let current = self.current_time();
        SystemTime::UNIX_EPOCH + StdDuration::from_millis(current.timestamp_millis().max(0) as u64)
    }

    fn sleep(&self, duration: StdDuration) {
        {
            let mut elapsed = self.elapsed.lock().unwrap();
            *elapsed += duration;
        }
        if self.time_multiplier > 0.0 {
            // Scale down to real time so the operator can watch it unfold.
            let real_secs = duration.as_secs_f64() / self.time_multiplier;
            if real_secs > 0.0 {
                std::thread::sleep(StdDuration::from_secs_f64(real_secs));
            }
        } else {
            // Fast-forward: minimal yield so log output stays ordered.
            std::thread::sleep(StdDuration::from_millis(1));
        }
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.has_ended()
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Get the current system time from the global time source
pub fn system_now() -> SystemTime {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .system_now()
}

/// Sleep for the specified duration using the global time source
pub fn sleep(duration: StdDuration) {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .sleep(duration)
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Check if simulation has reached its end time (always false for real time)
pub fn simulation_ended() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_ended()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS"
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))
        .and_then(|naive| {
            Local
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| "Ambiguous or invalid local time".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn simulated_source_advances_with_sleep() {
        let start = Local.with_ymd_and_hms(2026, 3, 1, 5, 0, 0).unwrap();
        let end = Local.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap();
        let source = SimulatedTimeSource::new(start, end, 0.0);

        assert_eq!(source.now(), start);
        source.sleep(StdDuration::from_secs(90));
        assert_eq!(source.now(), start + ChronoDuration::seconds(90));
        assert!(!source.has_ended());
    }

    #[test]
    fn simulated_source_caps_at_end_time() {
        let start = Local.with_ymd_and_hms(2026, 3, 1, 5, 0, 0).unwrap();
        let end = Local.with_ymd_and_hms(2026, 3, 1, 5, 1, 0).unwrap();
        let source = SimulatedTimeSource::new(start, end, 0.0);

        source.sleep(StdDuration::from_secs(600));
        assert_eq!(source.now(), end);
        assert!(source.has_ended());
    }

    #[test]
    fn parse_datetime_rejects_garbage() {
        assert!(parse_datetime("2026-03-01 05:00:00").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }
}
