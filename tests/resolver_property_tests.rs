//! Property tests for the display-state resolver.
//!
//! These pin the engine's contract rather than specific scenarios: every
//! instant resolves to exactly one state, resolution is a pure function of
//! its inputs, countdowns stay in range, and the list-view predicate can
//! never disagree with the resolver about a running prayer.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use salatr::core::{
    DisplayState, LogicConfig, TaraweehConfig, is_prayer_currently_active, resolve_display_state,
};
use salatr::test_support::{on_day, sample_day};

fn fixture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 6).unwrap()
}

prop_compose! {
    fn arb_logic()(
        pre_adhan in 0u64..=600,
        adhan_duration in 0u64..=600,
        pre_iqama in 0u64..=600,
        duration in 1u64..=120,
    ) -> LogicConfig {
        LogicConfig {
            pre_adhan_seconds: pre_adhan,
            adhan_duration_seconds: adhan_duration,
            pre_iqama_seconds: pre_iqama,
            prayer_duration_minutes: duration,
        }
    }
}

proptest! {
    #[test]
    fn resolution_is_total_and_idempotent(
        offset_seconds in 0i64..86_400,
        logic in arb_logic(),
    ) {
        let schedule = sample_day(fixture_date());
        let taraweeh = TaraweehConfig::default();
        let now = on_day(fixture_date(), 0, 0, 0) + Duration::seconds(offset_seconds);

        let first = resolve_display_state(&schedule, &logic, &taraweeh, now);
        let second = resolve_display_state(&schedule, &logic, &taraweeh, now);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn countdowns_stay_in_range(
        offset_seconds in 0i64..86_400,
        logic in arb_logic(),
    ) {
        let schedule = sample_day(fixture_date());
        let taraweeh = TaraweehConfig::default();
        let now = on_day(fixture_date(), 0, 0, 0) + Duration::seconds(offset_seconds);

        match resolve_display_state(&schedule, &logic, &taraweeh, now) {
            DisplayState::PreAdhan { countdown_seconds, .. } => {
                prop_assert!(countdown_seconds >= 0);
                prop_assert!(countdown_seconds <= logic.pre_adhan_seconds as i64);
            }
            DisplayState::PreIqama { countdown_seconds, .. } => {
                prop_assert!(countdown_seconds >= 0);
                prop_assert!(countdown_seconds <= logic.pre_iqama_seconds as i64);
            }
            DisplayState::IqamaWait { countdown_seconds, .. }
            | DisplayState::NextPrayer { countdown_seconds, .. } => {
                prop_assert!(countdown_seconds >= 0);
            }
            DisplayState::AdhanMoment { .. } | DisplayState::PrayerInProgress { .. } => {}
        }
    }

    #[test]
    fn in_progress_state_agrees_with_the_list_predicate(
        offset_seconds in 0i64..86_400,
        logic in arb_logic(),
    ) {
        let schedule = sample_day(fixture_date());
        let taraweeh = TaraweehConfig::default();
        let now = on_day(fixture_date(), 0, 0, 0) + Duration::seconds(offset_seconds);

        if let DisplayState::PrayerInProgress { prayer } =
            resolve_display_state(&schedule, &logic, &taraweeh, now)
        {
            prop_assert!(is_prayer_currently_active(prayer, &logic, &taraweeh, now));
        }
    }

    #[test]
    fn next_prayer_is_the_nearest_strictly_future_adhan(
        offset_seconds in 0i64..86_400,
    ) {
        let schedule = sample_day(fixture_date());
        let logic = LogicConfig {
            // Minimal windows so most instants fall through to the fallback.
            pre_adhan_seconds: 0,
            adhan_duration_seconds: 0,
            pre_iqama_seconds: 0,
            prayer_duration_minutes: 1,
        };
        let taraweeh = TaraweehConfig::default();
        let now = on_day(fixture_date(), 0, 0, 0) + Duration::seconds(offset_seconds);

        let state = resolve_display_state(&schedule, &logic, &taraweeh, now);
        if let DisplayState::NextPrayer { prayer, countdown_seconds, tomorrow } = state {
            if tomorrow {
                // Everything today is over; wraps to the canonical first.
                prop_assert!(schedule.prayers().iter().all(|p| p.adhan <= now));
                prop_assert_eq!(prayer.name, schedule.first().name);
            } else {
                prop_assert!(prayer.adhan > now);
                // No other prayer sits between now and the chosen one.
                prop_assert!(
                    schedule
                        .prayers()
                        .iter()
                        .filter(|p| p.adhan > now)
                        .all(|p| p.adhan >= prayer.adhan)
                );
                prop_assert_eq!(countdown_seconds, (prayer.adhan - now).num_seconds());
            }
        }
    }
}
