//! Property tests for counter-to-rate derivation

use chrono::{Duration, TimeZone, Utc};
use hostpulse_core::monitoring::{CounterSample, rate_kbps};
use proptest::prelude::*;

proptest! {
    /// Property: a growing counter yields round(delta / elapsed / 1024)
    #[test]
    fn rate_matches_formula(
        prev in 0u64..1_000_000_000_000,
        delta in 0u64..10_000_000_000,
        elapsed_ms in 1i64..600_000,
    ) {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let rate = rate_kbps(
            Some(CounterSample::new(prev, t0)),
            CounterSample::new(prev + delta, t0 + Duration::milliseconds(elapsed_ms)),
        );
        let expected = (delta as f64 / (elapsed_ms as f64 / 1000.0) / 1024.0).round() as u64;
        prop_assert_eq!(rate, expected);
    }

    /// Property: a counter that went backwards yields exactly zero
    #[test]
    fn decreasing_counter_is_zero(
        curr in 0u64..1_000_000_000,
        drop_by in 1u64..1_000_000_000,
        elapsed_ms in 1i64..600_000,
    ) {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let rate = rate_kbps(
            Some(CounterSample::new(curr + drop_by, t0)),
            CounterSample::new(curr, t0 + Duration::milliseconds(elapsed_ms)),
        );
        prop_assert_eq!(rate, 0);
    }

    /// Property: without a previous sample the rate is zero
    #[test]
    fn first_sample_is_zero(curr in any::<u64>()) {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        prop_assert_eq!(rate_kbps(None, CounterSample::new(curr, t0)), 0);
    }
}
