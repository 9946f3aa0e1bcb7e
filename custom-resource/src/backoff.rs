// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use rand::Rng;

pub const DEFAULT_JITTER: f64 = 0.1;
pub const DEFAULT_MAX_MS: u64 = 0x7fff_ffff;

/// Exponential back-off with configurable base and jitter.
///
/// Sleeps for `2^iteration * base_ms * (1 + jitter * U)` milliseconds, `U` uniform in `[0, 1)`,
/// capped at `max_ms` unless `max_ms` is zero.
pub async fn backoff(iteration: u32, base_ms: u64, jitter: f64, max_ms: u64) {
    let sample = rand::thread_rng().gen::<f64>();
    tokio::time::sleep(backoff_delay(iteration, base_ms, jitter, max_ms, sample)).await;
}

/// The delay [`backoff`] sleeps for, given the random `sample`.
pub fn backoff_delay(
    iteration: u32,
    base_ms: u64,
    jitter: f64,
    max_ms: u64,
    sample: f64,
) -> Duration {
    let mut ms = 2f64.powf(f64::from(iteration)) * base_ms as f64 * (1.0 + jitter * sample);
    // NaN and negative delays (negative jitter) collapse to no delay at all
    ms = ms.max(0.0);
    if max_ms != 0 {
        ms = ms.min(max_ms as f64);
    }
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 100, DEFAULT_JITTER, 0.0, 100)]
    #[case(3, 100, DEFAULT_JITTER, 0.0, 800)]
    #[case(3, 100, 0.5, 0.5, 1000)]
    #[case(1, 250, 0.5, 0.8, 700)]
    fn test_delay_grows_exponentially(
        #[case] iteration: u32,
        #[case] base_ms: u64,
        #[case] jitter: f64,
        #[case] sample: f64,
        #[case] expected_ms: u64,
    ) {
        let delay = backoff_delay(iteration, base_ms, jitter, DEFAULT_MAX_MS, sample);
        let diff = delay.as_secs_f64() * 1000.0 - expected_ms as f64;
        assert!(diff.abs() < 0.001, "{delay:?} != {expected_ms}ms");
    }

    #[test]
    fn test_delay_is_capped() {
        let delay = backoff_delay(20, 1000, DEFAULT_JITTER, 5_000, 0.5);
        assert_eq!(delay, Duration::from_millis(5_000));
    }

    #[test]
    fn test_zero_max_means_unbounded() {
        let delay = backoff_delay(40, 1000, 0.0, 0, 0.0);
        assert!(delay > Duration::from_secs(1 << 30));
        assert_eq!(backoff_delay(2000, 1000, 0.0, 0, 0.0), Duration::MAX);
    }

    #[rstest]
    #[case(-2.0, 0.9)]
    #[case(DEFAULT_JITTER, f64::NAN)]
    #[case(f64::NAN, 0.5)]
    fn test_invalid_jitter_does_not_sleep_forever(#[case] jitter: f64, #[case] sample: f64) {
        assert_eq!(backoff_delay(3, 100, jitter, 0, sample), Duration::ZERO);
        assert_eq!(backoff_delay(3, 100, jitter, DEFAULT_MAX_MS, sample), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_backoff_suspends_for_at_least_base() {
        let start = std::time::Instant::now();
        backoff(1, 5, DEFAULT_JITTER, DEFAULT_MAX_MS).await;
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
