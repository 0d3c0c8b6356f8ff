use crate::fetchers::base::PriceFetcher;
use crate::models::bar::PriceSeries;
use log::{debug, warn};
use std::fmt;
use std::time::Duration;

/// Fixed-count, fixed-delay retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: usize, delay: Duration) -> Self {
        Self {
            retries: retries.max(1),
            delay,
        }
    }
}

/// Why no series came back for a symbol
#[derive(Debug, Clone, PartialEq)]
pub enum AbsenceReason {
    /// Provider answered, but with no usable bars
    Empty,
    /// The last attempt failed with this error
    Failed(String),
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsenceReason::Empty => write!(f, "no data"),
            AbsenceReason::Failed(msg) => write!(f, "fetch failed: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Series(PriceSeries),
    Absent(AbsenceReason),
}

/// Fetch a symbol's intraday series, retrying empty or failed responses.
pub async fn fetch_with_retry(
    fetcher: &(dyn PriceFetcher + Send + Sync),
    symbol: &str,
    policy: RetryPolicy,
) -> FetchOutcome {
    let mut reason = AbsenceReason::Empty;

    for attempt in 1..=policy.retries {
        match fetcher.fetch_intraday(symbol).await {
            Ok(bars) if !bars.is_empty() => {
                return FetchOutcome::Series(PriceSeries::new(symbol, bars));
            }
            Ok(_) => {
                debug!("{}: empty response for {} (attempt {}/{})",
                       fetcher.source_name(), symbol, attempt, policy.retries);
                reason = AbsenceReason::Empty;
            }
            Err(e) => {
                debug!("{}: fetch for {} failed (attempt {}/{}): {}",
                       fetcher.source_name(), symbol, attempt, policy.retries, e);
                reason = AbsenceReason::Failed(e.to_string());
            }
        }

        if attempt < policy.retries && !policy.delay.is_zero() {
            tokio::time::sleep(policy.delay).await;
        }
    }

    warn!("Giving up on {} after {} attempts: {}", symbol, policy.retries, reason);
    FetchOutcome::Absent(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{GainerError, Result};
    use crate::models::bar::MinuteBar;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails or returns empty until `succeed_on`, then returns one bar
    struct FlakyFetcher {
        calls: AtomicUsize,
        succeed_on: usize,
        fail_with_error: bool,
    }

    impl FlakyFetcher {
        fn new(succeed_on: usize, fail_with_error: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                succeed_on,
                fail_with_error,
            }
        }
    }

    #[async_trait]
    impl PriceFetcher for FlakyFetcher {
        fn source_name(&self) -> &'static str {
            "flaky"
        }

        async fn fetch_intraday(&self, _symbol: &str) -> Result<Vec<MinuteBar>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.succeed_on {
                return Ok(vec![MinuteBar {
                    timestamp: Utc::now(),
                    open: 1.0,
                    high: 1.0,
                    low: 1.0,
                    close: 1.0,
                    volume: 1,
                }]);
            }
            if self.fail_with_error {
                Err(GainerError::DataError("boom".to_string()))
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn policy(retries: usize) -> RetryPolicy {
        RetryPolicy::new(retries, Duration::ZERO)
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let fetcher = FlakyFetcher::new(3, true);
        match fetch_with_retry(&fetcher, "SIE.DE", policy(6)).await {
            FetchOutcome::Series(series) => {
                assert_eq!(series.symbol, "SIE.DE");
                assert_eq!(series.len(), 1);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_retry_count() {
        let fetcher = FlakyFetcher::new(usize::MAX, true);
        let outcome = fetch_with_retry(&fetcher, "BMW.DE", policy(4)).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
        assert!(matches!(outcome, FetchOutcome::Absent(AbsenceReason::Failed(_))));
    }

    #[tokio::test]
    async fn empty_responses_end_as_empty() {
        let fetcher = FlakyFetcher::new(usize::MAX, false);
        let outcome = fetch_with_retry(&fetcher, "RIO.L", policy(2)).await;
        assert_eq!(outcome, FetchOutcome::Absent(AbsenceReason::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_attempts_only() {
        let fetcher = FlakyFetcher::new(usize::MAX, true);
        let started = tokio::time::Instant::now();
        fetch_with_retry(&fetcher, "AZN.L", RetryPolicy::new(3, Duration::from_millis(400))).await;
        assert_eq!(started.elapsed(), Duration::from_millis(800));
    }
}
