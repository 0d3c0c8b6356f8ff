use crate::config::Config;
use crate::errors::{Result, GainerError};
use crate::fetchers::base::PriceFetcher;
use crate::fetchers::retry::{fetch_with_retry, AbsenceReason, FetchOutcome, RetryPolicy};
use crate::market_hours;
use crate::models::bar::PriceSeries;
use crate::models::gain::{round2, GainRecord, GainerQuery, QueryResult};
use crate::registry::TickerEntry;
use chrono::{DateTime, Local, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, info};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Unrounded prices and gain for one ticker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainSample {
    pub opening: f64,
    pub latest: f64,
    pub past: f64,
    pub gain_pct: f64,
}

/// Why a ticker was left out of a query result
#[derive(Debug, Clone, PartialEq)]
pub enum Exclusion {
    NoData(AbsenceReason),
    TooShort { len: usize, required: usize },
    InvalidPrice,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::NoData(reason) => write!(f, "{}", reason),
            Exclusion::TooShort { len, required } => {
                write!(f, "series too short ({} < {})", len, required)
            }
            Exclusion::InvalidPrice => write!(f, "invalid price"),
        }
    }
}

/// Gain over `interval` minutes ending at the latest bar.
///
/// The reference point is the close `interval + 1` bars from the end, and the
/// series must hold at least `interval + 2` bars.
pub fn evaluate_series(series: &PriceSeries, interval: usize) -> std::result::Result<GainSample, Exclusion> {
    let required = interval.checked_add(2).unwrap_or(usize::MAX);
    if series.len() < required {
        return Err(Exclusion::TooShort { len: series.len(), required });
    }

    let (latest, past, opening) = match (
        series.latest_close(),
        series.close_back(required - 1),
        series.first_open(),
    ) {
        (Some(latest), Some(past), Some(opening)) => (latest, past, opening),
        _ => return Err(Exclusion::InvalidPrice),
    };

    if !latest.is_finite() || !past.is_finite() || !opening.is_finite() || past == 0.0 {
        return Err(Exclusion::InvalidPrice);
    }

    let gain_pct = (latest - past) / past * 100.0;
    if !gain_pct.is_finite() {
        return Err(Exclusion::InvalidPrice);
    }

    Ok(GainSample { opening, latest, past, gain_pct })
}

pub fn evaluate_outcome(outcome: &FetchOutcome, interval: usize) -> std::result::Result<GainSample, Exclusion> {
    match outcome {
        FetchOutcome::Series(series) => evaluate_series(series, interval),
        FetchOutcome::Absent(reason) => Err(Exclusion::NoData(reason.clone())),
    }
}

/// Filter by threshold (inclusive), rank by unrounded gain, keep the top `top_n`.
///
/// `candidates` must be in registry order; the sort is stable, so equal gains
/// keep that order.
pub fn rank_gainers(
    candidates: Vec<(TickerEntry, GainSample)>,
    min_gain: f64,
    top_n: usize,
    timestamp: &str,
) -> QueryResult {
    let mut qualifying: Vec<(TickerEntry, GainSample)> = candidates
        .into_iter()
        .filter(|(_, sample)| sample.gain_pct >= min_gain)
        .collect();

    if qualifying.is_empty() {
        return QueryResult::no_matches();
    }

    qualifying.sort_by(|a, b| b.1.gain_pct.partial_cmp(&a.1.gain_pct).unwrap_or(Ordering::Equal));
    qualifying.truncate(top_n);

    let results = qualifying
        .into_iter()
        .map(|(ticker, sample)| GainRecord {
            timestamp: timestamp.to_string(),
            name: ticker.name,
            symbol: ticker.symbol,
            opening_price: round2(sample.opening),
            latest_price: round2(sample.latest),
            gain_pct: round2(sample.gain_pct),
        })
        .collect();

    QueryResult::found(results)
}

pub fn validate_query(query: &GainerQuery) -> Result<()> {
    if query.interval_minutes < 1 {
        return Err(GainerError::InvalidParameter("interval_minutes must be at least 1".to_string()));
    }
    if query.top_n < 1 {
        return Err(GainerError::InvalidParameter("top_n must be at least 1".to_string()));
    }
    if !query.min_gain.is_finite() {
        return Err(GainerError::InvalidParameter("min_gain must be a finite number".to_string()));
    }
    Ok(())
}

/// Screens the ticker registry for short-horizon gainers
pub struct GainerService {
    config: Arc<Config>,
    fetcher: Arc<dyn PriceFetcher + Send + Sync>,
}

impl GainerService {
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn PriceFetcher + Send + Sync>) -> Self {
        Self { config, fetcher }
    }

    pub async fn calculate_gainers(&self, query: &GainerQuery) -> Result<QueryResult> {
        self.calculate_gainers_at(Utc::now(), query).await
    }

    pub async fn calculate_gainers_at(&self, now: DateTime<Utc>, query: &GainerQuery) -> Result<QueryResult> {
        validate_query(query)?;

        if !market_hours::is_any_market_open(&self.config.sessions, now) {
            info!("All configured exchanges are closed, skipping fetch");
            return Ok(QueryResult::market_closed());
        }

        let timestamp = now.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string();
        let interval = query.interval_minutes;
        let policy = RetryPolicy::new(self.config.fetch_retries, self.config.retry_delay);
        let fetcher = self.fetcher.clone();

        // buffered() yields in input order, so candidates stay in registry order
        let evaluated: Vec<(TickerEntry, std::result::Result<GainSample, Exclusion>)> =
            stream::iter(self.config.tickers.clone())
                .map(move |ticker| {
                    let fetcher = fetcher.clone();
                    async move {
                        let outcome = fetch_with_retry(fetcher.as_ref(), &ticker.symbol, policy).await;
                        let evaluation = evaluate_outcome(&outcome, interval);
                        (ticker, evaluation)
                    }
                })
                .buffered(self.config.fetch_concurrency)
                .collect()
                .await;

        let mut candidates = Vec::with_capacity(evaluated.len());
        for (ticker, evaluation) in evaluated {
            match evaluation {
                Ok(sample) => candidates.push((ticker, sample)),
                Err(exclusion) => debug!("Skipping {}: {}", ticker.symbol, exclusion),
            }
        }

        let evaluated_count = candidates.len();
        let result = rank_gainers(candidates, query.min_gain, query.top_n, &timestamp);
        info!(
            "Screened {} tickers ({} with usable data): {} results for interval={}m min_gain={}%",
            self.config.tickers.len(),
            evaluated_count,
            result.results.len(),
            interval,
            query.min_gain
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bar::MinuteBar;
    use chrono::TimeZone;

    fn series(symbol: &str, open: f64, closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2026, 10, 14, 7, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| MinuteBar {
                timestamp: start + chrono::Duration::minutes(i as i64),
                open: if i == 0 { open } else { close },
                high: close,
                low: close,
                close,
                volume: 10,
            })
            .collect();
        PriceSeries::new(symbol, bars)
    }

    struct NoBars;

    #[async_trait::async_trait]
    impl PriceFetcher for NoBars {
        fn source_name(&self) -> &'static str {
            "none"
        }

        async fn fetch_intraday(&self, _symbol: &str) -> Result<Vec<MinuteBar>> {
            Ok(Vec::new())
        }
    }

    fn sample(gain_pct: f64) -> GainSample {
        GainSample { opening: 100.0, latest: 100.0 + gain_pct, past: 100.0, gain_pct }
    }

    #[test]
    fn gain_uses_close_interval_plus_one_back() {
        let s = series("AIR.PA", 98.0, &[99.0, 100.0, 102.0, 105.0]);
        let sample = evaluate_series(&s, 2).unwrap();
        assert_eq!(sample.past, 100.0);
        assert_eq!(sample.latest, 105.0);
        assert_eq!(sample.opening, 98.0);
        assert!((sample.gain_pct - 5.0).abs() < 1e-12);
    }

    #[test]
    fn short_series_is_excluded_whatever_the_move() {
        let s = series("AIR.PA", 1.0, &[1.0, 50.0, 500.0]);
        assert_eq!(
            evaluate_series(&s, 2),
            Err(Exclusion::TooShort { len: 3, required: 4 })
        );
    }

    #[test]
    fn zero_past_price_is_invalid() {
        let s = series("AIR.PA", 1.0, &[1.0, 0.0, 2.0, 3.0]);
        assert_eq!(evaluate_series(&s, 2), Err(Exclusion::InvalidPrice));
    }

    fn series_with(open: f64, past: f64, latest: f64) -> PriceSeries {
        let mut s = series("AIR.PA", 100.0, &[100.0, past, 101.0, latest]);
        s.bars[0].open = open;
        s
    }

    #[test]
    fn non_finite_latest_price_is_invalid() {
        let s = series_with(100.0, 100.0, f64::NAN);
        assert_eq!(evaluate_series(&s, 2), Err(Exclusion::InvalidPrice));
    }

    #[test]
    fn non_finite_past_price_is_invalid() {
        let s = series_with(100.0, f64::INFINITY, 105.0);
        assert_eq!(evaluate_series(&s, 2), Err(Exclusion::InvalidPrice));
    }

    #[test]
    fn non_finite_opening_price_is_invalid() {
        let s = series_with(f64::NAN, 100.0, 105.0);
        assert_eq!(evaluate_series(&s, 2), Err(Exclusion::InvalidPrice));
    }

    #[test]
    fn huge_interval_is_too_short_instead_of_overflowing() {
        let s = series("AIR.PA", 98.0, &[99.0, 100.0, 102.0, 105.0]);
        assert_eq!(
            evaluate_series(&s, usize::MAX),
            Err(Exclusion::TooShort { len: 4, required: usize::MAX })
        );
        assert_eq!(
            evaluate_series(&s, usize::MAX - 1),
            Err(Exclusion::TooShort { len: 4, required: usize::MAX })
        );
    }

    #[test]
    fn calculate_gainers_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}
        let service = GainerService::new(Arc::new(Config::new()), Arc::new(NoBars));
        let query = GainerQuery::default();
        assert_send(&service.calculate_gainers(&query));
    }

    #[test]
    fn absent_outcome_maps_to_no_data() {
        let outcome = FetchOutcome::Absent(AbsenceReason::Empty);
        assert_eq!(
            evaluate_outcome(&outcome, 5),
            Err(Exclusion::NoData(AbsenceReason::Empty))
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let candidates = vec![(TickerEntry::new("AIR.PA", "Airbus"), sample(2.0))];
        let result = rank_gainers(candidates, 2.0, 10, "t");
        assert_eq!(result.results.len(), 1);
    }

    #[test]
    fn ranks_descending_and_truncates() {
        let candidates = vec![
            (TickerEntry::new("A", "a"), sample(2.5)),
            (TickerEntry::new("B", "b"), sample(7.0)),
            (TickerEntry::new("C", "c"), sample(1.0)),
            (TickerEntry::new("D", "d"), sample(4.0)),
        ];
        let result = rank_gainers(candidates, 2.0, 2, "2026-10-14 10:00:00");
        let symbols: Vec<_> = result.results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "D"]);
        assert_eq!(result.message, "2개 종목 발견");
        assert!(result.results.iter().all(|r| r.timestamp == "2026-10-14 10:00:00"));
    }

    #[test]
    fn ties_keep_registry_order() {
        let candidates = vec![
            (TickerEntry::new("X", "x"), sample(3.0)),
            (TickerEntry::new("Y", "y"), sample(3.0)),
        ];
        let result = rank_gainers(candidates, 0.0, 10, "t");
        assert_eq!(result.results[0].symbol, "X");
        assert_eq!(result.results[1].symbol, "Y");
    }

    #[test]
    fn ranking_uses_unrounded_gain() {
        // both display as 3.0 but the second is larger
        let candidates = vec![
            (TickerEntry::new("LOW", "low"), sample(3.001)),
            (TickerEntry::new("HIGH", "high"), sample(3.004)),
        ];
        let result = rank_gainers(candidates, 0.0, 10, "t");
        assert_eq!(result.results[0].symbol, "HIGH");
        assert_eq!(result.results[0].gain_pct, 3.0);
    }

    #[test]
    fn nothing_above_threshold_is_no_matches() {
        let candidates = vec![(TickerEntry::new("A", "a"), sample(5.0))];
        let result = rank_gainers(candidates, 6.0, 10, "t");
        assert_eq!(result, QueryResult::no_matches());
    }

    #[test]
    fn negative_threshold_admits_losers() {
        let candidates = vec![(TickerEntry::new("A", "a"), sample(-1.5))];
        let result = rank_gainers(candidates, -2.0, 10, "t");
        assert_eq!(result.results[0].gain_pct, -1.5);
    }

    #[test]
    fn invalid_queries_are_rejected() {
        assert!(validate_query(&GainerQuery::new(0, 2.0, 10)).is_err());
        assert!(validate_query(&GainerQuery::new(5, 2.0, 0)).is_err());
        assert!(validate_query(&GainerQuery::new(5, f64::NAN, 10)).is_err());
        assert!(validate_query(&GainerQuery::default()).is_ok());
    }
}
