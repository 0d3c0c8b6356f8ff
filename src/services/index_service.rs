use crate::fetchers::base::PriceFetcher;
use crate::fetchers::retry::{fetch_with_retry, FetchOutcome, RetryPolicy};
use crate::models::bar::PriceSeries;
use crate::models::gain::round2;
use crate::registry::TickerEntry;
use log::debug;
use serde::Serialize;

/// Day move of one market index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSummary {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "현재가")]
    pub last: f64,
    #[serde(rename = "변동률(%)")]
    pub change_pct: f64,
}

/// Latest close against the day's first open, rounded for display
pub fn summarize_index(entry: &TickerEntry, series: &PriceSeries) -> Option<IndexSummary> {
    let last = series.latest_close()?;
    let open = series.first_open()?;
    if !last.is_finite() || !open.is_finite() || open == 0.0 {
        return None;
    }

    Some(IndexSummary {
        symbol: entry.symbol.clone(),
        name: entry.name.clone(),
        last: round2(last),
        change_pct: round2((last - open) / open * 100.0),
    })
}

/// Summaries for every index that returned data, in registry order
pub async fn fetch_index_summaries(
    fetcher: &(dyn PriceFetcher + Send + Sync),
    indices: &[TickerEntry],
    policy: RetryPolicy,
) -> Vec<IndexSummary> {
    let mut summaries = Vec::with_capacity(indices.len());

    for entry in indices {
        match fetch_with_retry(fetcher, &entry.symbol, policy).await {
            FetchOutcome::Series(series) => {
                if let Some(summary) = summarize_index(entry, &series) {
                    summaries.push(summary);
                }
            }
            FetchOutcome::Absent(reason) => {
                debug!("No index data for {}: {}", entry.symbol, reason);
            }
        }
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{GainerError, Result};
    use crate::models::bar::MinuteBar;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;

    fn bar(open: f64, close: f64) -> MinuteBar {
        MinuteBar { timestamp: Utc::now(), open, high: close, low: open, close, volume: 0 }
    }

    #[test]
    fn change_is_measured_from_first_open() {
        let entry = TickerEntry::new("^GDAXI", "DAX (독일)");
        let series = PriceSeries::new("^GDAXI", vec![bar(20000.0, 20010.0), bar(20010.0, 20300.0)]);
        let summary = summarize_index(&entry, &series).unwrap();
        assert_eq!(summary.last, 20300.0);
        assert_eq!(summary.change_pct, 1.5);
    }

    #[test]
    fn empty_series_has_no_summary() {
        let entry = TickerEntry::new("^FTSE", "FTSE 100 (영국)");
        assert!(summarize_index(&entry, &PriceSeries::new("^FTSE", Vec::new())).is_none());
    }

    struct OnlyDax;

    #[async_trait]
    impl PriceFetcher for OnlyDax {
        fn source_name(&self) -> &'static str {
            "only-dax"
        }

        async fn fetch_intraday(&self, symbol: &str) -> Result<Vec<MinuteBar>> {
            if symbol == "^GDAXI" {
                Ok(vec![bar(100.0, 101.0)])
            } else {
                Err(GainerError::DataError("unavailable".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn failed_indices_are_skipped() {
        let indices = crate::registry::default_indices();
        let summaries = fetch_index_summaries(&OnlyDax, &indices, RetryPolicy::new(1, Duration::ZERO)).await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].symbol, "^GDAXI");
        assert_eq!(summaries[0].change_pct, 1.0);
    }
}
