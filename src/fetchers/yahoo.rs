use crate::models::bar::MinuteBar;
use crate::errors::{Result, GainerError};
use crate::fetchers::base::PriceFetcher;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Yahoo Finance chart API fetcher
pub struct YahooChartFetcher {
    client: Client,
    base_url: String,
}

impl YahooChartFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(GainerError::RequestError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceFetcher for YahooChartFetcher {
    fn source_name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_intraday(&self, symbol: &str) -> Result<Vec<MinuteBar>> {
        debug!("Fetching 1d/1m chart for {}", symbol);

        let response = self.client
            .get(format!("{}/v8/finance/chart/{}", self.base_url, symbol))
            .query(&[("range", "1d"), ("interval", "1m")])
            .send()
            .await?;

        let json: Value = response.json().await?;
        let bars = parse_chart_response(&json)?;

        debug!("Got {} minute bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

/// Decode a chart API body into bars. Rows with any missing price are dropped.
pub fn parse_chart_response(json: &Value) -> Result<Vec<MinuteBar>> {
    let chart = json.get("chart")
        .ok_or_else(|| GainerError::DataError("Missing chart object".to_string()))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let description = error.get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("unknown provider error");
        return Err(GainerError::DataError(description.to_string()));
    }

    let result = match chart.get("result").and_then(|r| r.as_array()).and_then(|r| r.first()) {
        Some(result) => result,
        None => return Ok(Vec::new()),
    };

    let timestamps = match result.get("timestamp").and_then(|t| t.as_array()) {
        Some(timestamps) => timestamps,
        None => return Ok(Vec::new()),
    };

    let quote = result.get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(|q| q.as_array())
        .and_then(|q| q.first())
        .ok_or_else(|| GainerError::DataError("Missing quote indicators".to_string()))?;

    let column = |name: &str| -> Vec<Value> {
        quote.get(name).and_then(|c| c.as_array()).cloned().unwrap_or_default()
    };
    let opens = column("open");
    let highs = column("high");
    let lows = column("low");
    let closes = column("close");
    let volumes = column("volume");

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let timestamp = match ts.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()) {
            Some(timestamp) => timestamp,
            None => continue,
        };
        let (open, high, low, close) = match (
            value_at(&opens, i),
            value_at(&highs, i),
            value_at(&lows, i),
            value_at(&closes, i),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };
        let volume = volumes.get(i).and_then(|v| v.as_u64()).unwrap_or_default();

        let bar = MinuteBar { timestamp, open, high, low, close, volume };
        if bar.is_complete() {
            bars.push(bar);
        }
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

fn value_at(values: &[Value], i: usize) -> Option<f64> {
    values.get(i).and_then(|v| v.as_f64())
}
