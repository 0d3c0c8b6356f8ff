use crate::errors::{Result, GainerError};
use crate::models::gain::GainerQuery;
use std::ops::RangeInclusive;
use std::time::Duration;

pub const INTERVAL_RANGE: RangeInclusive<usize> = 1..=60;
pub const MIN_GAIN_RANGE: RangeInclusive<f64> = 0.1..=30.0;
pub const TOP_N_RANGE: RangeInclusive<usize> = 1..=50;
pub const REFRESH_RANGE: RangeInclusive<u64> = 10..=120;

/// User-adjustable dashboard knobs; nothing is persisted between runs
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub api_url: String,
    pub interval_minutes: usize,
    pub min_gain: f64,
    pub top_n: usize,
    pub auto_refresh: bool,
    pub refresh_secs: u64,
    pub chart_ticker: Option<String>,
}

impl DashboardSettings {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            interval_minutes: 5,
            min_gain: 2.0,
            top_n: 10,
            auto_refresh: true,
            refresh_secs: 30,
            chart_ticker: None,
        }
    }

    pub fn with_interval_minutes(mut self, minutes: usize) -> Self {
        self.interval_minutes = minutes;
        self
    }

    pub fn with_min_gain(mut self, min_gain: f64) -> Self {
        self.min_gain = min_gain;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh = enabled;
        self
    }

    pub fn with_refresh_secs(mut self, secs: u64) -> Self {
        self.refresh_secs = secs;
        self
    }

    pub fn with_chart_ticker(mut self, ticker: Option<&str>) -> Self {
        self.chart_ticker = ticker.map(|t| t.to_string());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !INTERVAL_RANGE.contains(&self.interval_minutes) {
            return Err(out_of_range("interval minutes", self.interval_minutes, &INTERVAL_RANGE));
        }
        if !MIN_GAIN_RANGE.contains(&self.min_gain) {
            return Err(out_of_range("min gain", self.min_gain, &MIN_GAIN_RANGE));
        }
        if !TOP_N_RANGE.contains(&self.top_n) {
            return Err(out_of_range("top N", self.top_n, &TOP_N_RANGE));
        }
        if !REFRESH_RANGE.contains(&self.refresh_secs) {
            return Err(out_of_range("refresh seconds", self.refresh_secs, &REFRESH_RANGE));
        }
        Ok(())
    }

    pub fn query(&self) -> GainerQuery {
        GainerQuery::new(self.interval_minutes, self.min_gain, self.top_n)
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

fn out_of_range<T: std::fmt::Display>(what: &str, value: T, range: &RangeInclusive<T>) -> GainerError {
    GainerError::InvalidParameter(format!(
        "{} {} outside [{}, {}]",
        what,
        value,
        range.start(),
        range.end()
    ))
}
