use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One-minute OHLCV sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinuteBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl MinuteBar {
    /// All four prices are finite numbers
    pub fn is_complete(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Intraday minute series for one symbol, oldest bar first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<MinuteBar>,
}

impl PriceSeries {
    pub fn new(symbol: &str, bars: Vec<MinuteBar>) -> Self {
        Self {
            symbol: symbol.to_string(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Open of the first bar of the session
    pub fn first_open(&self) -> Option<f64> {
        self.bars.first().map(|b| b.open)
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Close `back` bars from the end; `close_back(1)` is the latest close.
    pub fn close_back(&self, back: usize) -> Option<f64> {
        if back == 0 || back > self.bars.len() {
            return None;
        }
        self.bars.get(self.bars.len() - back).map(|b| b.close)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
