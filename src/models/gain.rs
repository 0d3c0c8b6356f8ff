use serde::{Deserialize, Serialize};

pub const MSG_MARKET_CLOSED: &str = "현재 유럽 시장은 폐장 상태입니다.";
pub const MSG_NO_MATCHES: &str = "장중이지만 기준에 맞는 급등 종목이 없습니다.";

/// Parameters of one screener query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainerQuery {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: usize,
    #[serde(default = "default_min_gain")]
    pub min_gain: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_interval_minutes() -> usize {
    5
}

fn default_min_gain() -> f64 {
    2.0
}

fn default_top_n() -> usize {
    10
}

impl Default for GainerQuery {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            min_gain: default_min_gain(),
            top_n: default_top_n(),
        }
    }
}

impl GainerQuery {
    pub fn new(interval_minutes: usize, min_gain: f64, top_n: usize) -> Self {
        Self {
            interval_minutes,
            min_gain,
            top_n,
        }
    }
}

/// One qualifying ticker, display values rounded to 2 decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainRecord {
    #[serde(rename = "시간")]
    pub timestamp: String,
    #[serde(rename = "기업명")]
    pub name: String,
    #[serde(rename = "티커")]
    pub symbol: String,
    #[serde(rename = "당일시가")]
    pub opening_price: f64,
    #[serde(rename = "현재가")]
    pub latest_price: f64,
    #[serde(rename = "상승률(%)")]
    pub gain_pct: f64,
}

/// Response body of the screener query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub market_closed: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub results: Vec<GainRecord>,
}

impl QueryResult {
    pub fn market_closed() -> Self {
        Self {
            market_closed: true,
            message: MSG_MARKET_CLOSED.to_string(),
            results: Vec::new(),
        }
    }

    pub fn no_matches() -> Self {
        Self {
            market_closed: false,
            message: MSG_NO_MATCHES.to_string(),
            results: Vec::new(),
        }
    }

    pub fn found(results: Vec<GainRecord>) -> Self {
        Self {
            market_closed: false,
            message: format!("{}개 종목 발견", results.len()),
            results,
        }
    }

    /// Stand-in result when the screener could not be reached
    pub fn connection_error(reason: &str) -> Self {
        Self {
            market_closed: true,
            message: format!("❌ 서버 연결 오류: {}", reason),
            results: Vec::new(),
        }
    }

    pub fn has_results(&self) -> bool {
        !self.market_closed && !self.results.is_empty()
    }
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_record_uses_wire_keys() {
        let record = GainRecord {
            timestamp: "2026-10-14 10:00:00".to_string(),
            name: "Airbus".to_string(),
            symbol: "AIR.PA".to_string(),
            opening_price: 98.0,
            latest_price: 105.0,
            gain_pct: 5.0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["시간"], "2026-10-14 10:00:00");
        assert_eq!(json["기업명"], "Airbus");
        assert_eq!(json["티커"], "AIR.PA");
        assert_eq!(json["당일시가"], 98.0);
        assert_eq!(json["현재가"], 105.0);
        assert_eq!(json["상승률(%)"], 5.0);
    }

    #[test]
    fn query_defaults_apply_to_missing_fields() {
        let query: GainerQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, GainerQuery::default());
        let query: GainerQuery = serde_json::from_str(r#"{"top_n": 3}"#).unwrap();
        assert_eq!(query.top_n, 3);
        assert_eq!(query.interval_minutes, 5);
    }

    #[test]
    fn found_message_counts_results() {
        let result = QueryResult::found(Vec::new());
        assert_eq!(result.message, "0개 종목 발견");
        assert!(!result.has_results());
    }

    #[test]
    fn round2_rounds_to_cents() {
        assert_eq!(round2(4.999), 5.0);
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(-2.346), -2.35);
    }
}
