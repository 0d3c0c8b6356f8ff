use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::{GainerError, Result};
use crate::registry::{self, MarketSession, TickerEntry};

pub const DEFAULT_PROVIDER_URL: &str = "https://query1.finance.yahoo.com";

/// Process-wide read-only settings, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub tickers: Vec<TickerEntry>,
    pub indices: Vec<TickerEntry>,
    pub sessions: Vec<MarketSession>,
    pub fetch_retries: usize,
    pub retry_delay: Duration,
    pub fetch_concurrency: usize,
    pub request_timeout: Duration,
    pub provider_url: String,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            tickers: registry::default_tickers(),
            indices: registry::default_indices(),
            sessions: registry::default_sessions(),
            fetch_retries: 6,
            retry_delay: Duration::from_millis(400),
            fetch_concurrency: 4,
            request_timeout: Duration::from_secs(30),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
        }
    }

    pub fn with_tickers(mut self, tickers: Vec<TickerEntry>) -> Self {
        self.tickers = tickers;
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<MarketSession>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_fetch_retries(mut self, retries: usize) -> Self {
        self.fetch_retries = retries.max(1);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    // 1 means strictly sequential fetching
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_provider_url(mut self, url: &str) -> Self {
        self.provider_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_bind_addr(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn bind_socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr.parse().map_err(|e| {
            GainerError::ConfigError(format!("invalid bind address {:?}: {}", self.bind_addr, e))
        })
    }
}
