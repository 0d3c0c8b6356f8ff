use crate::errors::{Result, GainerError};
use crate::models::gain::{GainerQuery, QueryResult};
use log::warn;
use reqwest::Client;
use std::time::Duration;

/// HTTP client for the screener's `/get_gainers` endpoint
pub struct ScreenerClient {
    client: Client,
    base_url: String,
}

impl ScreenerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GainerError::RequestError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_gainers(&self, query: &GainerQuery) -> Result<QueryResult> {
        let response = self.client
            .get(format!("{}/get_gainers", self.base_url))
            .query(&[
                ("interval_minutes", query.interval_minutes.to_string()),
                ("min_gain", query.min_gain.to_string()),
                ("top_n", query.top_n.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<QueryResult>().await?)
    }

    /// Like `fetch_gainers`, but a failed call becomes an empty result
    /// carrying the connection error message.
    pub async fn poll(&self, query: &GainerQuery) -> QueryResult {
        match self.fetch_gainers(query).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Screener request failed: {}", e);
                QueryResult::connection_error(&e.to_string())
            }
        }
    }
}
