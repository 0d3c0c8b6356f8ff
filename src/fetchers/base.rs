use crate::models::bar::MinuteBar;
use crate::errors::Result;
use async_trait::async_trait;

/// Source of intraday minute bars
#[async_trait]
pub trait PriceFetcher {
    /// Short name of the upstream provider, for logs
    fn source_name(&self) -> &'static str;

    /// Fetch the most recent trading day's one-minute bars, oldest first.
    /// Bars with missing prices must already be dropped.
    async fn fetch_intraday(&self, symbol: &str) -> Result<Vec<MinuteBar>>;
}
