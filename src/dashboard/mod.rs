//! Terminal dashboard that polls the screener on a timer.

pub mod client;
pub mod controls;
pub mod render;
pub mod settings;

use crate::config::Config;
use crate::errors::Result;
use crate::fetchers::base::PriceFetcher;
use crate::fetchers::retry::{fetch_with_retry, FetchOutcome, RetryPolicy};
use crate::models::bar::PriceSeries;
use crate::models::gain::QueryResult;
use crate::registry::TickerEntry;
use crate::services::index_service::fetch_index_summaries;
use chrono::Local;
use client::ScreenerClient;
use controls::{apply_command, DashboardCommand, HELP_LINE};
use log::{debug, info, warn};
use settings::DashboardSettings;
use std::future::Future;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;

const CHART_WIDTH: usize = 72;
const CHART_HEIGHT: usize = 12;

/// Explicit choice first, then the top result, then the first registry ticker
pub fn select_chart_ticker(
    settings: &DashboardSettings,
    result: &QueryResult,
    registry: &[TickerEntry],
) -> Option<String> {
    if let Some(ticker) = &settings.chart_ticker {
        return Some(ticker.clone());
    }
    if let Some(top) = result.results.first() {
        return Some(top.symbol.clone());
    }
    registry.first().map(|t| t.symbol.clone())
}

pub struct Dashboard {
    settings: DashboardSettings,
    client: ScreenerClient,
    fetcher: Arc<dyn PriceFetcher + Send + Sync>,
    config: Arc<Config>,
}

impl Dashboard {
    pub fn new(
        settings: DashboardSettings,
        config: Arc<Config>,
        fetcher: Arc<dyn PriceFetcher + Send + Sync>,
    ) -> Result<Self> {
        settings.validate()?;
        let client = ScreenerClient::new(&settings.api_url, config.request_timeout)?;
        Ok(Self { settings, client, fetcher, config })
    }

    /// One full refresh: indices, gainer table and chart
    pub async fn render_once(&self) -> String {
        let policy = RetryPolicy::new(self.config.fetch_retries, self.config.retry_delay);
        let fetcher = self.fetcher.as_ref();

        let indices = fetch_index_summaries(fetcher, &self.config.indices, policy).await;
        let result = self.client.poll(&self.settings.query()).await;

        let mut screen = format!(
            "EU Gainer Monitor | {} | {}m >= {}% top {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.settings.interval_minutes,
            self.settings.min_gain,
            self.settings.top_n
        );
        screen.push_str(&render::render_index_panel(&indices));
        screen.push('\n');
        screen.push_str(&render::render_gainer_table(&result));
        screen.push('\n');

        if let Some(symbol) = select_chart_ticker(&self.settings, &result, &self.config.tickers) {
            let series = match fetch_with_retry(fetcher, &symbol, policy).await {
                FetchOutcome::Series(series) => series,
                FetchOutcome::Absent(_) => PriceSeries::new(&symbol, Vec::new()),
            };
            screen.push_str(&render::render_line_chart(&series, CHART_WIDTH, CHART_HEIGHT));
        }

        screen
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Refresh every `refresh_secs` until Ctrl-C or `q`, or once when auto-refresh is off
    pub async fn run(&mut self) -> Result<()> {
        if !self.settings.auto_refresh {
            println!("{}", self.render_once().await);
            return Ok(());
        }

        // plain thread: a blocked stdin read must not hold up runtime shutdown
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines().map_while(|line| line.ok()) {
                match DashboardCommand::parse(&line) {
                    Some(command) => {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                    None => debug!("Ignoring dashboard input {:?}", line),
                }
            }
        });

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_until(rx, shutdown).await
    }

    /// Refresh loop driven by a timer and `commands`, stopped by `shutdown` or a quit command.
    ///
    /// `shutdown` is polled during rendering too, so a stop request is never lost.
    pub async fn run_until<F>(&mut self, mut commands: mpsc::UnboundedReceiver<DashboardCommand>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("Auto refresh every {}s", self.settings.refresh_secs);
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(self.settings.refresh_period());
        let mut input_open = true;

        loop {
            let redraw = tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => true,
                command = commands.recv(), if input_open => match command {
                    Some(DashboardCommand::Quit) => break,
                    Some(command) => apply_command(&mut self.settings, command, &self.config.tickers),
                    None => {
                        input_open = false;
                        false
                    }
                },
            };
            if !redraw {
                continue;
            }

            let screen = tokio::select! {
                _ = &mut shutdown => break,
                screen = self.render_once() => screen,
            };
            // clear terminal, cursor home
            print!("\x1B[2J\x1B[H");
            println!("{}\n{}", screen, HELP_LINE);
        }

        info!("Dashboard stopped");
        Ok(())
    }
}
