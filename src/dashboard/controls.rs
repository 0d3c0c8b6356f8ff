//! Keyboard controls read from stdin while the dashboard is refreshing.

use super::settings::{DashboardSettings, MIN_GAIN_RANGE, TOP_N_RANGE};
use crate::registry::TickerEntry;

pub const MIN_GAIN_STEP: f64 = 0.5;

pub const HELP_LINE: &str =
    "keys (then Enter): n/p chart ticker, a auto chart, +/- min gain, ]/[ top N, r refresh, q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCommand {
    NextChart,
    PrevChart,
    AutoChart,
    MinGainUp,
    MinGainDown,
    TopNUp,
    TopNDown,
    Refresh,
    Quit,
}

impl DashboardCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "n" => Some(Self::NextChart),
            "p" => Some(Self::PrevChart),
            "a" => Some(Self::AutoChart),
            "+" => Some(Self::MinGainUp),
            "-" => Some(Self::MinGainDown),
            "]" => Some(Self::TopNUp),
            "[" => Some(Self::TopNDown),
            "r" | "" => Some(Self::Refresh),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Apply `command` to `settings`, staying inside the validated ranges.
/// Returns whether the screen should be redrawn.
pub fn apply_command(settings: &mut DashboardSettings, command: DashboardCommand, registry: &[TickerEntry]) -> bool {
    match command {
        DashboardCommand::NextChart => settings.chart_ticker = step_ticker(settings.chart_ticker.as_deref(), registry, true),
        DashboardCommand::PrevChart => settings.chart_ticker = step_ticker(settings.chart_ticker.as_deref(), registry, false),
        DashboardCommand::AutoChart => settings.chart_ticker = None,
        DashboardCommand::MinGainUp => {
            settings.min_gain = round1(settings.min_gain + MIN_GAIN_STEP).min(*MIN_GAIN_RANGE.end());
        }
        DashboardCommand::MinGainDown => {
            settings.min_gain = round1(settings.min_gain - MIN_GAIN_STEP).max(*MIN_GAIN_RANGE.start());
        }
        DashboardCommand::TopNUp => settings.top_n = (settings.top_n + 1).min(*TOP_N_RANGE.end()),
        DashboardCommand::TopNDown => settings.top_n = settings.top_n.saturating_sub(1).max(*TOP_N_RANGE.start()),
        DashboardCommand::Refresh => {}
        DashboardCommand::Quit => return false,
    }
    true
}

// Unknown or unset tickers start from the registry edge
fn step_ticker(current: Option<&str>, registry: &[TickerEntry], forward: bool) -> Option<String> {
    if registry.is_empty() {
        return current.map(|t| t.to_string());
    }
    let len = registry.len();
    let position = current.and_then(|symbol| registry.iter().position(|t| t.symbol == symbol));
    let index = match (position, forward) {
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    };
    Some(registry[index].symbol.clone())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
