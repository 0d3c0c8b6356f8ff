use chrono_tz::Tz;
use chrono_tz::Europe;

/// Tracked symbol and its display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerEntry {
    pub symbol: String,
    pub name: String,
}

impl TickerEntry {
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }
}

/// Trading window of one exchange, in fractional local hours
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSession {
    pub suffix: String,
    pub open_hour: f64,
    pub close_hour: f64,
    pub timezone: Tz,
}

impl MarketSession {
    pub fn new(suffix: &str, open_hour: f64, close_hour: f64, timezone: Tz) -> Self {
        Self {
            suffix: suffix.to_string(),
            open_hour,
            close_hour,
            timezone,
        }
    }
}

pub fn default_tickers() -> Vec<TickerEntry> {
    [
        ("AIR.PA", "Airbus"),
        ("OR.PA", "L’Oréal"),
        ("MC.PA", "LVMH"),
        ("BNP.PA", "BNP Paribas"),
        ("KER.PA", "Kering"),
        ("SIE.DE", "Siemens"),
        ("ALV.DE", "Allianz"),
        ("BMW.DE", "BMW"),
        ("VOW3.DE", "Volkswagen"),
        ("AZN.L", "AstraZeneca"),
        ("HSBA.L", "HSBC"),
        ("ULVR.L", "Unilever"),
        ("RIO.L", "Rio Tinto"),
        ("NESN.SW", "Nestlé"),
        ("UBSG.SW", "UBS Group"),
    ]
    .iter()
    .map(|(symbol, name)| TickerEntry::new(symbol, name))
    .collect()
}

/// Index symbols shown on the dashboard
pub fn default_indices() -> Vec<TickerEntry> {
    [
        ("^FTSE", "FTSE 100 (영국)"),
        ("^GDAXI", "DAX (독일)"),
        ("^FCHI", "CAC 40 (프랑스)"),
        ("^STOXX50E", "EURO STOXX50 (유럽)"),
    ]
    .iter()
    .map(|(symbol, name)| TickerEntry::new(symbol, name))
    .collect()
}

pub fn default_sessions() -> Vec<MarketSession> {
    vec![
        MarketSession::new("PA", 9.0, 17.5, Europe::Paris),
        MarketSession::new("DE", 9.0, 17.5, Europe::Berlin),
        MarketSession::new("L", 8.0, 16.5, Europe::London),
        MarketSession::new("SW", 9.0, 17.5, Europe::Zurich),
    ]
}
