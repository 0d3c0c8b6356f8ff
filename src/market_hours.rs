use chrono::{DateTime, Timelike, Utc};

use crate::registry::MarketSession;

/// Fractional local hour of `now` in the session's timezone, e.g. 16:30 -> 16.5
pub fn local_hour(session: &MarketSession, now: DateTime<Utc>) -> f64 {
    let local = now.with_timezone(&session.timezone);
    local.hour() as f64 + local.minute() as f64 / 60.0
}

/// Whether `now` falls inside the session window, both ends inclusive.
/// No weekend or holiday calendar is applied.
pub fn is_session_open(session: &MarketSession, now: DateTime<Utc>) -> bool {
    let hour = local_hour(session, now);
    session.open_hour <= hour && hour <= session.close_hour
}

pub fn is_any_market_open(sessions: &[MarketSession], now: DateTime<Utc>) -> bool {
    sessions.iter().any(|s| is_session_open(s, now))
}
