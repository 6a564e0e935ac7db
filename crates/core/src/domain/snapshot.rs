use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ticker carried by the degraded sentinel snapshot when a fetch fails.
pub const ERROR_TICKER: &str = "ERROR";

/// Point-in-time market data for a single ticker. Created fresh on every
/// lookup, folded into one prompt payload, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub current_price: f64,
    pub last_updated: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_change_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MarketSnapshot {
    /// Sentinel record standing in for data that could not be fetched.
    /// Downstream prompt assembly treats it like any other snapshot.
    pub fn unavailable(now: DateTime<Utc>) -> Self {
        Self {
            ticker: ERROR_TICKER.to_string(),
            current_price: 0.0,
            last_updated: now,
            market_cap: None,
            pe_ratio: None,
            day_change: None,
            day_change_percent: None,
            volume: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            sector: None,
            industry: None,
            notes: Some(
                "Failed to fetch stock data. Please check the URL or ticker symbol and try again."
                    .to_string(),
            ),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.ticker == ERROR_TICKER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_snapshot_has_error_ticker_and_zero_price() {
        let s = MarketSnapshot::unavailable(Utc::now());
        assert!(s.is_unavailable());
        assert_eq!(s.current_price, 0.0);
        assert!(s.notes.as_deref().unwrap().contains("Failed to fetch"));
    }

    #[test]
    fn omits_absent_optional_fields_when_serialized() {
        let s = MarketSnapshot::unavailable(Utc::now());
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("pe_ratio").is_none());
        assert!(json.get("sector").is_none());
        assert_eq!(json["ticker"], ERROR_TICKER);
    }
}
