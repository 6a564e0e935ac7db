use crate::domain::snapshot::MarketSnapshot;
use crate::market::normalize::normalize;
use crate::market::synthesize::Synthesizer;
use anyhow::Result;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_LATENCY_MIN_MS: u64 = 500;
const DEFAULT_LATENCY_MAX_MS: u64 = 1500;

/// Source of snapshots for canonical tickers. The synthesizer implements
/// this today; a real market-data client can replace it behind the same
/// trait without touching callers.
#[async_trait::async_trait]
pub trait SnapshotProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn snapshot(&self, ticker: &str) -> Result<MarketSnapshot>;
}

#[async_trait::async_trait]
impl SnapshotProvider for Synthesizer {
    fn provider_name(&self) -> &'static str {
        "synthesized"
    }

    async fn snapshot(&self, ticker: &str) -> Result<MarketSnapshot> {
        Ok(self.synthesize(ticker))
    }
}

/// Simulated lookup latency, drawn per call from [min_ms, max_ms].
#[derive(Debug, Clone)]
pub struct LatencyProfile {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyProfile {
    pub fn simulated() -> Self {
        Self {
            min_ms: DEFAULT_LATENCY_MIN_MS,
            max_ms: DEFAULT_LATENCY_MAX_MS,
        }
    }

    pub fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    pub fn from_env() -> Self {
        let mut out = Self::simulated();

        if let Ok(s) = std::env::var("FETCH_LATENCY_MIN_MS") {
            if let Ok(n) = s.parse::<u64>() {
                out.min_ms = n;
            }
        }

        if let Ok(s) = std::env::var("FETCH_LATENCY_MAX_MS") {
            if let Ok(n) = s.parse::<u64>() {
                out.max_ms = n;
            }
        }

        if out.max_ms < out.min_ms {
            out.max_ms = out.min_ms;
        }

        out
    }
}

/// Outcome of a market-data lookup. The facade never fails: provider errors
/// are absorbed into a `Degraded` sentinel snapshot so downstream reasoning
/// needs no failure handling for data fetches.
#[derive(Debug, Clone)]
pub enum MarketFetch {
    Fresh(MarketSnapshot),
    Degraded {
        snapshot: MarketSnapshot,
        reason: String,
    },
}

impl MarketFetch {
    pub fn snapshot(&self) -> &MarketSnapshot {
        match self {
            Self::Fresh(snapshot) => snapshot,
            Self::Degraded { snapshot, .. } => snapshot,
        }
    }

    pub fn into_snapshot(self) -> MarketSnapshot {
        match self {
            Self::Fresh(snapshot) => snapshot,
            Self::Degraded { snapshot, .. } => snapshot,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

#[derive(Clone)]
pub struct MarketDataService {
    provider: Arc<dyn SnapshotProvider>,
    latency: LatencyProfile,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn SnapshotProvider>, latency: LatencyProfile) -> Self {
        Self { provider, latency }
    }

    pub fn synthesized(latency: LatencyProfile) -> Self {
        Self::new(Arc::new(Synthesizer::with_default_table()), latency)
    }

    /// Resolves a free-form identifier to a snapshot. Always resolves:
    /// unknown identifiers degrade through the "UNKNOWN" ticker, provider
    /// failures through the "ERROR" sentinel.
    pub async fn fetch_market_data(&self, identifier: &str) -> MarketFetch {
        self.pause().await;

        let ticker = normalize(identifier);
        match self.provider.snapshot(&ticker).await {
            Ok(snapshot) => MarketFetch::Fresh(snapshot),
            Err(err) => {
                tracing::warn!(
                    %ticker,
                    provider = self.provider.provider_name(),
                    error = %err,
                    "snapshot lookup failed; returning degraded sentinel"
                );
                MarketFetch::Degraded {
                    snapshot: MarketSnapshot::unavailable(chrono::Utc::now()),
                    reason: format!("{err:#}"),
                }
            }
        }
    }

    async fn pause(&self) {
        let LatencyProfile { min_ms, max_ms } = self.latency;
        if max_ms == 0 {
            return;
        }

        let ms = if min_ms >= max_ms {
            min_ms
        } else {
            rand::thread_rng().gen_range(min_ms..=max_ms)
        };
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::ERROR_TICKER;

    struct FailingProvider;

    #[async_trait::async_trait]
    impl SnapshotProvider for FailingProvider {
        fn provider_name(&self) -> &'static str {
            "failing"
        }

        async fn snapshot(&self, _ticker: &str) -> Result<MarketSnapshot> {
            anyhow::bail!("upstream unavailable")
        }
    }

    #[tokio::test]
    async fn resolves_for_any_input_including_empty() {
        let service = MarketDataService::synthesized(LatencyProfile::none());
        for input in ["AAPL", "https://finance.example.com/quote/aapl", "", "???"] {
            let fetched = service.fetch_market_data(input).await;
            assert!(!fetched.is_degraded(), "degraded for input {input:?}");
        }
    }

    #[tokio::test]
    async fn unknown_identifier_resolves_via_unknown_ticker() {
        let service = MarketDataService::synthesized(LatencyProfile::none());
        let fetched = service.fetch_market_data("not a ticker at all///").await;
        assert_eq!(fetched.snapshot().ticker, "UNKNOWN");
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_error_sentinel() {
        let service = MarketDataService::new(Arc::new(FailingProvider), LatencyProfile::none());
        let fetched = service.fetch_market_data("AAPL").await;
        assert!(fetched.is_degraded());
        assert_eq!(fetched.snapshot().ticker, ERROR_TICKER);
        assert_eq!(fetched.snapshot().current_price, 0.0);
        match fetched {
            MarketFetch::Degraded { reason, .. } => {
                assert!(reason.contains("upstream unavailable"))
            }
            MarketFetch::Fresh(_) => unreachable!(),
        }
    }
}
