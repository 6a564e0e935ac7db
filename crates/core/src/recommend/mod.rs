use crate::domain::recommendation::Recommendation;
use crate::domain::request::{AdvisoryParams, ComparativeParams};
use crate::llm::{prompt, LlmClient};
use crate::market::fetch::MarketDataService;

/// Compares two stocks side by side: validate, fetch both snapshots
/// concurrently, render the comparative template, reason once.
pub async fn comparative(
    market: &MarketDataService,
    llm: &dyn LlmClient,
    params: ComparativeParams,
) -> anyhow::Result<Recommendation> {
    let request = params.validate_and_into_request()?;

    // The two lookups are independent; order does not matter.
    let (first, second) = tokio::join!(
        market.fetch_market_data(&request.first),
        market.fetch_market_data(&request.second),
    );

    let rendered = prompt::comparative(first.snapshot(), second.snapshot())?;
    llm.generate_recommendation(rendered).await
}

/// Tailors advice to one stock plus the investor's parameters.
pub async fn advisory(
    market: &MarketDataService,
    llm: &dyn LlmClient,
    params: AdvisoryParams,
) -> anyhow::Result<Recommendation> {
    let request = params.validate_and_into_request()?;

    let fetched = market.fetch_market_data(&request.identifier).await;

    let rendered = prompt::advisory(fetched.snapshot(), &request)?;
    llm.generate_recommendation(rendered).await
}
