use crate::domain::request::AdvisoryRequest;
use crate::domain::snapshot::MarketSnapshot;
use anyhow::Context;

/// Instruction text ready for one reasoning call.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Side-by-side analysis of two snapshots (fresh or degraded — both
/// serialize the same way).
pub fn comparative(
    first: &MarketSnapshot,
    second: &MarketSnapshot,
) -> anyhow::Result<RenderedPrompt> {
    let first_json =
        serde_json::to_string(first).context("failed to serialize first snapshot")?;
    let second_json =
        serde_json::to_string(second).context("failed to serialize second snapshot")?;

    let system = [
        "You are a professional stock market analyst with expertise in fundamental",
        "and technical analysis. Analyze the provided stock data and give detailed",
        "buy/sell recommendations.",
    ]
    .join(" ");

    let user = format!(
        "Stock Data 1: {first_json}\n\
         Stock Data 2: {second_json}\n\n\
         Please provide a comprehensive analysis including:\n\
         1. Individual stock analysis for each stock\n\
         2. Comparative analysis between the two stocks\n\
         3. Specific buy/sell/hold recommendations with reasoning\n\
         4. Risk assessment and potential catalysts\n\
         5. Price targets if applicable\n\
         6. Portfolio allocation suggestions\n\n\
         Be specific about entry points, stop losses, and time horizons. Consider \
         market conditions, sector trends, and company fundamentals in your analysis."
    );

    Ok(RenderedPrompt { system, user })
}

/// Advice for one snapshot tailored to the investor's parameters.
pub fn advisory(
    snapshot: &MarketSnapshot,
    request: &AdvisoryRequest,
) -> anyhow::Result<RenderedPrompt> {
    let system = [
        "You are a stock market expert providing investment advice based on the",
        "user's input and current stock data. Consider the user's risk tolerance",
        "and trading goals when making your recommendation. If the user has low",
        "risk tolerance, recommend safer investments. If the user has high risk",
        "tolerance, recommend more aggressive investments.",
    ]
    .join(" ");

    let user = format!(
        "Stock Data:\n\
         Ticker: {ticker}\n\
         Current Price: {price}\n\
         Last Updated: {updated}\n\
         Notes: {notes}\n\n\
         Investment Amount: {amount}\n\
         Risk Tolerance: {risk}\n\
         Trading Goals: {goals}\n\n\
         Recommendation:",
        ticker = snapshot.ticker,
        price = snapshot.current_price,
        updated = snapshot.last_updated.to_rfc3339(),
        notes = snapshot.notes.as_deref().unwrap_or(""),
        amount = request.investment_amount,
        risk = request.risk_tolerance,
        goals = request.trading_goals,
    );

    Ok(RenderedPrompt { system, user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::{AdvisoryParams, RiskTolerance};
    use crate::market::synthesize::Synthesizer;

    fn advisory_request(amount: f64, risk: RiskTolerance) -> AdvisoryRequest {
        AdvisoryParams {
            identifier: "MSFT".to_string(),
            investment_amount: amount,
            risk_tolerance: risk.to_string(),
            trading_goals: "growth".to_string(),
        }
        .validate_and_into_request()
        .unwrap()
    }

    #[test]
    fn comparative_prompt_embeds_both_snapshots_with_notes() {
        let synth = Synthesizer::with_default_table();
        let aapl = synth.synthesize("AAPL");
        let googl = synth.synthesize("GOOGL");

        let rendered = comparative(&aapl, &googl).unwrap();
        assert!(rendered.user.contains("\"ticker\":\"AAPL\""));
        assert!(rendered.user.contains("\"ticker\":\"GOOGL\""));
        assert!(rendered
            .user
            .contains("Strong quarterly earnings, iPhone sales robust."));
        assert!(rendered.user.contains("AI investments showing promise."));
    }

    #[test]
    fn advisory_prompt_embeds_parameters_verbatim() {
        let synth = Synthesizer::with_default_table();
        let msft = synth.synthesize("MSFT");
        let request = advisory_request(5000.0, RiskTolerance::Low);

        let rendered = advisory(&msft, &request).unwrap();
        assert!(rendered.user.contains("Ticker: MSFT"));
        assert!(rendered.user.contains("Investment Amount: 5000"));
        assert!(rendered.user.contains("Risk Tolerance: low"));
        assert!(rendered.user.contains("Trading Goals: growth"));
    }
}
