use crate::domain::recommendation::Recommendation;
use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// Raw reply shape expected from the reasoning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRecommendation {
    pub recommendation: String,
}

impl LlmRecommendation {
    pub fn validate_and_into_recommendation(self) -> anyhow::Result<Recommendation> {
        let recommendation = self.recommendation.trim().to_string();
        ensure!(
            !recommendation.is_empty(),
            "recommendation must be a non-empty string"
        );
        Ok(Recommendation { recommendation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_recommendation_and_trims_it() {
        let out = LlmRecommendation {
            recommendation: "  BUY AAPL, HOLD GOOGL  ".to_string(),
        }
        .validate_and_into_recommendation()
        .unwrap();
        assert_eq!(out.recommendation, "BUY AAPL, HOLD GOOGL");
    }

    #[test]
    fn rejects_blank_recommendation() {
        let res = LlmRecommendation {
            recommendation: "   ".to_string(),
        }
        .validate_and_into_recommendation();
        assert!(res.is_err());
    }
}
