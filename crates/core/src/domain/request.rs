use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rejected input, detected before any fetch or reasoning call.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTolerance {
    type Err = ValidationError;

    // Lenient on whitespace and case; strict on the value set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ValidationError::new(
                "risk_tolerance",
                format!("must be low, medium, or high (got {other:?})"),
            )),
        }
    }
}

/// Comparative mode: two identifiers, analyzed side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparativeParams {
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone)]
pub struct ComparativeRequest {
    pub first: String,
    pub second: String,
}

impl ComparativeParams {
    pub fn validate_and_into_request(self) -> Result<ComparativeRequest, ValidationError> {
        let first = self.first.trim().to_string();
        if first.is_empty() {
            return Err(ValidationError::new("first", "identifier must be non-empty"));
        }

        let second = self.second.trim().to_string();
        if second.is_empty() {
            return Err(ValidationError::new(
                "second",
                "identifier must be non-empty",
            ));
        }

        Ok(ComparativeRequest { first, second })
    }
}

/// Advisory mode: one identifier plus the investor's parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryParams {
    pub identifier: String,
    pub investment_amount: f64,
    pub risk_tolerance: String,
    pub trading_goals: String,
}

#[derive(Debug, Clone)]
pub struct AdvisoryRequest {
    pub identifier: String,
    pub investment_amount: f64,
    pub risk_tolerance: RiskTolerance,
    pub trading_goals: String,
}

impl AdvisoryParams {
    pub fn validate_and_into_request(self) -> Result<AdvisoryRequest, ValidationError> {
        let identifier = self.identifier.trim().to_string();
        if identifier.is_empty() {
            return Err(ValidationError::new(
                "identifier",
                "identifier must be non-empty",
            ));
        }

        if !self.investment_amount.is_finite() || self.investment_amount <= 0.0 {
            return Err(ValidationError::new(
                "investment_amount",
                format!("must be a positive amount (got {})", self.investment_amount),
            ));
        }

        let risk_tolerance = self.risk_tolerance.parse::<RiskTolerance>()?;

        let trading_goals = self.trading_goals.trim().to_string();
        if trading_goals.is_empty() {
            return Err(ValidationError::new(
                "trading_goals",
                "trading goals must be non-empty",
            ));
        }

        Ok(AdvisoryRequest {
            identifier,
            investment_amount: self.investment_amount,
            risk_tolerance,
            trading_goals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_comparative_request_with_two_identifiers() {
        let req = ComparativeParams {
            first: "AAPL".to_string(),
            second: "https://finance.example.com/quote/GOOGL".to_string(),
        }
        .validate_and_into_request()
        .unwrap();
        assert_eq!(req.first, "AAPL");
    }

    #[test]
    fn rejects_comparative_request_with_one_empty_identifier() {
        let err = ComparativeParams {
            first: "AAPL".to_string(),
            second: "   ".to_string(),
        }
        .validate_and_into_request()
        .unwrap_err();
        assert_eq!(err.field, "second");
    }

    #[test]
    fn rejects_non_positive_and_non_finite_amounts() {
        for amount in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let res = AdvisoryParams {
                identifier: "MSFT".to_string(),
                investment_amount: amount,
                risk_tolerance: "low".to_string(),
                trading_goals: "growth".to_string(),
            }
            .validate_and_into_request();
            assert!(res.is_err(), "amount {amount} should be rejected");
        }
    }

    #[test]
    fn parses_risk_tolerance_leniently() {
        assert_eq!("LOW".parse::<RiskTolerance>().unwrap(), RiskTolerance::Low);
        assert_eq!(
            " medium ".parse::<RiskTolerance>().unwrap(),
            RiskTolerance::Medium
        );
        assert_eq!(
            "High".parse::<RiskTolerance>().unwrap(),
            RiskTolerance::High
        );
        assert!("extreme".parse::<RiskTolerance>().is_err());
    }

    #[test]
    fn rejects_empty_trading_goals() {
        let err = AdvisoryParams {
            identifier: "MSFT".to_string(),
            investment_amount: 5000.0,
            risk_tolerance: "low".to_string(),
            trading_goals: String::new(),
        }
        .validate_and_into_request()
        .unwrap_err();
        assert_eq!(err.field, "trading_goals");
    }
}
