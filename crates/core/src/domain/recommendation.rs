use serde::{Deserialize, Serialize};

/// Natural-language recommendation returned by the reasoning service.
/// Validated to be non-empty; no further structure is imposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: String,
}
