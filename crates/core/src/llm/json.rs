use crate::domain::contract::LlmRecommendation;
use crate::domain::recommendation::Recommendation;
use anyhow::Context;

pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        // Remove Markdown fences (```json ... ``` or ``` ... ```).
        let mut inner = trimmed;
        if let Some(after_first) = inner.splitn(2, '\n').nth(1) {
            inner = after_first;
        }
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim().to_string());
    }

    // Best-effort extraction: first '{' to last '}'.
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim().to_string())
}

pub fn parse_recommendation(text: &str) -> anyhow::Result<Recommendation> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim().to_string());
    let parsed = serde_json::from_str::<LlmRecommendation>(&json_str).with_context(|| {
        format!("LLM output is not valid JSON for the recommendation schema: {json_str}")
    })?;
    parsed.validate_and_into_recommendation()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_handles_fenced_blocks() {
        let body = "{\"recommendation\":\"BUY\"}";
        let fenced = format!("```json\n{body}\n```\n");
        assert_eq!(extract_json(&fenced), Some(body.to_string()));
    }

    #[test]
    fn extract_json_falls_back_to_braces() {
        let s = "prefix {\"recommendation\":\"BUY\"} suffix";
        assert_eq!(
            extract_json(s),
            Some("{\"recommendation\":\"BUY\"}".to_string())
        );
    }

    #[test]
    fn parse_recommendation_accepts_valid_json() {
        let out = parse_recommendation("{\"recommendation\": \"BUY AAPL, HOLD GOOGL\"}").unwrap();
        assert_eq!(out.recommendation, "BUY AAPL, HOLD GOOGL");
    }

    #[test]
    fn parse_recommendation_rejects_prose() {
        assert!(parse_recommendation("I would buy Apple.").is_err());
    }

    #[test]
    fn parse_recommendation_rejects_empty_string_field() {
        assert!(parse_recommendation("{\"recommendation\": \"\"}").is_err());
    }
}
