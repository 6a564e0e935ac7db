use once_cell::sync::Lazy;
use regex::Regex;

/// Returned when no extraction rule matches. A valid low-confidence outcome,
/// not an error: lookups against it still succeed.
pub const UNKNOWN_TICKER: &str = "UNKNOWN";

const MAX_BARE_SEGMENT_LEN: usize = 5;

// Ordered extraction rules for common quote-page URL shapes. List order is
// the tie-break contract for ambiguous multi-segment URLs.
static URL_MATCHERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)/quote/([A-Z]+)",  // Yahoo Finance style: /quote/AAPL
        r"(?i)/stock/([A-Z]+)",  // Generic: /stock/AAPL
        r"(?i)symbol=([A-Z]+)",  // Query param: ?symbol=AAPL
        r"(?i)ticker=([A-Z]+)",  // Query param: ?ticker=AAPL
        r"(?i)/([A-Z]+)$",       // End of path: /AAPL
        r"(?i)/([A-Z]+)/",       // Interior segment: /AAPL/
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static ticker matcher must compile"))
    .collect()
});

/// Derives a canonical upper-case ticker from a free-form identifier
/// (a bare symbol or a quote-page URL). Total: every input maps to a
/// ticker, degrading to `UNKNOWN` instead of failing.
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();

    // Already a bare symbol.
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return trimmed.to_ascii_uppercase();
    }

    for matcher in URL_MATCHERS.iter() {
        if let Some(captures) = matcher.captures(trimmed) {
            if let Some(group) = captures.get(1) {
                return group.as_str().to_ascii_uppercase();
            }
        }
    }

    // Last resort: the trailing path segment, if it is ticker-shaped.
    if let Some(last) = trimmed.split('/').filter(|s| !s.is_empty()).last() {
        if (1..=MAX_BARE_SEGMENT_LEN).contains(&last.len())
            && last.chars().all(|c| c.is_ascii_alphabetic())
        {
            return last.to_ascii_uppercase();
        }
    }

    UNKNOWN_TICKER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_bare_alphabetic_symbols_upper_cased() {
        for (input, expected) in [
            ("AAPL", "AAPL"),
            ("aapl", "AAPL"),
            ("msft", "MSFT"),
            ("v", "V"),
            ("SIEMENS", "SIEMENS"),
        ] {
            assert_eq!(normalize(input), expected);
        }
    }

    #[test]
    fn extracts_from_quote_path() {
        assert_eq!(
            normalize("https://finance.example.com/quote/aapl"),
            "AAPL"
        );
        assert_eq!(normalize("https://finance.example.com/quote/AAPL"), "AAPL");
    }

    #[test]
    fn extracts_from_stock_path() {
        assert_eq!(normalize("https://example.com/stock/tsla"), "TSLA");
    }

    #[test]
    fn extracts_from_query_params() {
        assert_eq!(normalize("https://example.com/q?symbol=nvda"), "NVDA");
        assert_eq!(normalize("https://example.com/q?ticker=amzn"), "AMZN");
    }

    #[test]
    fn extracts_trailing_path_segment() {
        assert_eq!(normalize("https://example.com/markets/GOOGL"), "GOOGL");
    }

    #[test]
    fn quote_rule_wins_over_later_segments() {
        // Both /quote/ and a trailing segment match; list order decides.
        assert_eq!(
            normalize("https://example.com/quote/aapl/history"),
            "AAPL"
        );
    }

    #[test]
    fn junk_degrades_to_unknown() {
        assert_eq!(normalize("not a ticker at all///"), UNKNOWN_TICKER);
        assert_eq!(normalize(""), UNKNOWN_TICKER);
        assert_eq!(normalize("12345"), UNKNOWN_TICKER);
    }

    #[test]
    fn matches_paths_without_a_scheme() {
        assert_eq!(normalize("example.org/x1/msft"), "MSFT");
        assert_eq!(normalize("example.com/aapl/"), "AAPL");
    }
}
