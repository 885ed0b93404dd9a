//! Kalshi REST API endpoint constants.
//!
//! Paths are relative to [`API_PREFIX`]. The prefix is part of the signed
//! path, so it is added in one place by the client.

use crate::error::KalshiError;

/// Base URL for the production trade API.
pub const PROD_BASE_URL: &str = "https://api.elections.kalshi.com/trade-api/v2";

/// Base URL for the demo environment.
pub const DEMO_BASE_URL: &str = "https://demo-api.kalshi.co/trade-api/v2";

/// Path prefix shared by every trade API endpoint.
pub const API_PREFIX: &str = "/trade-api/v2";

/// Market data endpoints.
pub mod market {
    /// List markets.
    pub const MARKETS: &str = "/markets";

    /// Orderbook for a single market.
    pub fn orderbook(ticker: &str) -> String {
        format!("/markets/{ticker}/orderbook")
    }
}

/// Portfolio endpoints.
pub mod portfolio {
    /// Account balance.
    pub const BALANCE: &str = "/portfolio/balance";
    /// Market and event positions.
    pub const POSITIONS: &str = "/portfolio/positions";
    /// Orders (list and create).
    pub const ORDERS: &str = "/portfolio/orders";

    /// A single order.
    pub fn order(order_id: &str) -> String {
        format!("/portfolio/orders/{order_id}")
    }
}

/// Full API path for `path`, with the prefix added when missing.
///
/// Accepts paths with or without a leading slash. Any query string is kept.
pub fn api_path(path: &str) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let has_prefix = path
        .strip_prefix(API_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']));

    if has_prefix {
        path
    } else {
        format!("{API_PREFIX}{path}")
    }
}

/// Check an identifier before it is placed in a path.
///
/// Tickers and order ids are plain ASCII tokens. Anything that would change
/// the shape of the URL (`/`, `?`, `#`, `%`, whitespace) is rejected, since
/// the signature covers the path exactly as sent.
pub fn path_segment<'a>(what: &str, value: &'a str) -> Result<&'a str, KalshiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(KalshiError::InvalidRequest(format!("{what} must not be empty")));
    }
    if let Some(c) = value
        .chars()
        .find(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        return Err(KalshiError::InvalidRequest(format!(
            "{what} contains invalid character {c:?}: {value:?}"
        )));
    }
    Ok(value)
}

/// Scheme and authority of `base_url`, with any trailing API prefix removed.
pub fn host_of(base_url: &str) -> &str {
    let trimmed = base_url.trim_end_matches('/');
    trimmed.strip_suffix(API_PREFIX).unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_path_adds_prefix() {
        assert_eq!(api_path("/portfolio/balance"), "/trade-api/v2/portfolio/balance");
        assert_eq!(api_path("markets"), "/trade-api/v2/markets");
    }

    #[test]
    fn test_api_path_keeps_existing_prefix() {
        assert_eq!(api_path("/trade-api/v2/markets"), "/trade-api/v2/markets");
        assert_eq!(api_path("/trade-api/v2/markets?limit=1"), "/trade-api/v2/markets?limit=1");
    }

    #[test]
    fn test_host_of_strips_prefix() {
        assert_eq!(host_of(PROD_BASE_URL), "https://api.elections.kalshi.com");
        assert_eq!(host_of("http://127.0.0.1:4000/"), "http://127.0.0.1:4000");
        assert_eq!(host_of("http://127.0.0.1:4000/trade-api/v2/"), "http://127.0.0.1:4000");
    }

    #[test]
    fn test_path_segment_rejects_url_syntax() {
        assert_eq!(path_segment("ticker", " KXBTC-25DEC31-T100000 ").unwrap(), "KXBTC-25DEC31-T100000");
        for bad in ["", "  ", "ABC?x", "A/B", "A#B", "A%2FB", "A B"] {
            assert!(
                matches!(path_segment("ticker", bad), Err(KalshiError::InvalidRequest(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_path_builders() {
        assert_eq!(market::orderbook("KXBTC-25"), "/markets/KXBTC-25/orderbook");
        assert_eq!(portfolio::order("abc"), "/portfolio/orders/abc");
    }
}
