//! Market data endpoints.

mod types;

pub use types::*;

use reqwest::Method;

use crate::error::KalshiError;
use crate::rest::KalshiRestClient;
use crate::rest::endpoints::{market, path_segment};
use crate::rest::pagination::PaginationError;

/// Page size used when walking every market.
pub const DEFAULT_MARKETS_PAGE_SIZE: u32 = 200;

impl KalshiRestClient {
    /// List one page of markets.
    ///
    /// The request's own `limit` and `cursor` are passed through, so callers
    /// can resume from a cursor returned by an earlier page.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use kalshi_api_client::rest::{KalshiRestClient, MarketsRequest};
    /// use kalshi_api_client::types::MarketStatus;
    ///
    /// # async fn run(client: &KalshiRestClient) -> Result<(), kalshi_api_client::KalshiError> {
    /// let page = client
    ///     .list_markets(&MarketsRequest::new().status(MarketStatus::Open).limit(20))
    ///     .await?;
    /// for market in &page.markets {
    ///     println!("{} {}", market.ticker, market.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_markets(&self, request: &MarketsRequest) -> Result<MarketsPage, KalshiError> {
        self.get_with_params(market::MARKETS, request).await
    }

    /// List every market matching the request's filters.
    ///
    /// Pages are fetched `page_size` at a time until the server stops
    /// returning a cursor, or until `max_pages` pages have been read.
    pub async fn list_all_markets(
        &self,
        request: &MarketsRequest,
        page_size: u32,
        max_pages: Option<usize>,
    ) -> Result<Vec<Market>, PaginationError<Market>> {
        self.fetch_all::<MarketsPage, _>(market::MARKETS, &request.without_paging(), page_size, max_pages)
            .await
    }

    /// Get the orderbook for a market.
    pub async fn get_orderbook(&self, ticker: &str) -> Result<Orderbook, KalshiError> {
        let ticker = path_segment("market ticker", ticker)?;
        let response: OrderbookResponse = self.get(&market::orderbook(ticker)).await?;
        Ok(response.orderbook)
    }

    /// GET an arbitrary API path and return the raw JSON.
    ///
    /// The path may be given with or without the `/trade-api/v2` prefix and
    /// may carry a query string.
    pub async fn debug_path(&self, path: &str) -> Result<serde_json::Value, KalshiError> {
        self.execute(Method::GET, path, None, None).await
    }
}
