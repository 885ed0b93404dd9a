//! Kalshi trade API REST client.
//!
//! Market data lives in [`market`], account data and order entry in
//! [`portfolio`]. Both are implemented as methods on [`KalshiRestClient`]
//! and mirrored by the [`KalshiClient`] trait.
//!
//! ```rust,ignore
//! use kalshi_api_client::rest::{KalshiClient, MarketsRequest};
//!
//! async fn first_ticker<C: KalshiClient>(client: &C) -> Result<Option<String>, kalshi_api_client::KalshiError> {
//!     let page = client.list_markets(&MarketsRequest::new().limit(1)).await?;
//!     Ok(page.markets.into_iter().next().map(|m| m.ticker))
//! }
//! ```

mod client;
pub mod endpoints;
pub mod market;
mod pagination;
pub mod portfolio;
mod traits;

pub use client::{KalshiRestClient, KalshiRestClientBuilder};
pub use endpoints::{API_PREFIX, DEMO_BASE_URL, PROD_BASE_URL};
pub use market::{BestPrices, Market, MarketsPage, MarketsRequest, Orderbook, PriceLevel};
pub use pagination::{CursorPager, Paginated, PaginationError};
pub use portfolio::{
    Balance, CancelOrderResponse, CreateOrderRequest, LimitPrice, MarketPosition, Order,
    OrdersPage, OrdersRequest, PositionsPage, PositionsRequest,
};
pub use traits::KalshiClient;
