//! Trait definition for the Kalshi REST API client.
//!
//! This module provides the `KalshiClient` trait which abstracts the REST
//! operations the CLI needs. This enables:
//! - Mock implementations for testing
//! - Decorators (e.g., caching or recording wrappers)
//!
//! # Example
//!
//! ```rust,ignore
//! use kalshi_api_client::rest::KalshiClient;
//!
//! async fn print_balance<C: KalshiClient>(client: &C) -> Result<(), kalshi_api_client::KalshiError> {
//!     let balance = client.get_balance().await?;
//!     println!("{} cents", balance.balance);
//!     Ok(())
//! }
//! ```

use std::future::Future;

use crate::error::KalshiError;
use crate::rest::KalshiRestClient;
use crate::rest::market::{Market, MarketsPage, MarketsRequest, Orderbook};
use crate::rest::pagination::PaginationError;
use crate::rest::portfolio::{
    Balance, CancelOrderResponse, CreateOrderRequest, Order, OrdersPage, OrdersRequest,
    PositionsPage, PositionsRequest,
};
use crate::types::OrderStatus;

/// Trait defining the Kalshi REST operations.
///
/// All methods are async and return `Result<T, KalshiError>`, except the
/// full market listing which keeps partial results on failure.
pub trait KalshiClient: Send + Sync {
    // ========== Markets ==========

    /// List one page of markets.
    fn list_markets(
        &self,
        request: &MarketsRequest,
    ) -> impl Future<Output = Result<MarketsPage, KalshiError>> + Send;

    /// List every market matching the request's filters.
    fn list_all_markets(
        &self,
        request: &MarketsRequest,
        page_size: u32,
        max_pages: Option<usize>,
    ) -> impl Future<Output = Result<Vec<Market>, PaginationError<Market>>> + Send;

    /// Get the orderbook for a market.
    fn get_orderbook(
        &self,
        ticker: &str,
    ) -> impl Future<Output = Result<Orderbook, KalshiError>> + Send;

    /// GET an arbitrary API path and return the raw JSON.
    fn debug_path(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<serde_json::Value, KalshiError>> + Send;

    // ========== Portfolio ==========

    /// Get the account balance.
    fn get_balance(&self) -> impl Future<Output = Result<Balance, KalshiError>> + Send;

    /// Get one page of positions.
    fn get_positions(
        &self,
        request: &PositionsRequest,
    ) -> impl Future<Output = Result<PositionsPage, KalshiError>> + Send;

    /// Get one page of orders.
    fn get_orders(
        &self,
        request: &OrdersRequest,
    ) -> impl Future<Output = Result<OrdersPage, KalshiError>> + Send;

    /// Place a limit order.
    fn place_order(
        &self,
        request: &CreateOrderRequest,
    ) -> impl Future<Output = Result<Order, KalshiError>> + Send;

    /// Cancel an order.
    fn cancel_order(
        &self,
        order_id: &str,
    ) -> impl Future<Output = Result<CancelOrderResponse, KalshiError>> + Send;

    /// Cancel up to `limit` orders in a market.
    fn cancel_all_for_ticker(
        &self,
        ticker: &str,
        status: OrderStatus,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CancelOrderResponse>, KalshiError>> + Send;
}

impl KalshiClient for KalshiRestClient {
    async fn list_markets(&self, request: &MarketsRequest) -> Result<MarketsPage, KalshiError> {
        KalshiRestClient::list_markets(self, request).await
    }

    async fn list_all_markets(
        &self,
        request: &MarketsRequest,
        page_size: u32,
        max_pages: Option<usize>,
    ) -> Result<Vec<Market>, PaginationError<Market>> {
        KalshiRestClient::list_all_markets(self, request, page_size, max_pages).await
    }

    async fn get_orderbook(&self, ticker: &str) -> Result<Orderbook, KalshiError> {
        KalshiRestClient::get_orderbook(self, ticker).await
    }

    async fn debug_path(&self, path: &str) -> Result<serde_json::Value, KalshiError> {
        KalshiRestClient::debug_path(self, path).await
    }

    async fn get_balance(&self) -> Result<Balance, KalshiError> {
        KalshiRestClient::get_balance(self).await
    }

    async fn get_positions(&self, request: &PositionsRequest) -> Result<PositionsPage, KalshiError> {
        KalshiRestClient::get_positions(self, request).await
    }

    async fn get_orders(&self, request: &OrdersRequest) -> Result<OrdersPage, KalshiError> {
        KalshiRestClient::get_orders(self, request).await
    }

    async fn place_order(&self, request: &CreateOrderRequest) -> Result<Order, KalshiError> {
        KalshiRestClient::place_order(self, request).await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<CancelOrderResponse, KalshiError> {
        KalshiRestClient::cancel_order(self, order_id).await
    }

    async fn cancel_all_for_ticker(
        &self,
        ticker: &str,
        status: OrderStatus,
        limit: usize,
    ) -> Result<Vec<CancelOrderResponse>, KalshiError> {
        KalshiRestClient::cancel_all_for_ticker(self, ticker, status, limit).await
    }
}
