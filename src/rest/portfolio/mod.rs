//! Portfolio endpoints (balance, positions, orders).

mod types;

pub use types::*;

use tracing::{info, warn};

use crate::error::KalshiError;
use crate::rest::KalshiRestClient;
use crate::rest::endpoints::{path_segment, portfolio};
use crate::rest::pagination::CursorPager;
use crate::types::OrderStatus;

/// Largest page Kalshi accepts for order listings.
const MAX_ORDERS_PAGE_SIZE: u32 = 200;

impl KalshiRestClient {
    /// Get the account balance.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use kalshi_api_client::rest::KalshiRestClient;
    ///
    /// # async fn run(client: &KalshiRestClient) -> Result<(), kalshi_api_client::KalshiError> {
    /// let balance = client.get_balance().await?;
    /// println!("${:.2}", balance.balance as f64 / 100.0);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_balance(&self) -> Result<Balance, KalshiError> {
        self.get(portfolio::BALANCE).await
    }

    /// Get one page of market positions.
    pub async fn get_positions(
        &self,
        request: &PositionsRequest,
    ) -> Result<PositionsPage, KalshiError> {
        self.get_with_params(portfolio::POSITIONS, request).await
    }

    /// Get one page of orders.
    pub async fn get_orders(&self, request: &OrdersRequest) -> Result<OrdersPage, KalshiError> {
        self.get_with_params(portfolio::ORDERS, request).await
    }

    /// Place a limit order.
    ///
    /// The request is validated locally first; an invalid order never
    /// reaches the network. A missing `client_order_id` is generated so that
    /// retried attempts all carry the same id.
    pub async fn place_order(&self, request: &CreateOrderRequest) -> Result<Order, KalshiError> {
        request.validate()?;
        let request = request.clone().ensure_client_order_id();
        let response: CreateOrderResponse = self.post(portfolio::ORDERS, &request).await?;
        info!(
            order_id = %response.order.order_id,
            ticker = %response.order.ticker,
            status = %response.order.status,
            "order placed"
        );
        Ok(response.order)
    }

    /// Cancel a resting order.
    pub async fn cancel_order(&self, order_id: &str) -> Result<CancelOrderResponse, KalshiError> {
        let order_id = path_segment("order id", order_id)?;
        self.delete(&portfolio::order(order_id)).await
    }

    /// Cancel up to `limit` orders in `ticker` with the given status.
    ///
    /// Orders are listed first, then cancelled one at a time. A failed
    /// cancellation stops the sweep and is returned as the error.
    pub async fn cancel_all_for_ticker(
        &self,
        ticker: &str,
        status: OrderStatus,
        limit: usize,
    ) -> Result<Vec<CancelOrderResponse>, KalshiError> {
        let filters = OrdersRequest {
            status: Some(status),
            ticker: Some(ticker.to_string()),
            ..Default::default()
        };
        let page_size = u32::try_from(limit)
            .unwrap_or(MAX_ORDERS_PAGE_SIZE)
            .clamp(1, MAX_ORDERS_PAGE_SIZE);

        let mut pager = CursorPager::<OrdersPage>::new(self, portfolio::ORDERS, &filters, page_size)?;
        let mut orders = Vec::new();
        while orders.len() < limit {
            match pager.next_page().await? {
                Some(page) => orders.extend(page),
                None => break,
            }
        }
        orders.truncate(limit);

        let mut cancelled = Vec::with_capacity(orders.len());
        for order in &orders {
            match self.cancel_order(&order.order_id).await {
                Ok(response) => cancelled.push(response),
                Err(err) => {
                    warn!(
                        ticker,
                        order_id = %order.order_id,
                        cancelled = cancelled.len(),
                        error = %err,
                        "cancel sweep stopped"
                    );
                    return Err(err);
                }
            }
        }

        info!(ticker, cancelled = cancelled.len(), "cancel sweep finished");
        Ok(cancelled)
    }
}
