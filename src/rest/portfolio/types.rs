//! Types for portfolio endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::KalshiError;
use crate::rest::pagination::Paginated;
use crate::types::serde_helpers::{empty_string_as_none, null_as_default};
use crate::types::{Action, OrderStatus, SettlementStatus, Side};

/// Lowest valid contract price in cents.
pub const MIN_PRICE: u32 = 1;
/// Highest valid contract price in cents.
pub const MAX_PRICE: u32 = 99;

/// Account balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Available balance in cents.
    pub balance: i64,
    /// Value of open positions in cents.
    #[serde(default)]
    pub portfolio_value: Option<i64>,
    /// Last update, seconds since the UNIX epoch.
    #[serde(default)]
    pub updated_ts: Option<i64>,
}

impl Balance {
    /// When the balance was last updated.
    pub fn updated_at(&self) -> Option<OffsetDateTime> {
        self.updated_ts
            .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
    }
}

/// Filters for `GET /portfolio/positions`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PositionsRequest {
    /// Settled, unsettled or all positions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_status: Option<SettlementStatus>,
    /// Comma separated list of fields that must be non-zero (`position`, `total_traded`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_filter: Option<String>,
    /// Only this market.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    /// Only markets of this event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// A position in one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPosition {
    /// Market ticker.
    pub ticker: String,
    /// Net contracts held; positive for YES, negative for NO.
    #[serde(default)]
    pub position: i64,
    /// Cost of the position in cents.
    #[serde(default)]
    pub market_exposure: Option<i64>,
    /// Cost of the position in dollars.
    #[serde(default)]
    pub market_exposure_dollars: Option<Decimal>,
    /// Realized profit and loss in cents.
    #[serde(default)]
    pub realized_pnl: Option<i64>,
    /// Realized profit and loss in dollars.
    #[serde(default)]
    pub realized_pnl_dollars: Option<Decimal>,
    /// Contracts traded in this market.
    #[serde(default)]
    pub total_traded: Option<i64>,
    /// Fees paid in cents.
    #[serde(default)]
    pub fees_paid: Option<i64>,
    /// Orders still resting in this market.
    #[serde(default)]
    pub resting_orders_count: Option<i64>,
    /// Last update, RFC 3339.
    #[serde(default)]
    pub last_updated_ts: Option<String>,
}

impl MarketPosition {
    /// Side of the net position, `None` when flat.
    pub fn side(&self) -> Option<Side> {
        match self.position.signum() {
            1 => Some(Side::Yes),
            -1 => Some(Side::No),
            _ => None,
        }
    }
}

/// One page of `GET /portfolio/positions`.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsPage {
    /// Positions per market.
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub market_positions: Vec<MarketPosition>,
    /// Cursor for the next page.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub cursor: Option<String>,
}

impl Paginated for PositionsPage {
    type Item = MarketPosition;

    fn into_parts(self) -> (Vec<MarketPosition>, Option<String>) {
        (self.market_positions, self.cursor)
    }
}

/// Filters for `GET /portfolio/orders`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrdersRequest {
    /// Only orders in this state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// Only this market.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    /// Only markets of this event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// An order as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Server assigned order id.
    pub order_id: String,
    /// Market ticker.
    pub ticker: String,
    /// Contract side.
    pub side: Side,
    /// Buy or sell.
    pub action: Action,
    /// Order state (`resting`, `canceled`, `executed`, ...).
    #[serde(default)]
    pub status: String,
    /// Order type (`limit` or `market`).
    #[serde(rename = "type", default)]
    pub order_type: Option<String>,
    /// YES limit price in cents.
    #[serde(default)]
    pub yes_price: Option<i64>,
    /// NO limit price in cents.
    #[serde(default)]
    pub no_price: Option<i64>,
    /// Contracts still open.
    #[serde(default)]
    pub remaining_count: Option<i64>,
    /// Contracts filled.
    #[serde(default)]
    pub fill_count: Option<i64>,
    /// Contracts originally requested.
    #[serde(default)]
    pub initial_count: Option<i64>,
    /// Caller supplied id.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub client_order_id: Option<String>,
    /// Creation time, RFC 3339.
    #[serde(default)]
    pub created_time: Option<String>,
}

/// One page of `GET /portfolio/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPage {
    /// Orders in this page.
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub orders: Vec<Order>,
    /// Cursor for the next page.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub cursor: Option<String>,
}

impl Paginated for OrdersPage {
    type Item = Order;

    fn into_parts(self) -> (Vec<Order>, Option<String>) {
        (self.orders, self.cursor)
    }
}

/// Limit price of an order, quoted on exactly one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitPrice {
    /// Price of the YES contract in cents.
    Yes(u32),
    /// Price of the NO contract in cents.
    No(u32),
}

impl LimitPrice {
    /// Build a price for `side`.
    pub fn new(side: Side, cents: u32) -> Self {
        match side {
            Side::Yes => LimitPrice::Yes(cents),
            Side::No => LimitPrice::No(cents),
        }
    }

    /// The side this price is quoted on.
    pub fn side(self) -> Side {
        match self {
            LimitPrice::Yes(_) => Side::Yes,
            LimitPrice::No(_) => Side::No,
        }
    }

    /// The price in cents.
    pub fn cents(self) -> u32 {
        match self {
            LimitPrice::Yes(cents) | LimitPrice::No(cents) => cents,
        }
    }
}

/// Body of `POST /portfolio/orders` for a limit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    /// Market ticker.
    pub ticker: String,
    /// Buy or sell.
    pub action: Action,
    /// Contract side.
    pub side: Side,
    /// Number of contracts.
    pub count: u32,
    /// Always `limit`.
    #[serde(rename = "type")]
    pub order_type: &'static str,
    /// YES limit price in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_price: Option<u32>,
    /// NO limit price in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_price: Option<u32>,
    /// Caller supplied id for idempotent retries on the caller's side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl CreateOrderRequest {
    /// A limit order for `count` contracts at `price`.
    pub fn limit(ticker: impl Into<String>, action: Action, price: LimitPrice, count: u32) -> Self {
        let (yes_price, no_price) = match price {
            LimitPrice::Yes(cents) => (Some(cents), None),
            LimitPrice::No(cents) => (None, Some(cents)),
        };
        Self {
            ticker: ticker.into(),
            action,
            side: price.side(),
            count,
            order_type: "limit",
            yes_price,
            no_price,
            client_order_id: None,
        }
    }

    /// Attach a client order id.
    pub fn client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// The same order with a client order id, generating a v4 UUID when
    /// none (or an empty one) was given.
    ///
    /// Every retry of a POST carries this id, and the exchange refuses a
    /// second order with an id it has already accepted.
    pub fn ensure_client_order_id(mut self) -> Self {
        if self.client_order_id.as_deref().is_none_or(str::is_empty) {
            self.client_order_id = Some(Uuid::new_v4().to_string());
        }
        self
    }

    /// Check the order before it is sent.
    pub fn validate(&self) -> Result<(), KalshiError> {
        if self.ticker.trim().is_empty() {
            return Err(KalshiError::InvalidRequest(
                "order ticker must not be empty".to_string(),
            ));
        }
        if self.count == 0 {
            return Err(KalshiError::InvalidRequest(
                "order count must be positive".to_string(),
            ));
        }

        let price = match (self.yes_price, self.no_price) {
            (Some(cents), None) => cents,
            (None, Some(cents)) => cents,
            _ => {
                return Err(KalshiError::InvalidRequest(
                    "exactly one of yes_price or no_price must be set".to_string(),
                ));
            }
        };
        if !(MIN_PRICE..=MAX_PRICE).contains(&price) {
            return Err(KalshiError::InvalidRequest(format!(
                "price must be between {MIN_PRICE} and {MAX_PRICE} cents, got {price}"
            )));
        }

        let priced_side = if self.yes_price.is_some() { Side::Yes } else { Side::No };
        if priced_side != self.side {
            return Err(KalshiError::InvalidRequest(format!(
                "price is quoted on {priced_side} but the order is for {}",
                self.side
            )));
        }

        Ok(())
    }
}

/// Response of `POST /portfolio/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    /// The created order.
    pub order: Order,
}

/// Response of `DELETE /portfolio/orders/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderResponse {
    /// The order after cancellation.
    pub order: Order,
    /// Contracts removed from the book.
    #[serde(default)]
    pub reduced_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_limit_order_serialization() {
        let order = CreateOrderRequest::limit("KXBTC-25", Action::Buy, LimitPrice::Yes(35), 10);
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["ticker"], "KXBTC-25");
        assert_eq!(json["action"], "buy");
        assert_eq!(json["side"], "yes");
        assert_eq!(json["type"], "limit");
        assert_eq!(json["yes_price"], 35);
        assert!(json.get("no_price").is_none());
        assert!(json.get("client_order_id").is_none());
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_client_order_id_is_generated_once() {
        let order = CreateOrderRequest::limit("T", Action::Buy, LimitPrice::Yes(10), 1)
            .ensure_client_order_id();
        let id = order.client_order_id.clone().unwrap();
        assert_eq!(id.len(), 36);

        // An existing id is kept.
        let again = order.ensure_client_order_id();
        assert_eq!(again.client_order_id.as_deref(), Some(id.as_str()));

        let supplied = CreateOrderRequest::limit("T", Action::Buy, LimitPrice::Yes(10), 1)
            .client_order_id("mine")
            .ensure_client_order_id();
        assert_eq!(supplied.client_order_id.as_deref(), Some("mine"));

        let blank = CreateOrderRequest::limit("T", Action::Buy, LimitPrice::Yes(10), 1)
            .client_order_id("")
            .ensure_client_order_id();
        assert!(!blank.client_order_id.unwrap().is_empty());
    }

    #[test]
    fn test_validate_rejects_out_of_range_prices() {
        for cents in [0, 100, 250] {
            let order = CreateOrderRequest::limit("T", Action::Buy, LimitPrice::No(cents), 1);
            assert!(matches!(order.validate(), Err(KalshiError::InvalidRequest(_))));
        }
        let edge = CreateOrderRequest::limit("T", Action::Sell, LimitPrice::No(99), 1);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_count_and_double_price() {
        let zero = CreateOrderRequest::limit("T", Action::Buy, LimitPrice::Yes(50), 0);
        assert!(zero.validate().is_err());

        let mut both = CreateOrderRequest::limit("T", Action::Buy, LimitPrice::Yes(50), 1);
        both.no_price = Some(50);
        assert!(both.validate().is_err());

        let mut mismatched = CreateOrderRequest::limit("T", Action::Buy, LimitPrice::Yes(50), 1);
        mismatched.side = Side::No;
        assert!(mismatched.validate().is_err());
    }

    #[test]
    fn test_position_decoding() {
        let json = r#"{
            "market_positions": [
                {"ticker": "A", "position": -3, "market_exposure": 120, "market_exposure_dollars": "1.2000", "realized_pnl": 0}
            ],
            "cursor": null
        }"#;
        let page: PositionsPage = serde_json::from_str(json).unwrap();
        assert!(page.cursor.is_none());

        let position = &page.market_positions[0];
        assert_eq!(position.side(), Some(Side::No));
        assert_eq!(
            position.market_exposure_dollars,
            Some(Decimal::from_str("1.2").unwrap())
        );
    }

    #[test]
    fn test_balance_timestamp() {
        let balance: Balance =
            serde_json::from_str(r#"{"balance": 10050, "updated_ts": 1700000000}"#).unwrap();
        assert_eq!(balance.balance, 10050);
        assert_eq!(balance.updated_at().unwrap().year(), 2023);
    }

    #[test]
    fn test_orders_request_query() {
        let request = OrdersRequest {
            status: Some(OrderStatus::Resting),
            ticker: Some("KXBTC".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_urlencoded::to_string(&request).unwrap(),
            "status=resting&ticker=KXBTC"
        );
    }
}
