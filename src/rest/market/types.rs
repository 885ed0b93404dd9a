//! Types for market data endpoints.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::rest::pagination::Paginated;
use crate::types::MarketStatus;
use crate::types::serde_helpers::{comma_separated, empty_string_as_none, null_as_default};

/// Contract prices are quoted in cents between 1 and 99.
pub const PRICE_SCALE: u32 = 100;

/// Filters for the market listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketsRequest {
    /// Only markets in this lifecycle state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MarketStatus>,
    /// Only markets belonging to this event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
    /// Only markets belonging to this series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_ticker: Option<String>,
    /// Only these market tickers.
    #[serde(
        skip_serializing_if = "BTreeSet::is_empty",
        serialize_with = "comma_separated::serialize"
    )]
    pub tickers: BTreeSet<String>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl MarketsRequest {
    /// An unfiltered request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status.
    pub fn status(mut self, status: MarketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume from a cursor.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Filter by event ticker.
    pub fn event_ticker(mut self, event_ticker: impl Into<String>) -> Self {
        self.event_ticker = Some(event_ticker.into());
        self
    }

    /// The same filters without paging state.
    pub fn without_paging(&self) -> Self {
        Self {
            limit: None,
            cursor: None,
            ..self.clone()
        }
    }
}

/// A market as listed by `GET /markets`.
///
/// Prices are in cents. Fields not modelled here are kept in `extra` so
/// snapshots preserve the full server record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Market ticker.
    pub ticker: String,
    /// Event this market belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
    /// Market title.
    #[serde(default)]
    pub title: String,
    /// Market subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Lifecycle status as reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Best YES bid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes_bid: Option<i64>,
    /// Best YES ask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes_ask: Option<i64>,
    /// Best NO bid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_bid: Option<i64>,
    /// Best NO ask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_ask: Option<i64>,
    /// Last traded YES price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price: Option<i64>,
    /// Contracts traded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    /// Open contracts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<i64>,
    /// Close time, RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Market {
    /// Price a YES buyer would pay: the ask, or `100 - no_bid` when the
    /// ask is not quoted.
    pub fn yes_price(&self) -> Option<i64> {
        self.yes_ask
            .or_else(|| self.no_bid.map(|bid| PRICE_SCALE as i64 - bid))
    }

    /// Price a NO buyer would pay: the ask, or `100 - yes_bid` when the
    /// ask is not quoted.
    pub fn no_price(&self) -> Option<i64> {
        self.no_ask
            .or_else(|| self.yes_bid.map(|bid| PRICE_SCALE as i64 - bid))
    }
}

/// One page of `GET /markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsPage {
    /// Markets in this page, in server order.
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub markets: Vec<Market>,
    /// Cursor for the next page, `None` on the last page.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub cursor: Option<String>,
}

impl Paginated for MarketsPage {
    type Item = Market;

    fn into_parts(self) -> (Vec<Market>, Option<String>) {
        (self.markets, self.cursor)
    }
}

/// A resting price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u64)", into = "(u32, u64)")]
pub struct PriceLevel {
    /// Price in cents.
    pub price: u32,
    /// Contracts resting at this price.
    pub quantity: u64,
}

impl From<(u32, u64)> for PriceLevel {
    fn from((price, quantity): (u32, u64)) -> Self {
        Self { price, quantity }
    }
}

impl From<PriceLevel> for (u32, u64) {
    fn from(level: PriceLevel) -> Self {
        (level.price, level.quantity)
    }
}

/// Resting bids on both sides of a market.
///
/// Kalshi only publishes bids. A YES bid at `p` is equivalent to a NO ask
/// at `100 - p`, so asks are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orderbook {
    /// YES bids.
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub yes: Vec<PriceLevel>,
    /// NO bids.
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub no: Vec<PriceLevel>,
}

/// Envelope of `GET /markets/{ticker}/orderbook`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrderbookResponse {
    pub(crate) orderbook: Orderbook,
}

/// Best prices derived from an [`Orderbook`].
///
/// A side without levels yields `None`, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BestPrices {
    /// Highest YES bid.
    pub yes_bid: Option<u32>,
    /// Lowest YES ask (`100 - best NO bid`).
    pub yes_ask: Option<u32>,
    /// Highest NO bid.
    pub no_bid: Option<u32>,
    /// Lowest NO ask (`100 - best YES bid`).
    pub no_ask: Option<u32>,
}

impl Orderbook {
    /// Highest YES bid.
    pub fn best_yes_bid(&self) -> Option<u32> {
        best_bid(&self.yes)
    }

    /// Highest NO bid.
    pub fn best_no_bid(&self) -> Option<u32> {
        best_bid(&self.no)
    }

    /// Best bid and ask for both sides.
    pub fn best_prices(&self) -> BestPrices {
        let yes_bid = self.best_yes_bid();
        let no_bid = self.best_no_bid();
        BestPrices {
            yes_bid,
            yes_ask: no_bid.map(complement),
            no_bid,
            no_ask: yes_bid.map(complement),
        }
    }

    /// Whether neither side has resting orders.
    pub fn is_empty(&self) -> bool {
        self.yes.is_empty() && self.no.is_empty()
    }
}

fn best_bid(levels: &[PriceLevel]) -> Option<u32> {
    levels
        .iter()
        .filter(|level| level.quantity > 0)
        .map(|level| level.price)
        .max()
}

fn complement(price: u32) -> u32 {
    PRICE_SCALE.saturating_sub(price)
}
