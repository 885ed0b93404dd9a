//! Market listing post-processing: search, sort and snapshots.

use std::cmp::Ordering;
use std::path::Path;

use anyhow::{Context, Result};
use kalshi_api_client::rest::{BestPrices, Market};
use kalshi_api_client::types::MarketStatus;
use serde::Serialize;

use crate::cli::SortKey;

/// Keep markets whose title or ticker contains `query`, ignoring case.
pub fn search(markets: Vec<Market>, query: &str) -> Vec<Market> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return markets;
    }
    markets
        .into_iter()
        .filter(|m| {
            m.title.to_lowercase().contains(&query) || m.ticker.to_lowercase().contains(&query)
        })
        .collect()
}

const SPORT_KEYS: &[&str] = &[
    "NBA", "NFL", "MLB", "NHL", "EPL", "NCAAMB", "NCAAF", "ATP", "WTA", "GAME", "MATCH",
];
const POLITICS_KEYS: &[&str] = &[
    "TRUMP", "BIDEN", "ELECTION", "SENATE", "HOUSE", "FED", "INFLATION", "CPI", "RATE",
];

/// Rough market category, guessed from ticker and title keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Sports,
    Politics,
    Other,
}

impl Category {
    /// Sports keywords win over politics keywords.
    pub fn of(market: &Market) -> Self {
        let ticker = market.ticker.to_uppercase();
        let title = market.title.to_uppercase();
        let hit = |keys: &[&str]| keys.iter().any(|k| ticker.contains(k) || title.contains(k));
        if hit(SPORT_KEYS) {
            Category::Sports
        } else if hit(POLITICS_KEYS) {
            Category::Politics
        } else {
            Category::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Sports => "sports",
            Category::Politics => "politics",
            Category::Other => "other",
        }
    }
}

/// Replace the listed prices with the best levels of a fetched orderbook.
///
/// `None` (the orderbook could not be fetched) clears all four prices.
pub fn apply_book_prices(market: &mut Market, best: Option<BestPrices>) {
    let best = best.unwrap_or_default();
    let cents = |price: Option<u32>| price.map(i64::from);
    market.yes_bid = cents(best.yes_bid);
    market.yes_ask = cents(best.yes_ask);
    market.no_bid = cents(best.no_bid);
    market.no_ask = cents(best.no_ask);
}

/// Sort markets in place. The sort is stable; unpriced markets sort first.
pub fn sort(markets: &mut [Market], key: SortKey) {
    let by_price = |a: Option<i64>, b: Option<i64>| a.unwrap_or(-1).cmp(&b.unwrap_or(-1));
    markets.sort_by(|a, b| -> Ordering {
        match key {
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::Ticker => a.ticker.cmp(&b.ticker),
            SortKey::YesPrice => by_price(a.yes_price(), b.yes_price()),
            SortKey::NoPrice => by_price(a.no_price(), b.no_price()),
        }
    });
}

/// A saved market listing.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub fetched_at: String,
    pub status: MarketStatus,
    pub all: bool,
    pub page_limit: u32,
    pub book_prices: bool,
    pub search: &'a str,
    pub sort: &'static str,
    pub markets: &'a [Market],
}

impl Snapshot<'_> {
    /// Write the snapshot as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))
    }
}
