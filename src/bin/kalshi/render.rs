//! Plain-text rendering for terminal output.
//!
//! Every renderer returns a `String` so the layout can be tested without a
//! terminal.

use std::fmt::Write;

use kalshi_api_client::rest::{Balance, BestPrices, Market, MarketPosition, Order};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::listing::Category;

const TITLE_WIDTH: usize = 48;

/// `12345` cents as `$123.45`, with thousands separators.
pub fn cents_to_dollars(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// A price cell: empty when the price is absent.
pub fn price_cell(cents: Option<i64>) -> String {
    cents.map(cents_to_dollars).unwrap_or_default()
}

/// `2024-01-02 03:04:05 UTC`.
pub fn format_utc(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    at.to_offset(time::UtcOffset::UTC)
        .format(format)
        .unwrap_or_else(|_| at.to_string())
}

/// Make an RFC 3339 timestamp from the API a little easier to read.
pub fn format_api_time(ts: Option<&str>) -> String {
    ts.map(|ts| ts.replacen('T', " ", 1).replace('Z', " UTC"))
        .unwrap_or_default()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

/// Account balance summary.
pub fn balance(balance: &Balance) -> String {
    let updated = balance
        .updated_at()
        .map(format_utc)
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Account Balance\n  Cash:      {}\n  Portfolio: {}\n  Updated:   {}\n",
        cents_to_dollars(balance.balance),
        cents_to_dollars(balance.portfolio_value.unwrap_or(0)),
        updated
    )
}

/// Market listing with quoted prices.
pub fn markets(markets: &[Market], heading: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(
        out,
        "{:<36} {:<width$} {:<8} {:>9} {:>9} {:>9} {:>9}",
        "TICKER",
        "TITLE",
        "CATEGORY",
        "YES BID",
        "YES ASK",
        "NO BID",
        "NO ASK",
        width = TITLE_WIDTH
    );
    for market in markets {
        let _ = writeln!(
            out,
            "{:<36} {:<width$} {:<8} {:>9} {:>9} {:>9} {:>9}",
            truncate(&market.ticker, 36),
            truncate(&market.title, TITLE_WIDTH),
            Category::of(market).as_str(),
            price_cell(market.yes_bid),
            price_cell(market.yes_ask),
            price_cell(market.no_bid),
            price_cell(market.no_ask),
            width = TITLE_WIDTH
        );
    }
    let _ = writeln!(out, "{} market(s)", markets.len());
    out
}

/// Best levels of one orderbook.
pub fn orderbook(ticker: &str, best: &BestPrices) -> String {
    let cell = |price: Option<u32>| {
        let cell = price_cell(price.map(i64::from));
        if cell.is_empty() { "-".to_string() } else { cell }
    };
    format!(
        "Orderbook (best levels)\n  Ticker:  {ticker}\n  YES Bid: {}\n  YES Ask: {}\n  NO Bid:  {}\n  NO Ask:  {}\n",
        cell(best.yes_bid),
        cell(best.yes_ask),
        cell(best.no_bid),
        cell(best.no_ask)
    )
}

/// Market positions table.
pub fn positions(positions: &[MarketPosition]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36} {:>9} {:>12} {:>13} {:>8}  {}",
        "TICKER", "POSITION", "EXPOSURE", "REALIZED PNL", "RESTING", "LAST UPDATED"
    );
    for position in positions {
        let exposure = match position.market_exposure_dollars {
            Some(dollars) => format!("${dollars}"),
            None => cents_to_dollars(position.market_exposure.unwrap_or(0)),
        };
        let realized = match position.realized_pnl_dollars {
            Some(dollars) => format!("${dollars}"),
            None => cents_to_dollars(position.realized_pnl.unwrap_or(0)),
        };
        let _ = writeln!(
            out,
            "{:<36} {:>9} {:>12} {:>13} {:>8}  {}",
            truncate(&position.ticker, 36),
            position.position,
            exposure,
            realized,
            position.resting_orders_count.unwrap_or(0),
            format_api_time(position.last_updated_ts.as_deref())
        );
    }
    out
}

/// Orders table.
pub fn orders(orders: &[Order]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<38} {:<30} {:<4} {:<5} {:<9} {:>7} {:>9}  {}",
        "ORDER ID", "TICKER", "SIDE", "ACT", "STATUS", "PRICE", "REM/INIT", "CREATED"
    );
    for order in orders {
        let remaining = order.remaining_count.unwrap_or(0);
        let initial = order
            .initial_count
            .unwrap_or_else(|| order.fill_count.unwrap_or(0) + remaining);
        let _ = writeln!(
            out,
            "{:<38} {:<30} {:<4} {:<5} {:<9} {:>7} {:>9}  {}",
            order.order_id,
            truncate(&order.ticker, 30),
            order.side.to_string(),
            order.action.to_string(),
            order.status,
            price_cell(order.yes_price.or(order.no_price)),
            format!("{remaining}/{initial}"),
            format_api_time(order.created_time.as_deref())
        );
    }
    out
}

/// One-line summary of a placed order.
pub fn order_placed(order: &Order) -> String {
    let leg = match (order.yes_price, order.no_price) {
        (Some(cents), _) => format!("YES @ {cents}c"),
        (None, Some(cents)) => format!("NO @ {cents}c"),
        (None, None) => String::new(),
    };
    format!(
        "Order sent: {} {} x{} {}\nOrder ID: {} | Status: {}\n",
        order.action.to_string().to_uppercase(),
        order.ticker,
        order.initial_count.unwrap_or(0),
        leg,
        order.order_id,
        order.status
    )
}
