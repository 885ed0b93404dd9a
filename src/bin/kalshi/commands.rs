//! Command handlers.
//!
//! Written against [`KalshiClient`] so they work with any implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use kalshi_api_client::rest::{
    CreateOrderRequest, KalshiClient, LimitPrice, Market, MarketsRequest, OrdersRequest,
    PositionsRequest,
};
use kalshi_api_client::types::Action;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::cli::{
    CancelAllArgs, CancelArgs, JsonArgs, MarketsArgs, OrderbookArgs, OrdersArgs, PositionsArgs,
    PriceArgs, RawArgs, SortKey,
};
use crate::listing::{self, Snapshot};
use crate::render;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Show the account balance.
pub async fn balance<C: KalshiClient>(client: &C, args: JsonArgs) -> Result<()> {
    let balance = client.get_balance().await.context("failed to fetch balance")?;
    if args.json {
        print_json(&balance)
    } else {
        print!("{}", render::balance(&balance));
        Ok(())
    }
}

/// List markets, optionally refreshing on an interval.
pub async fn markets<C: KalshiClient>(client: &C, args: MarketsArgs) -> Result<()> {
    let Some(refresh) = args.refresh else {
        return markets_once(client, &args).await;
    };

    let interval = Duration::from_secs(refresh.max(1));
    let mut iteration = 0u32;
    loop {
        iteration += 1;
        if let Err(err) = markets_once(client, &args).await {
            // Keep refreshing; one failed round should not end the session.
            warn!(iteration, error = %format!("{err:#}"), "refresh failed");
        }
        if args.iterations.is_some_and(|max| iteration >= max) {
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}

async fn markets_once<C: KalshiClient>(client: &C, args: &MarketsArgs) -> Result<()> {
    let request = MarketsRequest::new().status(args.status);
    let markets: Vec<Market> = if args.all {
        match client
            .list_all_markets(&request, args.page_limit, args.max_pages)
            .await
        {
            Ok(markets) => markets,
            Err(err) if !err.items.is_empty() => {
                warn!(
                    pages = err.pages_fetched,
                    items = err.items.len(),
                    error = %err.source,
                    "listing incomplete, showing partial results"
                );
                err.items
            }
            Err(err) => return Err(err.into_source()).context("failed to list markets"),
        }
    } else {
        client
            .list_markets(&request.limit(args.limit))
            .await
            .context("failed to list markets")?
            .markets
    };

    let mut markets = listing::search(markets, &args.search);
    if args.book_prices {
        for market in &mut markets {
            let best = match client.get_orderbook(&market.ticker).await {
                Ok(book) => Some(book.best_prices()),
                Err(err) => {
                    warn!(ticker = %market.ticker, error = %err, "orderbook unavailable");
                    None
                }
            };
            listing::apply_book_prices(market, best);
        }
    }
    listing::sort(&mut markets, args.sort);

    if let Some(path) = &args.save {
        let snapshot = Snapshot {
            fetched_at: render::format_utc(OffsetDateTime::now_utc()),
            status: args.status,
            all: args.all,
            page_limit: args.page_limit,
            book_prices: args.book_prices,
            search: &args.search,
            sort: args.sort.as_str(),
            markets: &markets,
        };
        snapshot.write_to(path)?;
        info!(path = %path.display(), markets = markets.len(), "saved snapshot");
    }

    if args.json {
        return print_json(&serde_json::json!({ "markets": markets }));
    }

    let mut heading = format!("Markets (status={})", args.status);
    if !args.search.is_empty() || args.sort != SortKey::Title {
        heading.push_str(&format!(" (search='{}', sort={})", args.search, args.sort.as_str()));
    }
    println!();
    print!("{}", render::markets(&markets, &heading));
    Ok(())
}

/// Show the best levels of one market.
pub async fn orderbook<C: KalshiClient>(client: &C, args: OrderbookArgs) -> Result<()> {
    let book = client
        .get_orderbook(&args.ticker)
        .await
        .with_context(|| format!("failed to fetch orderbook for {}", args.ticker))?;
    if args.json {
        print_json(&serde_json::json!({ "orderbook": book, "best": book.best_prices() }))
    } else {
        print!("{}", render::orderbook(&args.ticker, &book.best_prices()));
        Ok(())
    }
}

/// Print the raw JSON of an arbitrary GET.
pub async fn raw<C: KalshiClient>(client: &C, args: RawArgs) -> Result<()> {
    let value = client
        .debug_path(&args.path)
        .await
        .with_context(|| format!("GET {} failed", args.path))?;
    eprintln!("GET {}", args.path);
    print_json(&value)
}

/// Show market positions.
pub async fn positions<C: KalshiClient>(client: &C, args: PositionsArgs) -> Result<()> {
    let request = PositionsRequest {
        settlement_status: Some(args.settlement_status.into()),
        count_filter: Some(args.count_filter).filter(|f| !f.is_empty()),
        ticker: args.ticker,
        limit: Some(args.limit),
        ..Default::default()
    };
    let page = client
        .get_positions(&request)
        .await
        .context("failed to fetch positions")?;

    if args.json {
        return print_json(&page.market_positions);
    }
    if page.market_positions.is_empty() {
        println!("No market positions found.");
    } else {
        print!("{}", render::positions(&page.market_positions));
    }
    Ok(())
}

/// Show orders.
pub async fn orders<C: KalshiClient>(client: &C, args: OrdersArgs) -> Result<()> {
    let request = OrdersRequest {
        status: args.status.filter(),
        ticker: args.ticker,
        limit: Some(args.limit),
        ..Default::default()
    };
    let page = client
        .get_orders(&request)
        .await
        .context("failed to fetch orders")?;

    if args.json {
        return print_json(&page.orders);
    }
    if page.orders.is_empty() {
        println!("No orders found for the given filters.");
    } else {
        print!("{}", render::orders(&page.orders));
    }
    Ok(())
}

/// Place a limit order.
pub async fn place_order<C: KalshiClient>(
    client: &C,
    ticker: String,
    action: Action,
    price: PriceArgs,
) -> Result<()> {
    let (side, cents) = price.priced_side();
    let request = CreateOrderRequest::limit(ticker, action, LimitPrice::new(side, cents), price.qty);
    let order = client
        .place_order(&request)
        .await
        .context("order request failed")?;

    if price.json {
        print_json(&order)
    } else {
        print!("{}", render::order_placed(&order));
        Ok(())
    }
}

/// Cancel one order.
pub async fn cancel<C: KalshiClient>(client: &C, args: CancelArgs) -> Result<()> {
    let response = client
        .cancel_order(&args.order_id)
        .await
        .with_context(|| format!("failed to cancel order {}", args.order_id))?;

    if args.json {
        return print_json(&response.order);
    }
    println!("Cancel request sent for order {}.", args.order_id);
    println!("New status: {}", response.order.status);
    Ok(())
}

/// Cancel every matching order on a market.
pub async fn cancel_all<C: KalshiClient>(client: &C, args: CancelAllArgs) -> Result<()> {
    let cancelled = client
        .cancel_all_for_ticker(&args.ticker, args.status, args.limit)
        .await
        .with_context(|| format!("failed to cancel orders on {}", args.ticker))?;

    if args.json {
        let orders: Vec<_> = cancelled.iter().map(|c| &c.order).collect();
        return print_json(&orders);
    }
    println!(
        "Sent cancel requests for {} order(s) on {} with status '{}'.",
        cancelled.len(),
        args.ticker,
        args.status
    );
    Ok(())
}
