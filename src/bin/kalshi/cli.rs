//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kalshi_api_client::types::{Action, MarketStatus, OrderStatus, SettlementStatus, Side};

/// Kalshi trade API client
#[derive(Parser)]
#[command(name = "kalshi")]
#[command(about = "Query markets and manage a Kalshi portfolio from the terminal")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show account balance
    Balance(JsonArgs),
    /// List markets
    Markets(MarketsArgs),
    /// Show best bid/ask for a market
    Orderbook(OrderbookArgs),
    /// GET an arbitrary API path for debugging
    Raw(RawArgs),
    /// Show market-level positions
    Positions(PositionsArgs),
    /// Show your orders
    Orders(OrdersArgs),
    /// Place a limit order (buy or sell, YES or NO)
    Order(OrderArgs),
    /// Buy YES or NO on a market
    Buy(TradeArgs),
    /// Sell YES or NO on a market
    Sell(TradeArgs),
    /// Cancel a single order by id
    Cancel(CancelArgs),
    /// Cancel all orders on a market
    CancelAll(CancelAllArgs),
}

/// Only a `--json` switch
#[derive(Args)]
pub struct JsonArgs {
    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the markets command
#[derive(Args, Clone)]
pub struct MarketsArgs {
    /// Market status filter
    #[arg(long, default_value = "open")]
    pub status: MarketStatus,

    /// Number of markets (single page). Ignored with --all
    #[arg(long, default_value_t = 15)]
    pub limit: u32,

    /// Fetch all markets using pagination
    #[arg(long)]
    pub all: bool,

    /// Items per page when paginating
    #[arg(long, default_value_t = 100)]
    pub page_limit: u32,

    /// Stop after this many pages when paginating
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Price each row from its orderbook (one extra request per market)
    #[arg(long)]
    pub book_prices: bool,

    /// Case-insensitive substring filter over title and ticker
    #[arg(long, default_value = "")]
    pub search: String,

    /// Sort key
    #[arg(long, value_enum, default_value_t = SortKey::Title)]
    pub sort: SortKey,

    /// Output raw JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Write a JSON snapshot of the listing to this file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Re-fetch every SECS seconds
    #[arg(long, value_name = "SECS")]
    pub refresh: Option<u64>,

    /// Stop after N refreshes (default: run until interrupted)
    #[arg(long, value_name = "N", requires = "refresh")]
    pub iterations: Option<u32>,
}

/// Sort keys for market listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    Ticker,
    YesPrice,
    NoPrice,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Ticker => "ticker",
            SortKey::YesPrice => "yes_price",
            SortKey::NoPrice => "no_price",
        }
    }
}

/// Arguments for the orderbook command
#[derive(Args)]
pub struct OrderbookArgs {
    /// Market ticker, e.g. KXNBAGAME-25NOV14BKNORL-ORL
    pub ticker: String,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the raw command
#[derive(Args)]
pub struct RawArgs {
    /// API path, e.g. /markets?limit=1 (with or without /trade-api/v2)
    pub path: String,
}

/// Settlement filter for positions
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SettlementArg {
    Unsettled,
    Settled,
    All,
}

impl From<SettlementArg> for SettlementStatus {
    fn from(arg: SettlementArg) -> Self {
        match arg {
            SettlementArg::Unsettled => SettlementStatus::Unsettled,
            SettlementArg::Settled => SettlementStatus::Settled,
            SettlementArg::All => SettlementStatus::All,
        }
    }
}

/// Arguments for the positions command
#[derive(Args)]
pub struct PositionsArgs {
    /// Filter positions by settlement status
    #[arg(long, value_enum, default_value_t = SettlementArg::Unsettled)]
    pub settlement_status: SettlementArg,

    /// Fields that must be non-zero, e.g. "position" or "position,total_traded"
    #[arg(long, default_value = "position")]
    pub count_filter: String,

    /// Filter by market ticker
    #[arg(long)]
    pub ticker: Option<String>,

    /// Max records per page
    #[arg(long, default_value_t = 100)]
    pub limit: u32,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

/// Order status filter, `all` meaning no filter
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderStatusArg {
    Resting,
    Executed,
    Canceled,
    All,
}

impl OrderStatusArg {
    pub fn filter(self) -> Option<OrderStatus> {
        match self {
            OrderStatusArg::Resting => Some(OrderStatus::Resting),
            OrderStatusArg::Executed => Some(OrderStatus::Executed),
            OrderStatusArg::Canceled => Some(OrderStatus::Canceled),
            OrderStatusArg::All => None,
        }
    }
}

/// Arguments for the orders command
#[derive(Args)]
pub struct OrdersArgs {
    /// Order status filter
    #[arg(long, value_enum, default_value_t = OrderStatusArg::Resting)]
    pub status: OrderStatusArg,

    /// Filter by market ticker
    #[arg(long)]
    pub ticker: Option<String>,

    /// Max records per page
    #[arg(long, default_value_t = 100)]
    pub limit: u32,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

/// Price and size of an order
#[derive(Args)]
pub struct PriceArgs {
    /// YES price in cents (1-99)
    #[arg(long, conflicts_with = "no", required_unless_present = "no")]
    pub yes: Option<u32>,

    /// NO price in cents (1-99)
    #[arg(long)]
    pub no: Option<u32>,

    /// Number of contracts
    #[arg(long, default_value_t = 1)]
    pub qty: u32,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

impl PriceArgs {
    /// The quoted side and price.
    pub fn priced_side(&self) -> (Side, u32) {
        match (self.yes, self.no) {
            (Some(cents), _) => (Side::Yes, cents),
            (None, Some(cents)) => (Side::No, cents),
            // clap guarantees one of the two.
            (None, None) => (Side::Yes, 0),
        }
    }
}

/// Arguments for the buy and sell commands
#[derive(Args)]
pub struct TradeArgs {
    /// Market ticker
    pub ticker: String,

    #[command(flatten)]
    pub price: PriceArgs,
}

/// Arguments for the generic order command
#[derive(Args)]
pub struct OrderArgs {
    /// Market ticker
    pub ticker: String,

    /// buy or sell
    #[arg(value_enum)]
    pub action: ActionArg,

    #[command(flatten)]
    pub price: PriceArgs,
}

/// Order action
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActionArg {
    Buy,
    Sell,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Buy => Action::Buy,
            ActionArg::Sell => Action::Sell,
        }
    }
}

/// Arguments for the cancel command
#[derive(Args)]
pub struct CancelArgs {
    /// Order id to cancel (see `kalshi orders`)
    pub order_id: String,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the cancel-all command
#[derive(Args)]
pub struct CancelAllArgs {
    /// Market ticker whose orders should be cancelled
    pub ticker: String,

    /// Which orders to cancel
    #[arg(long, default_value = "resting")]
    pub status: OrderStatus,

    /// Max number of orders to cancel in one run
    #[arg(long, default_value_t = 1000)]
    pub limit: usize,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}
