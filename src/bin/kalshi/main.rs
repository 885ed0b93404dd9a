//! Kalshi CLI
//!
//! Provides commands for:
//! - `balance`, `positions`, `orders`: account data
//! - `markets`, `orderbook`: market data
//! - `order`, `buy`, `sell`, `cancel`, `cancel-all`: order entry
//! - `raw`: signed GET of any API path
//!
//! Configuration comes from `KALSHI_*` environment variables, optionally
//! loaded from a `.env` file. Logs go to stderr and are filtered by `RUST_LOG`.

mod cli;
mod commands;
mod listing;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use kalshi_api_client::config::ClientConfig;
use kalshi_api_client::rest::KalshiRestClient;
use kalshi_api_client::types::Action;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kalshi=info,kalshi_api_client=warn")),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("invalid Kalshi configuration")?;
    let client = KalshiRestClient::from_config(&config).context("failed to build client")?;
    debug!(base_url = %config.base_url, key_id = %config.key_id, "client ready");

    // Execute command
    match cli.command {
        Commands::Balance(args) => commands::balance(&client, args).await?,
        Commands::Markets(args) => commands::markets(&client, args).await?,
        Commands::Orderbook(args) => commands::orderbook(&client, args).await?,
        Commands::Raw(args) => commands::raw(&client, args).await?,
        Commands::Positions(args) => commands::positions(&client, args).await?,
        Commands::Orders(args) => commands::orders(&client, args).await?,
        Commands::Order(args) => {
            commands::place_order(&client, args.ticker, args.action.into(), args.price).await?
        }
        Commands::Buy(args) => {
            commands::place_order(&client, args.ticker, Action::Buy, args.price).await?
        }
        Commands::Sell(args) => {
            commands::place_order(&client, args.ticker, Action::Sell, args.price).await?
        }
        Commands::Cancel(args) => commands::cancel(&client, args).await?,
        Commands::CancelAll(args) => commands::cancel_all(&client, args).await?,
    }

    Ok(())
}
