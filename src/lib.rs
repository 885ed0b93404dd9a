//! # Kalshi Client
//!
//! An async Rust client library for the Kalshi trade API, plus the `kalshi`
//! command-line tool built on it.
//!
//! ## Features
//!
//! - RSA-PSS request signing with per-request millisecond timestamps
//! - Retry with exponential backoff on 429, 408 and 5xx responses
//! - Read/write request pacing
//! - Cursor pagination, lazy or eager
//! - Strong typing for market and portfolio responses
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kalshi_api_client::config::ClientConfig;
//! use kalshi_api_client::rest::{KalshiRestClient, MarketsRequest};
//! use kalshi_api_client::types::MarketStatus;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KalshiRestClient::from_config(&ClientConfig::from_env()?)?;
//!     let page = client
//!         .list_markets(&MarketsRequest::new().status(MarketStatus::Open).limit(15))
//!         .await?;
//!     for market in page.markets {
//!         println!("{:<40} {}", market.ticker, market.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use error::KalshiError;
pub use types::common::{Action, MarketStatus, OrderStatus, Side};

/// Result type alias using KalshiError
pub type Result<T> = std::result::Result<T, KalshiError>;
