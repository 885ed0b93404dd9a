//! Enumerations shared by market and portfolio endpoints.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Contract side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The YES contract
    Yes,
    /// The NO contract
    No,
}

impl Side {
    /// The other side of the same market.
    pub fn opposite(self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Yes => write!(f, "yes"),
            Side::No => write!(f, "no"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" => Ok(Side::Yes),
            "no" => Ok(Side::No),
            other => Err(format!("unknown side {other:?}, expected yes or no")),
        }
    }
}

/// Order action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Buy contracts
    Buy,
    /// Sell contracts
    Sell,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "buy"),
            Action::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Action::Buy),
            "sell" => Ok(Action::Sell),
            other => Err(format!("unknown action {other:?}, expected buy or sell")),
        }
    }
}

/// Market lifecycle status, as accepted by the `status` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    /// Listed but not yet trading
    Unopened,
    /// Trading
    Open,
    /// No longer trading, awaiting settlement
    Closed,
    /// Settled
    Settled,
}

impl std::fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketStatus::Unopened => write!(f, "unopened"),
            MarketStatus::Open => write!(f, "open"),
            MarketStatus::Closed => write!(f, "closed"),
            MarketStatus::Settled => write!(f, "settled"),
        }
    }
}

impl FromStr for MarketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unopened" => Ok(MarketStatus::Unopened),
            "open" => Ok(MarketStatus::Open),
            "closed" => Ok(MarketStatus::Closed),
            "settled" => Ok(MarketStatus::Settled),
            other => Err(format!("unknown market status {other:?}")),
        }
    }
}

/// Order status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Resting on the book
    Resting,
    /// Canceled before fully filling
    Canceled,
    /// Fully filled
    Executed,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Resting => write!(f, "resting"),
            OrderStatus::Canceled => write!(f, "canceled"),
            OrderStatus::Executed => write!(f, "executed"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "resting" => Ok(OrderStatus::Resting),
            "canceled" | "cancelled" => Ok(OrderStatus::Canceled),
            "executed" => Ok(OrderStatus::Executed),
            other => Err(format!("unknown order status {other:?}")),
        }
    }
}

/// Settlement filter for positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Settled and unsettled positions
    All,
    /// Only settled positions
    Settled,
    /// Only open positions (server default)
    #[default]
    Unsettled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Yes).unwrap(), "\"yes\"");
        assert_eq!(serde_json::from_str::<Side>("\"no\"").unwrap(), Side::No);
        assert_eq!(Side::Yes.opposite(), Side::No);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("BUY".parse::<Action>().unwrap(), Action::Buy);
        assert_eq!("Open".parse::<MarketStatus>().unwrap(), MarketStatus::Open);
        assert_eq!("cancelled".parse::<OrderStatus>().unwrap(), OrderStatus::Canceled);
        assert!("maybe".parse::<Side>().is_err());
    }

    #[test]
    fn test_status_round_trips_through_display() {
        for status in [
            MarketStatus::Unopened,
            MarketStatus::Open,
            MarketStatus::Closed,
            MarketStatus::Settled,
        ] {
            assert_eq!(status.to_string().parse::<MarketStatus>().unwrap(), status);
        }
    }
}
