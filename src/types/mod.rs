//! Common types used across the Kalshi client library.

pub mod common;
pub mod serde_helpers;

pub use common::*;
