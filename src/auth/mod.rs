//! Authentication module for Kalshi API.
//!
//! This module provides:
//! - Credential loading from PEM encoded RSA keys
//! - Millisecond timestamps that never repeat across requests
//! - RSA-PSS signature generation for authenticated requests

mod credentials;
mod signature;
mod timestamp;

pub use credentials::Credentials;
pub use signature::{
    ACCESS_KEY_HEADER, ACCESS_SIGNATURE_HEADER, ACCESS_TIMESTAMP_HEADER, AuthHeaders,
    canonical_message, sign_request,
};
pub use timestamp::{IncreasingTimestamp, TimestampProvider};
