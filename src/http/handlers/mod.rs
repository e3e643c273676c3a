//! API route handlers, one module per resource.

pub mod donations;
pub mod notifications;
pub mod projects;
pub mod requests;
pub mod stats;
pub mod system;
pub mod transactions;
pub mod users;
pub mod wallet;
pub mod zakat;

use crate::http::error::ApiError;
use crate::solana::Pubkey;

/// Parse a base58 address from a path or body field.
pub(crate) fn parse_address(raw: &str) -> Result<Pubkey, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid wallet address"))
}
