//! Zakat pool and distribution records.
//!
//! The pool is a charity token account on chain; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::solana::{PreparedTransaction, Pubkey};

/// Current state of the zakat pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZakatPool {
    pub address: Pubkey,
    pub mint: Pubkey,
    /// Token base units.
    pub balance: u64,
    pub formatted_balance: String,
    pub decimals: u8,
}

/// A distribution out of the pool to one recipient.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZakatDistributionRequest {
    pub recipient: String,
    /// Charity tokens, not base units.
    pub amount: f64,
    #[serde(default)]
    pub reason: Option<String>,
    /// Notify this user once distributed.
    #[serde(default)]
    pub recipient_user_id: Option<String>,
}

/// Distribution progress as reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionStatus {
    /// Built but must be signed by the pool owner.
    AwaitingSignature,
    /// Signed by the platform and submitted.
    Submitted,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZakatDistribution {
    pub pool: Pubkey,
    pub recipient: Pubkey,
    pub amount: f64,
    pub reason: Option<String>,
    pub status: DistributionStatus,
    pub signature: Option<String>,
    /// Present when the platform could not sign itself.
    pub transaction: Option<PreparedTransaction>,
}
