//! Cluster-specific types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Fee charged for a single-signature transaction when the cluster
/// cannot be asked.
pub const DEFAULT_FEE_LAMPORTS: u64 = 5_000;

/// Known Solana clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
}

impl Cluster {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Localnet => "localnet",
        }
    }

    /// Airdrops are only served by the test clusters.
    pub fn supports_airdrop(&self) -> bool {
        matches!(self, Cluster::Devnet | Cluster::Testnet | Cluster::Localnet)
    }
}

impl FromStr for Cluster {
    type Err = SolanaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            other => Err(SolanaError::Custom(format!("Unknown network: {other}"))),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commitment level for queries and confirmation.
///
/// Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl Default for Commitment {
    fn default() -> Self {
        Commitment::Confirmed
    }
}

impl FromStr for Commitment {
    type Err = SolanaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(SolanaError::Custom(format!("Unknown commitment: {other}"))),
        }
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum SolanaError {
    /// RPC connection or transport failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    RpcResponse { code: i64, message: String },

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Not a base58 encoded 32-byte public key.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Transaction was not confirmed within the polling budget.
    #[error("Transaction was not confirmed after {0} attempts")]
    ConfirmationTimeout(u32),

    /// Malformed or unexpected RPC payload.
    #[error("Unexpected RPC response: {0}")]
    Decode(String),

    /// Invalid keypair material or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Feature not available on this cluster or not configured.
    #[error("Not available: {0}")]
    NotAvailable(String),

    /// Error raised by platform code with a message meant for users.
    #[error("{0}")]
    Custom(String),
}

/// Result type for chain operations.
pub type SolanaResult<T> = Result<T, SolanaError>;

impl SolanaError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            SolanaError::Rpc(_) => "RPC_ERROR",
            SolanaError::RpcResponse { .. } => "RPC_RESPONSE_ERROR",
            SolanaError::Timeout(_) => "RPC_TIMEOUT",
            SolanaError::InvalidPublicKey(_) => "INVALID_PUBLIC_KEY",
            SolanaError::ConfirmationTimeout(_) => "CONFIRMATION_TIMEOUT",
            SolanaError::Decode(_) => "DECODE_ERROR",
            SolanaError::Wallet(_) => "WALLET_ERROR",
            SolanaError::NotAvailable(_) => "NOT_AVAILABLE",
            SolanaError::Custom(_) => "CUSTOM",
        }
    }

    /// Message suitable for showing to end users.
    pub fn user_message(&self) -> String {
        match self {
            SolanaError::Custom(message) => message.clone(),
            other => user_message_for(&other.to_string()).to_string(),
        }
    }
}

/// Map a raw chain error message to a user-facing message.
pub fn user_message_for(raw: &str) -> &'static str {
    if raw.contains("insufficient funds") {
        "Insufficient funds for transaction"
    } else if raw.contains("Transaction was not confirmed") {
        "Transaction failed to confirm"
    } else if raw.contains("Blockhash not found") {
        "Transaction expired, please try again"
    } else {
        "An unexpected error occurred"
    }
}

/// Account state as returned by `getAccountInfo` with base64 encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub lamports: u64,
    pub owner: String,
    /// `[payload, encoding]`.
    pub data: (String, String),
    pub executable: bool,
    #[serde(default)]
    pub rent_epoch: Option<u64>,
    #[serde(default)]
    pub space: Option<u64>,
}

impl AccountInfo {
    /// Raw account data.
    pub fn data_bytes(&self) -> SolanaResult<Vec<u8>> {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&self.data.0)
            .map_err(|e| SolanaError::Decode(format!("account data: {e}")))
    }
}

/// An account owned by a program (`getProgramAccounts`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedAccount {
    pub pubkey: String,
    pub account: AccountInfo,
}

/// Token amount in base units plus its display form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    /// Base units as a decimal string (may exceed 2^53).
    pub amount: String,
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount_string: Option<String>,
}

impl TokenAmount {
    pub fn base_units(&self) -> SolanaResult<u64> {
        self.amount
            .parse()
            .map_err(|_| SolanaError::Decode(format!("token amount '{}'", self.amount)))
    }
}

/// Result of `getLatestBlockhash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

/// One entry of `getSignatureStatuses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Landed without error and reached at least `commitment`.
    pub fn satisfies(&self, commitment: Commitment) -> bool {
        self.err.is_none()
            && self
                .confirmation_status
                .map(|status| status >= commitment)
                .unwrap_or(false)
    }
}

/// One entry of `getSignaturesForAddress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

/// A history entry: signature metadata plus the fetched transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub success: bool,
    pub fee: Option<u64>,
    pub memo: Option<String>,
    pub confirmation_status: Option<Commitment>,
    /// Full `getTransaction` payload.
    pub transaction: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_parsing() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("Mainnet-Beta".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert!("moonnet".parse::<Cluster>().is_err());
        assert!(!Cluster::MainnetBeta.supports_airdrop());
        assert!(Cluster::Testnet.supports_airdrop());
    }

    #[test]
    fn test_commitment_ordering() {
        assert!(Commitment::Finalized > Commitment::Confirmed);
        assert!(Commitment::Confirmed > Commitment::Processed);
        assert_eq!(Commitment::default(), Commitment::Confirmed);
    }

    #[test]
    fn test_custom_error_keeps_message() {
        let err = SolanaError::Custom("Custom Solana error".to_string());
        assert_eq!(err.user_message(), "Custom Solana error");
        assert_eq!(err.code(), "CUSTOM");
    }

    #[test]
    fn test_insufficient_funds() {
        let err = SolanaError::RpcResponse {
            code: -32002,
            message: "Transaction simulation failed: insufficient funds for transaction".to_string(),
        };
        assert_eq!(err.user_message(), "Insufficient funds for transaction");
    }

    #[test]
    fn test_confirmation_error() {
        let err = SolanaError::ConfirmationTimeout(30);
        assert_eq!(err.user_message(), "Transaction failed to confirm");
    }

    #[test]
    fn test_blockhash_error() {
        assert_eq!(
            user_message_for("Blockhash not found"),
            "Transaction expired, please try again"
        );
    }

    #[test]
    fn test_unknown_errors() {
        assert_eq!(user_message_for("Unknown error occurred"), "An unexpected error occurred");
        assert_eq!(user_message_for(""), "An unexpected error occurred");
        assert_eq!(SolanaError::Timeout(10).user_message(), "An unexpected error occurred");
    }

    #[test]
    fn test_signature_status_satisfies() {
        let status: SignatureStatus = serde_json::from_value(serde_json::json!({
            "slot": 5,
            "confirmations": null,
            "err": null,
            "confirmationStatus": "finalized"
        }))
        .unwrap();
        assert!(status.satisfies(Commitment::Confirmed));

        let failed = SignatureStatus {
            err: Some(serde_json::json!({"InstructionError": [0, "Custom"]})),
            ..status.clone()
        };
        assert!(!failed.satisfies(Commitment::Processed));

        let processed = SignatureStatus {
            confirmation_status: Some(Commitment::Processed),
            ..status
        };
        assert!(!processed.satisfies(Commitment::Confirmed));
    }

    #[test]
    fn test_account_info_decoding() {
        let info: AccountInfo = serde_json::from_value(serde_json::json!({
            "lamports": 2039280,
            "owner": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            "data": ["AQID", "base64"],
            "executable": false,
            "rentEpoch": 18446744073709551615u64,
            "space": 3
        }))
        .unwrap();
        assert_eq!(info.data_bytes().unwrap(), vec![1, 2, 3]);
        assert_eq!(info.rent_epoch, Some(u64::MAX));
    }

    #[test]
    fn test_error_display() {
        let err = SolanaError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");
    }
}
