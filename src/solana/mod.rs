//! Solana chain-access subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration (network, RPC URL, mint, zakat pool)
//!     → client.rs (JSON-RPC with timeouts and failover)
//!     → transaction.rs (build unsigned transfers, wire encoding)
//!     → wallet (donor) signs, API relays via send_transaction
//!     → confirmation.rs (fixed-count status polling)
//! ```
//!
//! # Security Constraints
//! - The optional authority keypair comes ONLY from the environment
//! - Never log secret key material
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when the cluster is unreachable

pub mod cache;
pub mod client;
pub mod confirmation;
pub mod format;
pub mod pubkey;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use cache::{BalanceCache, BalanceKind};
pub use client::SolanaClient;
pub use pubkey::{get_associated_token_address, is_valid_public_key, Pubkey};
pub use transaction::{PreparedTransaction, Transaction};
pub use types::{Cluster, Commitment, SolanaError, SolanaResult};
pub use wallet::Wallet;
