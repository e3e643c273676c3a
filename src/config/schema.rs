//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the platform.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the charity platform.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PlatformConfig {
    /// HTTP server settings (bind address, limits).
    pub server: ServerConfig,

    /// Database connection settings.
    pub database: DatabaseConfig,

    /// Solana cluster and token settings.
    pub solana: SolanaConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Moderation API settings.
    pub admin: AdminConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum body size in bytes.
    pub max_body_size: usize,

    /// Origins allowed to call the API from a browser. Empty allows any.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 60,
            max_body_size: 2 * 1024 * 1024, // 2MB
            allowed_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g., "sqlite://charity.db").
    pub url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,

    /// Serve stub data from the mock store when the database is unreachable.
    pub fallback_to_mock: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://charity.db".to_string(),
            max_connections: 5,
            fallback_to_mock: true,
        }
    }
}

/// Solana cluster configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SolanaConfig {
    /// Cluster name: devnet, testnet, mainnet-beta or localnet.
    pub network: String,

    /// JSON-RPC endpoint URL. Empty selects the public endpoint of `network`.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Commitment level used for queries and confirmation.
    pub commitment: String,

    /// Mint address of the charity token. Empty when no token is deployed.
    pub charity_token_mint: String,

    /// Decimals of the charity token.
    pub charity_token_decimals: u8,

    /// Owner address of the zakat pool. Empty when no pool is deployed.
    pub zakat_pool_address: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Confirmation polling: number of status checks.
    pub confirmation_retries: u32,

    /// Confirmation polling: fixed delay between checks in milliseconds.
    pub confirmation_delay_ms: u64,

    /// Wallet balance cache lifetime in seconds (0 disables the cache).
    pub balance_cache_ttl_secs: u64,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            network: "devnet".to_string(),
            rpc_url: String::new(),
            failover_urls: Vec::new(),
            commitment: "confirmed".to_string(),
            charity_token_mint: String::new(),
            charity_token_decimals: 9,
            zakat_pool_address: String::new(),
            rpc_timeout_secs: 10,
            confirmation_retries: 30,
            confirmation_delay_ms: 1000,
            balance_cache_ttl_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Moderation API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the moderation routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

impl SolanaConfig {
    /// The RPC endpoint in effect: the configured URL, or the public
    /// endpoint of the configured network.
    pub fn endpoint(&self) -> String {
        if self.rpc_url.is_empty() {
            crate::solana::format::cluster_api_url(&self.network).to_string()
        } else {
            self.rpc_url.clone()
        }
    }
}
