//! Solana JSON-RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Talk JSON-RPC 2.0 to a primary endpoint plus failover endpoints
//! - Query chain state (balances, token accounts, signatures, supply)
//! - Build unsigned transfer transactions for wallet signing
//! - Relay signed transactions and poll for confirmation
//!
//! # Error policy
//! Balance and transaction submission calls propagate errors. Read-only
//! lookups that feed dashboards (token balance, supply, history, program
//! accounts, account info, confirmation) log the failure and return an
//! empty value instead.

use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::config::SolanaConfig;
use crate::observability::metrics;
use crate::solana::format::{sol_to_lamports, ui_amount_to_base_units};
use crate::solana::pubkey::{get_associated_token_address, Pubkey};
use crate::solana::transaction::{
    create_associated_token_account, decode_blockhash, system_transfer, token_transfer, Message,
    Transaction,
};
use crate::solana::types::{
    AccountInfo, Cluster, Commitment, KeyedAccount, LatestBlockhash, SignatureInfo,
    SignatureStatus, SolanaError, SolanaResult, TokenAmount, TransactionRecord,
    DEFAULT_FEE_LAMPORTS,
};

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `{ context, value }` wrapper used by most RPC results.
#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

/// Solana RPC client wrapper with failover support.
#[derive(Clone)]
pub struct SolanaClient {
    http: reqwest::Client,
    /// Endpoint URLs (primary + failovers).
    providers: Arc<Vec<String>>,
    timeout_duration: Duration,
    cluster: Cluster,
    commitment: Commitment,
    charity_mint: Option<Pubkey>,
    charity_decimals: u8,
    zakat_pool: Option<Pubkey>,
    confirmation_retries: u32,
    confirmation_delay: Duration,
    next_id: Arc<AtomicU64>,
}

impl SolanaClient {
    /// Create a new client from configuration.
    ///
    /// No request is made here; an unreachable cluster only shows up as
    /// failed calls (and an unhealthy `/health`).
    pub fn new(config: &SolanaConfig) -> SolanaResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let cluster: Cluster = config.network.parse()?;
        let commitment: Commitment = config.commitment.parse()?;

        let primary = config.endpoint();
        url::Url::parse(&primary)
            .map_err(|e| SolanaError::Rpc(format!("Invalid RPC URL '{}': {}", primary, e)))?;
        let mut providers = vec![primary.clone()];

        for url_str in &config.failover_urls {
            if url::Url::parse(url_str).is_ok() {
                providers.push(url_str.clone());
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let charity_mint = optional_pubkey(&config.charity_token_mint)?;
        let zakat_pool = optional_pubkey(&config.zakat_pool_address)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("charity-platform/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SolanaError::Rpc(format!("HTTP client: {}", e)))?;

        tracing::info!(
            rpc_url = %primary,
            network = %cluster,
            failovers = providers.len() - 1,
            "Solana client initialized"
        );

        Ok(Self {
            http,
            providers: Arc::new(providers),
            timeout_duration,
            cluster,
            commitment,
            charity_mint,
            charity_decimals: config.charity_token_decimals,
            zakat_pool,
            confirmation_retries: config.confirmation_retries,
            confirmation_delay: Duration::from_millis(config.confirmation_delay_ms),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Issue one JSON-RPC call, trying providers in order.
    ///
    /// Transport failures and timeouts move on to the next provider. An
    /// error object in the response is the node's answer and is returned
    /// as is.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> SolanaResult<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        for (i, url) in self.providers.iter().enumerate() {
            let fut = async {
                let response = self.http.post(url).json(&request).send().await?;
                response.error_for_status()?.json::<RpcResponse>().await
            };
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(response)) => {
                    if let Some(error) = response.error {
                        metrics::record_rpc_call(method, false);
                        return Err(SolanaError::RpcResponse {
                            code: error.code,
                            message: error.message,
                        });
                    }
                    metrics::record_rpc_call(method, true);
                    return serde_json::from_value(response.result)
                        .map_err(|e| SolanaError::Decode(format!("{method}: {e}")));
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, method, "RPC timeout, trying next provider");
                }
            }
        }

        metrics::record_rpc_call(method, false);
        Err(SolanaError::Rpc(format!("All RPC providers failed for {method}")))
    }

    fn commitment_config(&self) -> Value {
        json!({ "commitment": self.commitment.as_str() })
    }

    /// SOL balance in lamports. Errors propagate.
    pub async fn get_balance(&self, address: &Pubkey) -> SolanaResult<u64> {
        let result: WithContext<u64> = self
            .call("getBalance", json!([address.to_string(), self.commitment_config()]))
            .await
            .inspect_err(|e| tracing::error!(address = %address, error = %e, "Error getting wallet balance"))?;
        Ok(result.value)
    }

    /// Balance of `owner`'s associated token account for `mint`, in base
    /// units. Returns 0 when the account is missing or the call fails.
    pub async fn get_token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> u64 {
        let fetch = async {
            let ata = get_associated_token_address(owner, mint)?;
            let result: WithContext<TokenAmount> = self
                .call(
                    "getTokenAccountBalance",
                    json!([ata.to_string(), self.commitment_config()]),
                )
                .await?;
            result.value.base_units()
        };
        match fetch.await {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(owner = %owner, mint = %mint, error = %e, "Error getting token balance");
                0
            }
        }
    }

    /// Charity token balance, 0 when the mint is not configured.
    pub async fn get_charity_token_balance(&self, owner: &Pubkey) -> u64 {
        match self.charity_mint {
            Some(mint) => self.get_token_balance(owner, &mint).await,
            None => 0,
        }
    }

    pub async fn get_latest_blockhash(&self) -> SolanaResult<LatestBlockhash> {
        let result: WithContext<LatestBlockhash> = self
            .call("getLatestBlockhash", json!([self.commitment_config()]))
            .await?;
        Ok(result.value)
    }

    /// Account state, `None` when the account does not exist or the call fails.
    pub async fn get_account_info(&self, address: &Pubkey) -> Option<AccountInfo> {
        let params = json!([
            address.to_string(),
            { "encoding": "base64", "commitment": self.commitment.as_str() }
        ]);
        match self.call::<WithContext<Option<AccountInfo>>>("getAccountInfo", params).await {
            Ok(result) => result.value,
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Error getting account info");
                None
            }
        }
    }

    /// Status of a signature, `None` when the cluster has not seen it.
    pub async fn get_signature_status(&self, signature: &str) -> SolanaResult<Option<SignatureStatus>> {
        let result: WithContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature], { "searchTransactionHistory": true }]),
            )
            .await?;
        Ok(result.value.into_iter().next().flatten())
    }

    /// Whether the transaction landed without error at the configured
    /// commitment. Returns false on any failure.
    pub async fn confirm_transaction(&self, signature: &str) -> bool {
        match self.get_signature_status(signature).await {
            Ok(Some(status)) => status.satisfies(self.commitment),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(signature, error = %e, "Error confirming transaction");
                false
            }
        }
    }

    /// Poll confirmation with the configured retry count and delay.
    pub async fn wait_for_confirmation(&self, signature: &str) -> bool {
        crate::solana::confirmation::wait_for_confirmation(
            self,
            signature,
            self.confirmation_retries,
            self.confirmation_delay,
        )
        .await
    }

    /// Recent transactions touching `address`, newest first. Returns an
    /// empty list on failure; transactions the node cannot return are skipped.
    pub async fn get_transaction_history(&self, address: &Pubkey, limit: usize) -> Vec<TransactionRecord> {
        let signatures: Vec<SignatureInfo> = match self
            .call(
                "getSignaturesForAddress",
                json!([address.to_string(), { "limit": limit }]),
            )
            .await
        {
            Ok(signatures) => signatures,
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Error getting transaction history");
                return Vec::new();
            }
        };

        let fetches = signatures.into_iter().map(|info| async move {
            let params = json!([
                info.signature,
                { "encoding": "json", "maxSupportedTransactionVersion": 0 }
            ]);
            match self.call::<Option<Value>>("getTransaction", params).await {
                Ok(Some(transaction)) => Some(TransactionRecord {
                    fee: transaction.pointer("/meta/fee").and_then(Value::as_u64),
                    success: info.err.is_none(),
                    signature: info.signature,
                    slot: info.slot,
                    block_time: info.block_time,
                    memo: info.memo,
                    confirmation_status: info.confirmation_status,
                    transaction,
                }),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(signature = %info.signature, error = %e, "Error fetching transaction");
                    None
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Total supply of a mint in base units, 0 on failure.
    pub async fn get_token_supply(&self, mint: &Pubkey) -> u64 {
        let fetch = async {
            let result: WithContext<TokenAmount> = self
                .call("getTokenSupply", json!([mint.to_string(), self.commitment_config()]))
                .await?;
            result.value.base_units()
        };
        match fetch.await {
            Ok(supply) => supply,
            Err(e) => {
                tracing::warn!(mint = %mint, error = %e, "Error getting token supply");
                0
            }
        }
    }

    pub async fn get_charity_token_supply(&self) -> u64 {
        match self.charity_mint {
            Some(mint) => self.get_token_supply(&mint).await,
            None => 0,
        }
    }

    /// Accounts owned by a program, empty on failure.
    pub async fn get_program_accounts(&self, program_id: &Pubkey) -> Vec<KeyedAccount> {
        let params = json!([
            program_id.to_string(),
            { "encoding": "base64", "commitment": self.commitment.as_str() }
        ]);
        match self.call("getProgramAccounts", params).await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(program_id = %program_id, error = %e, "Error getting program accounts");
                Vec::new()
            }
        }
    }

    /// Request an airdrop of `sol` SOL to `address`. Returns the signature
    /// without waiting for it to land.
    ///
    /// Only devnet, testnet and localnet serve airdrops.
    pub async fn request_airdrop(&self, address: &Pubkey, sol: f64) -> SolanaResult<String> {
        if !self.cluster.supports_airdrop() {
            return Err(SolanaError::NotAvailable(
                "Airdrop only available on devnet/testnet".to_string(),
            ));
        }
        let lamports = sol_to_lamports(sol);
        let signature: String = self
            .call("requestAirdrop", json!([address.to_string(), lamports]))
            .await
            .inspect_err(|e| tracing::error!(address = %address, error = %e, "Error requesting airdrop"))?;
        tracing::info!(address = %address, lamports, signature = %signature, "Airdrop requested");
        Ok(signature)
    }

    /// Fee the cluster would charge for `message`, 5000 lamports when it
    /// cannot tell.
    pub async fn estimate_fee(&self, message: &Message) -> u64 {
        let encoded = BASE64.encode(message.serialize());
        match self
            .call::<WithContext<Option<u64>>>(
                "getFeeForMessage",
                json!([encoded, self.commitment_config()]),
            )
            .await
        {
            Ok(result) => result.value.unwrap_or(DEFAULT_FEE_LAMPORTS),
            Err(e) => {
                tracing::warn!(error = %e, "Error estimating transaction fee");
                DEFAULT_FEE_LAMPORTS
            }
        }
    }

    /// Relay a signed base64 wire transaction and return its signature.
    pub async fn send_transaction(&self, encoded: &str) -> SolanaResult<String> {
        let params = json!([
            encoded,
            { "encoding": "base64", "preflightCommitment": self.commitment.as_str() }
        ]);
        let signature: String = self
            .call("sendTransaction", params)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error sending transaction"))?;
        tracing::info!(signature = %signature, "Transaction submitted");
        Ok(signature)
    }

    /// Charity token balance of the zakat pool, 0 when unavailable.
    pub async fn get_zakat_pool_balance(&self) -> u64 {
        match self.zakat_pool {
            Some(pool) => self.get_charity_token_balance(&pool).await,
            None => {
                tracing::warn!("Zakat pool address not configured");
                0
            }
        }
    }

    /// Check if the cluster is reachable and healthy.
    pub async fn is_healthy(&self) -> bool {
        let healthy = matches!(
            self.call::<String>("getHealth", json!([])).await.as_deref(),
            Ok("ok")
        );
        metrics::record_backend_health("solana_rpc", healthy);
        healthy
    }

    async fn blockhash_bytes(&self) -> SolanaResult<[u8; 32]> {
        let latest = self.get_latest_blockhash().await?;
        decode_blockhash(&latest.blockhash)
    }

    /// Unsigned transfer of `lamports` from `from` to `to`.
    pub async fn create_sol_transfer_transaction(
        &self,
        from: &Pubkey,
        to: &Pubkey,
        lamports: u64,
    ) -> SolanaResult<Transaction> {
        let instructions = [system_transfer(from, to, lamports)];
        let message = Message::compile(&instructions, from, self.blockhash_bytes().await?)?;
        Ok(Transaction::new_unsigned(message))
    }

    /// Unsigned SPL token transfer of `amount` tokens between the owners'
    /// associated token accounts, paid by `from`.
    ///
    /// Creates the destination token account first when it does not exist.
    pub async fn create_token_transfer_transaction(
        &self,
        from: &Pubkey,
        to: &Pubkey,
        mint: &Pubkey,
        amount: f64,
        decimals: u8,
    ) -> SolanaResult<Transaction> {
        self.build_token_transfer(from, from, to, mint, amount, decimals).await
    }

    async fn build_token_transfer(
        &self,
        payer: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        mint: &Pubkey,
        amount: f64,
        decimals: u8,
    ) -> SolanaResult<Transaction> {
        let base_units = ui_amount_to_base_units(amount, decimals)?;
        let source = get_associated_token_address(from, mint)?;
        let destination = get_associated_token_address(to, mint)?;

        let mut instructions = Vec::with_capacity(2);
        if self.get_account_info(&destination).await.is_none() {
            tracing::debug!(owner = %to, account = %destination, "Destination token account missing, creating it");
            instructions.push(create_associated_token_account(payer, &destination, to, mint));
        }
        instructions.push(token_transfer(&source, &destination, from, base_units));

        let message = Message::compile(&instructions, payer, self.blockhash_bytes().await?)?;
        Ok(Transaction::new_unsigned(message))
    }

    /// Unsigned charity token transfer.
    pub async fn create_charity_token_transfer_transaction(
        &self,
        from: &Pubkey,
        to: &Pubkey,
        amount: f64,
    ) -> SolanaResult<Transaction> {
        let mint = self.charity_mint()?;
        self.create_token_transfer_transaction(from, to, &mint, amount, self.charity_decimals)
            .await
    }

    /// Unsigned donation: charity tokens, or SOL converted to lamports.
    pub async fn create_donation_transaction(
        &self,
        donor: &Pubkey,
        recipient: &Pubkey,
        amount: f64,
        is_charity_token: bool,
    ) -> SolanaResult<Transaction> {
        if is_charity_token {
            self.create_charity_token_transfer_transaction(donor, recipient, amount)
                .await
        } else {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(SolanaError::Custom(format!("Invalid amount: {amount}")));
            }
            self.create_sol_transfer_transaction(donor, recipient, sol_to_lamports(amount))
                .await
        }
    }

    /// Unsigned charity token transfer out of the zakat pool, fees paid
    /// by `authority`. Unless `authority` is the pool owner the transfer
    /// needs both signatures.
    pub async fn create_zakat_distribution_transaction(
        &self,
        authority: &Pubkey,
        recipient: &Pubkey,
        amount: f64,
    ) -> SolanaResult<Transaction> {
        let pool = self.zakat_pool()?;
        let mint = self.charity_mint()?;
        self.build_token_transfer(authority, &pool, recipient, &mint, amount, self.charity_decimals)
            .await
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// Primary endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.providers[0]
    }

    pub fn charity_decimals(&self) -> u8 {
        self.charity_decimals
    }

    pub fn charity_mint(&self) -> SolanaResult<Pubkey> {
        self.charity_mint
            .ok_or_else(|| SolanaError::NotAvailable("Charity token mint not configured".to_string()))
    }

    pub fn zakat_pool(&self) -> SolanaResult<Pubkey> {
        self.zakat_pool
            .ok_or_else(|| SolanaError::NotAvailable("Zakat pool address not configured".to_string()))
    }
}

fn optional_pubkey(raw: &str) -> SolanaResult<Option<Pubkey>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        raw.trim().parse().map(Some)
    }
}

impl std::fmt::Debug for SolanaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaClient")
            .field("rpc_url", &self.providers[0])
            .field("network", &self.cluster)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
