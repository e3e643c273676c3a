//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the store (SQLite, or the mock when allowed)
//! - Build the chain client for the configured cluster
//! - Load the optional authority keypair
//! - Assemble the shared application state
//!
//! # Design Decisions
//! - Fail fast: an unusable store or RPC endpoint is fatal
//! - A missing or malformed authority keypair is not; zakat
//!   distributions then wait for the pool owner to sign

use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::PlatformConfig;
use crate::database::{get_store, StoreError};
use crate::http::server::AppState;
use crate::lifecycle::Shutdown;
use crate::solana::wallet::AUTHORITY_KEYPAIR_ENV_VAR;
use crate::solana::{BalanceCache, SolanaClient, SolanaError, Wallet};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("store initialization failed: {0}")]
    Store(#[from] StoreError),

    #[error("chain client initialization failed: {0}")]
    Solana(#[from] SolanaError),
}

/// Build the application state for `config`.
pub async fn build_state(config: PlatformConfig) -> Result<AppState, StartupError> {
    let store = get_store(&config.database).await?;
    tracing::info!(store = store.kind().as_str(), "Store ready");

    let solana = SolanaClient::new(&config.solana)?;
    tracing::info!(
        network = solana.cluster().as_str(),
        endpoint = solana.endpoint(),
        "Chain client ready"
    );

    let authority = load_authority(std::env::var(AUTHORITY_KEYPAIR_ENV_VAR).ok());

    Ok(AppState::new(config, store, solana, authority))
}

/// Sweep expired balances every TTL (at least once a second) until
/// `shutdown` fires.
pub fn spawn_cache_sweeper(balances: BalanceCache, shutdown: Shutdown) -> JoinHandle<()> {
    let period = balances.ttl().max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = balances.purge_expired();
                    if purged > 0 {
                        tracing::debug!(purged, remaining = balances.len(), "Swept balance cache");
                    }
                }
                _ = shutdown.wait() => break,
            }
        }
        tracing::debug!("Balance cache sweeper stopped");
    })
}

fn load_authority(raw: Option<String>) -> Option<Wallet> {
    let raw = raw.filter(|value| !value.trim().is_empty());
    let Some(raw) = raw else {
        tracing::info!(
            env_var = AUTHORITY_KEYPAIR_ENV_VAR,
            "No authority keypair configured"
        );
        return None;
    };

    match Wallet::from_keypair_string(&raw) {
        Ok(wallet) => Some(wallet),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed authority keypair");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_authority_optional() {
        assert!(load_authority(None).is_none());
        assert!(load_authority(Some("  ".to_string())).is_none());
        assert!(load_authority(Some("[1,2,3]".to_string())).is_none());
    }

    #[test]
    fn test_load_authority_from_secret_bytes() {
        let bytes: Vec<String> = (1..=32u8).map(|b| b.to_string()).collect();
        let raw = format!("[{}]", bytes.join(","));
        let wallet = load_authority(Some(raw)).expect("valid keypair");
        let again = Wallet::from_secret_bytes(&(1..=32u8).collect::<Vec<_>>()).unwrap();
        assert_eq!(wallet.pubkey(), again.pubkey());
    }

    #[tokio::test]
    async fn test_cache_sweeper_purges_until_shutdown() {
        use crate::solana::{BalanceKind, Pubkey};

        let balances = BalanceCache::new(Duration::from_millis(1));
        balances.insert(Pubkey::new([1; 32]), BalanceKind::Sol, 1);
        tokio::time::sleep(Duration::from_millis(5)).await;

        let shutdown = Shutdown::new();
        let sweeper = spawn_cache_sweeper(balances.clone(), shutdown.clone());

        // The first tick fires immediately.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(balances.is_empty());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), sweeper)
            .await
            .expect("sweeper stops on shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_build_state_with_memory_store() {
        let mut config = PlatformConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        let state = build_state(config).await.unwrap();
        assert_eq!(state.config.database.url, "sqlite::memory:");
    }
}
