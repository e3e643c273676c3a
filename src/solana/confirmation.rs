//! Confirmation polling for submitted transactions.
//!
//! A fixed number of status checks with a fixed delay between them. There
//! is no backoff and no cancellation; callers that cannot wait the full
//! budget should call `confirm_transaction` once instead.

use std::time::Duration;

use crate::solana::client::SolanaClient;

/// Default number of status checks.
pub const DEFAULT_MAX_RETRIES: u32 = 30;

/// Default delay between status checks.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Poll until `signature` is confirmed or `max_retries` checks have failed.
///
/// The delay is only taken after an unconfirmed check, so a confirmed
/// transaction returns immediately.
pub async fn wait_for_confirmation(
    client: &SolanaClient,
    signature: &str,
    max_retries: u32,
    delay: Duration,
) -> bool {
    for attempt in 1..=max_retries {
        if client.confirm_transaction(signature).await {
            tracing::debug!(signature, attempt, "Transaction confirmed");
            return true;
        }
        tracing::trace!(signature, attempt, max_retries, "Transaction not confirmed yet");
        tokio::time::sleep(delay).await;
    }

    tracing::warn!(signature, max_retries, "Transaction was not confirmed");
    false
}
