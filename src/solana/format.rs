//! Amount formatting and cluster URL helpers.

use crate::solana::types::{Cluster, SolanaError, SolanaResult, LAMPORTS_PER_SOL};

/// Format lamports as SOL with four decimals (`1000000000` → `"1.0000"`).
pub fn format_lamports(lamports: u64) -> String {
    format!("{:.4}", lamports_to_sol(lamports))
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Convert SOL to lamports, rounding to the nearest lamport.
pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).round().max(0.0) as u64
}

/// Parse a human token amount into base units (`"0.5"`, 9 → `500000000`).
pub fn parse_token_amount(amount: &str, decimals: u8) -> SolanaResult<u64> {
    let value: f64 = amount
        .trim()
        .parse()
        .map_err(|_| SolanaError::Custom(format!("Invalid amount: {amount}")))?;
    ui_amount_to_base_units(value, decimals)
}

/// Convert a token amount to base units, rejecting negative or non-finite input.
pub fn ui_amount_to_base_units(amount: f64, decimals: u8) -> SolanaResult<u64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(SolanaError::Custom(format!("Invalid amount: {amount}")));
    }
    let scaled = (amount * 10f64.powi(decimals as i32)).round();
    if scaled > u64::MAX as f64 {
        return Err(SolanaError::Custom(format!("Amount too large: {amount}")));
    }
    Ok(scaled as u64)
}

/// Format base units as a token amount: four decimals for 9-decimal
/// tokens, two otherwise.
pub fn format_token_amount(amount: u64, decimals: u8) -> String {
    let value = amount as f64 / 10f64.powi(decimals as i32);
    if decimals == 9 {
        format!("{value:.4}")
    } else {
        format!("{value:.2}")
    }
}

/// Shorten an address to `abcd...wxyz`.
pub fn shorten_address(address: &str, chars: usize) -> String {
    let count = address.chars().count();
    if count <= chars * 2 {
        return address.to_string();
    }
    let head: String = address.chars().take(chars).collect();
    let tail: String = address.chars().skip(count - chars).collect();
    format!("{head}...{tail}")
}

/// Guess the cluster name from an RPC endpoint URL.
pub fn network_from_endpoint(endpoint: &str) -> &'static str {
    if endpoint.contains("devnet") {
        "devnet"
    } else if endpoint.contains("testnet") {
        "testnet"
    } else if endpoint.contains("mainnet") {
        "mainnet-beta"
    } else if endpoint.contains("localhost") || endpoint.contains("127.0.0.1") {
        "localnet"
    } else {
        "unknown"
    }
}

/// Public RPC endpoint of a cluster. Unknown names fall back to devnet.
pub fn cluster_api_url(network: &str) -> &'static str {
    match network.parse::<Cluster>() {
        Ok(Cluster::MainnetBeta) => "https://api.mainnet-beta.solana.com",
        Ok(Cluster::Testnet) => "https://api.testnet.solana.com",
        Ok(Cluster::Localnet) => "http://127.0.0.1:8899",
        Ok(Cluster::Devnet) | Err(_) => "https://api.devnet.solana.com",
    }
}

/// What an explorer link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerKind {
    Tx,
    Address,
}

/// Solana explorer link for a signature or an address.
pub fn explorer_url(target: &str, kind: ExplorerKind, network: &str) -> String {
    let path = match kind {
        ExplorerKind::Tx => "tx",
        ExplorerKind::Address => "address",
    };
    match network.parse::<Cluster>() {
        Ok(Cluster::MainnetBeta) => format!("https://explorer.solana.com/{path}/{target}"),
        Ok(Cluster::Localnet) => format!(
            "https://explorer.solana.com/{path}/{target}?cluster=custom&customUrl=http%3A%2F%2Flocalhost%3A8899"
        ),
        _ => format!("https://explorer.solana.com/{path}/{target}?cluster={network}"),
    }
}
