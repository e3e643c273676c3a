//! `/api/wallet` balances and history, `/api/airdrop`.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::error::{ApiError, ApiResult};
use crate::http::handlers::parse_address;
use crate::http::request::{parse_or, required_text, ApiJson};
use crate::http::server::AppState;
use crate::models::MAX_PAGE_SIZE;
use crate::solana::format::{format_lamports, format_token_amount, lamports_to_sol};
use crate::solana::types::TransactionRecord;
use crate::solana::{BalanceKind, Pubkey, SolanaResult};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// SOL airdropped when the body names no amount.
pub const DEFAULT_AIRDROP_SOL: f64 = 1.0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalances {
    pub address: Pubkey,
    /// SOL, not lamports.
    pub sol_balance: f64,
    /// Charity tokens, not base units.
    pub charity_token_balance: f64,
    pub formatted_sol_balance: String,
    pub formatted_charity_token_balance: String,
}

async fn sol_balance(state: &AppState, address: &Pubkey) -> SolanaResult<u64> {
    if let Some(cached) = state.balances.get(address, BalanceKind::Sol) {
        return Ok(cached);
    }
    let lamports = state.solana.get_balance(address).await?;
    state.balances.insert(*address, BalanceKind::Sol, lamports);
    Ok(lamports)
}

async fn charity_token_balance(state: &AppState, address: &Pubkey) -> u64 {
    if let Some(cached) = state.balances.get(address, BalanceKind::Token) {
        return cached;
    }
    let amount = state.solana.get_charity_token_balance(address).await;
    state.balances.insert(*address, BalanceKind::Token, amount);
    amount
}

pub async fn get_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<WalletBalances>> {
    let address = parse_address(&address)?;
    let (lamports, tokens) = tokio::join!(
        sol_balance(&state, &address),
        charity_token_balance(&state, &address)
    );
    let lamports = lamports?;
    let decimals = state.solana.charity_decimals();

    Ok(Json(WalletBalances {
        address,
        sol_balance: lamports_to_sol(lamports),
        charity_token_balance: tokens as f64 / 10f64.powi(i32::from(decimals)),
        formatted_sol_balance: format_lamports(lamports),
        formatted_charity_token_balance: format_token_amount(tokens, decimals),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WalletHistory {
    pub address: Pubkey,
    pub transactions: Vec<TransactionRecord>,
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<WalletHistory>> {
    let address = parse_address(&address)?;
    let limit = parse_or(query.limit.as_deref(), DEFAULT_HISTORY_LIMIT).clamp(1, MAX_PAGE_SIZE as usize);
    let transactions = state.solana.get_transaction_history(&address, limit).await;
    Ok(Json(WalletHistory {
        address,
        transactions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AirdropBody {
    pub address: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct AirdropResult {
    pub signature: String,
    pub address: Pubkey,
    pub amount: f64,
    pub confirmed: bool,
}

/// Devnet and testnet only.
pub async fn airdrop(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AirdropBody>,
) -> ApiResult<Json<AirdropResult>> {
    let address = required_text(&body.address)
        .ok_or_else(|| ApiError::bad_request("address is required"))
        .and_then(parse_address)?;
    let amount = body.amount.unwrap_or(DEFAULT_AIRDROP_SOL);
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::bad_request(format!("Invalid amount: {amount}")));
    }

    let signature = state.solana.request_airdrop(&address, amount).await?;
    let confirmed = state.confirm_within_budget(&signature).await;
    state.balances.invalidate(&address);

    Ok(Json(AirdropResult {
        signature,
        address,
        amount,
        confirmed,
    }))
}
