//! `/api/zakat/pool` and `/api/token`.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::error::ApiResult;
use crate::http::server::AppState;
use crate::models::ZakatPool;
use crate::solana::format::format_token_amount;
use crate::solana::Pubkey;

pub async fn get_pool(State(state): State<AppState>) -> ApiResult<Json<ZakatPool>> {
    let address = state.solana.zakat_pool()?;
    let mint = state.solana.charity_mint()?;
    let decimals = state.solana.charity_decimals();
    let balance = state.solana.get_zakat_pool_balance().await;

    Ok(Json(ZakatPool {
        address,
        mint,
        balance,
        formatted_balance: format_token_amount(balance, decimals),
        decimals,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub mint: Pubkey,
    pub decimals: u8,
    /// Base units.
    pub supply: u64,
    pub formatted_supply: String,
    pub network: &'static str,
}

pub async fn get_token(State(state): State<AppState>) -> ApiResult<Json<TokenInfo>> {
    let mint = state.solana.charity_mint()?;
    let decimals = state.solana.charity_decimals();
    let supply = state.solana.get_token_supply(&mint).await;

    Ok(Json(TokenInfo {
        mint,
        decimals,
        supply,
        formatted_supply: format_token_amount(supply, decimals),
        network: state.solana.cluster().as_str(),
    }))
}
