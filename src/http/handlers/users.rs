//! `/api/users`: profiles keyed by wallet address.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::http::error::{ApiError, ApiResult};
use crate::http::request::{required_text, ApiJson};
use crate::http::server::AppState;
use crate::models::{UserPatch, UserUpsert};

/// Users listed when no wallet is given.
pub const USER_LIST_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub wallet: Option<String>,
}

/// Body of POST and PUT. The wallet is optional here so a missing one
/// gets a readable 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub wallet_address: Option<String>,
    #[serde(flatten)]
    pub profile: UserPatch,
}

impl UserBody {
    fn wallet(&self) -> ApiResult<&str> {
        required_text(&self.wallet_address)
            .ok_or_else(|| ApiError::bad_request("Wallet address is required"))
    }
}

/// One profile with counts, or the newest users.
pub async fn get_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Response> {
    match required_text(&query.wallet) {
        Some(wallet) => {
            let profile = state
                .store
                .find_user_by_wallet(wallet)
                .await?
                .ok_or_else(|| ApiError::not_found("User not found"))?;
            Ok(Json(profile).into_response())
        }
        None => {
            let users = state.store.list_users(USER_LIST_LIMIT).await?;
            Ok(Json(users).into_response())
        }
    }
}

pub async fn upsert_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UserBody>,
) -> ApiResult<Response> {
    let upsert = UserUpsert {
        wallet_address: body.wallet()?.to_string(),
        profile: body.profile,
    };
    let user = state.store.upsert_user(&upsert).await?;
    Ok(Json(user).into_response())
}

pub async fn update_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UserBody>,
) -> ApiResult<Response> {
    let wallet = body.wallet()?;
    let user = state
        .store
        .update_user(wallet, &body.profile)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user).into_response())
}
