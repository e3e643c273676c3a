//! `/api/donations`: donation records.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::http::error::{ApiError, ApiResult};
use crate::http::request::{parse_filter, parse_or, required_text, ApiJson};
use crate::http::server::AppState;
use crate::models::{Donation, DonationFilter, NewDonation, MAX_PAGE_SIZE};

pub const DEFAULT_DONATION_LIMIT: u32 = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationQuery {
    pub donor_id: Option<String>,
    pub request_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<String>,
    pub limit: Option<String>,
}

pub async fn list_donations(
    State(state): State<AppState>,
    Query(query): Query<DonationQuery>,
) -> ApiResult<Json<Vec<Donation>>> {
    let filter = DonationFilter {
        donor_id: required_text(&query.donor_id).map(str::to_string),
        request_id: required_text(&query.request_id).map(str::to_string),
        project_id: required_text(&query.project_id).map(str::to_string),
        status: parse_filter(query.status.as_deref(), "status")?,
    };
    let limit = parse_or(query.limit.as_deref(), DEFAULT_DONATION_LIMIT).clamp(1, MAX_PAGE_SIZE);

    let donations = state.store.list_donations(&filter, limit).await?;
    Ok(Json(donations))
}

/// Record a donation and credit its target and donor.
pub async fn record_donation(
    State(state): State<AppState>,
    ApiJson(donation): ApiJson<NewDonation>,
) -> ApiResult<(StatusCode, Json<Donation>)> {
    if donation.donor_id.trim().is_empty() {
        return Err(ApiError::bad_request("Missing required fields"));
    }
    let recorded = state.store.record_donation(&donation).await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}
