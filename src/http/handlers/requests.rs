//! `/api/requests`: charity requests.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::http::error::{ApiError, ApiResult};
use crate::http::request::{parse_filter, parse_or, required_text, ApiJson, FlexibleAmount};
use crate::http::response::RequestPage;
use crate::http::server::AppState;
use crate::models::{
    parse_timestamp, CharityCategory, CharityRequestListing, NewCharityRequest, Page, Pagination,
    RequestFilter, UrgencyLevel,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub urgency: Option<String>,
}

/// Public requests, most urgent first.
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<RequestPage<CharityRequestListing>>> {
    let page = Page::new(
        parse_or(query.page.as_deref(), 1),
        parse_or(query.limit.as_deref(), Page::default().limit),
    );
    let filter = RequestFilter {
        category: parse_filter(query.category.as_deref(), "category")?,
        status: parse_filter(query.status.as_deref(), "status")?,
        urgency: parse_filter(query.urgency.as_deref(), "urgency")?,
        user_id: None,
        include_private: false,
    };

    let (requests, total) = tokio::try_join!(
        state.store.list_requests(&filter, page),
        state.store.count_requests(&filter),
    )?;

    Ok(Json(RequestPage {
        requests,
        pagination: Pagination::new(page, total),
    }))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CharityRequestListing>> {
    let request = state
        .store
        .find_request(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Charity request not found"))?;
    Ok(Json(request))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub category: Option<String>,
    pub target_amount: Option<FlexibleAmount>,
    pub urgency: Option<String>,
    pub deadline: Option<String>,
    pub beneficiary_name: Option<String>,
    pub beneficiary_location: Option<String>,
    pub beneficiary_phone: Option<String>,
    pub beneficiary_email: Option<String>,
    pub personal_story: Option<String>,
    pub public_description: Option<String>,
    pub expected_impact: Option<String>,
    pub additional_notes: Option<String>,
    pub is_public: Option<bool>,
    pub user_id: Option<String>,
}

impl CreateRequestBody {
    /// Check required fields and parse typed values.
    pub fn into_new_request(self) -> ApiResult<NewCharityRequest> {
        let (
            Some(title),
            Some(description),
            Some(category),
            Some(target_amount),
            Some(urgency),
            Some(deadline),
            Some(user_id),
        ) = (
            required_text(&self.title),
            required_text(&self.description),
            required_text(&self.category),
            FlexibleAmount::positive(self.target_amount),
            required_text(&self.urgency),
            required_text(&self.deadline),
            required_text(&self.user_id),
        )
        else {
            return Err(ApiError::bad_request("Missing required fields"));
        };

        let category: CharityCategory = category
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid category: {category}")))?;
        let urgency: UrgencyLevel = urgency
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid urgency: {urgency}")))?;
        let deadline = parse_timestamp(deadline)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid deadline: {deadline}")))?;

        Ok(NewCharityRequest {
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            long_description: self.long_description,
            category,
            target_amount,
            urgency,
            deadline,
            beneficiary_name: self.beneficiary_name,
            beneficiary_location: self.beneficiary_location,
            beneficiary_phone: self.beneficiary_phone,
            beneficiary_email: self.beneficiary_email,
            personal_story: self.personal_story,
            public_description: self.public_description,
            expected_impact: self.expected_impact,
            additional_notes: self.additional_notes,
            is_public: self.is_public.unwrap_or(true),
        })
    }
}

/// Create a request in PENDING status.
pub async fn create_request(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateRequestBody>,
) -> ApiResult<(StatusCode, Json<CharityRequestListing>)> {
    let new_request = body.into_new_request()?;
    let created = state.store.create_request(&new_request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
