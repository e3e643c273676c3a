use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::error::{ApiError, ApiResult};
use crate::http::handlers::parse_address;
use crate::http::request::{parse_filter, parse_or, required_text, ApiJson};
use crate::http::response::RequestPage;
use crate::http::server::AppState;
use crate::models::{
    CharityRequest, CharityRequestListing, DistributionStatus, NewNotification, NotificationKind,
    Page, Pagination, RequestFilter, RequestReview, ReviewDecision, ZakatDistribution,
    ZakatDistributionRequest,
};
use crate::solana::format::{format_token_amount, ui_amount_to_base_units};
use crate::solana::{PreparedTransaction, Pubkey};

/// Reviewer recorded when the body names none.
pub const DEFAULT_REVIEWER: &str = "admin";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub store: &'static str,
    pub network: &'static str,
    pub authority: Option<Pubkey>,
    pub zakat_pool: Option<Pubkey>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        store: state.store.kind().as_str(),
        network: state.solana.cluster().as_str(),
        authority: state.authority.as_ref().map(|wallet| wallet.pubkey()),
        zakat_pool: state.solana.zakat_pool().ok(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ModerationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

/// Every request, public or not, for the moderation queue.
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<ModerationQuery>,
) -> ApiResult<Json<RequestPage<CharityRequestListing>>> {
    let page = Page::new(
        parse_or(query.page.as_deref(), 1),
        parse_or(query.limit.as_deref(), Page::default().limit),
    );
    let filter = RequestFilter {
        status: parse_filter(query.status.as_deref(), "status")?,
        include_private: true,
        ..RequestFilter::default()
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

#[derive(Debug, Default, Deserialize)]
pub struct ReviewBody {
    pub reviewer: Option<String>,
    pub reason: Option<String>,
}

pub async fn approve_request(
    state: State<AppState>,
    id: Path<String>,
    body: Bytes,
) -> ApiResult<Json<CharityRequest>> {
    review(state, id, body, ReviewDecision::Approve).await
}

pub async fn reject_request(
    state: State<AppState>,
    id: Path<String>,
    body: Bytes,
) -> ApiResult<Json<CharityRequest>> {
    review(state, id, body, ReviewDecision::Reject).await
}

async fn review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
    decision: ReviewDecision,
) -> ApiResult<Json<CharityRequest>> {
    let body = parse_review_body(&body)?;
    let review = RequestReview {
        decision,
        reviewer: required_text(&body.reviewer).unwrap_or(DEFAULT_REVIEWER).to_string(),
        reason: required_text(&body.reason).map(str::to_string),
    };

    let request = state
        .store
        .review_request(&id, &review)
        .await?
        .ok_or_else(|| ApiError::not_found("Charity request not found"))?;

    notify(&state, review_notification(&request, &review)).await;
    Ok(Json(request))
}

/// The review body is optional; an empty one means "admin" with no reason.
fn parse_review_body(raw: &[u8]) -> ApiResult<ReviewBody> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReviewBody::default());
    }
    serde_json::from_slice(raw).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))
}

fn review_notification(request: &CharityRequest, review: &RequestReview) -> NewNotification {
    match review.decision {
        ReviewDecision::Approve => NewNotification {
            user_id: request.user_id.clone(),
            kind: NotificationKind::RequestApproved,
            title: "Request approved".to_string(),
            message: format!("Your request \"{}\" is now open for donations.", request.title),
        },
        ReviewDecision::Reject => NewNotification {
            user_id: request.user_id.clone(),
            kind: NotificationKind::RequestRejected,
            title: "Request rejected".to_string(),
            message: match &review.reason {
                Some(reason) => format!("Your request \"{}\" was rejected: {reason}", request.title),
                None => format!("Your request \"{}\" was rejected.", request.title),
            },
        },
    }
}

/// Notifications are best effort; a failure never undoes the action.
async fn notify(state: &AppState, notification: NewNotification) {
    if let Err(e) = state.store.create_notification(&notification).await {
        tracing::warn!(user_id = %notification.user_id, error = %e, "Failed to create notification");
    }
}

/// Pay zakat out of the pool.
///
/// When the platform authority owns the pool the transfer is signed,
/// submitted and confirmed here; otherwise the unsigned transaction is
/// returned for the pool owner to sign.
pub async fn distribute_zakat(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ZakatDistributionRequest>,
) -> ApiResult<Json<ZakatDistribution>> {
    let recipient = parse_address(&body.recipient)?;
    if !body.amount.is_finite() || body.amount <= 0.0 {
        return Err(ApiError::bad_request(format!("Invalid amount: {}", body.amount)));
    }

    // The pool owner pays the fees so its signature alone completes the
    // transfer, whoever ends up signing.
    let pool = state.solana.zakat_pool()?;
    let mut transaction = state
        .solana
        .create_zakat_distribution_transaction(&pool, &recipient, body.amount)
        .await?;

    // The authority can only complete the transfer when it is the pool owner.
    let signer = state.authority.as_ref().filter(|wallet| wallet.pubkey() == pool);

    let Some(wallet) = signer else {
        tracing::info!(
            pool = %pool,
            recipient = %recipient,
            amount = body.amount,
            "Zakat distribution awaiting pool owner signature"
        );
        return Ok(Json(ZakatDistribution {
            pool,
            recipient,
            amount: body.amount,
            reason: body.reason,
            status: DistributionStatus::AwaitingSignature,
            signature: None,
            transaction: Some(PreparedTransaction::from_transaction(&transaction)),
        }));
    };

    transaction.sign(wallet)?;
    let signature = state.solana.send_transaction(&transaction.to_base64()).await?;
    let confirmed = state.confirm_within_budget(&signature).await;
    state.balances.invalidate(&pool);
    state.balances.invalidate(&recipient);

    tracing::info!(
        pool = %pool,
        recipient = %recipient,
        amount = body.amount,
        signature = %signature,
        confirmed,
        "Zakat distributed"
    );

    if let Some(user_id) = required_text(&body.recipient_user_id) {
        let decimals = state.solana.charity_decimals();
        let amount = ui_amount_to_base_units(body.amount, decimals)
            .map(|units| format_token_amount(units, decimals))
            .unwrap_or_else(|_| body.amount.to_string());
        notify(
            &state,
            NewNotification {
                user_id: user_id.to_string(),
                kind: NotificationKind::ZakatDistributed,
                title: "Zakat received".to_string(),
                message: format!("You received {amount} charity tokens from the zakat pool."),
            },
        )
        .await;
    }

    Ok(Json(ZakatDistribution {
        pool,
        recipient,
        amount: body.amount,
        reason: body.reason,
        status: if confirmed {
            DistributionStatus::Confirmed
        } else {
            DistributionStatus::Submitted
        },
        signature: Some(signature),
        transaction: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CharityCategory, RequestStatus, UrgencyLevel};
    use chrono::Utc;

    fn request() -> CharityRequest {
        let now = Utc::now();
        CharityRequest {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            title: "School fees".to_string(),
            description: "Tuition".to_string(),
            long_description: None,
            category: CharityCategory::Education,
            target_amount: 800.0,
            received_amount: 0.0,
            urgency: UrgencyLevel::Medium,
            status: RequestStatus::Rejected,
            deadline: now,
            beneficiary_name: None,
            beneficiary_location: None,
            beneficiary_phone: None,
            beneficiary_email: None,
            personal_story: None,
            public_description: None,
            expected_impact: None,
            additional_notes: None,
            is_public: true,
            reviewed_by: Some("admin".to_string()),
            reviewed_at: Some(now),
            rejection_reason: Some("Duplicate".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_rejection_notification_carries_reason() {
        let review = RequestReview {
            decision: ReviewDecision::Reject,
            reviewer: "admin".to_string(),
            reason: Some("Duplicate".to_string()),
        };
        let notification = review_notification(&request(), &review);
        assert_eq!(notification.user_id, "u1");
        assert_eq!(notification.kind, NotificationKind::RequestRejected);
        assert!(notification.message.ends_with("rejected: Duplicate"));
    }

    #[test]
    fn test_review_body_is_optional() {
        let body = parse_review_body(b"").unwrap();
        assert!(body.reviewer.is_none());

        let body = parse_review_body(br#"{"reviewer":"mod-1","reason":"Spam"}"#).unwrap();
        assert_eq!(body.reviewer.as_deref(), Some("mod-1"));
        assert_eq!(body.reason.as_deref(), Some("Spam"));

        assert!(parse_review_body(b"{not json").is_err());
    }

    #[test]
    fn test_approval_notification() {
        let review = RequestReview {
            decision: ReviewDecision::Approve,
            reviewer: "admin".to_string(),
            reason: None,
        };
        let notification = review_notification(&request(), &review);
        assert_eq!(notification.kind, NotificationKind::RequestApproved);
        assert!(notification.message.contains("School fees"));
    }
}
