//! Charity requests: individual appeals for help.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::enums::{CharityCategory, RequestStatus, UrgencyLevel};
use crate::models::user::UserSummary;
use crate::models::DonationCount;

/// A charity request as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharityRequest {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub category: CharityCategory,
    pub target_amount: f64,
    pub received_amount: f64,
    pub urgency: UrgencyLevel,
    pub status: RequestStatus,
    pub deadline: DateTime<Utc>,
    pub beneficiary_name: Option<String>,
    pub beneficiary_location: Option<String>,
    pub beneficiary_phone: Option<String>,
    pub beneficiary_email: Option<String>,
    pub personal_story: Option<String>,
    pub public_description: Option<String>,
    pub expected_impact: Option<String>,
    pub additional_notes: Option<String>,
    pub is_public: bool,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CharityRequest {
    /// Funding progress in percent, capped at 100.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.received_amount / self.target_amount * 100.0).min(100.0)
    }
}

/// A request with its owner and donation count, as listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharityRequestListing {
    #[serde(flatten)]
    pub request: CharityRequest,
    pub user: Option<UserSummary>,
    #[serde(rename = "_count")]
    pub counts: DonationCount,
}

/// Fields of a new request. Status always starts as PENDING.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCharityRequest {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub category: CharityCategory,
    pub target_amount: f64,
    pub urgency: UrgencyLevel,
    pub deadline: DateTime<Utc>,
    pub beneficiary_name: Option<String>,
    pub beneficiary_location: Option<String>,
    pub beneficiary_phone: Option<String>,
    pub beneficiary_email: Option<String>,
    pub personal_story: Option<String>,
    pub public_description: Option<String>,
    pub expected_impact: Option<String>,
    pub additional_notes: Option<String>,
    pub is_public: bool,
}

/// Listing filter. Public listings only show `is_public` requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub category: Option<CharityCategory>,
    pub status: Option<RequestStatus>,
    pub urgency: Option<UrgencyLevel>,
    pub user_id: Option<String>,
    /// Include non-public requests (moderation views).
    pub include_private: bool,
}

/// Outcome of a moderation review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn status(&self) -> RequestStatus {
        match self {
            ReviewDecision::Approve => RequestStatus::Approved,
            ReviewDecision::Reject => RequestStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestReview {
    pub decision: ReviewDecision,
    pub reviewer: String,
    pub reason: Option<String>,
}
