//! Donations toward a charity request or a halal project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::enums::DonationStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_id: String,
    pub request_id: Option<String>,
    pub project_id: Option<String>,
    pub amount: f64,
    pub charity_token_amount: f64,
    /// Base58 transaction signature once submitted on chain.
    pub transaction_signature: Option<String>,
    pub status: DonationStatus,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// What a donation funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationTarget<'a> {
    Request(&'a str),
    Project(&'a str),
}

impl DonationTarget<'_> {
    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            DonationTarget::Request(_) => "request",
            DonationTarget::Project(_) => "project",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    pub donor_id: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub charity_token_amount: f64,
    #[serde(default)]
    pub transaction_signature: Option<String>,
    #[serde(default)]
    pub status: Option<DonationStatus>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl NewDonation {
    /// The single record this donation funds. Exactly one of `request_id`
    /// and `project_id` must be set.
    pub fn target(&self) -> Option<DonationTarget<'_>> {
        match (self.request_id.as_deref(), self.project_id.as_deref()) {
            (Some(request), None) => Some(DonationTarget::Request(request)),
            (None, Some(project)) => Some(DonationTarget::Project(project)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationFilter {
    pub donor_id: Option<String>,
    pub request_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<DonationStatus>,
}
