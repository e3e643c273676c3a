//! Halal investment projects funded in stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::enums::{ProjectCategory, ProjectStatus};
use crate::models::user::UserSummary;
use crate::models::DonationCount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalalProject {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub category: ProjectCategory,
    pub total_funding: f64,
    pub raised_amount: f64,
    pub status: ProjectStatus,
    pub total_stages: i64,
    pub current_stage: i64,
    pub location: Option<String>,
    pub halal_certified: bool,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HalalProject {
    pub fn is_fully_funded(&self) -> bool {
        self.raised_amount >= self.total_funding
    }
}

/// A project with its creator and donation count, as listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalalProjectListing {
    #[serde(flatten)]
    pub project: HalalProject,
    pub creator: Option<UserSummary>,
    #[serde(rename = "_count")]
    pub counts: DonationCount,
}

/// Fields of a new project. Status always starts as PENDING at stage 1.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHalalProject {
    pub creator_id: String,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub category: ProjectCategory,
    pub total_funding: f64,
    pub total_stages: i64,
    pub location: Option<String>,
    pub halal_certified: bool,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,
    pub creator_id: Option<String>,
}
