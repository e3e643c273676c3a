//! Platform-wide aggregates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::donation::Donation;

/// Per-category request totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub count: i64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: i64,
    /// Sum of donation amounts.
    pub total_donations: f64,
    pub total_donation_count: i64,
    pub total_requests: i64,
    pub active_projects: i64,
    pub completed_requests: i64,
    pub average_donation: f64,
    /// Keyed by category name.
    pub categories: BTreeMap<String, CategoryStats>,
    /// Latest donations, newest first.
    pub recent_activity: Vec<Donation>,
}

impl PlatformStats {
    /// Average of `total` over `count`, 0 when there is nothing to average.
    pub fn average(total: f64, count: i64) -> f64 {
        if count > 0 {
            total / count as f64
        } else {
            0.0
        }
    }
}
