//! Domain records shared by the store and the API.
//!
//! All records serialize to camelCase JSON; enumerations serialize as
//! SCREAMING_SNAKE_CASE names.

pub mod donation;
pub mod enums;
pub mod notification;
pub mod project;
pub mod request;
pub mod stats;
pub mod user;
pub mod zakat;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use donation::{Donation, DonationFilter, DonationTarget, NewDonation};
pub use enums::{
    CharityCategory, DonationStatus, NotificationKind, ProjectCategory, ProjectStatus,
    RequestStatus, UnknownVariant, UrgencyLevel, UserRole,
};
pub use notification::{NewNotification, Notification};
pub use project::{HalalProject, HalalProjectListing, NewHalalProject, ProjectFilter};
pub use request::{
    CharityRequest, CharityRequestListing, NewCharityRequest, RequestFilter, RequestReview,
    ReviewDecision,
};
pub use stats::{CategoryStats, PlatformStats};
pub use user::{User, UserCounts, UserPatch, UserProfile, UserSummary, UserUpsert};
pub use zakat::{DistributionStatus, ZakatDistribution, ZakatDistributionRequest, ZakatPool};

/// Donation count embedded in listings as `_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationCount {
    pub donations: i64,
}

/// Largest page size a listing returns.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Offset pagination, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Clamp to page >= 1 and 1 <= limit <= 100.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: Page, total: u64) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total,
            pages: total.div_ceil(page.limit as u64),
        }
    }
}

/// Parse a timestamp sent by a form: RFC 3339, or a bare `YYYY-MM-DD`
/// date taken as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
