//! Data-access subsystem.
//!
//! # Data Flow
//! ```text
//! API handler
//!     → get_store() (process-wide singleton, built on first use)
//!     → SqliteStore (sqlx pool)  |  MockStore (stub values)
//!     → records returned unchanged to the handler
//! ```
//!
//! # Design Decisions
//! - One async trait, two implementations; handlers never know which
//! - Only donation recording spans several writes, inside one transaction
//! - Integrity (NOT NULL, UNIQUE, foreign keys) comes from the schema

pub mod client;
pub mod mock;
pub mod schema;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    CharityRequest, CharityRequestListing, Donation, DonationFilter, DonationStatus,
    HalalProjectListing, NewCharityRequest, NewDonation, NewHalalProject, NewNotification,
    Notification, Page, PlatformStats, ProjectFilter, RequestFilter, RequestReview, User,
    UserPatch, UserProfile, UserUpsert,
};

pub use client::{get_store, StoreHandle};
pub use mock::MockStore;
pub use sqlite::SqliteStore;

/// Errors raised by the data-access layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] schema::SchemaError),

    /// A stored value could not be mapped back to a record.
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// The caller asked for something the store cannot do.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Which implementation backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Mock,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Sqlite => "sqlite",
            StoreKind::Mock => "mock",
        }
    }
}

/// Persistence operations used by the API layer.
#[async_trait]
pub trait CharityStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    /// Cheap round trip for health checks.
    async fn ping(&self) -> StoreResult<()>;

    // ==================== USERS ====================

    async fn find_user_by_wallet(&self, wallet: &str) -> StoreResult<Option<UserProfile>>;

    /// Newest users first.
    async fn list_users(&self, limit: u32) -> StoreResult<Vec<User>>;

    /// Update profile fields and `lastLoginAt` of an existing wallet, or
    /// create the user.
    async fn upsert_user(&self, user: &UserUpsert) -> StoreResult<User>;

    async fn update_user(&self, wallet: &str, patch: &UserPatch) -> StoreResult<Option<User>>;

    // ==================== CHARITY REQUESTS ====================

    /// Ordered by urgency (most urgent first), then newest first.
    async fn list_requests(
        &self,
        filter: &RequestFilter,
        page: Page,
    ) -> StoreResult<Vec<CharityRequestListing>>;

    async fn count_requests(&self, filter: &RequestFilter) -> StoreResult<u64>;

    /// Create with status PENDING.
    async fn create_request(&self, request: &NewCharityRequest) -> StoreResult<CharityRequestListing>;

    async fn find_request(&self, id: &str) -> StoreResult<Option<CharityRequestListing>>;

    async fn review_request(&self, id: &str, review: &RequestReview) -> StoreResult<Option<CharityRequest>>;

    // ==================== HALAL PROJECTS ====================

    /// Newest first.
    async fn list_projects(
        &self,
        filter: &ProjectFilter,
        page: Page,
    ) -> StoreResult<Vec<HalalProjectListing>>;

    async fn count_projects(&self, filter: &ProjectFilter) -> StoreResult<u64>;

    async fn create_project(&self, project: &NewHalalProject) -> StoreResult<HalalProjectListing>;

    async fn find_project(&self, id: &str) -> StoreResult<Option<HalalProjectListing>>;

    // ==================== DONATIONS ====================

    /// Insert the donation and credit its request or project and its
    /// donor, all in one transaction.
    async fn record_donation(&self, donation: &NewDonation) -> StoreResult<Donation>;

    /// Newest first.
    async fn list_donations(&self, filter: &DonationFilter, limit: u32) -> StoreResult<Vec<Donation>>;

    async fn update_donation_status(
        &self,
        id: &str,
        status: DonationStatus,
        signature: Option<&str>,
    ) -> StoreResult<Option<Donation>>;

    // ==================== NOTIFICATIONS ====================

    async fn create_notification(&self, notification: &NewNotification) -> StoreResult<Notification>;

    /// Newest first.
    async fn list_notifications(&self, user_id: &str, unread_only: bool) -> StoreResult<Vec<Notification>>;

    /// Returns false when no such notification exists.
    async fn mark_notification_read(&self, id: &str) -> StoreResult<bool>;

    // ==================== STATS ====================

    async fn platform_stats(&self) -> StoreResult<PlatformStats>;
}
