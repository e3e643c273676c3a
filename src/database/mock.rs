//! Stand-in store used when no database is reachable.
//!
//! Lookups find nothing, listings are empty, and writes echo their input
//! back with the id `mock-id` without persisting anything.

use async_trait::async_trait;
use chrono::Utc;

use crate::database::{CharityStore, StoreError, StoreKind, StoreResult};
use crate::models::{
    CharityRequest, CharityRequestListing, Donation, DonationCount, DonationFilter,
    DonationStatus, HalalProject, HalalProjectListing, NewCharityRequest, NewDonation,
    NewHalalProject, NewNotification, Notification, Page, PlatformStats, ProjectFilter,
    ProjectStatus, RequestFilter, RequestReview, RequestStatus, User, UserPatch, UserProfile,
    UserRole, UserUpsert,
};

/// Identifier given to every record the mock store "creates".
pub const MOCK_ID: &str = "mock-id";

#[derive(Debug, Clone, Copy, Default)]
pub struct MockStore;

impl MockStore {
    pub fn new() -> Self {
        Self
    }
}

fn echo_user(wallet: &str, patch: &UserPatch) -> User {
    let now = Utc::now();
    User {
        id: MOCK_ID.to_string(),
        wallet_address: wallet.to_string(),
        email: patch.email.clone(),
        name: patch.name.clone(),
        avatar: patch.avatar.clone(),
        bio: patch.bio.clone(),
        location: patch.location.clone(),
        is_verified: false,
        role: UserRole::User,
        total_donated: 0.0,
        total_requests: 0,
        reputation: 0,
        charity_tokens: 0.0,
        created_at: now,
        updated_at: now,
        last_login_at: Some(now),
    }
}

#[async_trait]
impl CharityStore for MockStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Mock
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_user_by_wallet(&self, _wallet: &str) -> StoreResult<Option<UserProfile>> {
        Ok(None)
    }

    async fn list_users(&self, _limit: u32) -> StoreResult<Vec<User>> {
        Ok(Vec::new())
    }

    async fn upsert_user(&self, user: &UserUpsert) -> StoreResult<User> {
        Ok(echo_user(&user.wallet_address, &user.profile))
    }

    async fn update_user(&self, wallet: &str, patch: &UserPatch) -> StoreResult<Option<User>> {
        Ok(Some(echo_user(wallet, patch)))
    }

    async fn list_requests(
        &self,
        _filter: &RequestFilter,
        _page: Page,
    ) -> StoreResult<Vec<CharityRequestListing>> {
        Ok(Vec::new())
    }

    async fn count_requests(&self, _filter: &RequestFilter) -> StoreResult<u64> {
        Ok(0)
    }

    async fn create_request(&self, request: &NewCharityRequest) -> StoreResult<CharityRequestListing> {
        let now = Utc::now();
        Ok(CharityRequestListing {
            request: CharityRequest {
                id: MOCK_ID.to_string(),
                user_id: request.user_id.clone(),
                title: request.title.clone(),
                description: request.description.clone(),
                long_description: request.long_description.clone(),
                category: request.category,
                target_amount: request.target_amount,
                received_amount: 0.0,
                urgency: request.urgency,
                status: RequestStatus::Pending,
                deadline: request.deadline,
                beneficiary_name: request.beneficiary_name.clone(),
                beneficiary_location: request.beneficiary_location.clone(),
                beneficiary_phone: request.beneficiary_phone.clone(),
                beneficiary_email: request.beneficiary_email.clone(),
                personal_story: request.personal_story.clone(),
                public_description: request.public_description.clone(),
                expected_impact: request.expected_impact.clone(),
                additional_notes: request.additional_notes.clone(),
                is_public: request.is_public,
                reviewed_by: None,
                reviewed_at: None,
                rejection_reason: None,
                created_at: now,
                updated_at: now,
            },
            user: None,
            counts: DonationCount::default(),
        })
    }

    async fn find_request(&self, _id: &str) -> StoreResult<Option<CharityRequestListing>> {
        Ok(None)
    }

    async fn review_request(&self, _id: &str, _review: &RequestReview) -> StoreResult<Option<CharityRequest>> {
        Ok(None)
    }

    async fn list_projects(
        &self,
        _filter: &ProjectFilter,
        _page: Page,
    ) -> StoreResult<Vec<HalalProjectListing>> {
        Ok(Vec::new())
    }

    async fn count_projects(&self, _filter: &ProjectFilter) -> StoreResult<u64> {
        Ok(0)
    }

    async fn create_project(&self, project: &NewHalalProject) -> StoreResult<HalalProjectListing> {
        let now = Utc::now();
        Ok(HalalProjectListing {
            project: HalalProject {
                id: MOCK_ID.to_string(),
                creator_id: project.creator_id.clone(),
                title: project.title.clone(),
                description: project.description.clone(),
                long_description: project.long_description.clone(),
                category: project.category,
                total_funding: project.total_funding,
                raised_amount: 0.0,
                status: ProjectStatus::Pending,
                total_stages: project.total_stages.max(1),
                current_stage: 1,
                location: project.location.clone(),
                halal_certified: project.halal_certified,
                deadline: project.deadline,
                created_at: now,
                updated_at: now,
            },
            creator: None,
            counts: DonationCount::default(),
        })
    }

    async fn find_project(&self, _id: &str) -> StoreResult<Option<HalalProjectListing>> {
        Ok(None)
    }

    async fn record_donation(&self, donation: &NewDonation) -> StoreResult<Donation> {
        if donation.target().is_none() {
            return Err(StoreError::InvalidInput(
                "exactly one of requestId or projectId is required".to_string(),
            ));
        }
        Ok(Donation {
            id: MOCK_ID.to_string(),
            donor_id: donation.donor_id.clone(),
            request_id: donation.request_id.clone(),
            project_id: donation.project_id.clone(),
            amount: donation.amount,
            charity_token_amount: donation.charity_token_amount,
            transaction_signature: donation.transaction_signature.clone(),
            status: donation.status.unwrap_or(DonationStatus::Pending),
            message: donation.message.clone(),
            is_anonymous: donation.is_anonymous,
            created_at: Utc::now(),
        })
    }

    async fn list_donations(&self, _filter: &DonationFilter, _limit: u32) -> StoreResult<Vec<Donation>> {
        Ok(Vec::new())
    }

    async fn update_donation_status(
        &self,
        _id: &str,
        _status: DonationStatus,
        _signature: Option<&str>,
    ) -> StoreResult<Option<Donation>> {
        Ok(None)
    }

    async fn create_notification(&self, notification: &NewNotification) -> StoreResult<Notification> {
        Ok(Notification {
            id: MOCK_ID.to_string(),
            user_id: notification.user_id.clone(),
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            read: false,
            created_at: Utc::now(),
        })
    }

    async fn list_notifications(&self, _user_id: &str, _unread_only: bool) -> StoreResult<Vec<Notification>> {
        Ok(Vec::new())
    }

    async fn mark_notification_read(&self, _id: &str) -> StoreResult<bool> {
        Ok(false)
    }

    async fn platform_stats(&self) -> StoreResult<PlatformStats> {
        Ok(PlatformStats::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CharityCategory, UrgencyLevel};

    #[tokio::test]
    async fn test_lookups_find_nothing() {
        let store = MockStore::new();
        assert_eq!(store.kind(), StoreKind::Mock);
        assert!(store.find_user_by_wallet("w").await.unwrap().is_none());
        assert!(store.find_request("r").await.unwrap().is_none());
        assert!(store
            .list_requests(&RequestFilter::default(), Page::default())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(store.count_projects(&ProjectFilter::default()).await.unwrap(), 0);
        assert_eq!(store.platform_stats().await.unwrap(), PlatformStats::default());
    }

    #[tokio::test]
    async fn test_writes_echo_with_mock_id() {
        let store = MockStore::new();
        let user = store
            .upsert_user(&UserUpsert {
                wallet_address: "wallet".to_string(),
                profile: UserPatch {
                    name: Some("Bilal".to_string()),
                    ..UserPatch::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(user.id, MOCK_ID);
        assert_eq!(user.name.as_deref(), Some("Bilal"));

        let created = store
            .create_request(&NewCharityRequest {
                user_id: "u1".to_string(),
                title: "Roof repair".to_string(),
                description: "Storm damage".to_string(),
                long_description: None,
                category: CharityCategory::Housing,
                target_amount: 300.0,
                urgency: UrgencyLevel::High,
                deadline: Utc::now(),
                beneficiary_name: None,
                beneficiary_location: None,
                beneficiary_phone: None,
                beneficiary_email: None,
                personal_story: None,
                public_description: None,
                expected_impact: None,
                additional_notes: None,
                is_public: true,
            })
            .await
            .unwrap();
        assert_eq!(created.request.id, MOCK_ID);
        assert_eq!(created.request.status, RequestStatus::Pending);
        assert_eq!(created.request.title, "Roof repair");
    }

    #[tokio::test]
    async fn test_donation_still_needs_one_target() {
        let store = MockStore::new();
        let donation = NewDonation {
            donor_id: "d".to_string(),
            request_id: None,
            project_id: None,
            amount: 1.0,
            charity_token_amount: 0.0,
            transaction_signature: None,
            status: None,
            message: None,
            is_anonymous: false,
        };
        assert!(matches!(
            store.record_donation(&donation).await,
            Err(StoreError::InvalidInput(_))
        ));
    }
}
