//! SQLite-backed store.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::database::schema;
use crate::database::{CharityStore, StoreError, StoreKind, StoreResult};
use crate::models::{
    CategoryStats, CharityRequest, CharityRequestListing, Donation, DonationCount, DonationFilter,
    DonationStatus, DonationTarget, HalalProject, HalalProjectListing, NewCharityRequest,
    NewDonation, NewHalalProject, NewNotification, Notification, Page, PlatformStats,
    ProjectFilter, ProjectStatus, RequestFilter, RequestReview, RequestStatus, User, UserCounts,
    UserPatch, UserProfile, UserSummary, UserUpsert,
};
use crate::observability::metrics;

/// Sort key putting the most urgent requests first.
const URGENCY_RANK_SQL: &str = "CASE r.urgency \
     WHEN 'URGENT' THEN 4 WHEN 'HIGH' THEN 3 WHEN 'MEDIUM' THEN 2 ELSE 1 END";

const REQUEST_LISTING_SELECT: &str = "SELECT r.*, \
     u.id AS owner_id, u.name AS owner_name, u.avatar AS owner_avatar, \
     u.is_verified AS owner_is_verified, \
     (SELECT COUNT(*) FROM donations d WHERE d.request_id = r.id) AS donation_count \
     FROM charity_requests r LEFT JOIN users u ON u.id = r.user_id";

const PROJECT_LISTING_SELECT: &str = "SELECT p.*, \
     u.id AS owner_id, u.name AS owner_name, u.avatar AS owner_avatar, \
     u.is_verified AS owner_is_verified, \
     (SELECT COUNT(*) FROM donations d WHERE d.project_id = p.id) AS donation_count \
     FROM halal_projects p LEFT JOIN users u ON u.id = p.creator_id";

/// Charity store over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect, creating the database file if missing, and initialize the
    /// schema.
    ///
    /// In-memory databases live as long as their connection, so they are
    /// held on a single connection that never expires.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        tracing::info!(url = %url, "Connecting to database");

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };
        let pool = pool_options.connect_with(options).await?;

        schema::initialize_schema(&pool).await?;
        tracing::info!("Database initialized successfully");

        Ok(Self { pool })
    }

    /// Wrap an existing pool whose schema is already initialized.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_user_by_wallet(&self, wallet: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE wallet_address = ?")
            .bind(wallet)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn fetch_request(&self, id: &str) -> StoreResult<Option<CharityRequest>> {
        let row = sqlx::query("SELECT * FROM charity_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(request_from_row).transpose()
    }

    async fn fetch_donation(&self, id: &str) -> StoreResult<Option<Donation>> {
        let row = sqlx::query("SELECT * FROM donations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(donation_from_row).transpose()
    }

    async fn user_exists(&self, id: &str) -> StoreResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl CharityStore for SqliteStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Sqlite
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ==================== USERS ====================

    async fn find_user_by_wallet(&self, wallet: &str) -> StoreResult<Option<UserProfile>> {
        let Some(user) = self.fetch_user_by_wallet(wallet).await? else {
            return Ok(None);
        };

        let (charity_requests, halal_projects, donations): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM charity_requests WHERE user_id = ?1),
                (SELECT COUNT(*) FROM halal_projects WHERE creator_id = ?1),
                (SELECT COUNT(*) FROM donations WHERE donor_id = ?1)
            "#,
        )
        .bind(&user.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(UserProfile {
            user,
            counts: UserCounts {
                charity_requests,
                halal_projects,
                donations,
            },
        }))
    }

    async fn list_users(&self, limit: u32) -> StoreResult<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at DESC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn upsert_user(&self, user: &UserUpsert) -> StoreResult<User> {
        let now = timestamp(Utc::now());
        let profile = &user.profile;

        let existing = self.fetch_user_by_wallet(&user.wallet_address).await?;
        if existing.is_some() {
            sqlx::query(
                r#"
                UPDATE users SET
                    email = COALESCE(?, email),
                    name = COALESCE(?, name),
                    avatar = COALESCE(?, avatar),
                    bio = COALESCE(?, bio),
                    location = COALESCE(?, location),
                    last_login_at = ?,
                    updated_at = ?
                WHERE wallet_address = ?
                "#,
            )
            .bind(&profile.email)
            .bind(&profile.name)
            .bind(&profile.avatar)
            .bind(&profile.bio)
            .bind(&profile.location)
            .bind(&now)
            .bind(&now)
            .bind(&user.wallet_address)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO users (
                    id, wallet_address, email, name, avatar, bio, location,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&user.wallet_address)
            .bind(&profile.email)
            .bind(&profile.name)
            .bind(&profile.avatar)
            .bind(&profile.bio)
            .bind(&profile.location)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await?;
            tracing::info!(wallet = %user.wallet_address, "User created");
        }

        self.fetch_user_by_wallet(&user.wallet_address)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity: "User",
                id: user.wallet_address.clone(),
            })
    }

    async fn update_user(&self, wallet: &str, patch: &UserPatch) -> StoreResult<Option<User>> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = COALESCE(?, email),
                name = COALESCE(?, name),
                avatar = COALESCE(?, avatar),
                bio = COALESCE(?, bio),
                location = COALESCE(?, location),
                updated_at = ?
            WHERE wallet_address = ?
            "#,
        )
        .bind(&patch.email)
        .bind(&patch.name)
        .bind(&patch.avatar)
        .bind(&patch.bio)
        .bind(&patch.location)
        .bind(timestamp(Utc::now()))
        .bind(wallet)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_user_by_wallet(wallet).await
    }

    // ==================== CHARITY REQUESTS ====================

    async fn list_requests(
        &self,
        filter: &RequestFilter,
        page: Page,
    ) -> StoreResult<Vec<CharityRequestListing>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(REQUEST_LISTING_SELECT);
        push_request_filter(&mut query, filter);
        query.push(format!(" ORDER BY {URGENCY_RANK_SQL} DESC, r.created_at DESC"));
        query.push(" LIMIT ").push_bind(page.limit as i64);
        query.push(" OFFSET ").push_bind(page.offset() as i64);

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(request_listing_from_row).collect()
    }

    async fn count_requests(&self, filter: &RequestFilter) -> StoreResult<u64> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM charity_requests r");
        push_request_filter(&mut query, filter);

        let (count,): (i64,) = query.build_query_as().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn create_request(&self, request: &NewCharityRequest) -> StoreResult<CharityRequestListing> {
        if !self.user_exists(&request.user_id).await? {
            return Err(StoreError::NotFound {
                entity: "User",
                id: request.user_id.clone(),
            });
        }

        let id = Uuid::new_v4().to_string();
        let now = timestamp(Utc::now());
        sqlx::query(
            r#"
            INSERT INTO charity_requests (
                id, user_id, title, description, long_description, category,
                target_amount, urgency, status, deadline,
                beneficiary_name, beneficiary_location, beneficiary_phone, beneficiary_email,
                personal_story, public_description, expected_impact, additional_notes,
                is_public, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&request.user_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.long_description)
        .bind(request.category.as_str())
        .bind(request.target_amount)
        .bind(request.urgency.as_str())
        .bind(RequestStatus::Pending.as_str())
        .bind(timestamp(request.deadline))
        .bind(&request.beneficiary_name)
        .bind(&request.beneficiary_location)
        .bind(&request.beneficiary_phone)
        .bind(&request.beneficiary_email)
        .bind(&request.personal_story)
        .bind(&request.public_description)
        .bind(&request.expected_impact)
        .bind(&request.additional_notes)
        .bind(request.is_public)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!(request_id = %id, user_id = %request.user_id, "Charity request created");

        self.find_request(&id).await?.ok_or(StoreError::NotFound {
            entity: "CharityRequest",
            id,
        })
    }

    async fn find_request(&self, id: &str) -> StoreResult<Option<CharityRequestListing>> {
        let row = sqlx::query(&format!("{REQUEST_LISTING_SELECT} WHERE r.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(request_listing_from_row).transpose()
    }

    async fn review_request(&self, id: &str, review: &RequestReview) -> StoreResult<Option<CharityRequest>> {
        let now = timestamp(Utc::now());
        let result = sqlx::query(
            r#"
            UPDATE charity_requests SET
                status = ?,
                reviewed_by = ?,
                reviewed_at = ?,
                rejection_reason = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(review.decision.status().as_str())
        .bind(&review.reviewer)
        .bind(&now)
        .bind(&review.reason)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        tracing::info!(
            request_id = %id,
            status = %review.decision.status(),
            reviewer = %review.reviewer,
            "Charity request reviewed"
        );
        self.fetch_request(id).await
    }

    // ==================== HALAL PROJECTS ====================

    async fn list_projects(
        &self,
        filter: &ProjectFilter,
        page: Page,
    ) -> StoreResult<Vec<HalalProjectListing>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(PROJECT_LISTING_SELECT);
        push_project_filter(&mut query, filter);
        query.push(" ORDER BY p.created_at DESC");
        query.push(" LIMIT ").push_bind(page.limit as i64);
        query.push(" OFFSET ").push_bind(page.offset() as i64);

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(project_listing_from_row).collect()
    }

    async fn count_projects(&self, filter: &ProjectFilter) -> StoreResult<u64> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM halal_projects p");
        push_project_filter(&mut query, filter);

        let (count,): (i64,) = query.build_query_as().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn create_project(&self, project: &NewHalalProject) -> StoreResult<HalalProjectListing> {
        if !self.user_exists(&project.creator_id).await? {
            return Err(StoreError::NotFound {
                entity: "User",
                id: project.creator_id.clone(),
            });
        }

        let id = Uuid::new_v4().to_string();
        let now = timestamp(Utc::now());
        sqlx::query(
            r#"
            INSERT INTO halal_projects (
                id, creator_id, title, description, long_description, category,
                total_funding, status, total_stages, current_stage, location,
                halal_certified, deadline, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&project.creator_id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.long_description)
        .bind(project.category.as_str())
        .bind(project.total_funding)
        .bind(ProjectStatus::Pending.as_str())
        .bind(project.total_stages.max(1))
        .bind(&project.location)
        .bind(project.halal_certified)
        .bind(project.deadline.map(timestamp))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!(project_id = %id, creator_id = %project.creator_id, "Halal project created");

        self.find_project(&id).await?.ok_or(StoreError::NotFound {
            entity: "HalalProject",
            id,
        })
    }

    async fn find_project(&self, id: &str) -> StoreResult<Option<HalalProjectListing>> {
        let row = sqlx::query(&format!("{PROJECT_LISTING_SELECT} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(project_listing_from_row).transpose()
    }

    // ==================== DONATIONS ====================

    async fn record_donation(&self, donation: &NewDonation) -> StoreResult<Donation> {
        let target = donation.target().ok_or_else(|| {
            StoreError::InvalidInput("exactly one of requestId or projectId is required".to_string())
        })?;
        if !donation.amount.is_finite() || donation.amount <= 0.0 {
            return Err(StoreError::InvalidInput(format!(
                "donation amount must be positive, got {}",
                donation.amount
            )));
        }

        let id = Uuid::new_v4().to_string();
        let status = donation.status.unwrap_or(DonationStatus::Pending);
        let mut tx = self.pool.begin().await?;

        // A donation recorded as already void still has to name a real
        // target and donor, it just credits nothing.
        let (amount, tokens) = if status.counts() {
            (donation.amount, donation.charity_token_amount)
        } else {
            (0.0, 0.0)
        };

        let credited = match target {
            DonationTarget::Request(request_id) => {
                sqlx::query(
                    "UPDATE charity_requests SET received_amount = received_amount + ?, updated_at = ? WHERE id = ?",
                )
                .bind(amount)
                .bind(timestamp(Utc::now()))
                .bind(request_id)
                .execute(&mut *tx)
                .await?
            }
            DonationTarget::Project(project_id) => {
                sqlx::query(
                    "UPDATE halal_projects SET raised_amount = raised_amount + ?, updated_at = ? WHERE id = ?",
                )
                .bind(amount)
                .bind(timestamp(Utc::now()))
                .bind(project_id)
                .execute(&mut *tx)
                .await?
            }
        };
        if credited.rows_affected() == 0 {
            let (entity, id) = match target {
                DonationTarget::Request(id) => ("CharityRequest", id),
                DonationTarget::Project(id) => ("HalalProject", id),
            };
            return Err(StoreError::NotFound {
                entity,
                id: id.to_string(),
            });
        }

        let donor = sqlx::query(
            "UPDATE users SET total_donated = total_donated + ?, charity_tokens = charity_tokens + ?, updated_at = ? WHERE id = ?",
        )
        .bind(amount)
        .bind(tokens)
        .bind(timestamp(Utc::now()))
        .bind(&donation.donor_id)
        .execute(&mut *tx)
        .await?;
        if donor.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "User",
                id: donation.donor_id.clone(),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO donations (
                id, donor_id, request_id, project_id, amount, charity_token_amount,
                transaction_signature, status, message, is_anonymous, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&donation.donor_id)
        .bind(&donation.request_id)
        .bind(&donation.project_id)
        .bind(donation.amount)
        .bind(donation.charity_token_amount)
        .bind(&donation.transaction_signature)
        .bind(status.as_str())
        .bind(&donation.message)
        .bind(donation.is_anonymous)
        .bind(timestamp(Utc::now()))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        metrics::record_donation(target.kind());
        tracing::info!(
            donation_id = %id,
            donor_id = %donation.donor_id,
            target = target.kind(),
            amount = donation.amount,
            "Donation recorded"
        );

        self.fetch_donation(&id).await?.ok_or(StoreError::NotFound {
            entity: "Donation",
            id,
        })
    }

    async fn list_donations(&self, filter: &DonationFilter, limit: u32) -> StoreResult<Vec<Donation>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM donations WHERE 1 = 1");
        if let Some(donor_id) = &filter.donor_id {
            query.push(" AND donor_id = ").push_bind(donor_id.clone());
        }
        if let Some(request_id) = &filter.request_id {
            query.push(" AND request_id = ").push_bind(request_id.clone());
        }
        if let Some(project_id) = &filter.project_id {
            query.push(" AND project_id = ").push_bind(project_id.clone());
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY created_at DESC LIMIT ").push_bind(limit as i64);

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(donation_from_row).collect()
    }

    async fn update_donation_status(
        &self,
        id: &str,
        status: DonationStatus,
        signature: Option<&str>,
    ) -> StoreResult<Option<Donation>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query(
            "SELECT status, donor_id, request_id, project_id, amount, charity_token_amount \
             FROM donations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = current else {
            return Ok(None);
        };
        let previous: DonationStatus = get_enum(&row, "status")?;
        let donor_id: String = row.try_get("donor_id")?;
        let request_id: Option<String> = row.try_get("request_id")?;
        let project_id: Option<String> = row.try_get("project_id")?;
        let amount: f64 = row.try_get("amount")?;
        let tokens: f64 = row.try_get("charity_token_amount")?;

        // Moving between counted and void statuses moves the credits with it.
        let sign = match (previous.counts(), status.counts()) {
            (true, false) => Some(-1.0),
            (false, true) => Some(1.0),
            _ => None,
        };
        if let Some(sign) = sign {
            let now = timestamp(Utc::now());
            if let Some(request_id) = &request_id {
                sqlx::query(
                    "UPDATE charity_requests SET received_amount = MAX(received_amount + ?, 0), updated_at = ? WHERE id = ?",
                )
                .bind(sign * amount)
                .bind(&now)
                .bind(request_id)
                .execute(&mut *tx)
                .await?;
            }
            if let Some(project_id) = &project_id {
                sqlx::query(
                    "UPDATE halal_projects SET raised_amount = MAX(raised_amount + ?, 0), updated_at = ? WHERE id = ?",
                )
                .bind(sign * amount)
                .bind(&now)
                .bind(project_id)
                .execute(&mut *tx)
                .await?;
            }
            sqlx::query(
                "UPDATE users SET total_donated = MAX(total_donated + ?, 0), \
                 charity_tokens = MAX(charity_tokens + ?, 0), updated_at = ? WHERE id = ?",
            )
            .bind(sign * amount)
            .bind(sign * tokens)
            .bind(&now)
            .bind(&donor_id)
            .execute(&mut *tx)
            .await?;
            tracing::info!(
                donation_id = %id,
                from = previous.as_str(),
                to = status.as_str(),
                amount,
                "Donation credits moved with status change"
            );
        }

        sqlx::query(
            "UPDATE donations SET status = ?, transaction_signature = COALESCE(?, transaction_signature) WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(signature)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.fetch_donation(id).await
    }

    // ==================== NOTIFICATIONS ====================

    async fn create_notification(&self, notification: &NewNotification) -> StoreResult<Notification> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        sqlx::query(
            "INSERT INTO notifications (id, user_id, kind, title, message, read, created_at) VALUES (?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(&id)
        .bind(&notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(timestamp(created_at))
        .execute(&self.pool)
        .await?;

        Ok(Notification {
            id,
            user_id: notification.user_id.clone(),
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            read: false,
            created_at: parse_timestamp_column(&timestamp(created_at))?,
        })
    }

    async fn list_notifications(&self, user_id: &str, unread_only: bool) -> StoreResult<Vec<Notification>> {
        let sql = if unread_only {
            "SELECT * FROM notifications WHERE user_id = ? AND read = 0 ORDER BY created_at DESC"
        } else {
            "SELECT * FROM notifications WHERE user_id = ? ORDER BY created_at DESC"
        };
        let rows = sqlx::query(sql).bind(user_id).fetch_all(&self.pool).await?;
        rows.iter().map(notification_from_row).collect()
    }

    async fn mark_notification_read(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== STATS ====================

    async fn platform_stats(&self) -> StoreResult<PlatformStats> {
        let (total_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let (total_donations, total_donation_count): (f64, i64) = sqlx::query_as(
            "SELECT CAST(COALESCE(SUM(amount), 0) AS REAL), COUNT(*) FROM donations \
             WHERE status NOT IN ('FAILED', 'CANCELLED')",
        )
        .fetch_one(&self.pool)
        .await?;

        let (total_requests, completed_requests): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status IN ('FUNDED', 'COMPLETED') THEN 1 ELSE 0 END), 0) \
             FROM charity_requests",
        )
        .fetch_one(&self.pool)
        .await?;

        let (active_projects,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM halal_projects WHERE status = 'ACTIVE'")
                .fetch_one(&self.pool)
                .await?;

        let category_rows: Vec<(String, i64, f64)> = sqlx::query_as(
            "SELECT category, COUNT(*), CAST(COALESCE(SUM(received_amount), 0) AS REAL) \
             FROM charity_requests GROUP BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        let categories: BTreeMap<String, CategoryStats> = category_rows
            .into_iter()
            .map(|(category, count, amount)| (category, CategoryStats { count, amount }))
            .collect();

        let recent_activity = self.list_donations(&DonationFilter::default(), 5).await?;

        Ok(PlatformStats {
            total_users,
            total_donations,
            total_donation_count,
            total_requests,
            active_projects,
            completed_requests,
            average_donation: PlatformStats::average(total_donations, total_donation_count),
            categories,
            recent_activity,
        })
    }
}

fn push_request_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &RequestFilter) {
    query.push(" WHERE 1 = 1");
    if !filter.include_private {
        query.push(" AND r.is_public = 1");
    }
    if let Some(category) = filter.category {
        query.push(" AND r.category = ").push_bind(category.as_str());
    }
    if let Some(status) = filter.status {
        query.push(" AND r.status = ").push_bind(status.as_str());
    }
    if let Some(urgency) = filter.urgency {
        query.push(" AND r.urgency = ").push_bind(urgency.as_str());
    }
    if let Some(user_id) = &filter.user_id {
        query.push(" AND r.user_id = ").push_bind(user_id.clone());
    }
}

fn push_project_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &ProjectFilter) {
    query.push(" WHERE 1 = 1");
    if let Some(category) = filter.category {
        query.push(" AND p.category = ").push_bind(category.as_str());
    }
    if let Some(status) = filter.status {
        query.push(" AND p.status = ").push_bind(status.as_str());
    }
    if let Some(creator_id) = &filter.creator_id {
        query.push(" AND p.creator_id = ").push_bind(creator_id.clone());
    }
}

// ==================== ROW MAPPING ====================

/// Fixed-width RFC 3339 so text order is time order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp_column(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidData(format!("timestamp '{raw}': {e}")))
}

fn get_timestamp(row: &SqliteRow, column: &str) -> StoreResult<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    parse_timestamp_column(&raw)
}

fn get_optional_timestamp(row: &SqliteRow, column: &str) -> StoreResult<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.try_get(column)?;
    raw.as_deref().map(parse_timestamp_column).transpose()
}

fn get_enum<T: FromStr>(row: &SqliteRow, column: &str) -> StoreResult<T>
where
    T::Err: std::fmt::Display,
{
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|e: T::Err| StoreError::InvalidData(format!("{column}: {e}")))
}

fn user_from_row(row: &SqliteRow) -> StoreResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        wallet_address: row.try_get("wallet_address")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        avatar: row.try_get("avatar")?,
        bio: row.try_get("bio")?,
        location: row.try_get("location")?,
        is_verified: row.try_get("is_verified")?,
        role: get_enum(row, "role")?,
        total_donated: row.try_get("total_donated")?,
        total_requests: row.try_get("total_requests")?,
        reputation: row.try_get("reputation")?,
        charity_tokens: row.try_get("charity_tokens")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
        last_login_at: get_optional_timestamp(row, "last_login_at")?,
    })
}

fn request_from_row(row: &SqliteRow) -> StoreResult<CharityRequest> {
    Ok(CharityRequest {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        long_description: row.try_get("long_description")?,
        category: get_enum(row, "category")?,
        target_amount: row.try_get("target_amount")?,
        received_amount: row.try_get("received_amount")?,
        urgency: get_enum(row, "urgency")?,
        status: get_enum(row, "status")?,
        deadline: get_timestamp(row, "deadline")?,
        beneficiary_name: row.try_get("beneficiary_name")?,
        beneficiary_location: row.try_get("beneficiary_location")?,
        beneficiary_phone: row.try_get("beneficiary_phone")?,
        beneficiary_email: row.try_get("beneficiary_email")?,
        personal_story: row.try_get("personal_story")?,
        public_description: row.try_get("public_description")?,
        expected_impact: row.try_get("expected_impact")?,
        additional_notes: row.try_get("additional_notes")?,
        is_public: row.try_get("is_public")?,
        reviewed_by: row.try_get("reviewed_by")?,
        reviewed_at: get_optional_timestamp(row, "reviewed_at")?,
        rejection_reason: row.try_get("rejection_reason")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

/// Owner columns from a LEFT JOIN, `None` when the owner row is missing.
fn owner_summary_from_row(row: &SqliteRow) -> StoreResult<Option<UserSummary>> {
    let owner_id: Option<String> = row.try_get("owner_id")?;
    let Some(id) = owner_id else {
        return Ok(None);
    };
    Ok(Some(UserSummary {
        id,
        name: row.try_get("owner_name")?,
        avatar: row.try_get("owner_avatar")?,
        is_verified: row.try_get::<Option<bool>, _>("owner_is_verified")?.unwrap_or(false),
    }))
}

fn request_listing_from_row(row: &SqliteRow) -> StoreResult<CharityRequestListing> {
    Ok(CharityRequestListing {
        request: request_from_row(row)?,
        user: owner_summary_from_row(row)?,
        counts: DonationCount {
            donations: row.try_get("donation_count")?,
        },
    })
}

fn project_from_row(row: &SqliteRow) -> StoreResult<HalalProject> {
    Ok(HalalProject {
        id: row.try_get("id")?,
        creator_id: row.try_get("creator_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        long_description: row.try_get("long_description")?,
        category: get_enum(row, "category")?,
        total_funding: row.try_get("total_funding")?,
        raised_amount: row.try_get("raised_amount")?,
        status: get_enum(row, "status")?,
        total_stages: row.try_get("total_stages")?,
        current_stage: row.try_get("current_stage")?,
        location: row.try_get("location")?,
        halal_certified: row.try_get("halal_certified")?,
        deadline: get_optional_timestamp(row, "deadline")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

fn project_listing_from_row(row: &SqliteRow) -> StoreResult<HalalProjectListing> {
    Ok(HalalProjectListing {
        project: project_from_row(row)?,
        creator: owner_summary_from_row(row)?,
        counts: DonationCount {
            donations: row.try_get("donation_count")?,
        },
    })
}

fn donation_from_row(row: &SqliteRow) -> StoreResult<Donation> {
    Ok(Donation {
        id: row.try_get("id")?,
        donor_id: row.try_get("donor_id")?,
        request_id: row.try_get("request_id")?,
        project_id: row.try_get("project_id")?,
        amount: row.try_get("amount")?,
        charity_token_amount: row.try_get("charity_token_amount")?,
        transaction_signature: row.try_get("transaction_signature")?,
        status: get_enum(row, "status")?,
        message: row.try_get("message")?,
        is_anonymous: row.try_get("is_anonymous")?,
        created_at: get_timestamp(row, "created_at")?,
    })
}

fn notification_from_row(row: &SqliteRow) -> StoreResult<Notification> {
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: get_enum(row, "kind")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        read: row.try_get("read")?,
        created_at: get_timestamp(row, "created_at")?,
    })
}
