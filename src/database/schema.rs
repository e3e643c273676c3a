//! SQLite schema, created idempotently on connect.
//!
//! Timestamps are RFC 3339 text in UTC with microsecond precision, so
//! text ordering matches time ordering. Enumerations are stored by name.

use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Database schema version
pub const SCHEMA_VERSION: i32 = 1;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        wallet_address TEXT UNIQUE NOT NULL,
        email TEXT UNIQUE,
        name TEXT,
        avatar TEXT,
        bio TEXT,
        location TEXT,
        is_verified BOOLEAN NOT NULL DEFAULT 0,
        role TEXT NOT NULL DEFAULT 'USER',
        total_donated REAL NOT NULL DEFAULT 0,
        total_requests INTEGER NOT NULL DEFAULT 0,
        reputation INTEGER NOT NULL DEFAULT 0,
        charity_tokens REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        last_login_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS charity_requests (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        long_description TEXT,
        category TEXT NOT NULL,
        target_amount REAL NOT NULL,
        received_amount REAL NOT NULL DEFAULT 0,
        urgency TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'PENDING',
        deadline TEXT NOT NULL,
        beneficiary_name TEXT,
        beneficiary_location TEXT,
        beneficiary_phone TEXT,
        beneficiary_email TEXT,
        personal_story TEXT,
        public_description TEXT,
        expected_impact TEXT,
        additional_notes TEXT,
        is_public BOOLEAN NOT NULL DEFAULT 1,
        reviewed_by TEXT,
        reviewed_at TEXT,
        rejection_reason TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS halal_projects (
        id TEXT PRIMARY KEY,
        creator_id TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        long_description TEXT,
        category TEXT NOT NULL,
        total_funding REAL NOT NULL,
        raised_amount REAL NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'PENDING',
        total_stages INTEGER NOT NULL DEFAULT 1,
        current_stage INTEGER NOT NULL DEFAULT 1,
        location TEXT,
        halal_certified BOOLEAN NOT NULL DEFAULT 0,
        deadline TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (creator_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS donations (
        id TEXT PRIMARY KEY,
        donor_id TEXT NOT NULL,
        request_id TEXT,
        project_id TEXT,
        amount REAL NOT NULL,
        charity_token_amount REAL NOT NULL DEFAULT 0,
        transaction_signature TEXT UNIQUE,
        status TEXT NOT NULL DEFAULT 'PENDING',
        message TEXT,
        is_anonymous BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        FOREIGN KEY (donor_id) REFERENCES users(id),
        FOREIGN KEY (request_id) REFERENCES charity_requests(id),
        FOREIGN KEY (project_id) REFERENCES halal_projects(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        read BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS schema_meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_requests_listing ON charity_requests(is_public, urgency, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_requests_user ON charity_requests(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_requests_status ON charity_requests(status)",
    "CREATE INDEX IF NOT EXISTS idx_projects_creator ON halal_projects(creator_id)",
    "CREATE INDEX IF NOT EXISTS idx_projects_status ON halal_projects(status)",
    "CREATE INDEX IF NOT EXISTS idx_donations_donor ON donations(donor_id)",
    "CREATE INDEX IF NOT EXISTS idx_donations_request ON donations(request_id)",
    "CREATE INDEX IF NOT EXISTS idx_donations_project ON donations(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, read)",
];

/// Initialize database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    for statement in TABLES.iter().chain(INDEXES) {
        sqlx::query(statement).execute(pool).await?;
    }

    sqlx::query("INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('version', ?)")
        .bind(SCHEMA_VERSION.to_string())
        .execute(pool)
        .await?;

    tracing::debug!(version = SCHEMA_VERSION, "Database schema initialized");
    Ok(())
}

/// Get current schema version, `None` on a fresh database.
pub async fn get_schema_version(pool: &SqlitePool) -> Result<Option<i32>> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT value FROM schema_meta WHERE key = 'version'")
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(value,)| value.parse().ok()))
}
