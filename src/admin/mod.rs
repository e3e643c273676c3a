//! Moderation API.
//!
//! # Data Flow
//! ```text
//! /admin/* request
//!     → auth.rs (bearer token against admin.api_key)
//!     → handlers.rs (review requests, distribute zakat)
//!     → store / chain client
//! ```

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

/// Admin routes, all behind the bearer-token check.
pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/requests", get(list_requests))
        .route("/admin/requests/{id}/approve", post(approve_request))
        .route("/admin/requests/{id}/reject", post(reject_request))
        .route("/admin/zakat/distribute", post(distribute_zakat))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
