//! `/api/stats`: platform aggregates.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::response::Envelope;
use crate::http::server::AppState;

pub const STATS_MESSAGE: &str = "Islamic Charity Platform Statistics - Barak Allahu feeki";

/// Failures keep the `success` envelope rather than the plain error shape.
pub async fn get_stats(State(state): State<AppState>) -> Response {
    match state.store.platform_stats().await {
        Ok(stats) => Json(Envelope::new(stats, STATS_MESSAGE)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching statistics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Internal server error",
                    "message": "Failed to fetch statistics",
                })),
            )
                .into_response()
        }
    }
}
