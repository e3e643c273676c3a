//! Connectivity checks: `/api/test` and `/health`.

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::response::timestamp;
use crate::http::server::AppState;

pub const API_ENDPOINTS: &[&str] = &[
    "/api/test",
    "/api/users",
    "/api/requests",
    "/api/projects",
    "/api/donations",
    "/api/stats",
    "/api/wallet",
    "/api/zakat",
];

pub async fn test_get() -> Json<Value> {
    Json(json!({
        "message": "Islamic Charity Platform API is running",
        "timestamp": timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": API_ENDPOINTS,
    }))
}

/// Echo a JSON body back. The body is parsed by hand so malformed JSON
/// still gets the timestamped error shape.
pub async fn test_post(body: Bytes) -> impl IntoResponse {
    match serde_json::from_slice::<Value>(&body) {
        Ok(received) => (
            StatusCode::OK,
            Json(json!({
                "message": "Data received successfully",
                "received": received,
                "timestamp": timestamp(),
            })),
        ),
        Err(e) => {
            tracing::debug!(error = %e, "Malformed JSON on /api/test");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Failed to parse JSON",
                    "timestamp": timestamp(),
                })),
            )
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    pub store_healthy: bool,
    pub chain_healthy: bool,
    pub network: &'static str,
    pub timestamp: String,
}

/// Liveness plus dependency health. Always 200 while the process serves;
/// `status` is `degraded` when a dependency is down.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let (store_result, chain_healthy) = tokio::join!(state.store.ping(), state.solana.is_healthy());
    let store_healthy = match store_result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };

    Json(HealthReport {
        status: if store_healthy && chain_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.kind().as_str(),
        store_healthy,
        chain_healthy,
        network: state.solana.cluster().as_str(),
        timestamp: timestamp(),
    })
}
