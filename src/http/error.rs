//! API error type and its JSON rendering.
//!
//! Every failure leaves the API as `{ "error": "<message>" }`. Store and
//! chain failures are logged here with their full detail; clients only
//! see a message that is safe to show.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::database::StoreError;
use crate::solana::SolanaError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Solana(#[from] SolanaError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Status code and client-facing message.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            ApiError::ServiceUnavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, message.clone())
            }
            ApiError::Store(StoreError::NotFound { entity, .. }) => {
                (StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            ApiError::Store(StoreError::InvalidInput(message)) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            ApiError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Solana(e) => match e {
                SolanaError::InvalidPublicKey(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid wallet address".to_string())
                }
                SolanaError::Wallet(_) | SolanaError::Decode(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                SolanaError::Custom(message) => (StatusCode::BAD_REQUEST, message.clone()),
                SolanaError::NotAvailable(message) => {
                    (StatusCode::SERVICE_UNAVAILABLE, message.clone())
                }
                SolanaError::Rpc(_)
                | SolanaError::RpcResponse { .. }
                | SolanaError::Timeout(_)
                | SolanaError::ConfirmationTimeout(_) => (StatusCode::BAD_GATEWAY, e.user_message()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            ApiError::Store(e) if status.is_server_error() => {
                tracing::error!(error = %e, "Store operation failed");
            }
            ApiError::Solana(e) if status.is_server_error() => {
                tracing::error!(error = %e, code = e.code(), "Chain operation failed");
            }
            _ => tracing::debug!(status = %status, error = %message, "Request rejected"),
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_hide_details() {
        let err = ApiError::from(StoreError::InvalidData("bad timestamp".to_string()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");

        let err = ApiError::from(StoreError::NotFound {
            entity: "User",
            id: "u1".to_string(),
        });
        assert_eq!(
            err.status_and_message(),
            (StatusCode::NOT_FOUND, "User not found".to_string())
        );
    }

    #[test]
    fn test_chain_errors_use_lookup_table() {
        let err = ApiError::from(SolanaError::RpcResponse {
            code: -32002,
            message: "Transaction simulation failed: insufficient funds for rent".to_string(),
        });
        assert_eq!(
            err.status_and_message(),
            (StatusCode::BAD_GATEWAY, "Insufficient funds for transaction".to_string())
        );

        let err = ApiError::from(SolanaError::InvalidPublicKey("xyz".to_string()));
        assert_eq!(err.status_and_message().0, StatusCode::BAD_REQUEST);

        let err = ApiError::from(SolanaError::NotAvailable("Airdrop".to_string()));
        assert_eq!(err.status_and_message().0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::bad_request("Missing required fields").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
