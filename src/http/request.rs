//! Request-side helpers: request IDs, JSON bodies and query values.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body and query parsing failures become `{ "error": ... }` 400s, the
//!   same shape as every other API error

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::http::error::ApiError;
use crate::models::UnknownVariant;

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID of an incoming request, if one was assigned.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(&X_REQUEST_ID).and_then(|v| v.to_str().ok())
}

/// JSON body extractor whose rejection is an [`ApiError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "Rejected JSON body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge;
    }
    ApiError::bad_request(format!("Invalid JSON body: {}", rejection.body_text()))
}

/// Lenient page/limit parsing: missing or unparsable values fall back to
/// the default.
pub fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}

/// Optional enumeration filter from a query string. Empty means unset.
pub fn parse_filter<T>(raw: Option<&str>, field: &str) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr<Err = UnknownVariant>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("Invalid {field}: {value}"))),
    }
}

/// A required text field: absent, null and blank strings all count as
/// missing.
pub fn required_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Amount sent either as a JSON number or a numeric string.
///
/// Anything else, including `""`, reads as no amount so the handler
/// reports the field as missing instead of failing the whole body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexibleAmount(pub Option<f64>);

impl<'de> Deserialize<'de> for FlexibleAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(FlexibleAmount(amount))
    }
}

impl FlexibleAmount {
    /// Zero counts as missing, like an empty form field.
    pub fn positive(amount: Option<FlexibleAmount>) -> Option<f64> {
        amount
            .and_then(|a| a.0)
            .filter(|a| a.is_finite() && *a > 0.0)
    }
}
