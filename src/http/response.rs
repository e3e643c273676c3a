//! Response-side helpers shared by the handlers.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::models::Pagination;

/// Current time as an RFC 3339 string with milliseconds.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `{ success: true, data, timestamp, message }` envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub timestamp: String,
    pub message: &'static str,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T, message: &'static str) -> Self {
        Self {
            success: true,
            data,
            timestamp: timestamp(),
            message,
        }
    }
}

/// One page of charity requests.
#[derive(Debug, Serialize)]
pub struct RequestPage<T: Serialize> {
    pub requests: Vec<T>,
    pub pagination: Pagination,
}

/// One page of halal projects.
#[derive(Debug, Serialize)]
pub struct ProjectPage<T: Serialize> {
    pub projects: Vec<T>,
    pub pagination: Pagination,
}
