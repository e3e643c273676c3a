//! `/api/notifications`

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::error::{ApiError, ApiResult};
use crate::http::request::required_text;
use crate::http::server::AppState;
use crate::models::Notification;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub user_id: Option<String>,
    #[serde(default)]
    pub unread: bool,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    let user_id = required_text(&query.user_id)
        .ok_or_else(|| ApiError::bad_request("userId is required"))?;
    let notifications = state.store.list_notifications(user_id, query.unread).await?;
    Ok(Json(notifications))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !state.store.mark_notification_read(&id).await? {
        return Err(ApiError::not_found("Notification not found"));
    }
    Ok(Json(json!({ "success": true })))
}
