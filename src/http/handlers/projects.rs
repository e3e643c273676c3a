//! `/api/projects`: halal investment projects.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::http::error::{ApiError, ApiResult};
use crate::http::request::{parse_filter, parse_or, required_text, ApiJson, FlexibleAmount};
use crate::http::response::ProjectPage;
use crate::http::server::AppState;
use crate::models::{
    parse_timestamp, HalalProjectListing, NewHalalProject, Page, Pagination, ProjectCategory,
    ProjectFilter,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub creator_id: Option<String>,
}

/// Projects, newest first.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ProjectPage<HalalProjectListing>>> {
    let page = Page::new(
        parse_or(query.page.as_deref(), 1),
        parse_or(query.limit.as_deref(), Page::default().limit),
    );
    let filter = ProjectFilter {
        category: parse_filter(query.category.as_deref(), "category")?,
        status: parse_filter(query.status.as_deref(), "status")?,
        creator_id: required_text(&query.creator_id).map(str::to_string),
    };

    let (projects, total) = tokio::try_join!(
        state.store.list_projects(&filter, page),
        state.store.count_projects(&filter),
    )?;

    Ok(Json(ProjectPage {
        projects,
        pagination: Pagination::new(page, total),
    }))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HalalProjectListing>> {
    let project = state
        .store
        .find_project(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Halal project not found"))?;
    Ok(Json(project))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub category: Option<String>,
    pub total_funding: Option<FlexibleAmount>,
    pub total_stages: Option<i64>,
    pub location: Option<String>,
    pub halal_certified: Option<bool>,
    pub deadline: Option<String>,
    pub creator_id: Option<String>,
}

impl CreateProjectBody {
    pub fn into_new_project(self) -> ApiResult<NewHalalProject> {
        let (Some(title), Some(description), Some(category), Some(total_funding), Some(creator_id)) = (
            required_text(&self.title),
            required_text(&self.description),
            required_text(&self.category),
            FlexibleAmount::positive(self.total_funding),
            required_text(&self.creator_id),
        ) else {
            return Err(ApiError::bad_request("Missing required fields"));
        };

        let category: ProjectCategory = category
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid category: {category}")))?;
        let deadline = match required_text(&self.deadline) {
            Some(raw) => Some(
                parse_timestamp(raw)
                    .ok_or_else(|| ApiError::bad_request(format!("Invalid deadline: {raw}")))?,
            ),
            None => None,
        };
        let total_stages = self.total_stages.unwrap_or(1);
        if total_stages < 1 {
            return Err(ApiError::bad_request("totalStages must be at least 1"));
        }

        Ok(NewHalalProject {
            creator_id: creator_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            long_description: self.long_description,
            category,
            total_funding,
            total_stages,
            location: self.location,
            halal_certified: self.halal_certified.unwrap_or(false),
            deadline,
        })
    }
}

pub async fn create_project(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateProjectBody>,
) -> ApiResult<(StatusCode, Json<HalalProjectListing>)> {
    let new_project = body.into_new_project()?;
    let created = state.store.create_project(&new_project).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let body: CreateProjectBody = serde_json::from_value(serde_json::json!({
            "title": "Community well",
            "description": "Clean water",
            "category": "water",
            "totalFunding": 12000,
            "creatorId": "u1"
        }))
        .unwrap();
        let project = body.into_new_project().unwrap();
        assert_eq!(project.total_stages, 1);
        assert!(!project.halal_certified);
        assert!(project.deadline.is_none());
        assert_eq!(project.category, ProjectCategory::Water);
    }

    #[test]
    fn test_zero_stages_rejected() {
        let body = CreateProjectBody {
            title: Some("t".to_string()),
            description: Some("d".to_string()),
            category: Some("school".to_string()),
            total_funding: Some(FlexibleAmount(Some(10.0))),
            total_stages: Some(0),
            creator_id: Some("u1".to_string()),
            ..CreateProjectBody::default()
        };
        assert!(body.into_new_project().is_err());
    }
}
