//! Project API endpoints.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::HeaderMap,
};
use serde::Serialize;

use super::{created, parse_body, parse_id, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Project, ProjectInput};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub project: Project,
}

impl ProjectResponse {
    fn new(project: Project) -> Self {
        Self {
            success: true,
            project,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectDeleted {
    pub success: bool,
    pub message: String,
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".to_string())
}

/// GET /api/projects - List all projects (public).
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    let Ok(repo) = state.repo() else {
        return success(Vec::new());
    };

    success(repo.list_projects().await?)
}

/// GET /api/projects/:id - Get a single project (public).
pub async fn get_project(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<ProjectResponse> {
    let repo = state.repo()?;
    let id = parse_id(id, "Project")?;

    match repo.get_project(id).await? {
        Some(project) => success(ProjectResponse::new(project)),
        None => Err(project_not_found().into()),
    }
}

/// POST /api/projects - Create a new project.
pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<ProjectResponse> {
    let repo = state.repo()?;
    let admin = state.authorize(&headers)?;
    let input = ProjectInput::from_json(&parse_body(body)?)?;

    let project = repo
        .create_project(&input)
        .await
        .map_err(|e| state.admin_error(e))?;

    tracing::info!(
        project_id = project.id,
        cover = ?project.cover_image(),
        admin = %admin.email,
        "Created project"
    );
    created(ProjectResponse::new(project))
}

/// PUT /api/projects/:id - Replace a project.
pub async fn update_project(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<ProjectResponse> {
    let repo = state.repo()?;
    let admin = state.authorize(&headers)?;
    let id = parse_id(id, "Project")?;
    let input = ProjectInput::from_json(&parse_body(body)?)?;

    let project = repo
        .update_project(id, &input)
        .await
        .map_err(|e| state.admin_error(e))?
        .ok_or_else(project_not_found)?;

    tracing::info!(project_id = id, admin = %admin.email, "Updated project");
    success(ProjectResponse::new(project))
}

/// DELETE /api/projects/:id - Delete a project.
pub async fn delete_project(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult<ProjectDeleted> {
    let repo = state.repo()?;
    let admin = state.authorize(&headers)?;
    let id = parse_id(id, "Project")?;

    let deleted = repo
        .delete_project(id)
        .await
        .map_err(|e| state.admin_error(e))?;
    if !deleted {
        return Err(project_not_found().into());
    }

    tracing::info!(project_id = id, admin = %admin.email, "Deleted project");
    success(ProjectDeleted {
        success: true,
        message: "Project deleted".to_string(),
    })
}
