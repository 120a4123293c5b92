//! Project handlers.

use super::{parse_body, parse_page};
use crate::auth::{authorize, MEMBER_ROLES};
use crate::errors::WsError;
use crate::models::{
    CreateProjectRequest, CreateWorkspaceRequest, ListParams, Project, UpdateProjectRequest,
    Workspace,
};
use crate::routes::AppState;
use crate::services::{project_service, workspace_service};
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common::types::ProjectId;
use common::RequestScope;
use std::sync::Arc;
use tracing::instrument;

/// `GET /v1/projects`
#[instrument(skip_all, name = "ws.handler.list_projects")]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Project>>, WsError> {
    authorize(&scope, MEMBER_ROLES)?;
    let page = parse_page(query)?;

    Ok(Json(project_service::list_projects(&state.pool, page).await?))
}

/// `POST /v1/projects`
#[instrument(skip_all, name = "ws.handler.create_project")]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    body: Bytes,
) -> Result<(StatusCode, Json<Project>), WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;
    let request: CreateProjectRequest = parse_body(&body)?;

    let project = project_service::create_project(&state.pool, claims, &request).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /v1/projects/:id`
#[instrument(skip_all, name = "ws.handler.get_project")]
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
) -> Result<Json<Project>, WsError> {
    authorize(&scope, MEMBER_ROLES)?;
    let id: ProjectId = id.parse()?;

    Ok(Json(project_service::get_project(&state.pool, id).await?))
}

/// `PATCH /v1/projects/:id`
#[instrument(skip_all, name = "ws.handler.update_project")]
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Project>, WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;
    let id: ProjectId = id.parse()?;
    let request: UpdateProjectRequest = parse_body(&body)?;

    Ok(Json(
        project_service::update_project(&state.pool, claims, id, &request).await?,
    ))
}

/// `DELETE /v1/projects/:id`
#[instrument(skip_all, name = "ws.handler.delete_project")]
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
) -> Result<StatusCode, WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;
    let id: ProjectId = id.parse()?;

    project_service::delete_project(&state.pool, claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /v1/projects/:id/workspaces`
#[instrument(skip_all, name = "ws.handler.list_workspaces")]
pub async fn list_project_workspaces(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Workspace>>, WsError> {
    authorize(&scope, MEMBER_ROLES)?;
    let id: ProjectId = id.parse()?;
    let page = parse_page(query)?;

    Ok(Json(
        workspace_service::list_workspaces(&state.pool, id, page).await?,
    ))
}

/// `POST /v1/projects/:id/workspaces`
#[instrument(skip_all, name = "ws.handler.create_workspace")]
pub async fn create_project_workspace(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Workspace>), WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;
    let id: ProjectId = id.parse()?;
    let request: CreateWorkspaceRequest = parse_body(&body)?;

    let workspace = workspace_service::create_workspace(&state.pool, claims, id, &request).await?;
    Ok((StatusCode::CREATED, Json(workspace)))
}
