//! Workspace handlers.

use super::{parse_body, parse_page};
use crate::auth::{authorize, MEMBER_ROLES};
use crate::errors::WsError;
use crate::models::{Asset, CreateAssetRequest, ListParams, UpdateWorkspaceRequest, Workspace};
use crate::routes::AppState;
use crate::services::{asset_service, workspace_service};
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common::types::WorkspaceId;
use common::RequestScope;
use std::sync::Arc;
use tracing::instrument;

/// `GET /v1/workspaces/:id`
#[instrument(skip_all, name = "ws.handler.get_workspace")]
pub async fn get_workspace(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
) -> Result<Json<Workspace>, WsError> {
    authorize(&scope, MEMBER_ROLES)?;
    let id: WorkspaceId = id.parse()?;

    Ok(Json(workspace_service::get_workspace(&state.pool, id).await?))
}

/// `PATCH /v1/workspaces/:id`
#[instrument(skip_all, name = "ws.handler.update_workspace")]
pub async fn update_workspace(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Workspace>, WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;
    let id: WorkspaceId = id.parse()?;
    let request: UpdateWorkspaceRequest = parse_body(&body)?;

    Ok(Json(
        workspace_service::update_workspace(&state.pool, claims, id, &request).await?,
    ))
}

/// `DELETE /v1/workspaces/:id`
#[instrument(skip_all, name = "ws.handler.delete_workspace")]
pub async fn delete_workspace(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
) -> Result<StatusCode, WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;
    let id: WorkspaceId = id.parse()?;

    workspace_service::delete_workspace(&state.pool, claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /v1/workspaces/:id/assets`
#[instrument(skip_all, name = "ws.handler.list_assets")]
pub async fn list_workspace_assets(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Asset>>, WsError> {
    authorize(&scope, MEMBER_ROLES)?;
    let id: WorkspaceId = id.parse()?;
    let page = parse_page(query)?;

    Ok(Json(asset_service::list_assets(&state.pool, id, page).await?))
}

/// `POST /v1/workspaces/:id/assets`
#[instrument(skip_all, name = "ws.handler.create_asset")]
pub async fn create_workspace_asset(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Asset>), WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;
    let id: WorkspaceId = id.parse()?;
    let request: CreateAssetRequest = parse_body(&body)?;

    let asset = asset_service::create_asset(&state.pool, claims, id, &request).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}
