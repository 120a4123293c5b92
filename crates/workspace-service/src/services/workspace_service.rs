use super::{ensure_owner, validated};
use crate::errors::{FieldError, WsError};
use crate::models::{CreateWorkspaceRequest, Page, Stem, UpdateWorkspaceRequest, Workspace};
use crate::repositories::workspaces::WorkspaceUpdate;
use crate::repositories::{ProjectsRepository, StemsRepository, WorkspacesRepository};
use chrono::Utc;
use common::types::{ProjectId, StemId, WorkspaceId};
use common::Claims;
use sqlx::PgPool;
use tracing::instrument;

fn not_found() -> WsError {
    WsError::NotFound("Workspace not found".to_string())
}

async fn ensure_project_exists(pool: &PgPool, project_id: ProjectId) -> Result<(), WsError> {
    match ProjectsRepository::find_by_id(pool, project_id).await? {
        Some(_) => Ok(()),
        None => Err(WsError::NotFound("Project not found".to_string())),
    }
}

pub async fn list_stems(pool: &PgPool) -> Result<Vec<Stem>, WsError> {
    StemsRepository::list(pool).await
}

pub async fn get_stem(pool: &PgPool, id: StemId) -> Result<Stem, WsError> {
    StemsRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(|| WsError::NotFound("Stem not found".to_string()))
}

pub async fn list_workspaces(
    pool: &PgPool,
    project_id: ProjectId,
    page: Page,
) -> Result<Vec<Workspace>, WsError> {
    ensure_project_exists(pool, project_id).await?;
    WorkspacesRepository::list_by_project(pool, project_id, page).await
}

pub async fn get_workspace(pool: &PgPool, id: WorkspaceId) -> Result<Workspace, WsError> {
    WorkspacesRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(not_found)
}

#[instrument(skip_all, name = "ws.service.create_workspace", fields(project_id = %project_id))]
pub async fn create_workspace(
    pool: &PgPool,
    claims: &Claims,
    project_id: ProjectId,
    request: &CreateWorkspaceRequest,
) -> Result<Workspace, WsError> {
    validated(request.validate())?;
    ensure_project_exists(pool, project_id).await?;

    if StemsRepository::find_by_id(pool, StemId(request.stem_id))
        .await?
        .is_none()
    {
        return Err(WsError::Validation(vec![FieldError::new(
            "stemId",
            "stemId does not name a known stem",
        )]));
    }

    let workspace = WorkspacesRepository::create(
        pool,
        WorkspaceId::new(),
        project_id,
        request,
        &claims.sub,
        Utc::now(),
    )
    .await?;

    tracing::info!(
        target: "ws.service.workspace",
        workspace_id = %workspace.workspace_id,
        "Workspace created"
    );
    Ok(workspace)
}

/// Partially update a workspace.
///
/// Shrinking the scene is refused with `Conflict` while any asset would end
/// up outside it. Lowering `assetAmountLimit` below the current count is
/// allowed; it only blocks further inserts.
#[instrument(skip_all, name = "ws.service.update_workspace", fields(workspace_id = %id))]
pub async fn update_workspace(
    pool: &PgPool,
    claims: &Claims,
    id: WorkspaceId,
    request: &UpdateWorkspaceRequest,
) -> Result<Workspace, WsError> {
    if !request.has_changes() {
        return Err(WsError::BadRequest("No fields to update".to_string()));
    }
    validated(request.validate())?;

    let current = get_workspace(pool, id).await?;
    ensure_owner(&current.created_by_user_id, claims, "workspace")?;

    match WorkspacesRepository::update(pool, id, request, &claims.sub, Utc::now()).await? {
        WorkspaceUpdate::Updated(workspace) => Ok(workspace),
        WorkspaceUpdate::Missing => Err(not_found()),
        WorkspaceUpdate::AssetsOutOfBounds => Err(WsError::Conflict(
            "Existing assets do not fit within the new workspace bounds".to_string(),
        )),
    }
}

/// Delete a workspace together with its assets.
#[instrument(skip_all, name = "ws.service.delete_workspace", fields(workspace_id = %id))]
pub async fn delete_workspace(
    pool: &PgPool,
    claims: &Claims,
    id: WorkspaceId,
) -> Result<(), WsError> {
    let current = get_workspace(pool, id).await?;
    ensure_owner(&current.created_by_user_id, claims, "workspace")?;

    if !WorkspacesRepository::delete(pool, id).await? {
        return Err(not_found());
    }

    tracing::info!(target: "ws.service.workspace", workspace_id = %id, "Workspace deleted");
    Ok(())
}
