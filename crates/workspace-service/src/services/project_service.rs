use super::{ensure_owner, validated};
use crate::errors::WsError;
use crate::models::{CreateProjectRequest, Page, Project, UpdateProjectRequest};
use crate::repositories::ProjectsRepository;
use chrono::Utc;
use common::types::ProjectId;
use common::Claims;
use sqlx::PgPool;
use tracing::instrument;

fn not_found() -> WsError {
    WsError::NotFound("Project not found".to_string())
}

pub async fn list_projects(pool: &PgPool, page: Page) -> Result<Vec<Project>, WsError> {
    ProjectsRepository::list(pool, page).await
}

pub async fn get_project(pool: &PgPool, id: ProjectId) -> Result<Project, WsError> {
    ProjectsRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(not_found)
}

#[instrument(skip_all, name = "ws.service.create_project")]
pub async fn create_project(
    pool: &PgPool,
    claims: &Claims,
    request: &CreateProjectRequest,
) -> Result<Project, WsError> {
    validated(request.validate())?;

    let project =
        ProjectsRepository::create(pool, ProjectId::new(), request, &claims.sub, Utc::now()).await?;

    tracing::info!(
        target: "ws.service.project",
        project_id = %project.project_id,
        "Project created"
    );
    Ok(project)
}

#[instrument(skip_all, name = "ws.service.update_project", fields(project_id = %id))]
pub async fn update_project(
    pool: &PgPool,
    claims: &Claims,
    id: ProjectId,
    request: &UpdateProjectRequest,
) -> Result<Project, WsError> {
    if !request.has_changes() {
        return Err(WsError::BadRequest("No fields to update".to_string()));
    }
    validated(request.validate())?;

    let current = get_project(pool, id).await?;
    ensure_owner(&current.created_by_user_id, claims, "project")?;

    ProjectsRepository::update(pool, id, request, &claims.sub, Utc::now())
        .await?
        .ok_or_else(not_found)
}

/// Delete a project together with its workspaces and assets.
#[instrument(skip_all, name = "ws.service.delete_project", fields(project_id = %id))]
pub async fn delete_project(pool: &PgPool, claims: &Claims, id: ProjectId) -> Result<(), WsError> {
    let current = get_project(pool, id).await?;
    ensure_owner(&current.created_by_user_id, claims, "project")?;

    if !ProjectsRepository::delete(pool, id).await? {
        return Err(not_found());
    }

    tracing::info!(target: "ws.service.project", project_id = %id, "Project deleted");
    Ok(())
}
