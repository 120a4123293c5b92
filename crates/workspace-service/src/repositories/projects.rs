//! Projects repository.

use super::{observe, observe_insert};
use crate::errors::{FieldError, WsError};
use crate::models::{CreateProjectRequest, Page, Project, UpdateProjectRequest};
use chrono::{DateTime, Utc};
use common::types::ProjectId;
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;

/// Projects repository for database operations.
pub struct ProjectsRepository;

impl ProjectsRepository {
    /// List projects, most recently updated first.
    #[instrument(skip_all, name = "ws.repo.list_projects")]
    pub async fn list(pool: &PgPool, page: Page) -> Result<Vec<Project>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Project>(
            r#"
            SELECT project_id, project_collaboration_type_id, name, description,
                   date_created, created_by_user_id, date_updated, updated_by_user_id
            FROM project
            ORDER BY date_updated DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.top)
        .bind(page.skip)
        .fetch_all(pool)
        .await;

        observe("list_projects", start, result)
    }

    #[instrument(skip_all, name = "ws.repo.get_project")]
    pub async fn find_by_id(pool: &PgPool, id: ProjectId) -> Result<Option<Project>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Project>(
            r#"
            SELECT project_id, project_collaboration_type_id, name, description,
                   date_created, created_by_user_id, date_updated, updated_by_user_id
            FROM project
            WHERE project_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await;

        observe("get_project", start, result)
    }

    /// Insert a project. An unknown collaboration type is a validation error.
    #[instrument(skip_all, name = "ws.repo.create_project")]
    pub async fn create(
        pool: &PgPool,
        id: ProjectId,
        request: &CreateProjectRequest,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Project, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO project (
                project_id, project_collaboration_type_id, name, description,
                date_created, created_by_user_id, date_updated, updated_by_user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $5, $6)
            RETURNING project_id, project_collaboration_type_id, name, description,
                      date_created, created_by_user_id, date_updated, updated_by_user_id
            "#,
        )
        .bind(id.as_uuid()) // $1
        .bind(request.project_type_id) // $2
        .bind(request.name.trim()) // $3
        .bind(request.description.trim()) // $4
        .bind(now) // $5
        .bind(user_id) // $6
        .fetch_one(pool)
        .await;

        observe_insert("create_project", start, result, || {
            WsError::Validation(vec![FieldError::new(
                "projectTypeId",
                "projectTypeId does not name a known collaboration type",
            )])
        })
    }

    /// Apply a partial update. Returns `None` if the project no longer exists.
    #[instrument(skip_all, name = "ws.repo.update_project")]
    pub async fn update(
        pool: &PgPool,
        id: ProjectId,
        request: &UpdateProjectRequest,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Project>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Project>(
            r#"
            UPDATE project
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                date_updated = $4,
                updated_by_user_id = $5
            WHERE project_id = $1
            RETURNING project_id, project_collaboration_type_id, name, description,
                      date_created, created_by_user_id, date_updated, updated_by_user_id
            "#,
        )
        .bind(id.as_uuid())
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.description.as_deref().map(str::trim))
        .bind(now)
        .bind(user_id)
        .fetch_optional(pool)
        .await;

        observe("update_project", start, result)
    }

    /// Delete a project and, through `ON DELETE CASCADE`, its workspaces and
    /// their assets. Returns whether a row was removed.
    #[instrument(skip_all, name = "ws.repo.delete_project")]
    pub async fn delete(pool: &PgPool, id: ProjectId) -> Result<bool, WsError> {
        let start = Instant::now();

        let result = sqlx::query("DELETE FROM project WHERE project_id = $1")
            .bind(id.as_uuid())
            .execute(pool)
            .await;

        observe("delete_project", start, result).map(|done| done.rows_affected() > 0)
    }
}
