//! Workspaces repository.
//!
//! # Concurrency
//!
//! Writes that depend on the workspace's bounds lock the workspace row
//! (`SELECT ... FOR UPDATE`) for the length of their transaction. Asset
//! inserts and moves take the same lock, so a bounds change and an asset
//! placement never interleave.

use super::{observe, observe_insert};
use crate::errors::WsError;
use crate::models::{CreateWorkspaceRequest, Page, UpdateWorkspaceRequest, Workspace};
use chrono::{DateTime, Utc};
use common::types::{ProjectId, WorkspaceId};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use tracing::instrument;

/// Outcome of a workspace update.
#[derive(Debug)]
pub enum WorkspaceUpdate {
    Updated(Workspace),
    /// The workspace was deleted concurrently.
    Missing,
    /// The new bounds would leave existing assets outside the scene.
    AssetsOutOfBounds,
}

pub struct WorkspacesRepository;

impl WorkspacesRepository {
    /// List a project's workspaces, most recently updated first.
    #[instrument(skip_all, name = "ws.repo.list_workspaces")]
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: ProjectId,
        page: Page,
    ) -> Result<Vec<Workspace>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT workspace_id, project_id, stem_id, name, description,
                   asset_amount_limit, x_max, y_max, z_max,
                   date_created, created_by_user_id, date_updated, updated_by_user_id
            FROM workspace
            WHERE project_id = $1
            ORDER BY date_updated DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(project_id.as_uuid())
        .bind(page.top)
        .bind(page.skip)
        .fetch_all(pool)
        .await;

        observe("list_workspaces", start, result)
    }

    #[instrument(skip_all, name = "ws.repo.get_workspace")]
    pub async fn find_by_id(pool: &PgPool, id: WorkspaceId) -> Result<Option<Workspace>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT workspace_id, project_id, stem_id, name, description,
                   asset_amount_limit, x_max, y_max, z_max,
                   date_created, created_by_user_id, date_updated, updated_by_user_id
            FROM workspace
            WHERE workspace_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await;

        observe("get_workspace", start, result)
    }

    /// Lock a workspace row inside `tx` and return it.
    pub(crate) async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: WorkspaceId,
    ) -> Result<Option<Workspace>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT workspace_id, project_id, stem_id, name, description,
                   asset_amount_limit, x_max, y_max, z_max,
                   date_created, created_by_user_id, date_updated, updated_by_user_id
            FROM workspace
            WHERE workspace_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await;

        observe("lock_workspace", start, result)
    }

    /// Insert a workspace under `project_id`.
    ///
    /// The caller has already checked that the project and stem exist; a
    /// foreign key violation here means the project was deleted in between.
    #[instrument(skip_all, name = "ws.repo.create_workspace")]
    pub async fn create(
        pool: &PgPool,
        id: WorkspaceId,
        project_id: ProjectId,
        request: &CreateWorkspaceRequest,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Workspace, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspace (
                workspace_id, project_id, stem_id, name, description,
                asset_amount_limit, x_max, y_max, z_max,
                date_created, created_by_user_id, date_updated, updated_by_user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $10, $11)
            RETURNING workspace_id, project_id, stem_id, name, description,
                      asset_amount_limit, x_max, y_max, z_max,
                      date_created, created_by_user_id, date_updated, updated_by_user_id
            "#,
        )
        .bind(id.as_uuid()) // $1
        .bind(project_id.as_uuid()) // $2
        .bind(request.stem_id) // $3
        .bind(request.name.trim()) // $4
        .bind(request.description.trim()) // $5
        .bind(request.asset_amount_limit) // $6
        .bind(request.max_x) // $7
        .bind(request.max_y) // $8
        .bind(request.max_z) // $9
        .bind(now) // $10
        .bind(user_id) // $11
        .fetch_one(pool)
        .await;

        observe_insert("create_workspace", start, result, || {
            WsError::NotFound("Project not found".to_string())
        })
    }

    /// Apply a partial update.
    ///
    /// Runs in a transaction holding the workspace row lock, so no asset can
    /// be placed or moved between the bounds check and the update.
    #[instrument(skip_all, name = "ws.repo.update_workspace")]
    pub async fn update(
        pool: &PgPool,
        id: WorkspaceId,
        request: &UpdateWorkspaceRequest,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<WorkspaceUpdate, WsError> {
        let begin = Instant::now();
        let mut tx = observe("begin", begin, pool.begin().await)?;

        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(WorkspaceUpdate::Missing);
        };

        let x_max = request.max_x.unwrap_or(current.x_max);
        let y_max = request.max_y.unwrap_or(current.y_max);
        let z_max = request.max_z.unwrap_or(current.z_max);

        let start = Instant::now();
        let outside = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM asset
                WHERE workspace_id = $1
                  AND (position_x::BIGINT + width_by_x > $2
                       OR position_y::BIGINT + height_by_y > $3
                       OR position_z::BIGINT + length_by_z > $4)
            )
            "#,
        )
        .bind(id.as_uuid())
        .bind(i64::from(x_max))
        .bind(i64::from(y_max))
        .bind(i64::from(z_max))
        .fetch_one(&mut *tx)
        .await;
        if observe("check_asset_bounds", start, outside)? {
            return Ok(WorkspaceUpdate::AssetsOutOfBounds);
        }

        let start = Instant::now();
        let result = sqlx::query_as::<_, Workspace>(
            r#"
            UPDATE workspace
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                asset_amount_limit = COALESCE($4, asset_amount_limit),
                x_max = $5,
                y_max = $6,
                z_max = $7,
                date_updated = $8,
                updated_by_user_id = $9
            WHERE workspace_id = $1
            RETURNING workspace_id, project_id, stem_id, name, description,
                      asset_amount_limit, x_max, y_max, z_max,
                      date_created, created_by_user_id, date_updated, updated_by_user_id
            "#,
        )
        .bind(id.as_uuid())
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.description.as_deref().map(str::trim))
        .bind(request.asset_amount_limit)
        .bind(x_max)
        .bind(y_max)
        .bind(z_max)
        .bind(now)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await;
        let updated = observe("update_workspace", start, result)?;

        let start = Instant::now();
        observe("commit", start, tx.commit().await)?;

        Ok(WorkspaceUpdate::Updated(updated))
    }

    /// Delete a workspace and its assets. Returns whether a row was removed.
    #[instrument(skip_all, name = "ws.repo.delete_workspace")]
    pub async fn delete(pool: &PgPool, id: WorkspaceId) -> Result<bool, WsError> {
        let start = Instant::now();

        let result = sqlx::query("DELETE FROM workspace WHERE workspace_id = $1")
            .bind(id.as_uuid())
            .execute(pool)
            .await;

        observe("delete_workspace", start, result).map(|done| done.rows_affected() > 0)
    }
}
