//! Assets repository.
//!
//! # Security
//!
//! - Asset creation enforces the workspace's `asset_amount_limit` in the same
//!   statement as the insert, while holding the workspace row lock
//! - Placement checks run against the locked workspace row, never a stale copy

use super::workspaces::WorkspacesRepository;
use super::observe;
use crate::errors::WsError;
use crate::models::{Asset, CreateAssetRequest, Page, UpdateAssetRequest, Workspace};
use chrono::{DateTime, Utc};
use common::types::{AssetId, WorkspaceId};
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;

pub struct AssetsRepository;

impl AssetsRepository {
    /// List a workspace's assets, most recently updated first.
    #[instrument(skip_all, name = "ws.repo.list_assets")]
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: WorkspaceId,
        page: Page,
    ) -> Result<Vec<Asset>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Asset>(
            r#"
            SELECT asset_id, workspace_id, asset_external_ref_id,
                   position_x, position_y, position_z, scale,
                   height_by_y, width_by_x, length_by_z,
                   date_created, created_by_user_id, date_updated, updated_by_user_id
            FROM asset
            WHERE workspace_id = $1
            ORDER BY date_updated DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(page.top)
        .bind(page.skip)
        .fetch_all(pool)
        .await;

        observe("list_assets", start, result)
    }

    #[instrument(skip_all, name = "ws.repo.get_asset")]
    pub async fn find_by_id(pool: &PgPool, id: AssetId) -> Result<Option<Asset>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Asset>(
            r#"
            SELECT asset_id, workspace_id, asset_external_ref_id,
                   position_x, position_y, position_z, scale,
                   height_by_y, width_by_x, length_by_z,
                   date_created, created_by_user_id, date_updated, updated_by_user_id
            FROM asset
            WHERE asset_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await;

        observe("get_asset", start, result)
    }

    /// Create an asset with an atomic workspace asset limit check.
    ///
    /// Inside one transaction:
    /// 1. Locks the workspace row (`NotFound` if it is gone)
    /// 2. Runs `admit` against the locked row (bounds checks)
    /// 3. Counts the workspace's assets and inserts only if under the limit,
    ///    in a single CTE statement
    ///
    /// Returns `Some(Asset)` on success, `None` if the limit is reached.
    #[instrument(skip_all, name = "ws.repo.create_asset")]
    pub async fn create_with_limit_check(
        pool: &PgPool,
        id: AssetId,
        workspace_id: WorkspaceId,
        request: &CreateAssetRequest,
        user_id: &str,
        now: DateTime<Utc>,
        admit: impl FnOnce(&Workspace) -> Result<(), WsError>,
    ) -> Result<Option<Asset>, WsError> {
        let begin = Instant::now();
        let mut tx = observe("begin", begin, pool.begin().await)?;

        let workspace = WorkspacesRepository::lock(&mut tx, workspace_id)
            .await?
            .ok_or_else(|| WsError::NotFound("Workspace not found".to_string()))?;
        admit(&workspace)?;

        let start = Instant::now();
        let result = sqlx::query_as::<_, Asset>(
            r#"
            WITH current_count AS (
                SELECT COUNT(*) AS cnt
                FROM asset
                WHERE workspace_id = $2
            )
            INSERT INTO asset (
                asset_id, workspace_id, asset_external_ref_id,
                position_x, position_y, position_z, scale,
                height_by_y, width_by_x, length_by_z,
                date_created, created_by_user_id, date_updated, updated_by_user_id
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $11, $12
            FROM current_count
            WHERE current_count.cnt < $13
            RETURNING asset_id, workspace_id, asset_external_ref_id,
                      position_x, position_y, position_z, scale,
                      height_by_y, width_by_x, length_by_z,
                      date_created, created_by_user_id, date_updated, updated_by_user_id
            "#,
        )
        .bind(id.as_uuid()) // $1
        .bind(workspace_id.as_uuid()) // $2
        .bind(request.asset_ref_id.trim()) // $3
        .bind(request.x) // $4
        .bind(request.y) // $5
        .bind(request.z) // $6
        .bind(request.scale) // $7
        .bind(request.height) // $8
        .bind(request.width) // $9
        .bind(request.length) // $10
        .bind(now) // $11
        .bind(user_id) // $12
        .bind(i64::from(workspace.asset_amount_limit)) // $13
        .fetch_optional(&mut *tx)
        .await;
        let created = observe("create_asset", start, result)?;

        let start = Instant::now();
        observe("commit", start, tx.commit().await)?;

        Ok(created)
    }

    /// Apply a partial update.
    ///
    /// Locks the owning workspace, then the asset, and runs `admit` against
    /// both before writing. Returns `None` if the asset no longer exists.
    #[instrument(skip_all, name = "ws.repo.update_asset")]
    pub async fn update(
        pool: &PgPool,
        id: AssetId,
        workspace_id: WorkspaceId,
        request: &UpdateAssetRequest,
        user_id: &str,
        now: DateTime<Utc>,
        admit: impl FnOnce(&Workspace, &Asset) -> Result<(), WsError>,
    ) -> Result<Option<Asset>, WsError> {
        let begin = Instant::now();
        let mut tx = observe("begin", begin, pool.begin().await)?;

        let Some(workspace) = WorkspacesRepository::lock(&mut tx, workspace_id).await? else {
            return Ok(None);
        };

        let start = Instant::now();
        let current = sqlx::query_as::<_, Asset>(
            r#"
            SELECT asset_id, workspace_id, asset_external_ref_id,
                   position_x, position_y, position_z, scale,
                   height_by_y, width_by_x, length_by_z,
                   date_created, created_by_user_id, date_updated, updated_by_user_id
            FROM asset
            WHERE asset_id = $1 AND workspace_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .bind(workspace_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await;
        let Some(current) = observe("lock_asset", start, current)? else {
            return Ok(None);
        };
        admit(&workspace, &current)?;

        let start = Instant::now();
        let result = sqlx::query_as::<_, Asset>(
            r#"
            UPDATE asset
            SET asset_external_ref_id = COALESCE($2, asset_external_ref_id),
                position_x = COALESCE($3, position_x),
                position_y = COALESCE($4, position_y),
                position_z = COALESCE($5, position_z),
                scale = COALESCE($6, scale),
                height_by_y = COALESCE($7, height_by_y),
                width_by_x = COALESCE($8, width_by_x),
                length_by_z = COALESCE($9, length_by_z),
                date_updated = $10,
                updated_by_user_id = $11
            WHERE asset_id = $1
            RETURNING asset_id, workspace_id, asset_external_ref_id,
                      position_x, position_y, position_z, scale,
                      height_by_y, width_by_x, length_by_z,
                      date_created, created_by_user_id, date_updated, updated_by_user_id
            "#,
        )
        .bind(id.as_uuid()) // $1
        .bind(request.asset_ref_id.as_deref().map(str::trim)) // $2
        .bind(request.x) // $3
        .bind(request.y) // $4
        .bind(request.z) // $5
        .bind(request.scale) // $6
        .bind(request.height) // $7
        .bind(request.width) // $8
        .bind(request.length) // $9
        .bind(now) // $10
        .bind(user_id) // $11
        .fetch_one(&mut *tx)
        .await;
        let updated = observe("update_asset", start, result)?;

        let start = Instant::now();
        observe("commit", start, tx.commit().await)?;

        Ok(Some(updated))
    }

    /// Returns whether a row was removed.
    #[instrument(skip_all, name = "ws.repo.delete_asset")]
    pub async fn delete(pool: &PgPool, id: AssetId) -> Result<bool, WsError> {
        let start = Instant::now();

        let result = sqlx::query("DELETE FROM asset WHERE asset_id = $1")
            .bind(id.as_uuid())
            .execute(pool)
            .await;

        observe("delete_asset", start, result).map(|done| done.rows_affected() > 0)
    }
}
